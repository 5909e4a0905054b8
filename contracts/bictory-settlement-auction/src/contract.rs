use super::*;

/// Initialize the auction. The init origin becomes the owner and the deadline
/// is counted from the current slot time.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - The deadline does not fit into a timestamp.
#[init(contract = "BictorySettlementAuction", parameter = "InitParams")]
fn contract_init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    let params: InitParams = ctx.parameter_cursor().get()?;

    let deadline = params
        .duration
        .checked_mul(1000)
        .and_then(|millis| {
            ctx.metadata()
                .slot_time()
                .checked_add(Duration::from_millis(millis))
        })
        .ok_or(CustomContractError::InvalidDuration)?;

    Ok(State::new(
        state_builder,
        ctx.init_origin(),
        deadline,
        params.starting_price,
    ))
}

/// Add the attached amount to the sender's cumulative bid.
///
/// It rejects if:
/// - Sender is a contract.
/// - Auction is finalized or its deadline has passed.
/// - The amount is zero, the first bid is below the starting price, the sender
///   already holds the top bid or the new total does not beat the top bid by
///   the bid increment.
/// - Fails to log `ExcessRefundAvailable` or `BidPlaced` events.
#[receive(
    contract = "BictorySettlementAuction",
    name = "bid",
    mutable,
    payable,
    enable_logger
)]
fn contract_bid<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    amount: Amount,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let bidder = sender_account(ctx)?;

    let outcome = host
        .state_mut()
        .place_bid(bidder, amount, ctx.metadata().slot_time())?;

    if let Some(excess) = outcome.excess {
        logger.log(&CustomEvent::excess_refund_available(bidder, excess))?;
    }

    logger.log(&CustomEvent::bid_placed(bidder, outcome.total))?;

    Ok(())
}

/// Transfer back everything the sender committed above the current minimum
/// required bid.
///
/// It rejects if:
/// - Sender is a contract or the top bidder.
/// - Auction is finalized or its deadline has passed.
/// - There is nothing to withdraw.
/// - The transfer fails.
#[receive(
    contract = "BictorySettlementAuction",
    name = "withdrawExcess",
    mutable,
    enable_logger
)]
fn contract_withdraw_excess<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let bidder = sender_account(ctx)?;

    let excess = host
        .state_mut()
        .withdraw_excess(bidder, ctx.metadata().slot_time())?;

    host.invoke_transfer(&bidder, excess)?;

    logger.log(&CustomEvent::partial_excess_refund(bidder, excess))?;

    Ok(())
}

/// Finalize the auction. Pays the winning bid to the owner and refunds all
/// other bidders, both after deducting the commission.
///
/// The whole settlement is a single call. A failing transfer rejects it and
/// the chain reverts every state change made by the call, so the owner can
/// finalize again.
///
/// It rejects if:
/// - Sender is not the owner.
/// - The deadline has not been reached.
/// - Auction is already finalized or has no bids.
/// - Any transfer fails.
#[receive(
    contract = "BictorySettlementAuction",
    name = "finalize",
    mutable,
    enable_logger
)]
fn contract_finalize<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let settlement = host
        .state_mut()
        .finalize(&ctx.sender(), ctx.metadata().slot_time())?;

    host.invoke_transfer(&settlement.owner, settlement.owner_share)?;
    logger.log(&CustomEvent::auction_closed(
        settlement.winning_bid.bidder,
        settlement.winning_bid.amount,
    ))?;

    for refund in settlement.refunds.iter() {
        host.invoke_transfer(&refund.bidder, refund.refund)?;
        logger.log(&CustomEvent::deposit_reimbursed(refund))?;
    }

    Ok(())
}

/// Sweep whatever balance is left after finalization to the owner.
///
/// It rejects if:
/// - Sender is not the owner.
/// - Auction is not finalized.
#[receive(
    contract = "BictorySettlementAuction",
    name = "emergencyWithdraw",
    mutable,
    enable_logger
)]
fn contract_emergency_withdraw<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let owner = host
        .state()
        .authorize_emergency_withdrawal(&ctx.sender())?;
    let balance = host.self_balance();

    if balance != Amount::zero() {
        host.invoke_transfer(&owner, balance)?;
    }

    logger.log(&CustomEvent::emergency_fund_withdrawn(owner, balance))?;

    Ok(())
}

#[receive(
    contract = "BictorySettlementAuction",
    name = "getTopBid",
    return_value = "Option<Bid>"
)]
fn get_top_bid<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Option<Bid>> {
    Ok(host.state().top_bid())
}

#[receive(
    contract = "BictorySettlementAuction",
    name = "getAuctionDeadline",
    return_value = "Timestamp"
)]
fn get_auction_deadline<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Timestamp> {
    Ok(host.state().deadline())
}

/// Every bid that became the top bid, oldest first.
#[receive(
    contract = "BictorySettlementAuction",
    name = "getAllBids",
    return_value = "Vec<Bid>"
)]
fn get_all_bids<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Vec<Bid>> {
    Ok(host.state().all_bids().to_vec())
}

/// Single entry of the bid log. Rejects with `BidIndexOutOfRange` for unknown
/// indices.
#[receive(
    contract = "BictorySettlementAuction",
    name = "getBid",
    parameter = "u32",
    return_value = "Bid"
)]
fn get_bid<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Bid> {
    let index: u32 = ctx.parameter_cursor().get()?;
    host.state().bid_at(index)
}

#[receive(
    contract = "BictorySettlementAuction",
    name = "getUserBidHistory",
    parameter = "AccountAddress",
    return_value = "Vec<Amount>"
)]
fn get_user_bid_history<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Vec<Amount>> {
    let account: AccountAddress = ctx.parameter_cursor().get()?;
    Ok(host.state().user_bid_history(&account))
}

#[receive(
    contract = "BictorySettlementAuction",
    name = "getUserTotalBid",
    parameter = "AccountAddress",
    return_value = "Amount"
)]
fn get_user_total_bid<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Amount> {
    let account: AccountAddress = ctx.parameter_cursor().get()?;
    Ok(host.state().user_total_bid(&account))
}

#[receive(
    contract = "BictorySettlementAuction",
    name = "isAuctionFinalized",
    return_value = "bool"
)]
fn is_auction_finalized<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<bool> {
    Ok(host.state().is_finalized())
}

#[receive(
    contract = "BictorySettlementAuction",
    name = "getOwner",
    return_value = "AccountAddress"
)]
fn get_owner<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<AccountAddress> {
    Ok(host.state().owner())
}

/// Cumulative total the next challenger has to exceed.
#[receive(
    contract = "BictorySettlementAuction",
    name = "getMinimumRequired",
    return_value = "Amount"
)]
fn get_minimum_required<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Amount> {
    host.state().minimum_required()
}

/// Amount `withdrawExcess` would transfer to the given account right now.
#[receive(
    contract = "BictorySettlementAuction",
    name = "getAvailableExcess",
    parameter = "AccountAddress",
    return_value = "Amount"
)]
fn get_available_excess<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Amount> {
    let account: AccountAddress = ctx.parameter_cursor().get()?;
    host.state().available_excess(&account)
}

/// View function that returns a summary of the auction.
#[receive(
    contract = "BictorySettlementAuction",
    name = "view",
    return_value = "AuctionView"
)]
fn view<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<AuctionView> {
    host.state().view()
}

// Only accounts can receive transfers, so only accounts may take part.
fn sender_account(ctx: &impl HasReceiveContext) -> ContractResult<AccountAddress> {
    match ctx.sender() {
        Address::Account(account) => Ok(account),
        Address::Contract(_) => Err(CustomContractError::OnlyAccountAddress),
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use test_infrastructure::*;

    const OWNER: AccountAddress = AccountAddress([0u8; 32]);
    const ALICE: AccountAddress = AccountAddress([1u8; 32]);
    const BOB: AccountAddress = AccountAddress([2u8; 32]);
    const CAROL: AccountAddress = AccountAddress([3u8; 32]);
    const SOME_CONTRACT: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };

    const START: u64 = 1_000_000;
    const DURATION_SECS: u64 = 60 * 60;
    const DEADLINE: u64 = START + DURATION_SECS * 1000;

    fn at(millis: u64) -> Timestamp {
        Timestamp::from_timestamp_millis(millis)
    }

    fn micro(amount: u64) -> Amount {
        Amount::from_micro_ccd(amount)
    }

    fn default_host() -> TestHost<State<TestStateApi>> {
        let mut ctx = TestInitContext::empty();
        let params = InitParams {
            duration: DURATION_SECS,
            starting_price: micro(100),
        };
        let bytes = to_bytes(&params);
        ctx.set_init_origin(OWNER)
            .set_parameter(&bytes)
            .set_metadata_slot_time(at(START));
        let mut state_builder = TestStateBuilder::new();

        // Call the init method.
        let state = contract_init(&ctx, &mut state_builder)
            .expect_report("Failed during init_BictorySettlementAuction");

        TestHost::new(state, state_builder)
    }

    fn account_ctx<'a>(sender: AccountAddress, slot_time: u64) -> TestReceiveContext<'a> {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(sender))
            .set_metadata_slot_time(at(slot_time));
        ctx
    }

    // Mirrors the chain: the attached amount is part of the balance during the
    // call and is taken back if the call is rejected.
    fn place_bid(
        host: &mut TestHost<State<TestStateApi>>,
        logger: &mut TestLogger,
        bidder: AccountAddress,
        amount: u64,
        slot_time: u64,
    ) -> ContractResult<()> {
        let ctx = account_ctx(bidder, slot_time);
        let balance = host.self_balance();
        host.set_self_balance(micro(balance.micro_ccd + amount));

        let result = contract_bid(&ctx, host, micro(amount), logger);
        if result.is_err() {
            host.set_self_balance(balance);
        }

        result
    }

    fn committed_sum(host: &TestHost<State<TestStateApi>>) -> u64 {
        host.state()
            .total_committed
            .iter()
            .map(|(_, amount)| amount.micro_ccd)
            .sum()
    }

    fn claim_balanced(host: &TestHost<State<TestStateApi>>) {
        claim_eq!(
            committed_sum(host),
            host.self_balance().micro_ccd,
            "Committed funds must match the contract balance"
        );
    }

    #[concordium_test]
    fn test_init() {
        let host = default_host();
        let ctx = TestReceiveContext::empty();

        claim_eq!(get_owner(&ctx, &host), Ok(OWNER));
        claim_eq!(get_auction_deadline(&ctx, &host), Ok(at(DEADLINE)));
        claim_eq!(get_top_bid(&ctx, &host), Ok(None));
        claim_eq!(is_auction_finalized(&ctx, &host), Ok(false));
        claim_eq!(get_all_bids(&ctx, &host), Ok(Vec::new()));
        claim_eq!(
            view(&ctx, &host),
            Ok(AuctionView {
                owner: OWNER,
                deadline: at(DEADLINE),
                starting_price: micro(100),
                finalized: false,
                top_bid: None,
                bid_count: 0,
                minimum_required: Amount::zero(),
            })
        );
    }

    #[concordium_test]
    fn test_init_invalid_duration() {
        let mut ctx = TestInitContext::empty();
        let params = InitParams {
            duration: u64::MAX,
            starting_price: micro(100),
        };
        let bytes = to_bytes(&params);
        ctx.set_init_origin(OWNER)
            .set_parameter(&bytes)
            .set_metadata_slot_time(at(START));
        let mut state_builder = TestStateBuilder::new();

        let result = contract_init(&ctx, &mut state_builder);
        claim_eq!(
            result.err(),
            Some(CustomContractError::InvalidDuration.into()),
            "Deadline overflow must be rejected with InvalidDuration"
        );
    }

    #[concordium_test]
    fn test_bid_ladder() {
        let mut host = default_host();
        let mut logger = TestLogger::init();

        // Below the starting price
        claim_eq!(
            place_bid(&mut host, &mut logger, ALICE, 99, START),
            Err(CustomContractError::BelowStartingPrice)
        );
        claim_eq!(
            place_bid(&mut host, &mut logger, ALICE, 100, START),
            Ok(())
        );
        claim_balanced(&host);

        // 104 does not exceed 100 + 5%
        claim_eq!(
            place_bid(&mut host, &mut logger, BOB, 104, START + 1),
            Err(CustomContractError::BidTooLow)
        );
        claim_eq!(
            place_bid(&mut host, &mut logger, BOB, 106, START + 1),
            Ok(())
        );
        claim_balanced(&host);

        claim_eq!(
            place_bid(&mut host, &mut logger, BOB, 10, START + 2),
            Err(CustomContractError::AlreadyTopBidder)
        );
        claim_eq!(
            place_bid(&mut host, &mut logger, CAROL, 0, START + 2),
            Err(CustomContractError::ZeroBid)
        );

        let ctx = TestReceiveContext::empty();
        claim_eq!(
            get_top_bid(&ctx, &host),
            Ok(Some(Bid {
                bidder: BOB,
                amount: micro(106)
            }))
        );
        claim_eq!(get_minimum_required(&ctx, &host), Ok(micro(111)));
        claim_balanced(&host);

        claim_eq!(
            logger.logs,
            vec![
                to_bytes(&CustomEvent::bid_placed(ALICE, micro(100))),
                to_bytes(&CustomEvent::excess_refund_available(BOB, micro(1))),
                to_bytes(&CustomEvent::bid_placed(BOB, micro(106))),
            ]
        );
    }

    #[concordium_test]
    fn test_bid_from_contract() {
        let mut host = default_host();
        let mut logger = TestLogger::init();
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Contract(SOME_CONTRACT))
            .set_metadata_slot_time(at(START));

        let result = contract_bid(&ctx, &mut host, micro(100), &mut logger);
        claim_eq!(result, Err(CustomContractError::OnlyAccountAddress));
        claim!(logger.logs.is_empty());
    }

    #[concordium_test]
    fn test_withdraw_excess_from_contract() {
        let mut host = default_host();
        let mut logger = TestLogger::init();
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Contract(SOME_CONTRACT))
            .set_metadata_slot_time(at(START));

        let result = contract_withdraw_excess(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::OnlyAccountAddress));
        claim!(host.get_transfers().is_empty());
        claim!(logger.logs.is_empty());
    }

    #[concordium_test]
    fn test_bid_history_queries() {
        let mut host = default_host();
        let mut logger = TestLogger::init();

        for (bidder, amount) in [(ALICE, 100), (BOB, 106), (ALICE, 12)] {
            claim_eq!(
                place_bid(&mut host, &mut logger, bidder, amount, START),
                Ok(())
            );
        }

        let mut ctx = TestReceiveContext::empty();
        let alice = to_bytes(&ALICE);
        ctx.set_parameter(&alice);
        claim_eq!(
            get_user_bid_history(&ctx, &host),
            Ok(vec![micro(100), micro(12)])
        );
        claim_eq!(get_user_total_bid(&ctx, &host), Ok(micro(112)));
        claim_eq!(get_available_excess(&ctx, &host), Ok(Amount::zero()));

        let mut ctx = TestReceiveContext::empty();
        let carol = to_bytes(&CAROL);
        ctx.set_parameter(&carol);
        claim_eq!(get_user_bid_history(&ctx, &host), Ok(Vec::new()));
        claim_eq!(get_user_total_bid(&ctx, &host), Ok(Amount::zero()));

        let mut ctx = TestReceiveContext::empty();
        let index = to_bytes(&1u32);
        ctx.set_parameter(&index);
        claim_eq!(
            get_bid(&ctx, &host),
            Ok(Bid {
                bidder: BOB,
                amount: micro(106)
            })
        );

        let mut ctx = TestReceiveContext::empty();
        let index = to_bytes(&3u32);
        ctx.set_parameter(&index);
        claim_eq!(
            get_bid(&ctx, &host),
            Err(CustomContractError::BidIndexOutOfRange)
        );

        let ctx = TestReceiveContext::empty();
        claim_eq!(get_all_bids(&ctx, &host).map(|bids| bids.len()), Ok(3));
        claim_eq!(view(&ctx, &host).map(|view| view.bid_count), Ok(3));
    }

    #[concordium_test]
    fn test_late_bid_extends_deadline() {
        let mut host = default_host();
        let mut logger = TestLogger::init();
        let ctx = TestReceiveContext::empty();

        claim_eq!(
            place_bid(&mut host, &mut logger, ALICE, 100, DEADLINE - 60 * 1000),
            Ok(())
        );
        claim_eq!(
            get_auction_deadline(&ctx, &host),
            Ok(at(DEADLINE + EXTENSION_WINDOW_MILLIS))
        );

        // Old deadline has passed, the extended one has not
        claim_eq!(
            place_bid(&mut host, &mut logger, BOB, 106, DEADLINE + 1),
            Ok(())
        );
        claim_eq!(
            get_auction_deadline(&ctx, &host),
            Ok(at(DEADLINE + 2 * EXTENSION_WINDOW_MILLIS))
        );

        claim_eq!(
            place_bid(
                &mut host,
                &mut logger,
                CAROL,
                200,
                DEADLINE + 2 * EXTENSION_WINDOW_MILLIS
            ),
            Err(CustomContractError::AuctionFinished)
        );
    }

    #[concordium_test]
    fn test_withdraw_excess() {
        let mut host = default_host();
        let mut logger = TestLogger::init();

        // Bob committed 150 while the ladder was lower, Alice leads with 106
        {
            let state = host.state_mut();
            let top = Bid {
                bidder: ALICE,
                amount: micro(106),
            };
            state.top_bid = Some(top);
            state.all_bids.push(top);
            state.total_committed.insert(ALICE, micro(106));
            state.total_committed.insert(BOB, micro(150));
        }
        host.set_self_balance(micro(256));

        let ctx = account_ctx(ALICE, START);
        claim_eq!(
            contract_withdraw_excess(&ctx, &mut host, &mut logger),
            Err(CustomContractError::TopBidderCannotWithdraw)
        );

        let ctx = account_ctx(CAROL, START);
        claim_eq!(
            contract_withdraw_excess(&ctx, &mut host, &mut logger),
            Err(CustomContractError::InsufficientExcess)
        );

        let ctx = account_ctx(BOB, START);
        claim_eq!(
            contract_withdraw_excess(&ctx, &mut host, &mut logger),
            Ok(())
        );
        claim!(host.transfer_occurred(&BOB, micro(39)));
        claim_eq!(host.state().user_total_bid(&BOB), micro(111));
        claim_balanced(&host);
        claim_eq!(
            logger.logs,
            vec![to_bytes(&CustomEvent::partial_excess_refund(BOB, micro(39)))]
        );

        let ctx = account_ctx(BOB, DEADLINE);
        claim_eq!(
            contract_withdraw_excess(&ctx, &mut host, &mut logger),
            Err(CustomContractError::AuctionFinished)
        );
    }

    #[concordium_test]
    fn test_finalize_and_sweep() {
        let mut host = default_host();
        let mut logger = TestLogger::init();

        for (bidder, amount) in [(ALICE, 100), (BOB, 106), (ALICE, 12)] {
            claim_eq!(
                place_bid(&mut host, &mut logger, bidder, amount, START),
                Ok(())
            );
        }
        claim_balanced(&host);
        claim_eq!(host.self_balance(), micro(218));

        let ctx = account_ctx(OWNER, DEADLINE - 1);
        claim_eq!(
            contract_finalize(&ctx, &mut host, &mut logger),
            Err(CustomContractError::AuctionStillActive)
        );

        let ctx = account_ctx(BOB, DEADLINE);
        claim_eq!(
            contract_finalize(&ctx, &mut host, &mut logger),
            Err(CustomContractError::Unauthorized)
        );

        // Sweeping is only possible after finalization
        let ctx = account_ctx(OWNER, DEADLINE);
        claim_eq!(
            contract_emergency_withdraw(&ctx, &mut host, &mut logger),
            Err(CustomContractError::AuctionNotFinalized)
        );

        let mut logger = TestLogger::init();
        claim_eq!(contract_finalize(&ctx, &mut host, &mut logger), Ok(()));

        // 112 - 2% to the owner, 106 - 2% back to Bob
        claim_eq!(
            host.get_transfers(),
            vec![(OWNER, micro(110)), (BOB, micro(104))]
        );
        claim_eq!(
            logger.logs,
            vec![
                to_bytes(&CustomEvent::auction_closed(ALICE, micro(112))),
                to_bytes(&CustomEvent::deposit_reimbursed(&Refund {
                    bidder: BOB,
                    refund: micro(104),
                    fee: micro(2),
                })),
            ]
        );
        claim_eq!(host.state().user_total_bid(&BOB), Amount::zero());
        claim_eq!(
            is_auction_finalized(&TestReceiveContext::empty(), &host),
            Ok(true)
        );

        claim_eq!(
            contract_finalize(&ctx, &mut host, &mut logger),
            Err(CustomContractError::AuctionFinalized)
        );
        claim_eq!(
            place_bid(&mut host, &mut logger, CAROL, 500, START),
            Err(CustomContractError::AuctionFinalized)
        );
        let bob_ctx = account_ctx(BOB, START);
        claim_eq!(
            contract_withdraw_excess(&bob_ctx, &mut host, &mut logger),
            Err(CustomContractError::AuctionFinalized)
        );

        // Commissions are the only funds left
        claim_eq!(host.self_balance(), micro(4));

        let bob_ctx = account_ctx(BOB, DEADLINE);
        claim_eq!(
            contract_emergency_withdraw(&bob_ctx, &mut host, &mut logger),
            Err(CustomContractError::Unauthorized)
        );

        let mut logger = TestLogger::init();
        claim_eq!(
            contract_emergency_withdraw(&ctx, &mut host, &mut logger),
            Ok(())
        );
        claim!(host.transfer_occurred(&OWNER, micro(4)));
        claim_eq!(host.self_balance(), Amount::zero());
        claim_eq!(
            logger.logs,
            vec![to_bytes(&CustomEvent::emergency_fund_withdrawn(
                OWNER,
                micro(4)
            ))]
        );
    }

    #[concordium_test]
    fn test_emergency_withdraw_empty_balance() {
        let mut host = default_host();
        let mut logger = TestLogger::init();

        claim_eq!(
            place_bid(&mut host, &mut logger, ALICE, 100, START),
            Ok(())
        );
        let ctx = account_ctx(OWNER, DEADLINE);
        claim_eq!(contract_finalize(&ctx, &mut host, &mut logger), Ok(()));
        claim_eq!(host.get_transfers(), vec![(OWNER, micro(98))]);

        // Commission already taken out of the contract
        host.set_self_balance(Amount::zero());

        let mut logger = TestLogger::init();
        claim_eq!(
            contract_emergency_withdraw(&ctx, &mut host, &mut logger),
            Ok(())
        );
        claim_eq!(host.get_transfers(), vec![(OWNER, micro(98))]);
        claim_eq!(
            logger.logs,
            vec![to_bytes(&CustomEvent::emergency_fund_withdrawn(
                OWNER,
                Amount::zero()
            ))]
        );
    }

    #[concordium_test]
    fn test_finalize_without_bids() {
        let mut host = default_host();
        let mut logger = TestLogger::init();

        let ctx = account_ctx(OWNER, DEADLINE);
        claim_eq!(
            contract_finalize(&ctx, &mut host, &mut logger),
            Err(CustomContractError::NoValidBids)
        );
        claim!(!host.state().is_finalized());
    }

    #[concordium_test]
    fn test_finalize_transfer_failure() {
        let mut host = default_host();
        let mut logger = TestLogger::init();

        claim_eq!(
            place_bid(&mut host, &mut logger, ALICE, 100, START),
            Ok(())
        );
        claim_eq!(
            place_bid(&mut host, &mut logger, BOB, 106, START),
            Ok(())
        );

        // Funds went missing, the owner payout cannot be made
        host.set_self_balance(micro(50));

        let ctx = account_ctx(OWNER, DEADLINE);
        claim_eq!(
            contract_finalize(&ctx, &mut host, &mut logger),
            Err(CustomContractError::InvokeTransferError)
        );
        claim!(host.get_transfers().is_empty());
    }
}
