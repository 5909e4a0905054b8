use super::*;
use core::convert::TryFrom;

// Functions for creating, querying and updating the contract state.
impl<S: HasStateApi> State<S> {
    /// Creates a new open auction without bids.
    pub fn new(
        state_builder: &mut StateBuilder<S>,
        owner: AccountAddress,
        deadline: Timestamp,
        starting_price: Amount,
    ) -> Self {
        State {
            owner,
            deadline,
            starting_price,
            finalized: false,
            top_bid: None,
            all_bids: Vec::new(),
            total_committed: state_builder.new_map(),
            bid_history: state_builder.new_map(),
        }
    }

    pub fn owner(&self) -> AccountAddress {
        self.owner
    }

    pub fn deadline(&self) -> Timestamp {
        self.deadline
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn top_bid(&self) -> Option<Bid> {
        self.top_bid
    }

    pub fn all_bids(&self) -> &[Bid] {
        &self.all_bids
    }

    pub fn bid_at(&self, index: u32) -> Result<Bid, CustomContractError> {
        self.all_bids
            .get(index as usize)
            .copied()
            .ok_or(CustomContractError::BidIndexOutOfRange)
    }

    pub fn user_total_bid(&self, account: &AccountAddress) -> Amount {
        self.total_committed
            .get(account)
            .map(|amount| *amount)
            .unwrap_or_else(Amount::zero)
    }

    pub fn user_bid_history(&self, account: &AccountAddress) -> Vec<Amount> {
        self.bid_history
            .get(account)
            .map(|history| history.to_vec())
            .unwrap_or_default()
    }

    /// Cumulative total a challenger has to exceed. Zero before the first bid.
    pub fn minimum_required(&self) -> Result<Amount, CustomContractError> {
        match self.top_bid {
            Some(top) => minimum_required(top.amount).ok_or(CustomContractError::Overflow),
            None => Ok(Amount::zero()),
        }
    }

    /// Amount `withdraw_excess` would currently pay out to `account`.
    pub fn available_excess(
        &self,
        account: &AccountAddress,
    ) -> Result<Amount, CustomContractError> {
        if self.top_bid.map(|top| top.bidder) == Some(*account) {
            return Ok(Amount::zero());
        }

        let minimum = self.minimum_required()?;
        let total = self.user_total_bid(account);

        Ok(Amount::from_micro_ccd(
            total.micro_ccd.saturating_sub(minimum.micro_ccd),
        ))
    }

    pub fn view(&self) -> Result<AuctionView, CustomContractError> {
        Ok(AuctionView {
            owner: self.owner,
            deadline: self.deadline,
            starting_price: self.starting_price,
            finalized: self.finalized,
            top_bid: self.top_bid,
            bid_count: u32::try_from(self.all_bids.len())
                .map_err(|_| CustomContractError::Overflow)?,
            minimum_required: self.minimum_required()?,
        })
    }

    /// Add `amount` to the cumulative bid of `bidder`.
    ///
    /// All checks happen before the state is touched, so a rejected bid leaves
    /// the state as it was.
    pub fn place_bid(
        &mut self,
        bidder: AccountAddress,
        amount: Amount,
        slot_time: Timestamp,
    ) -> Result<BidOutcome, CustomContractError> {
        ensure!(!self.finalized, CustomContractError::AuctionFinalized);
        ensure!(slot_time < self.deadline, CustomContractError::AuctionFinished);
        ensure!(amount > Amount::zero(), CustomContractError::ZeroBid);

        let total = self
            .user_total_bid(&bidder)
            .micro_ccd
            .checked_add(amount.micro_ccd)
            .map(Amount::from_micro_ccd)
            .ok_or(CustomContractError::Overflow)?;

        let minimum = match self.top_bid {
            None => {
                ensure!(
                    amount >= self.starting_price,
                    CustomContractError::BelowStartingPrice
                );
                None
            }
            Some(top) => {
                ensure_ne!(bidder, top.bidder, CustomContractError::AlreadyTopBidder);
                let minimum = self.minimum_required()?;
                ensure!(total > minimum, CustomContractError::BidTooLow);
                Some(minimum)
            }
        };

        let promoted = self.top_bid.map_or(true, |top| total > top.amount);

        // Remaining time is measured before the bid, the extension is added to
        // the old deadline
        let remaining = self.deadline.timestamp_millis() - slot_time.timestamp_millis();
        let extended_deadline = if promoted && remaining <= EXTENSION_WINDOW_MILLIS {
            let deadline = self
                .deadline
                .checked_add(Duration::from_millis(EXTENSION_WINDOW_MILLIS))
                .ok_or(CustomContractError::Overflow)?;
            Some(deadline)
        } else {
            None
        };

        self.total_committed.insert(bidder, total);
        self.bid_history
            .entry(bidder)
            .or_insert_with(Vec::new)
            .push(amount);

        // Informational only, funds stay with the contract
        let excess = minimum
            .filter(|minimum| total > *minimum)
            .map(|minimum| Amount::from_micro_ccd(total.micro_ccd - minimum.micro_ccd));

        if promoted {
            let bid = Bid {
                bidder,
                amount: total,
            };
            self.top_bid = Some(bid);
            self.all_bids.push(bid);
        }
        if let Some(deadline) = extended_deadline {
            self.deadline = deadline;
        }

        Ok(BidOutcome {
            total,
            excess,
            promoted,
            extended_deadline,
        })
    }

    /// Lower the commitment of a non-leading bidder to the required minimum and
    /// return the difference that MUST be transferred back.
    pub fn withdraw_excess(
        &mut self,
        bidder: AccountAddress,
        slot_time: Timestamp,
    ) -> Result<Amount, CustomContractError> {
        ensure!(!self.finalized, CustomContractError::AuctionFinalized);
        ensure!(slot_time < self.deadline, CustomContractError::AuctionFinished);
        if let Some(top) = self.top_bid {
            ensure_ne!(
                bidder,
                top.bidder,
                CustomContractError::TopBidderCannotWithdraw
            );
        }

        let minimum = self.minimum_required()?;
        let total = self.user_total_bid(&bidder);
        ensure!(total > minimum, CustomContractError::InsufficientExcess);

        self.total_committed.insert(bidder, minimum);

        Ok(Amount::from_micro_ccd(total.micro_ccd - minimum.micro_ccd))
    }

    /// Close the auction and return the transfers that settle it.
    ///
    /// The auction is marked finalized and losing deposits are cleared before
    /// anything is returned, so no transfer can observe an open auction.
    pub fn finalize(
        &mut self,
        sender: &Address,
        slot_time: Timestamp,
    ) -> Result<Settlement, CustomContractError> {
        ensure!(
            sender.matches_account(&self.owner),
            CustomContractError::Unauthorized
        );
        ensure!(
            slot_time >= self.deadline,
            CustomContractError::AuctionStillActive
        );
        ensure!(!self.finalized, CustomContractError::AuctionFinalized);
        let winning_bid = self.top_bid.ok_or(CustomContractError::NoValidBids)?;

        self.finalized = true;

        let mut refunds = Vec::new();
        for bid in self.all_bids.iter() {
            if bid.bidder == winning_bid.bidder {
                continue;
            }

            let total = self
                .total_committed
                .get(&bid.bidder)
                .map(|amount| *amount)
                .unwrap_or_else(Amount::zero);
            // Bidders appearing more than once were cleared on first encounter
            if total == Amount::zero() {
                continue;
            }

            self.total_committed.insert(bid.bidder, Amount::zero());

            let payout = deduct_commission(total);
            refunds.push(Refund {
                bidder: bid.bidder,
                refund: payout.amount,
                fee: payout.fee,
            });
        }

        Ok(Settlement {
            owner: self.owner,
            winning_bid,
            owner_share: deduct_commission(winning_bid.amount).amount,
            refunds,
        })
    }

    /// Ensure the remaining balance may be swept and return the receiver.
    pub fn authorize_emergency_withdrawal(
        &self,
        sender: &Address,
    ) -> Result<AccountAddress, CustomContractError> {
        ensure!(
            sender.matches_account(&self.owner),
            CustomContractError::Unauthorized
        );
        ensure!(self.finalized, CustomContractError::AuctionNotFinalized);

        Ok(self.owner)
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

    const START: u64 = 1_000_000;
    const DEADLINE: u64 = START + 1000 * 60 * 60;

    fn at(millis: u64) -> Timestamp {
        Timestamp::from_timestamp_millis(millis)
    }

    fn micro(amount: u64) -> Amount {
        Amount::from_micro_ccd(amount)
    }

    fn new_state() -> State<TestStateApi> {
        let mut state_builder = TestStateBuilder::new();
        State::new(&mut state_builder, OWNER, at(DEADLINE), micro(100))
    }

    fn committed_sum(state: &State<TestStateApi>) -> u64 {
        state
            .total_committed
            .iter()
            .map(|(_, amount)| amount.micro_ccd)
            .sum()
    }

    #[concordium_test]
    fn test_first_bid_against_starting_price() {
        let mut state = new_state();

        claim_eq!(
            state.place_bid(ALICE, micro(99), at(START)),
            Err(CustomContractError::BelowStartingPrice)
        );
        claim_eq!(state.top_bid(), None);
        claim_eq!(state.user_total_bid(&ALICE), Amount::zero());

        let outcome = state
            .place_bid(ALICE, micro(100), at(START))
            .expect_report("First bid at starting price should pass");
        claim_eq!(
            outcome,
            BidOutcome {
                total: micro(100),
                excess: None,
                promoted: true,
                extended_deadline: None,
            }
        );
        claim_eq!(
            state.top_bid(),
            Some(Bid {
                bidder: ALICE,
                amount: micro(100)
            })
        );
        claim_eq!(state.all_bids().len(), 1);
        claim_eq!(state.user_bid_history(&ALICE), vec![micro(100)]);
    }

    #[concordium_test]
    fn test_zero_bid() {
        let mut state = new_state();
        claim_eq!(
            state.place_bid(ALICE, Amount::zero(), at(START)),
            Err(CustomContractError::ZeroBid)
        );
    }

    #[concordium_test]
    fn test_bid_increment() {
        let mut state = new_state();
        state
            .place_bid(ALICE, micro(100), at(START))
            .expect_report("First bid should pass");

        // 104 does not exceed 100 + 5%
        claim_eq!(
            state.place_bid(BOB, micro(104), at(START)),
            Err(CustomContractError::BidTooLow)
        );
        // Exactly the minimum is not enough either
        claim_eq!(
            state.place_bid(BOB, micro(105), at(START)),
            Err(CustomContractError::BidTooLow)
        );
        claim_eq!(state.user_total_bid(&BOB), Amount::zero());
        claim!(state.user_bid_history(&BOB).is_empty());

        let outcome = state
            .place_bid(BOB, micro(106), at(START))
            .expect_report("Bid above the increment should pass");
        claim_eq!(outcome.total, micro(106));
        claim_eq!(outcome.excess, Some(micro(1)));
        claim!(outcome.promoted);
        claim_eq!(
            state.top_bid(),
            Some(Bid {
                bidder: BOB,
                amount: micro(106)
            })
        );
        claim_eq!(committed_sum(&state), 206);
    }

    #[concordium_test]
    fn test_top_bidder_cannot_raise() {
        let mut state = new_state();
        state
            .place_bid(ALICE, micro(100), at(START))
            .expect_report("First bid should pass");
        claim_eq!(
            state.place_bid(ALICE, micro(50), at(START)),
            Err(CustomContractError::AlreadyTopBidder)
        );
    }

    #[concordium_test]
    fn test_cumulative_bids() {
        let mut state = new_state();
        state
            .place_bid(ALICE, micro(100), at(START))
            .expect_report("Alice bid should pass");
        state
            .place_bid(BOB, micro(106), at(START))
            .expect_report("Bob bid should pass");

        // Alice needs more than 111 in total, she already has 100
        claim_eq!(
            state.place_bid(ALICE, micro(11), at(START)),
            Err(CustomContractError::BidTooLow)
        );
        let outcome = state
            .place_bid(ALICE, micro(12), at(START))
            .expect_report("Top up above the increment should pass");
        claim_eq!(outcome.total, micro(112));
        claim_eq!(outcome.excess, Some(micro(1)));

        claim_eq!(state.user_bid_history(&ALICE), vec![micro(100), micro(12)]);
        claim_eq!(
            state.all_bids(),
            &[
                Bid {
                    bidder: ALICE,
                    amount: micro(100)
                },
                Bid {
                    bidder: BOB,
                    amount: micro(106)
                },
                Bid {
                    bidder: ALICE,
                    amount: micro(112)
                },
            ][..]
        );
        claim_eq!(state.bid_at(2), Ok(state.all_bids()[2]));
        claim_eq!(state.bid_at(3), Err(CustomContractError::BidIndexOutOfRange));
        claim_eq!(committed_sum(&state), 218);
    }

    #[concordium_test]
    fn test_late_bid_extends_deadline() {
        let mut state = new_state();

        // Eleven minutes left, no extension
        let outcome = state
            .place_bid(ALICE, micro(100), at(DEADLINE - 11 * 60 * 1000))
            .expect_report("Bid should pass");
        claim_eq!(outcome.extended_deadline, None);
        claim_eq!(state.deadline(), at(DEADLINE));

        // Exactly ten minutes left extends from the old deadline
        let outcome = state
            .place_bid(BOB, micro(106), at(DEADLINE - EXTENSION_WINDOW_MILLIS))
            .expect_report("Bid should pass");
        let extended = at(DEADLINE + EXTENSION_WINDOW_MILLIS);
        claim_eq!(outcome.extended_deadline, Some(extended));
        claim_eq!(state.deadline(), extended);

        // One millisecond before the new deadline
        state
            .place_bid(CAROL, micro(112), at(DEADLINE + EXTENSION_WINDOW_MILLIS - 1))
            .expect_report("Bid should pass");
        claim_eq!(
            state.deadline(),
            at(DEADLINE + 2 * EXTENSION_WINDOW_MILLIS)
        );
    }

    #[concordium_test]
    fn test_bid_after_deadline() {
        let mut state = new_state();
        claim_eq!(
            state.place_bid(ALICE, micro(100), at(DEADLINE)),
            Err(CustomContractError::AuctionFinished)
        );
    }

    #[concordium_test]
    fn test_cumulative_total_overflow() {
        let mut state = new_state();
        state
            .place_bid(ALICE, micro(100), at(START))
            .expect_report("Alice bid should pass");
        state
            .place_bid(BOB, micro(u64::MAX), at(START))
            .expect_report("Bob bid should pass");

        claim_eq!(
            state.place_bid(ALICE, micro(u64::MAX), at(START)),
            Err(CustomContractError::Overflow)
        );
        claim_eq!(state.user_total_bid(&ALICE), micro(100));
        claim_eq!(state.user_bid_history(&ALICE), vec![micro(100)]);
        claim_eq!(
            state.top_bid(),
            Some(Bid {
                bidder: BOB,
                amount: micro(u64::MAX)
            })
        );
        claim_eq!(state.all_bids().len(), 2);
    }

    #[concordium_test]
    fn test_deadline_extension_overflow() {
        let mut state_builder = TestStateBuilder::new();
        let deadline = at(u64::MAX - 1);
        let mut state = State::new(&mut state_builder, OWNER, deadline, micro(100));

        claim_eq!(
            state.place_bid(ALICE, micro(100), at(u64::MAX - 2)),
            Err(CustomContractError::Overflow)
        );
        claim_eq!(state.deadline(), deadline);
        claim_eq!(state.top_bid(), None);
        claim!(state.all_bids().is_empty());
        claim_eq!(state.user_total_bid(&ALICE), Amount::zero());
        claim!(state.user_bid_history(&ALICE).is_empty());
    }

    #[concordium_test]
    fn test_withdraw_excess() {
        let mut state = new_state();
        state.top_bid = Some(Bid {
            bidder: ALICE,
            amount: micro(106),
        });
        state.all_bids.push(state.top_bid.unwrap());
        state.total_committed.insert(ALICE, micro(106));
        state.total_committed.insert(BOB, micro(150));

        claim_eq!(state.available_excess(&BOB), Ok(micro(39)));
        claim_eq!(state.available_excess(&ALICE), Ok(Amount::zero()));

        claim_eq!(
            state.withdraw_excess(ALICE, at(START)),
            Err(CustomContractError::TopBidderCannotWithdraw)
        );
        claim_eq!(
            state.withdraw_excess(CAROL, at(START)),
            Err(CustomContractError::InsufficientExcess)
        );

        claim_eq!(state.withdraw_excess(BOB, at(START)), Ok(micro(39)));
        claim_eq!(state.user_total_bid(&BOB), micro(111));

        // Already at the minimum
        claim_eq!(
            state.withdraw_excess(BOB, at(START)),
            Err(CustomContractError::InsufficientExcess)
        );
        claim_eq!(
            state.withdraw_excess(BOB, at(DEADLINE)),
            Err(CustomContractError::AuctionFinished)
        );
    }

    #[concordium_test]
    fn test_finalize_settlement() {
        let mut state = new_state();
        state.top_bid = Some(Bid {
            bidder: ALICE,
            amount: micro(106),
        });
        state.all_bids = vec![
            Bid {
                bidder: BOB,
                amount: micro(100),
            },
            Bid {
                bidder: ALICE,
                amount: micro(106),
            },
        ];
        state.total_committed.insert(ALICE, micro(106));
        state.total_committed.insert(BOB, micro(111));

        claim_eq!(
            state.finalize(&Address::Account(ALICE), at(DEADLINE)),
            Err(CustomContractError::Unauthorized)
        );
        claim_eq!(
            state.finalize(&Address::Account(OWNER), at(DEADLINE - 1)),
            Err(CustomContractError::AuctionStillActive)
        );
        claim!(!state.is_finalized());

        let settlement = state
            .finalize(&Address::Account(OWNER), at(DEADLINE))
            .expect_report("Finalization should pass");
        claim_eq!(
            settlement,
            Settlement {
                owner: OWNER,
                winning_bid: Bid {
                    bidder: ALICE,
                    amount: micro(106),
                },
                owner_share: micro(104),
                refunds: vec![Refund {
                    bidder: BOB,
                    refund: micro(109),
                    fee: micro(2),
                }],
            }
        );
        claim!(state.is_finalized());
        claim_eq!(state.user_total_bid(&BOB), Amount::zero());
        // Winner's ledger entry is not cleared by settlement
        claim_eq!(state.user_total_bid(&ALICE), micro(106));

        claim_eq!(
            state.finalize(&Address::Account(OWNER), at(DEADLINE)),
            Err(CustomContractError::AuctionFinalized)
        );
        claim_eq!(
            state.place_bid(CAROL, micro(500), at(START)),
            Err(CustomContractError::AuctionFinalized)
        );
        claim_eq!(
            state.withdraw_excess(BOB, at(START)),
            Err(CustomContractError::AuctionFinalized)
        );
    }

    #[concordium_test]
    fn test_finalize_refunds_each_bidder_once() {
        let mut state = new_state();
        let bids = [
            (BOB, 100),
            (ALICE, 106),
            (BOB, 12),
            (ALICE, 12),
            (CAROL, 124),
        ];
        for (bidder, amount) in bids {
            state
                .place_bid(bidder, micro(amount), at(START))
                .expect_report("Bid should pass");
        }
        claim_eq!(state.all_bids().len(), 5);

        let settlement = state
            .finalize(&Address::Account(OWNER), at(DEADLINE))
            .expect_report("Finalization should pass");
        claim_eq!(settlement.owner_share, micro(122));
        claim_eq!(
            settlement.refunds,
            vec![
                Refund {
                    bidder: BOB,
                    refund: micro(110),
                    fee: micro(2),
                },
                Refund {
                    bidder: ALICE,
                    refund: micro(116),
                    fee: micro(2),
                },
            ]
        );
        claim_eq!(state.user_total_bid(&ALICE), Amount::zero());
        claim_eq!(state.user_total_bid(&BOB), Amount::zero());
        claim_eq!(state.user_total_bid(&CAROL), micro(124));
    }

    #[concordium_test]
    fn test_finalize_without_bids() {
        let mut state = new_state();
        claim_eq!(
            state.finalize(&Address::Account(OWNER), at(DEADLINE)),
            Err(CustomContractError::NoValidBids)
        );
        claim!(!state.is_finalized());
    }

    #[concordium_test]
    fn test_emergency_withdrawal_authorization() {
        let mut state = new_state();
        claim_eq!(
            state.authorize_emergency_withdrawal(&Address::Account(OWNER)),
            Err(CustomContractError::AuctionNotFinalized)
        );

        state
            .place_bid(ALICE, micro(100), at(START))
            .expect_report("Bid should pass");
        let _ = state
            .finalize(&Address::Account(OWNER), at(DEADLINE))
            .expect_report("Finalization should pass");

        claim_eq!(
            state.authorize_emergency_withdrawal(&Address::Account(ALICE)),
            Err(CustomContractError::Unauthorized)
        );
        claim_eq!(
            state.authorize_emergency_withdrawal(&Address::Account(OWNER)),
            Ok(OWNER)
        );
    }
}
