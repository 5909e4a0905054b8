use super::*;

/// An untagged event of a placed bid.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq)]
pub struct BidPlacedEvent {
    /// Bidder account address.
    pub bidder: AccountAddress,
    /// Cumulative amount committed by the bidder.
    pub total: Amount,
}

/// An untagged event of excess funds a bidder could withdraw.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq)]
pub struct ExcessRefundAvailableEvent {
    /// Bidder account address.
    pub bidder: AccountAddress,
    /// Amount above the required minimum.
    pub excess: Amount,
}

/// An untagged event of a withdrawn excess.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq)]
pub struct PartialExcessRefundEvent {
    /// Bidder account address.
    pub bidder: AccountAddress,
    /// Transferred amount.
    pub amount: Amount,
}

/// An untagged event of auction closing.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq)]
pub struct AuctionClosedEvent {
    /// Winning account address.
    pub winner: AccountAddress,
    /// Winning bid before commission.
    pub amount: Amount,
}

/// An untagged event of a losing deposit returned on finalization.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq)]
pub struct DepositReimbursedEvent {
    /// Bidder account address.
    pub bidder: AccountAddress,
    /// Transferred amount.
    pub refund: Amount,
    /// Commission kept.
    pub fee: Amount,
}

/// An untagged event of the remaining balance sweep.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq)]
pub struct EmergencyFundWithdrawnEvent {
    /// Receiving account address.
    pub receiver: AccountAddress,
    /// Transferred amount.
    pub amount: Amount,
}

/// Tagged Custom event to be serialized for the event log.
#[derive(Debug, PartialEq, Eq)]
pub enum CustomEvent {
    BidPlaced(BidPlacedEvent),
    ExcessRefundAvailable(ExcessRefundAvailableEvent),
    PartialExcessRefund(PartialExcessRefundEvent),
    AuctionClosed(AuctionClosedEvent),
    DepositReimbursed(DepositReimbursedEvent),
    EmergencyFundWithdrawn(EmergencyFundWithdrawnEvent),
}

impl CustomEvent {
    pub fn bid_placed(bidder: AccountAddress, total: Amount) -> Self {
        Self::BidPlaced(BidPlacedEvent { bidder, total })
    }

    pub fn excess_refund_available(bidder: AccountAddress, excess: Amount) -> Self {
        Self::ExcessRefundAvailable(ExcessRefundAvailableEvent { bidder, excess })
    }

    pub fn partial_excess_refund(bidder: AccountAddress, amount: Amount) -> Self {
        Self::PartialExcessRefund(PartialExcessRefundEvent { bidder, amount })
    }

    pub fn auction_closed(winner: AccountAddress, amount: Amount) -> Self {
        Self::AuctionClosed(AuctionClosedEvent { winner, amount })
    }

    pub fn deposit_reimbursed(refund: &Refund) -> Self {
        Self::DepositReimbursed(DepositReimbursedEvent {
            bidder: refund.bidder,
            refund: refund.refund,
            fee: refund.fee,
        })
    }

    pub fn emergency_fund_withdrawn(receiver: AccountAddress, amount: Amount) -> Self {
        Self::EmergencyFundWithdrawn(EmergencyFundWithdrawnEvent { receiver, amount })
    }
}

impl Serial for CustomEvent {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            CustomEvent::BidPlaced(event) => {
                out.write_u8(BID_PLACED_TAG)?;
                event.serial(out)
            }
            CustomEvent::ExcessRefundAvailable(event) => {
                out.write_u8(EXCESS_REFUND_AVAILABLE_TAG)?;
                event.serial(out)
            }
            CustomEvent::PartialExcessRefund(event) => {
                out.write_u8(PARTIAL_EXCESS_REFUND_TAG)?;
                event.serial(out)
            }
            CustomEvent::AuctionClosed(event) => {
                out.write_u8(AUCTION_CLOSED_TAG)?;
                event.serial(out)
            }
            CustomEvent::DepositReimbursed(event) => {
                out.write_u8(DEPOSIT_REIMBURSED_TAG)?;
                event.serial(out)
            }
            CustomEvent::EmergencyFundWithdrawn(event) => {
                out.write_u8(EMERGENCY_FUND_WITHDRAWN_TAG)?;
                event.serial(out)
            }
        }
    }
}

impl Deserial for CustomEvent {
    fn deserial<R: Read>(source: &mut R) -> ParseResult<Self> {
        let tag = source.read_u8()?;
        match tag {
            BID_PLACED_TAG => BidPlacedEvent::deserial(source).map(CustomEvent::BidPlaced),
            EXCESS_REFUND_AVAILABLE_TAG => ExcessRefundAvailableEvent::deserial(source)
                .map(CustomEvent::ExcessRefundAvailable),
            PARTIAL_EXCESS_REFUND_TAG => {
                PartialExcessRefundEvent::deserial(source).map(CustomEvent::PartialExcessRefund)
            }
            AUCTION_CLOSED_TAG => {
                AuctionClosedEvent::deserial(source).map(CustomEvent::AuctionClosed)
            }
            DEPOSIT_REIMBURSED_TAG => {
                DepositReimbursedEvent::deserial(source).map(CustomEvent::DepositReimbursed)
            }
            EMERGENCY_FUND_WITHDRAWN_TAG => EmergencyFundWithdrawnEvent::deserial(source)
                .map(CustomEvent::EmergencyFundWithdrawn),
            _ => Err(ParseError::default()),
        }
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;

    #[concordium_test]
    fn test_event_tags() {
        let event = CustomEvent::deposit_reimbursed(&Refund {
            bidder: AccountAddress([1u8; 32]),
            refund: Amount::from_micro_ccd(109),
            fee: Amount::from_micro_ccd(2),
        });
        let bytes = to_bytes(&event);
        claim_eq!(bytes[0], DEPOSIT_REIMBURSED_TAG);
        claim_eq!(from_bytes::<CustomEvent>(&bytes).ok(), Some(event));

        claim!(from_bytes::<CustomEvent>(&[0u8]).is_err(), "Unknown tag must be rejected");
    }
}
