use super::*;

/// A cumulative commitment of a single account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SchemaType)]
pub struct Bid {
    /// Bidder account address.
    pub bidder: AccountAddress,
    /// Total amount committed by the bidder when the bid was recorded.
    pub amount: Amount,
}

/// The contract state.
#[derive(Serial, DeserialWithState)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// Account that created the auction and receives the winning bid.
    pub(crate) owner: AccountAddress,
    /// Bids are accepted strictly before this time.
    pub(crate) deadline: Timestamp,
    /// Smallest allowed first bid.
    pub(crate) starting_price: Amount,
    /// Set once by finalization, never reset.
    pub(crate) finalized: bool,
    /// Current highest cumulative bid. `None` until the first bid.
    pub(crate) top_bid: Option<Bid>,
    /// Every bid that became the top bid, in order.
    pub(crate) all_bids: Vec<Bid>,
    /// Amount each account has sent and not yet got back.
    pub(crate) total_committed: StateMap<AccountAddress, Amount, S>,
    /// Individual payments of each account.
    pub(crate) bid_history: StateMap<AccountAddress, Vec<Amount>, S>,
}

/// Type of the parameter to the `init` function.
#[derive(Debug, Serialize, SchemaType)]
pub struct InitParams {
    /// Auction duration in seconds, counted from the initialization.
    pub duration: u64,
    /// Smallest allowed first bid.
    pub starting_price: Amount,
}

/// Summary returned by the `view` function.
#[derive(Debug, PartialEq, Eq, Serialize, SchemaType)]
pub struct AuctionView {
    pub owner: AccountAddress,
    pub deadline: Timestamp,
    pub starting_price: Amount,
    pub finalized: bool,
    pub top_bid: Option<Bid>,
    pub bid_count: u32,
    pub minimum_required: Amount,
}

/// Result of an accepted bid. Nothing has been transferred yet.
#[derive(Debug, PartialEq, Eq)]
pub struct BidOutcome {
    /// Bidder's cumulative total including this bid.
    pub total: Amount,
    /// Portion of the total above the required minimum, if any.
    pub excess: Option<Amount>,
    /// Whether the bid became the top bid.
    pub promoted: bool,
    /// New deadline if the bid extended the auction.
    pub extended_deadline: Option<Timestamp>,
}

/// Deposit that MUST be transferred back to a losing bidder.
#[must_use]
#[derive(Debug, PartialEq, Eq)]
pub struct Refund {
    pub bidder: AccountAddress,
    pub refund: Amount,
    pub fee: Amount,
}

/// Transfers required to settle a finalized auction, in order.
#[must_use]
#[derive(Debug, PartialEq, Eq)]
pub struct Settlement {
    /// Owner receiving the winning bid.
    pub owner: AccountAddress,
    /// Winning bid.
    pub winning_bid: Bid,
    /// Owner share of the winning bid after commission.
    pub owner_share: Amount,
    /// Losing bidders in the order they first became the top bidder.
    pub refunds: Vec<Refund>,
}
