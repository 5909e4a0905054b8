use super::*;

/// The custom errors the contract can produce.
#[derive(Serialize, Debug, PartialEq, Eq, Reject, SchemaType)]
pub enum CustomContractError {
    /// Failed parsing the parameter (Error code: -1).
    #[from(ParseError)]
    ParseParams,
    /// Failed logging: Log is full (Error code: -2).
    LogFull,
    /// Failed logging: Log is malformed (Error code: -3).
    LogMalformed,
    /// Only account addresses can take part in the auction (Error code: -4).
    OnlyAccountAddress,
    /// Only the auction owner has access (Error code: -5).
    Unauthorized,
    /// Raised if the auction deadline has passed (Error code: -6).
    AuctionFinished,
    /// Raised if there is an attempt to finalize the auction before its
    /// deadline (Error code: -7).
    AuctionStillActive,
    /// Raised if the auction has already been finalized (Error code: -8).
    AuctionFinalized,
    /// Raised if funds are swept before finalization (Error code: -9).
    AuctionNotFinalized,
    /// Bids must carry a positive amount (Error code: -10).
    ZeroBid,
    /// First bid is lower than the starting price (Error code: -11).
    BelowStartingPrice,
    /// The top bidder cannot outbid themselves (Error code: -12).
    AlreadyTopBidder,
    /// Cumulative bid does not exceed the top bid by the required increment
    /// (Error code: -13).
    BidTooLow,
    /// The top bidder has no excess to withdraw (Error code: -14).
    TopBidderCannotWithdraw,
    /// Nothing above the required minimum to withdraw (Error code: -15).
    InsufficientExcess,
    /// Raised if the auction is finalized without any bids (Error code: -16).
    NoValidBids,
    /// Failed to invoke a transfer (Error code: -17).
    InvokeTransferError,
    /// Amount or time computation does not fit (Error code: -18).
    Overflow,
    /// Duration is too far in the future (Error code: -19).
    InvalidDuration,
    /// Requested bid index is not present in the bid log (Error code: -20).
    BidIndexOutOfRange,
}

/// Mapping the logging errors to CustomContractError.
impl From<LogError> for CustomContractError {
    fn from(le: LogError) -> Self {
        match le {
            LogError::Full => Self::LogFull,
            LogError::Malformed => Self::LogMalformed,
        }
    }
}

/// Mapping errors related to transfers to CustomContractError.
impl From<TransferError> for CustomContractError {
    fn from(_te: TransferError) -> Self {
        Self::InvokeTransferError
    }
}
