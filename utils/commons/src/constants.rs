use crate::Percentage;

/// Tag for the Custom Bid Placed event.
pub const BID_PLACED_TAG: u8 = u8::MAX;

/// Tag for the Custom Excess Refund Available event.
pub const EXCESS_REFUND_AVAILABLE_TAG: u8 = u8::MAX - 1;

/// Tag for the Custom Partial Excess Refund event.
pub const PARTIAL_EXCESS_REFUND_TAG: u8 = u8::MAX - 2;

/// Tag for the Custom Auction Closed event.
pub const AUCTION_CLOSED_TAG: u8 = u8::MAX - 3;

/// Tag for the Custom Deposit Reimbursed event.
pub const DEPOSIT_REIMBURSED_TAG: u8 = u8::MAX - 4;

/// Tag for the Custom Emergency Fund Withdrawn event.
pub const EMERGENCY_FUND_WITHDRAWN_TAG: u8 = u8::MAX - 5;

/// Commission kept from the winning bid and from every refunded deposit.
pub const COMMISSION_RATE: Percentage = Percentage::from_percent(2);

/// Margin a new cumulative bid must exceed over the current top bid.
pub const BID_INCREMENT: Percentage = Percentage::from_percent(5);

/// A promoting bid placed this close to the deadline pushes it back by the same
/// amount.
pub const EXTENSION_WINDOW_MILLIS: u64 = 1000 * 60 * 10;
