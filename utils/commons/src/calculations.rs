use super::*;

/// Amount paid out of a deposit once the commission has been deducted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payout {
    /// Share transferred to the receiver.
    pub amount: Amount,
    /// Commission that stays with the contract.
    pub fee: Amount,
}

/// Cumulative total a challenger has to exceed to overtake a top bid of `top`.
///
/// Returns `None` if the threshold does not fit into an [`Amount`].
pub fn minimum_required(top: Amount) -> Option<Amount> {
    top.micro_ccd
        .checked_add((BID_INCREMENT * top).micro_ccd)
        .map(Amount::from_micro_ccd)
}

/// Split `amount` into the payout and the commission, rounding the commission
/// down.
pub fn deduct_commission(amount: Amount) -> Payout {
    let fee = COMMISSION_RATE * amount;
    Payout {
        amount: Amount::from_micro_ccd(amount.micro_ccd - fee.micro_ccd),
        fee,
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;

    #[concordium_test]
    fn test_minimum_required() {
        claim_eq!(
            minimum_required(Amount::from_micro_ccd(100)),
            Some(Amount::from_micro_ccd(105))
        );
        // 5% of 106 is 5.3, rounded down
        claim_eq!(
            minimum_required(Amount::from_micro_ccd(106)),
            Some(Amount::from_micro_ccd(111))
        );
        // Nothing to add below 20 micro CCD
        claim_eq!(
            minimum_required(Amount::from_micro_ccd(19)),
            Some(Amount::from_micro_ccd(19))
        );
        claim_eq!(minimum_required(Amount::zero()), Some(Amount::zero()));
        claim_eq!(minimum_required(Amount::from_micro_ccd(u64::MAX)), None);
    }

    #[concordium_test]
    fn test_deduct_commission() {
        claim_eq!(
            deduct_commission(Amount::from_micro_ccd(106)),
            Payout {
                amount: Amount::from_micro_ccd(104),
                fee: Amount::from_micro_ccd(2),
            }
        );
        claim_eq!(
            deduct_commission(Amount::from_micro_ccd(111)),
            Payout {
                amount: Amount::from_micro_ccd(109),
                fee: Amount::from_micro_ccd(2),
            }
        );
        claim_eq!(
            deduct_commission(Amount::from_ccd(100)),
            Payout {
                amount: Amount::from_ccd(98),
                fee: Amount::from_ccd(2),
            }
        );
        // Large amounts must not overflow while computing the share
        let payout = deduct_commission(Amount::from_micro_ccd(u64::MAX));
        claim_eq!(
            payout.amount.micro_ccd + payout.fee.micro_ccd,
            u64::MAX,
            "Payout and fee must add up to the deposit"
        );
    }
}
