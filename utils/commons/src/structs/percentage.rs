use super::*;

use core::ops::Mul;

/// Fixed-point percentage with micro-percent precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, SchemaType)]
pub struct Percentage(u64);

impl Percentage {
    pub const fn from_percent(percent: u64) -> Self {
        Self(percent * 1_000_000)
    }
}

/// Share of an amount, rounded down to the nearest micro CCD.
impl Mul<Amount> for Percentage {
    type Output = Amount;

    fn mul(self, rhs: Amount) -> Self::Output {
        Amount::from_micro_ccd((rhs.micro_ccd as u128 * self.0 as u128 / 100_000_000) as u64)
    }
}
