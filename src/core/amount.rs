//! Exact conversion of currency amounts to integer minor units.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::error::AchError;

/// A non-negative amount in cents.
///
/// Fixed-width files carry amounts as zero-padded cents. Every amount
/// passes through this type so that no floating-point step is involved.
///
/// ```
/// use achfile::core::Cents;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(Cents::from_decimal(dec!(1234.5)).unwrap().get(), 123450);
/// assert!(Cents::from_decimal(dec!(0.005)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Cents(u64);

impl Cents {
    pub const ZERO: Self = Cents(0);

    pub fn new(cents: u64) -> Self {
        Cents(cents)
    }

    /// Convert a currency amount to cents.
    ///
    /// Rejects negative amounts and amounts with a non-zero fraction below
    /// one cent. `12.50`, `12.5` and `12.500` are all accepted.
    pub fn from_decimal(amount: Decimal) -> Result<Self, AchError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(AchError::Amount(format!(
                "amount {amount} is negative; direction is carried by the transaction type"
            )));
        }
        let scaled = amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or_else(|| AchError::Amount(format!("amount {amount} is out of range")))?;
        if scaled.fract() != Decimal::ZERO {
            return Err(AchError::Amount(format!(
                "amount {amount} has a fraction below one cent"
            )));
        }
        scaled
            .abs()
            .to_u64()
            .map(Cents)
            .ok_or_else(|| AchError::Amount(format!("amount {amount} is out of range")))
    }

    /// Raw number of cents.
    pub fn get(self) -> u64 {
        self.0
    }

    /// Back to currency units with two decimal places.
    pub fn to_decimal(self) -> Decimal {
        Decimal::from(self.0) / Decimal::ONE_HUNDRED
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Cents)
    }
}

impl Add for Cents {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Cents(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Cents {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Cents::ZERO, |acc, c| acc + c)
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
