//! # ADA Amounts
//!
//! The vault stores amounts as [`Lovelace`], a `u64` in the smallest unit.
//! ADA with six decimals exists only where a human reads or types a
//! number: [`parse_ada`] on the way in, [`format_ada`] on the way out.
//! Arithmetic never sees a float.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lovelace per ADA.
pub const LOVELACE_PER_ADA: u64 = 1_000_000;

/// Errors produced when turning user input into an amount.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    /// The input is not a number at all.
    #[error("not a number: {0:?}")]
    NotANumber(String),

    /// NaN, infinity, or a negative value.
    #[error("amount must be a finite, non-negative number")]
    OutOfRange,

    /// The value does not fit in a `u64` of lovelace.
    #[error("amount is too large")]
    TooLarge,
}

/// An amount of ADA in lovelace.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Lovelace(pub u64);

impl Lovelace {
    /// The empty amount.
    pub const ZERO: Lovelace = Lovelace(0);

    /// Whole ADA.
    pub fn from_ada(ada: u64) -> Self {
        Lovelace(ada.saturating_mul(LOVELACE_PER_ADA))
    }

    /// Raw lovelace value.
    pub fn get(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Lovelace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&lovelace_to_ada(*self))
    }
}

/// Converts a decimal ADA value into lovelace, flooring sub-lovelace
/// fractions.
pub fn ada_to_lovelace(ada: f64) -> Result<Lovelace, AmountError> {
    if !ada.is_finite() || ada < 0.0 {
        return Err(AmountError::OutOfRange);
    }
    let scaled = (ada * LOVELACE_PER_ADA as f64).floor();
    if scaled >= u64::MAX as f64 {
        return Err(AmountError::TooLarge);
    }
    Ok(Lovelace(scaled as u64))
}

/// Parses a user-typed ADA amount such as `"12.5"`.
pub fn parse_ada(input: &str) -> Result<Lovelace, AmountError> {
    let trimmed = input.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| AmountError::NotANumber(trimmed.to_string()))?;
    ada_to_lovelace(value)
}

/// Renders lovelace as ADA with exactly six decimals, e.g. `"50.000000"`.
pub fn lovelace_to_ada(amount: Lovelace) -> String {
    format!(
        "{}.{:06}",
        amount.0 / LOVELACE_PER_ADA,
        amount.0 % LOVELACE_PER_ADA
    )
}

/// Renders lovelace for display, e.g. `"50.000000 ADA"`.
pub fn format_ada(amount: Lovelace) -> String {
    format!("{} ADA", lovelace_to_ada(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_ada_converts_exactly() {
        assert_eq!(ada_to_lovelace(50.0), Ok(Lovelace(50_000_000)));
        assert_eq!(Lovelace::from_ada(50), Lovelace(50_000_000));
    }

    #[test]
    fn fractional_lovelace_is_floored() {
        assert_eq!(ada_to_lovelace(0.0000015), Ok(Lovelace(1)));
        assert_eq!(ada_to_lovelace(1.25), Ok(Lovelace(1_250_000)));
    }

    #[test]
    fn negative_and_non_finite_rejected() {
        assert_eq!(ada_to_lovelace(-1.0), Err(AmountError::OutOfRange));
        assert_eq!(ada_to_lovelace(f64::NAN), Err(AmountError::OutOfRange));
        assert_eq!(ada_to_lovelace(f64::INFINITY), Err(AmountError::OutOfRange));
        assert_eq!(ada_to_lovelace(1e300), Err(AmountError::TooLarge));
    }

    #[test]
    fn parse_trims_and_rejects_garbage() {
        assert_eq!(parse_ada(" 12.5 "), Ok(Lovelace(12_500_000)));
        assert!(matches!(parse_ada("abc"), Err(AmountError::NotANumber(_))));
        assert!(matches!(parse_ada(""), Err(AmountError::NotANumber(_))));
    }

    #[test]
    fn display_uses_six_decimals() {
        assert_eq!(lovelace_to_ada(Lovelace(1)), "0.000001");
        assert_eq!(lovelace_to_ada(Lovelace(123_456_789)), "123.456789");
        assert_eq!(format_ada(Lovelace::from_ada(50)), "50.000000 ADA");
        assert_eq!(Lovelace(2_500_000).to_string(), "2.500000");
    }

    #[test]
    fn lovelace_serializes_as_plain_integer() {
        let json = serde_json::to_string(&Lovelace(42)).expect("serialize");
        assert_eq!(json, "42");
    }
}
