use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Fixed-point decimal with 4 decimal places, stored as a scaled integer.
///
/// Ledger sums and the debit/credit equality checks run on this type, so
/// `10000.1 + 0.2 == 10000.3` holds exactly. Arithmetic is checked: values
/// that do not fit are rejected rather than clamped or wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(try_from = "f64")]
pub struct Amount(i64);

/// Error returned when a form field cannot be read as an amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAmountError {
    #[error("amount is empty")]
    Empty,
    #[error("'{0}' is not a number")]
    Invalid(String),
    #[error("'{0}' is too large")]
    OutOfRange(String),
    #[error("'{0}' has more than 4 decimal places")]
    TooPrecise(String),
}

impl Amount {
    const SCALE: i64 = 10_000;

    /// Rounding slack, in scaled units, below which a float still counts as
    /// having at most 4 decimal places.
    const SLACK: f64 = 1e-3;

    pub const ZERO: Amount = Amount(0);

    pub fn from_scaled(value: i64) -> Self {
        Amount(value)
    }

    pub fn to_scaled(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// Sum of `amounts`, or `None` if the total does not fit.
    pub fn checked_sum(amounts: impl IntoIterator<Item = Amount>) -> Option<Self> {
        i64::try_from(Self::wide_sum(amounts)).ok().map(Amount)
    }

    /// Exact sum in scaled units. Never overflows for any realistic count.
    pub(crate) fn wide_sum(amounts: impl IntoIterator<Item = Amount>) -> i128 {
        amounts.into_iter().map(|amount| i128::from(amount.0)).sum()
    }

    #[cfg(test)]
    pub(crate) fn from_whole(value: i64) -> Self {
        Amount(value * Self::SCALE)
    }
}

impl TryFrom<f64> for Amount {
    type Error = ParseAmountError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(ParseAmountError::Invalid(value.to_string()));
        }
        let scaled = value * Self::SCALE as f64;
        let rounded = scaled.round();
        // i64::MAX as f64 is 2^63, already out of range
        if rounded.abs() >= i64::MAX as f64 {
            return Err(ParseAmountError::OutOfRange(value.to_string()));
        }
        let slack = Self::SLACK.max(scaled.abs() * 4.0 * f64::EPSILON);
        if (scaled - rounded).abs() > slack {
            return Err(ParseAmountError::TooPrecise(value.to_string()));
        }
        Ok(Amount(rounded as i64))
    }
}

impl FromStr for Amount {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseAmountError::Empty);
        }
        let value: f64 = s
            .parse()
            .map_err(|_| ParseAmountError::Invalid(s.to_string()))?;
        Amount::try_from(value).map_err(|err| match err {
            ParseAmountError::OutOfRange(_) => ParseAmountError::OutOfRange(s.to_string()),
            ParseAmountError::TooPrecise(_) => ParseAmountError::TooPrecise(s.to_string()),
            _ => ParseAmountError::Invalid(s.to_string()),
        })
    }
}

/// Whole amounts print without a fractional part, others drop trailing zeros.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = Self::SCALE.unsigned_abs();
        let whole = abs / scale;
        let frac = abs % scale;
        if frac == 0 {
            return write!(f, "{sign}{whole}");
        }
        let digits = format!("{frac:04}");
        write!(f, "{sign}{whole}.{}", digits.trim_end_matches('0'))
    }
}
