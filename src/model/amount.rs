//! Amount type for handling monetary magnitudes with optional dollar signs.
//!
//! An `Amount` is always strictly positive. Whether money came in or went out is carried by
//! `TransactionType`, and the signed value is derived from the two together.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Number of decimal places kept for stored amounts.
pub(crate) const PLACES: u32 = 2;

/// Represents the magnitude of a transaction, e.g. `85.50`.
///
/// Values are rounded to two decimal places on construction, and a value that is zero or
/// negative after rounding is rejected.
///
/// # Examples
///
/// ```
/// # use finance_tracker::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("$1,250.5").unwrap();
/// assert_eq!(amount.to_string(), "1250.50");
/// assert_eq!(amount.pretty(), "$1,250.50");
/// assert!(Amount::from_str("-3.00").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// Creates a new `Amount`, rejecting values that are not strictly positive.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        let rounded = value.round_dp(PLACES);
        if rounded <= Decimal::ZERO {
            return Err(AmountError::NotPositive(value));
        }
        Ok(Self(rounded))
    }

    /// Returns the underlying, always positive, `Decimal` value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Formats the amount for people, e.g. `$60,000.00`.
    pub fn pretty(&self) -> String {
        money(self.0)
    }
}

/// Formats any decimal for people with a dollar sign and thousands separators, e.g. `-$60,000.00`.
pub fn money(value: Decimal) -> String {
    let sign = if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };
    let num = value.abs().round_dp(PLACES).to_f64().unwrap_or_default();
    format!("{sign}${}", format_num::format_num!(",.2", num))
}

/// Parses a decimal that may carry a leading `$`, a sign and thousands separators.
///
/// Accepts `-$50.00`, `$-50.00`, `1,000`, ` 12.5 ` and so on.
pub(crate) fn parse_decimal(s: &str) -> Result<Decimal, AmountError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }

    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(after_minus) => (true, after_minus),
        None => (false, trimmed),
    };
    let rest = rest.strip_prefix('$').unwrap_or(rest);
    let without_commas = rest.replace(',', "");

    let value = Decimal::from_str(&without_commas).map_err(AmountError::Parse)?;
    Ok(if negative { -value } else { value })
}

/// An error that can occur when parsing or constructing an `Amount`.
#[derive(Debug, Clone, PartialEq)]
pub enum AmountError {
    /// The input string was blank.
    Empty,
    /// The input could not be read as a decimal number.
    Parse(rust_decimal::Error),
    /// The value was zero or negative.
    NotPositive(Decimal),
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Empty => write!(f, "the amount is empty"),
            AmountError::Parse(e) => write!(f, "the amount is not a number: {e}"),
            AmountError::NotPositive(v) => write!(f, "the amount must be greater than zero, got {v}"),
        }
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AmountError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::new(parse_decimal(s)?)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}
