//! Decimal price and rating values.
//!
//! Both wrap [`rust_decimal::Decimal`] and mirror the precision of their
//! database columns: prices are `NUMERIC(10, 2)`, ratings `NUMERIC(2, 1)`.
//! Values are rescaled on construction so `5` and `5.00` compare and
//! serialize identically no matter which store produced them.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`] or [`Rating`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// The value is below zero.
    #[error("must not be negative")]
    Negative,
    /// The value has more fraction digits than the column stores.
    #[error("must have at most {max} decimal places")]
    TooPrecise {
        /// Maximum allowed fraction digits.
        max: u32,
    },
    /// The value exceeds the column's range.
    #[error("must be at most {max}")]
    TooLarge {
        /// Largest accepted value.
        max: Decimal,
    },
}

fn check(value: Decimal, scale: u32, max: Decimal) -> Result<Decimal, AmountError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AmountError::Negative);
    }
    if value.normalize().scale() > scale {
        return Err(AmountError::TooPrecise { max: scale });
    }
    if value > max {
        return Err(AmountError::TooLarge { max });
    }
    let mut value = value.abs();
    value.rescale(scale);
    Ok(value)
}

/// A non-negative section price in US dollars with cent precision.
///
/// Serializes as a decimal string (`"12.99"`), the same shape `PostgreSQL`
/// numeric columns produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Fraction digits stored for a price.
    pub const SCALE: u32 = 2;

    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::from_parts(0, 0, 0, false, 2));

    /// Largest price `NUMERIC(10, 2)` can hold.
    #[must_use]
    pub fn max_value() -> Decimal {
        Decimal::new(9_999_999_999, Self::SCALE)
    }

    /// Create a price, validating sign and precision.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is negative, has more than two
    /// fraction digits, or does not fit in `NUMERIC(10, 2)`.
    pub fn new(amount: Decimal) -> Result<Self, AmountError> {
        check(amount, Self::SCALE, Self::max_value()).map(Self)
    }

    /// Build a price from a whole number of cents.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is negative or too large.
    pub fn from_cents(cents: i64) -> Result<Self, AmountError> {
        Self::new(Decimal::new(cents, Self::SCALE))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the price is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl TryFrom<Decimal> for Price {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

/// An average review score between 0.0 and 5.0 with one fraction digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Rating(Decimal);

impl Rating {
    /// Fraction digits stored for a rating.
    pub const SCALE: u32 = 1;

    /// Create a rating, validating range and precision.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is outside 0.0-5.0 or has more than
    /// one fraction digit.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        check(value, Self::SCALE, Decimal::new(5, 0)).map(Self)
    }

    /// Get the underlying decimal value.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Rating {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for Decimal {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
