//! Dimensions
//!
//! Validation of user-entered measurements and quantities. Product pages and the cart page hand
//! raw form values to this module before anything reaches the pricing engine.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

/// Errors raised while validating form input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The field was left blank.
    #[error("value is empty")]
    Empty,

    /// The field does not hold a number.
    #[error("not a number: {0}")]
    NotANumber(String),

    /// The field holds a negative number.
    #[error("value must not be negative: {0}")]
    Negative(String),
}

/// A non-negative physical measurement (metres for wallpaper).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Dimension(Decimal);

impl Dimension {
    /// Zero-length dimension.
    pub const ZERO: Dimension = Dimension(Decimal::ZERO);

    /// Creates a dimension from a decimal value.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Negative`] if `value` is below zero.
    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(ValidationError::Negative(value.to_string()));
        }

        Ok(Dimension(value.normalize()))
    }

    /// Parses a form value such as `"2.5"` or `"2,5"`.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::Empty`]: the input is blank.
    /// - [`ValidationError::NotANumber`]: the input is not a decimal number.
    /// - [`ValidationError::Negative`]: the input is below zero.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty);
        }

        let value = Decimal::from_str(&trimmed.replace(',', "."))
            .map_err(|_err| ValidationError::NotANumber(trimmed.to_string()))?;

        Self::new(value)
    }

    /// Parses a form value, falling back to zero when it is invalid.
    ///
    /// Zero is then floored by the minimum area rule, so a blank field never produces a free item.
    pub fn coerce(input: &str) -> Self {
        Self::parse(input).unwrap_or_else(|err| {
            debug!(input, %err, "coercing invalid dimension to zero");

            Dimension::ZERO
        })
    }

    /// Returns the underlying value.
    pub fn value(self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Dimension {
    type Error = ValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for Dimension {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Number of units of a line item. Never below one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(u32);

impl Quantity {
    /// A single unit.
    pub const ONE: Quantity = Quantity(1);

    /// Creates a quantity, clamping anything below one up to one.
    pub fn new(value: i64) -> Self {
        let clamped = value.clamp(1, i64::from(u32::MAX));

        Quantity(u32::try_from(clamped).unwrap_or(u32::MAX))
    }

    /// Parses a form value. Zero and negative numbers clamp to one.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::Empty`]: the input is blank.
    /// - [`ValidationError::NotANumber`]: the input is not an integer.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty);
        }

        trimmed
            .parse::<i64>()
            .map(Self::new)
            .map_err(|_err| ValidationError::NotANumber(trimmed.to_string()))
    }

    /// Returns the number of units.
    pub fn get(self) -> u32 {
        self.0
    }

    /// One more unit.
    #[must_use]
    pub fn increment(self) -> Self {
        Quantity(self.0.saturating_add(1))
    }

    /// One fewer unit; stays at one.
    #[must_use]
    pub fn decrement(self) -> Self {
        Quantity(self.0.saturating_sub(1).max(1))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::ONE
    }
}

impl From<Quantity> for Decimal {
    fn from(quantity: Quantity) -> Self {
        Decimal::from(quantity.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
