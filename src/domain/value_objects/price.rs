//! # Price Value Object
//!
//! Non-negative decimal price with marketplace text parsing.
//!
//! # Examples
//!
//! ```
//! use pricehawk::domain::value_objects::price::Price;
//!
//! let price = Price::parse_text("₹ 73,999").unwrap();
//! assert_eq!(price, Price::new(73999.0).unwrap());
//!
//! assert!(Price::new(-1.0).is_err());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A listed price in the marketplace currency.
///
/// # Invariants
///
/// - Always finite and non-negative.
///
/// Serialized as a JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Creates a price from a float.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPrice`] for negative, NaN or infinite
    /// values.
    pub fn new(value: f64) -> DomainResult<Self> {
        if !value.is_finite() {
            return Err(DomainError::invalid_price(format!("{value} is not finite")));
        }
        let decimal = Decimal::from_f64(value)
            .ok_or_else(|| DomainError::invalid_price(value.to_string()))?;
        Self::from_decimal(decimal)
    }

    /// Creates a price from a decimal.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPrice`] for negative values.
    pub fn from_decimal(value: Decimal) -> DomainResult<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DomainError::invalid_price(format!("{value} is negative")));
        }
        Ok(Self(value.normalize()))
    }

    /// Parses marketplace price text such as `"₹ 73,999"`, `"Rs. 73,999.00"`
    /// or `"73999"`.
    ///
    /// Everything except digits, `.` and `,` is dropped, thousands
    /// separators are removed and only the left-most decimal point is kept.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPrice`] if no number remains.
    pub fn parse_text(text: &str) -> DomainResult<Self> {
        let kept: String = text
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        // a currency prefix like "Rs." leaves a leading dot behind
        let kept = kept.trim_start_matches('.');
        if kept.is_empty() {
            return Err(DomainError::invalid_price(format!("no digits in '{text}'")));
        }

        let cleaned = match kept.split_once('.') {
            Some((whole, rest)) => format!("{whole}.{}", rest.replace('.', "")),
            None => kept.to_string(),
        };
        let cleaned = cleaned.trim_end_matches('.');

        let decimal = Decimal::from_str(cleaned)
            .map_err(|e| DomainError::invalid_price(format!("'{text}': {e}")))?;
        Self::from_decimal(decimal)
    }

    /// Returns the decimal value.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Decimal {
        self.0
    }

    /// Returns the value as a float, for display and logging.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
