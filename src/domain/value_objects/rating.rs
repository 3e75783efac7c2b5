//! # Rating Value Object
//!
//! Star rating in `[0, 5]`.

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum star rating.
pub const MAX_RATING: f64 = 5.0;

/// A product star rating.
///
/// # Invariants
///
/// - Finite and within `[0, 5]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rating(f64);

impl Rating {
    /// Creates a rating.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidRating`] outside `[0, 5]`.
    pub fn new(value: f64) -> DomainResult<Self> {
        if !value.is_finite() || !(0.0..=MAX_RATING).contains(&value) {
            return Err(DomainError::invalid_rating(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Parses rating text such as `"4.5 out of 5 stars"` or `"4.3"`.
    ///
    /// The first number in the text is taken as the rating.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidRating`] if no number is present or the
    /// number is out of range.
    pub fn parse_text(text: &str) -> DomainResult<Self> {
        let token: String = text
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        let value: f64 = token
            .trim_end_matches('.')
            .parse()
            .map_err(|_| DomainError::invalid_rating(format!("no number in '{text}'")))?;
        Self::new(value)
    }

    /// Returns the numeric value.
    #[inline]
    #[must_use]
    pub fn get(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Rating {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for f64 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bounds() {
        assert!(Rating::new(0.0).is_ok());
        assert!(Rating::new(5.0).is_ok());
        assert!(Rating::new(5.1).is_err());
        assert!(Rating::new(-0.1).is_err());
        assert!(Rating::new(f64::NAN).is_err());
    }

    #[test]
    fn parses_marketplace_text() {
        assert_eq!(Rating::parse_text("4.5 out of 5 stars").unwrap().get(), 4.5);
        assert_eq!(Rating::parse_text("4.3").unwrap().get(), 4.3);
        assert!(Rating::parse_text("no reviews yet").is_err());
        assert!(Rating::parse_text("47 ratings").is_err());
    }

    #[test]
    fn deserialization_validates() {
        assert!(serde_json::from_str::<Rating>("4.2").is_ok());
        assert!(serde_json::from_str::<Rating>("9.0").is_err());
    }
}
