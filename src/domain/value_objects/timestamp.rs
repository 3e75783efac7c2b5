//! # Timestamp Value Object
//!
//! DateTime wrapper with domain-specific methods.
//!
//! This module provides the [`Timestamp`] type used for listing observation
//! times, snapshot capture times and search history records.
//!
//! # Examples
//!
//! ```
//! use pricehawk::domain::value_objects::timestamp::Timestamp;
//!
//! let now = Timestamp::now();
//! let later = now.add_secs(60);
//!
//! assert!(later.is_after(&now));
//! ```

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A UTC timestamp.
///
/// Wraps `chrono::DateTime<Utc>` so the rest of the crate never deals with
/// time zones directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Earliest representable timestamp.
    pub const MIN: Self = Self(DateTime::<Utc>::MIN_UTC);

    /// Latest representable timestamp.
    pub const MAX: Self = Self(DateTime::<Utc>::MAX_UTC);

    /// 1970-01-01T00:00:00Z.
    pub const UNIX_EPOCH: Self = Self(DateTime::<Utc>::UNIX_EPOCH);

    /// Creates a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from Unix milliseconds.
    ///
    /// Returns `None` if the value is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricehawk::domain::value_objects::timestamp::Timestamp;
    ///
    /// let ts = Timestamp::from_millis(1704067200000).unwrap();
    /// assert_eq!(ts.timestamp_millis(), 1704067200000);
    /// ```
    #[must_use]
    pub fn from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// Creates a timestamp from Unix seconds.
    #[must_use]
    pub fn from_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Returns the Unix timestamp in milliseconds.
    #[inline]
    #[must_use]
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Returns the Unix timestamp in seconds.
    #[inline]
    #[must_use]
    pub fn timestamp_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Adds seconds to the timestamp (negative values move backwards).
    ///
    /// Saturates at the representable range.
    #[must_use]
    pub fn add_secs(&self, secs: i64) -> Self {
        match Duration::try_seconds(secs) {
            Some(delta) => self.saturating_add(delta),
            None if secs < 0 => Self::MIN,
            None => Self::MAX,
        }
    }

    /// Subtracts seconds from the timestamp.
    ///
    /// Saturates at the representable range.
    #[must_use]
    pub fn sub_secs(&self, secs: i64) -> Self {
        match Duration::try_seconds(secs) {
            Some(delta) => self.saturating_sub(delta),
            None if secs < 0 => Self::MAX,
            None => Self::MIN,
        }
    }

    fn saturating_add(&self, delta: Duration) -> Self {
        match self.0.checked_add_signed(delta) {
            Some(dt) => Self(dt),
            None if delta < Duration::zero() => Self::MIN,
            None => Self::MAX,
        }
    }

    fn saturating_sub(&self, delta: Duration) -> Self {
        match self.0.checked_sub_signed(delta) {
            Some(dt) => Self(dt),
            None if delta < Duration::zero() => Self::MAX,
            None => Self::MIN,
        }
    }

    /// Returns true if this timestamp is before another.
    #[inline]
    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        self.0 < other.0
    }

    /// Returns true if this timestamp is after another.
    #[inline]
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        self.0 > other.0
    }

    /// Returns the moment `window` before now.
    ///
    /// This is the lower bound used for freshness lookups. It never goes
    /// below [`Timestamp::UNIX_EPOCH`], so an oversized window means
    /// everything stored counts as fresh and the bound still fits a
    /// database timestamp column.
    #[must_use]
    pub fn window_start(window: std::time::Duration) -> Self {
        (Self::now() - window).max(Self::UNIX_EPOCH)
    }

    /// Formats the timestamp as RFC 3339.
    #[must_use]
    pub fn to_iso8601(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Returns the underlying DateTime.
    #[inline]
    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl Add<std::time::Duration> for Timestamp {
    type Output = Self;

    fn add(self, rhs: std::time::Duration) -> Self::Output {
        match Duration::from_std(rhs) {
            Ok(delta) => self.saturating_add(delta),
            Err(_) => Self::MAX,
        }
    }
}

impl Sub<std::time::Duration> for Timestamp {
    type Output = Self;

    fn sub(self, rhs: std::time::Duration) -> Self::Output {
        match Duration::from_std(rhs) {
            Ok(delta) => self.saturating_sub(delta),
            Err(_) => Self::MIN,
        }
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = std::time::Duration;

    fn sub(self, rhs: Timestamp) -> Self::Output {
        (self.0 - rhs.0)
            .to_std()
            .unwrap_or(std::time::Duration::ZERO)
    }
}
