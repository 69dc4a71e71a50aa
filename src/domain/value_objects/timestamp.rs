//! # Timestamp Value Object
//!
//! UTC instant captured when a proposal is priced.
//!
//! The same [`Timestamp`] is shown as the proposal date and stamped into the
//! PDF metadata, so a rendered document always agrees with its priced data.
//!
//! # Examples
//!
//! ```
//! use proposal_dispatch::domain::value_objects::timestamp::Timestamp;
//!
//! let ts = Timestamp::from_secs(1_704_067_200).unwrap();
//! assert_eq!(ts.to_long_date(), "January 1, 2024");
//! ```

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Date format used on documents: `January 1, 2024`.
    pub const LONG_DATE_FORMAT: &'static str = "%B %-d, %Y";

    /// Creates a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from Unix seconds.
    ///
    /// Returns `None` if the value is out of range.
    #[must_use]
    pub fn from_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Creates a timestamp from Unix milliseconds.
    ///
    /// # Examples
    ///
    /// ```
    /// use proposal_dispatch::domain::value_objects::timestamp::Timestamp;
    ///
    /// let ts = Timestamp::from_millis(1_704_067_200_000).unwrap();
    /// assert_eq!(ts.timestamp_millis(), 1_704_067_200_000);
    /// ```
    #[must_use]
    pub fn from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// Returns the Unix timestamp in seconds.
    #[inline]
    #[must_use]
    pub fn timestamp_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Returns the Unix timestamp in milliseconds.
    #[inline]
    #[must_use]
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Formats as a long date (`January 1, 2024`).
    #[must_use]
    pub fn to_long_date(&self) -> String {
        self.0.format(Self::LONG_DATE_FORMAT).to_string()
    }

    /// Formats as RFC 3339.
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

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn long_date_has_no_zero_padding() {
        // 2024-03-05T12:00:00Z
        let ts = Timestamp::from_secs(1_709_640_000).unwrap();
        assert_eq!(ts.to_long_date(), "March 5, 2024");
    }

    #[test]
    fn millis_roundtrip() {
        let ts = Timestamp::from_millis(1_704_067_200_123).unwrap();
        assert_eq!(ts.timestamp_millis(), 1_704_067_200_123);
        assert_eq!(ts.timestamp_secs(), 1_704_067_200);
    }

    #[test]
    fn iso8601_format() {
        let ts = Timestamp::from_secs(1_704_067_200).unwrap();
        assert!(ts.to_iso8601().starts_with("2024-01-01T00:00:00"));
    }

    #[test]
    fn ordering() {
        let earlier = Timestamp::from_secs(1).unwrap();
        let later = Timestamp::from_secs(2).unwrap();
        assert!(earlier < later);
    }
}
