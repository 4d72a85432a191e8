// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, SecondsFormat, Utc};

/// On-disk spelling of "no timestamp" in the document.
pub const ZERO_TIME: &str = "0001-01-01T00:00:00Z";

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
/// Sub-second digits are kept only when present.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Serde adapter for `Option<DateTime<Utc>>` where `None` is persisted as
/// [`ZERO_TIME`] rather than omitted or `null`.
pub mod zero_time {
    use super::{format_utc_rfc3339, ZERO_TIME};
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_str(&format_utc_rfc3339(*date)),
            None => serializer.serialize_str(ZERO_TIME),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") | Some(ZERO_TIME) => Ok(None),
            Some(s) => DateTime::parse_from_rfc3339(s)
                .map(|d| Some(d.with_timezone(&Utc)))
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Stamp {
        #[serde(with = "zero_time", default)]
        at: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_none_is_written_as_zero_time() {
        let json = serde_json::to_string(&Stamp { at: None }).unwrap();
        assert_eq!(json, r#"{"at":"0001-01-01T00:00:00Z"}"#);
    }

    #[test]
    fn test_zero_time_and_missing_read_as_none() {
        let s: Stamp = serde_json::from_str(r#"{"at":"0001-01-01T00:00:00Z"}"#).unwrap();
        assert_eq!(s.at, None);
        let s: Stamp = serde_json::from_str("{}").unwrap();
        assert_eq!(s.at, None);
    }

    #[test]
    fn test_fractional_offset_timestamps_parse() {
        let s: Stamp =
            serde_json::from_str(r#"{"at":"2024-10-29T12:30:00.123456789+02:00"}"#).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 10, 29, 10, 30, 0).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        assert_eq!(s.at, Some(expected));
    }
}
