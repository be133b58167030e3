//! Lenient date/time parsing for inbound values
//!
//! Callers send timestamps in a handful of shapes. Parsing tries, in order:
//! RFC 3339, a naive datetime, an ISO date, then a Brazilian `dd/mm/yyyy`
//! date. Anything else is an [`Error::InvalidDate`].

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Parse a timestamp from any of the accepted input formats.
///
/// Date-only inputs resolve to midnight UTC.
pub fn parse_flexible(input: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }
    parse_flexible_date(input).map(|date| {
        date.and_hms_opt(0, 0, 0)
            .unwrap_or_default()
            .and_utc()
    })
}

/// Parse a calendar date: ISO first, Brazilian format as fallback.
pub fn parse_flexible_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(input, "%d/%m/%Y"))
        .map_err(|_| Error::InvalidDate(input.to_string()))
}

/// Serde adapter for optional timestamps in the accepted formats
pub mod flexible_opt {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<String> = Option::deserialize(deserializer)?;
        match value {
            Some(s) if !s.is_empty() => parse_flexible(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}

/// Serde adapter for optional calendar dates in the accepted formats
pub mod flexible_date_opt {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<String> = Option::deserialize(deserializer)?;
        match value {
            Some(s) if !s.is_empty() => parse_flexible_date(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_flexible("2024-01-01T10:00:00Z").unwrap();
        assert_eq!(dt.hour(), 10);

        let dt = parse_flexible("2024-01-01T10:00:00-03:00").unwrap();
        assert_eq!(dt.hour(), 13);
    }

    #[test]
    fn test_parse_naive_datetime() {
        let dt = parse_flexible("2024-01-01T10:30:00").unwrap();
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_parse_date_only_is_midnight() {
        let dt = parse_flexible("2024-06-15").unwrap();
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_parse_brazilian_date() {
        let date = parse_flexible_date("15/06/2024").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
    }

    #[test]
    fn test_garbage_is_a_typed_error() {
        let err = parse_flexible("quinta-feira").unwrap_err();
        assert!(matches!(err, Error::InvalidDate(_)));
    }
}
