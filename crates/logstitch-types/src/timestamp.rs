use crate::{Error, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Point in time used for ordering and windowing records.
pub type Timestamp = DateTime<Utc>;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp as returned by the analytics API.
///
/// Offsets are honored when present; naive values are taken to be UTC.
pub fn parse_api_timestamp(s: &str) -> Result<Timestamp> {
    let s = s.trim();
    if let Some(ts) = parse_with_offset(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    parse_naive(s)
        .map(|naive| naive.and_utc())
        .ok_or_else(|| Error::InvalidTimestamp(s.to_string()))
}

/// Parse a user-supplied ISO-8601 timestamp.
///
/// Naive values (e.g. `2024-01-01T00:00`) are interpreted in the local time
/// zone before being converted to UTC.
pub fn parse_local_timestamp(s: &str) -> Result<Timestamp> {
    let s = s.trim();
    if let Some(ts) = parse_with_offset(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    let naive = parse_naive(s).ok_or_else(|| Error::InvalidTimestamp(s.to_string()))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| Error::InvalidTimestamp(format!("{} does not exist in local time", s)))
}

/// Format a timestamp the way the analytics API expects it in `start`/`end`.
pub fn format_api_timestamp(ts: &Timestamp) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.6f+00:00").to_string()
}

fn parse_with_offset(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .or_else(|| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z").ok())
}

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_api_timestamp_with_offset() {
        let ts = parse_api_timestamp("2024-03-01T10:15:30.123456+02:00").unwrap();
        assert_eq!(ts.hour(), 8);
        assert_eq!(ts.nanosecond(), 123_456_000);
    }

    #[test]
    fn test_parse_api_timestamp_naive_is_utc() {
        let ts = parse_api_timestamp("2024-03-01T10:15:30.5").unwrap();
        assert_eq!(ts.hour(), 10);
        assert_eq!(ts.nanosecond(), 500_000_000);
    }

    #[test]
    fn test_parse_api_timestamp_compact_offset() {
        let ts = parse_api_timestamp("2024-03-01T10:15:30+0000").unwrap();
        assert_eq!(ts.minute(), 15);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_api_timestamp("yesterday"),
            Err(Error::InvalidTimestamp(_))
        ));
        assert!(parse_local_timestamp("").is_err());
    }

    #[test]
    fn test_parse_local_accepts_minutes_and_dates() {
        assert!(parse_local_timestamp("2024-01-01T00:00").is_ok());
        assert!(parse_local_timestamp("2024-01-01").is_ok());
        let explicit = parse_local_timestamp("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(explicit.hour(), 0);
    }

    #[test]
    fn test_format_api_timestamp_has_micros_and_offset() {
        let ts = parse_api_timestamp("2024-01-02T03:04:05.000007Z").unwrap();
        assert_eq!(format_api_timestamp(&ts), "2024-01-02T03:04:05.000007+00:00");
    }
}
