//! Lenient timestamp parsing for request bodies and query strings.
//!
//! Clients send either RFC 3339 (`2024-01-01T09:00:00Z`) or the naive form a
//! `datetime-local` input produces (`2024-01-01T09:00`). Naive values are read
//! as UTC. Range bounds in the list query may also be a bare `YYYY-MM-DD`.
//!
//! Values are cut to microseconds, the precision Postgres `TIMESTAMPTZ` keeps,
//! so a range validates exactly as it will be stored.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer};

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];
const DATE_FORMAT: &str = "%Y-%m-%d";
const STORED_SUBSEC_DIGITS: u16 = 6;

pub fn to_stored_precision(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(STORED_SUBSEC_DIGITS)
}

/// Current time at stored precision.
pub fn now() -> DateTime<Utc> {
    to_stored_precision(Utc::now())
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    let parsed = match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => parsed.with_timezone(&Utc),
        Err(_) => NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())?
            .and_utc(),
    };
    Some(to_stored_precision(parsed))
}

/// Lower bound of a date range: a bare date means the start of that day.
pub fn parse_range_start(raw: &str) -> Option<DateTime<Utc>> {
    parse_timestamp(raw).or_else(|| {
        NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
            .ok()
            .map(|date| date.and_time(NaiveTime::MIN).and_utc())
    })
}

/// Upper bound of a date range: a bare date covers the whole day.
pub fn parse_range_end(raw: &str) -> Option<DateTime<Utc>> {
    parse_timestamp(raw).or_else(|| {
        NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
            .ok()
            .and_then(|date| date.and_hms_nano_opt(23, 59, 59, 999_999_999))
            .map(|naive| to_stored_precision(naive.and_utc()))
    })
}

pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => parse_timestamp(&value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_rfc3339_with_offset_is_normalised() {
        let parsed = parse_timestamp("2024-01-01T09:00:00-03:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_naive_minutes_precision() {
        let parsed = parse_timestamp("2024-01-01T09:15").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 9, 15, 0).unwrap());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(parse_timestamp("tomorrow").is_none());
        assert!(parse_timestamp("2024-13-01T09:00").is_none());
    }

    #[test]
    fn test_bare_dates_cover_whole_day() {
        let from = parse_range_start("2024-01-01").unwrap();
        let to = parse_range_end("2024-01-31").unwrap();

        assert_eq!(from, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert!(to > Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap());
        assert!(to < Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_sub_microsecond_digits_are_dropped() {
        let parsed = parse_timestamp("2024-01-01T09:00:00.123456789Z").unwrap();
        assert_eq!(parsed.timestamp_subsec_nanos(), 123_456_000);

        let naive = parse_timestamp("2024-01-01T09:00:00.000000900").unwrap();
        assert_eq!(naive.timestamp_subsec_nanos(), 0);

        let end_of_day = parse_range_end("2024-01-31").unwrap();
        assert_eq!(end_of_day.timestamp_subsec_nanos(), 999_999_000);
        assert_eq!(now().timestamp_subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn test_bare_date_is_not_a_body_timestamp() {
        assert!(parse_timestamp("2024-01-01").is_none());
    }
}
