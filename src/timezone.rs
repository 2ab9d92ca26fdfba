//! Conversion of STH `recvTime` strings into display-zone datetimes.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

/// Tried first: `2024-01-15 10:30:00.123`
const FRACTIONAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
/// Fallback: `2024-01-15 10:30:00`
const WHOLE_SECOND_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp conversion errors
#[derive(Debug, Clone, PartialEq)]
pub enum TimestampError {
    /// Neither accepted format matched
    Unparseable(String),
}

impl std::fmt::Display for TimestampError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimestampError::Unparseable(raw) => {
                write!(f, "Unparseable timestamp '{}'", raw)
            }
        }
    }
}

impl std::error::Error for TimestampError {}

/// Parse a UTC timestamp as sent by STH (`T`/`Z` separators optional).
pub fn parse_utc(raw: &str) -> Result<NaiveDateTime, TimestampError> {
    let cleaned = raw.replace('T', " ").replace('Z', "");

    NaiveDateTime::parse_from_str(&cleaned, FRACTIONAL_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(&cleaned, WHOLE_SECOND_FORMAT))
        .map_err(|_| TimestampError::Unparseable(raw.to_string()))
}

/// Convert one UTC timestamp string into the display timezone
pub fn convert_timestamp(raw: &str, tz: Tz) -> Result<DateTime<Tz>, TimestampError> {
    let naive = parse_utc(raw)?;
    Ok(Utc.from_utc_datetime(&naive).with_timezone(&tz))
}

/// Convert a batch of timestamps, skipping (and logging) the ones that fail.
///
/// The output is shorter than the input when anything is skipped, so it is
/// not index-aligned with `timestamps`.
pub fn to_display_timezone<S: AsRef<str>>(timestamps: &[S], tz: Tz) -> Vec<DateTime<Tz>> {
    timestamps
        .iter()
        .filter_map(|raw| match convert_timestamp(raw.as_ref(), tz) {
            Ok(dt) => Some(dt),
            Err(e) => {
                warn!(error = %e, "Skipping timestamp");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Offset, Timelike};

    const SAO_PAULO: Tz = chrono_tz::America::Sao_Paulo;

    fn utc_naive(h: u32, m: u32, s: u32, milli: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_milli_opt(h, m, s, milli)
            .unwrap()
    }

    #[test]
    fn test_fractional_seconds_converted_to_sao_paulo() {
        let dt = convert_timestamp("2024-01-15T10:30:00.123Z", SAO_PAULO).unwrap();

        // Same instant as the UTC input
        assert_eq!(dt.naive_utc(), utc_naive(10, 30, 0, 123));
        // Shifted by the zone offset on that date (UTC-3, no DST since 2019)
        assert_eq!(dt.offset().fix().local_minus_utc(), -3 * 3600);
        assert_eq!(dt.naive_local(), utc_naive(7, 30, 0, 123));
        assert_eq!(dt.nanosecond(), 123_000_000);
    }

    #[test]
    fn test_whole_seconds_fallback() {
        let dt = convert_timestamp("2024-01-15T10:30:00Z", SAO_PAULO).unwrap();
        assert_eq!(dt.naive_utc(), utc_naive(10, 30, 0, 0));
        assert_eq!(dt.naive_local(), utc_naive(7, 30, 0, 0));
    }

    #[test]
    fn test_space_separated_input_accepted() {
        let dt = parse_utc("2024-01-15 10:30:00.5").unwrap();
        assert_eq!(dt, utc_naive(10, 30, 0, 500));
    }

    #[test]
    fn test_microsecond_precision_preserved() {
        let dt = parse_utc("2024-01-15T10:30:00.123456Z").unwrap();
        assert_eq!(dt.nanosecond(), 123_456_000);
    }

    #[test]
    fn test_unparseable_timestamp_error() {
        let err = convert_timestamp("not-a-date", SAO_PAULO).unwrap_err();
        assert_eq!(err, TimestampError::Unparseable("not-a-date".to_string()));
        assert!(err.to_string().contains("not-a-date"));
    }

    #[test]
    fn test_batch_skips_unparseable() {
        let input = vec![
            "2024-01-15T10:30:00.123Z",
            "not-a-date",
            "2024-01-15T10:31:00Z",
        ];
        let converted = to_display_timezone(&input, SAO_PAULO);

        assert_eq!(converted.len(), input.len() - 1);
        assert_eq!(converted[0].naive_utc(), utc_naive(10, 30, 0, 123));
        assert_eq!(converted[1].naive_utc(), utc_naive(10, 31, 0, 0));
    }

    #[test]
    fn test_batch_empty_input() {
        let input: Vec<String> = Vec::new();
        assert!(to_display_timezone(&input, SAO_PAULO).is_empty());
    }

    #[test]
    fn test_other_timezone() {
        let dt = convert_timestamp("2024-07-01T12:00:00Z", chrono_tz::Europe::Lisbon).unwrap();
        // Lisbon is on WEST (UTC+1) in July
        assert_eq!(dt.hour(), 13);
    }
}
