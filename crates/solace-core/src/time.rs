//! Canonical timestamp formatting.
//!
//! Every turn and every chat response carries a human-readable local
//! timestamp; the health probe reports an RFC 3339 one.

use chrono::{DateTime, Local, SecondsFormat};

/// Format used for turn and response timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a local time as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(at: DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// The current local time in the canonical format.
pub fn now_timestamp() -> String {
    format_timestamp(Local::now())
}

/// The current local time in RFC 3339, microsecond precision.
pub fn now_iso8601() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn test_format_timestamp_fixed_time() {
        let naive = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 2)
            .unwrap();
        let at = Local.from_local_datetime(&naive).unwrap();
        assert_eq!(format_timestamp(at), "2024-03-07 09:05:02");
    }

    #[test]
    fn test_now_timestamp_shape() {
        let ts = now_timestamp();
        assert_eq!(ts.len(), 19);
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn test_now_iso8601_parses() {
        let ts = now_iso8601();
        assert!(DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
