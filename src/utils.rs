// Utility functions
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parses an order date. Date-only values land on midnight.
pub fn parse_order_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }

    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc())
}

/// Rounds to two decimal places, ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_date_only() {
        let dt = parse_order_date("2024-01-10").unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_parse_datetime_variants() {
        assert_eq!(parse_order_date("2024-01-10 13:45:00").unwrap().hour(), 13);
        assert_eq!(parse_order_date("2024-01-10T08:00:00").unwrap().hour(), 8);
        assert_eq!(parse_order_date("2024-01-10T08:00:00+02:00").unwrap().hour(), 6);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_order_date("").is_none());
        assert!(parse_order_date("10/01/2024").is_none());
        assert!(parse_order_date("2024-13-40").is_none());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(83.33333), 83.33);
        assert_eq!(round2(100.0), 100.0);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_round2_ties_go_to_even() {
        assert_eq!(round2(3.125), 3.12);
        assert_eq!(round2(15.625), 15.62);
        assert_eq!(round2(0.375), 0.38);
    }
}
