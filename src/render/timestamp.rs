// Timestamp parsing and local-time display
//
// `created_at` arrives as "2024-01-15T09:30:00.000Z". Only the first 19
// characters are read; fractional seconds and any zone suffix are ignored
// and the value is taken as UTC. Servers send UTC in practice.

use chrono::{DateTime, Local, NaiveDateTime, Utc};

const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Locale date, weekday and time, e.g. "01/15/24(Mon) 18:30:00"
const DISPLAY_FORMAT: &str = "%x(%a) %X";

/// Parse a status `created_at` value, truncated to seconds
pub fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    let head = raw.get(..19)?;
    NaiveDateTime::parse_from_str(head, CREATED_AT_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Time zone used for display
#[derive(Debug, Clone, Copy, Default)]
pub enum Zone {
    /// The system's local time zone
    #[default]
    Local,
    /// A fixed offset from UTC
    #[cfg(test)]
    Fixed(chrono::FixedOffset),
}

impl Zone {
    pub fn format(&self, ts: DateTime<Utc>) -> String {
        match self {
            Zone::Local => ts.with_timezone(&Local).format(DISPLAY_FORMAT).to_string(),
            #[cfg(test)]
            Zone::Fixed(offset) => ts.with_timezone(offset).format(DISPLAY_FORMAT).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, FixedOffset, Timelike};

    #[test]
    fn parses_mastodon_timestamp() {
        let ts = parse_created_at("2024-01-15T09:30:05.123Z").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2024, 1, 15));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (9, 30, 5));
    }

    #[test]
    fn zone_suffix_is_ignored() {
        let a = parse_created_at("2024-01-15T09:30:05+09:00").unwrap();
        let b = parse_created_at("2024-01-15T09:30:05Z").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_short_or_garbled_input() {
        assert!(parse_created_at("2024-01-15").is_none());
        assert!(parse_created_at("").is_none());
        assert!(parse_created_at("yesterday at noon, probably").is_none());
    }

    #[test]
    fn formats_in_fixed_zone() {
        let ts = parse_created_at("2024-01-15T09:30:05Z").unwrap();
        let jst = Zone::Fixed(FixedOffset::east_opt(9 * 3600).unwrap());
        assert_eq!(jst.format(ts), "01/15/24(Mon) 18:30:05");
    }

    #[test]
    fn crossing_midnight_changes_date() {
        let ts = parse_created_at("2024-01-15T23:00:00Z").unwrap();
        let zone = Zone::Fixed(FixedOffset::east_opt(2 * 3600).unwrap());
        assert_eq!(zone.format(ts), "01/16/24(Tue) 01:00:00");
    }
}
