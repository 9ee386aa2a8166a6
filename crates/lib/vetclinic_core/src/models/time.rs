//! `HH:MM` time-of-day wire format.
//!
//! The API exchanges appointment times and slot bounds as `HH:MM`. Some
//! endpoints echo database values as `HH:MM:SS`, so both are accepted.

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serializer};

const FORMAT: &str = "%H:%M";

/// Parse `HH:MM` or `HH:MM:SS`.
pub fn parse(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

/// Render as `HH:MM`.
pub fn format(time: NaiveTime) -> String {
    time.format(FORMAT).to_string()
}

pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(*time))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid time of day: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_minutes_and_seconds_precision() {
        let expected = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        assert_eq!(parse("09:30"), Some(expected));
        assert_eq!(parse("09:30:00"), Some(expected));
        assert_eq!(parse("9h30"), None);
    }

    #[test]
    fn formats_without_seconds() {
        let time = NaiveTime::from_hms_opt(14, 5, 0).unwrap();
        assert_eq!(format(time), "14:05");
    }
}
