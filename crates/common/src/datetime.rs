//! Lenient chrono (de)serializers for naive timestamps.
//!
//! Clients send both `2025-03-01 08:00:00` and `2025-03-01T08:00:00`; both parse.
//! Output is always ISO-8601 with a `T` separator.

use chrono::NaiveDateTime;
use serde::{de, Deserialize, Deserializer, Serializer};

const FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

pub fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.format("%Y-%m-%dT%H:%M:%S").to_string())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_naive(&raw).ok_or_else(|| de::Error::custom(format!("invalid datetime '{raw}'")))
}

/// Same as the parent module for `Option<NaiveDateTime>` fields.
pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => super::serialize(v, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse_naive(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid datetime '{raw}'"))),
            None => Ok(None),
        }
    }
}

/// For `Option<Option<NaiveDateTime>>` patch fields; pair with `#[serde(default)]`.
pub mod patch {
    use super::*;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Option<NaiveDateTime>>, D::Error> {
        super::option::deserialize(deserializer).map(Some)
    }
}

/// Wall-clock times, `HH:MM:SS` or `HH:MM`.
pub mod time {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer};

    pub fn parse(raw: &str) -> Option<NaiveTime> {
        let raw = raw.trim();
        NaiveTime::parse_from_str(raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
            .ok()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid time '{raw}'")))
    }

    pub mod option {
        use super::*;

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => parse(&raw)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("invalid time '{raw}'"))),
                None => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::parse_naive;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn times_with_and_without_seconds() {
        let expected = NaiveTime::from_hms_opt(8, 5, 0).unwrap();
        assert_eq!(super::time::parse("08:05:00"), Some(expected));
        assert_eq!(super::time::parse("08:05"), Some(expected));
        assert_eq!(super::time::parse("25:00"), None);
    }

    #[test]
    fn accepts_space_and_t_separators() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap().and_hms_opt(8, 30, 0).unwrap();
        assert_eq!(parse_naive("2025-03-01 08:30:00"), Some(expected));
        assert_eq!(parse_naive("2025-03-01T08:30:00"), Some(expected));
        assert_eq!(parse_naive("2025-03-01T08:30"), Some(expected));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_naive("yesterday"), None);
        assert_eq!(parse_naive("2025-13-01 00:00:00"), None);
    }
}
