use serde::{self, Deserialize, Deserializer, Serializer};
use time::{Date, OffsetDateTime, macros::format_description};

/// Parses a calendar date from the portal's ISO `YYYY-MM-DD` form.
///
/// Also accepts a full datetime string and keeps only the date part, since
/// some server responses render dates with a time component.
pub fn parse_iso_date(date_str: &str) -> Result<Date, String> {
    if date_str.contains('T')
        && let Some(date_part) = date_str.split('T').next()
    {
        let format = format_description!("[year]-[month]-[day]");
        if let Ok(date) = Date::parse(date_part, &format) {
            return Ok(date);
        }
    }

    let format = format_description!("[year]-[month]-[day]");
    Date::parse(date_str, &format)
        .map_err(|e| format!("Failed to parse date '{date_str}': {e}"))
}

/// Parses a timestamp from the formats the portal server emits.
///
/// The server renders timestamps either as RFC3339 or as a naive
/// `T`-separated datetime (with or without fractional seconds); naive values
/// are assumed to be UTC.
pub fn parse_iso_datetime(datetime_str: &str) -> Result<OffsetDateTime, String> {
    let rfc3339 = time::format_description::well_known::Rfc3339;
    if let Ok(dt) = OffsetDateTime::parse(datetime_str, &rfc3339) {
        return Ok(dt);
    }

    // Naive datetime with fractional seconds, e.g. "2024-03-01T06:17:25.844847"
    if datetime_str.contains('T')
        && datetime_str.contains('.')
        && !datetime_str.contains('+')
        && !datetime_str.contains('Z')
    {
        let format =
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
        if let Ok(dt) = time::PrimitiveDateTime::parse(datetime_str, &format) {
            return Ok(dt.assume_utc());
        }
    }

    // Naive datetime without fractional seconds
    if datetime_str.contains('T')
        && !datetime_str.contains('.')
        && !datetime_str.contains('+')
        && !datetime_str.contains('Z')
    {
        let format = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
        if let Ok(dt) = time::PrimitiveDateTime::parse(datetime_str, &format) {
            return Ok(dt.assume_utc());
        }
    }

    Err(format!(
        "Failed to parse datetime '{datetime_str}': no matching format"
    ))
}

// Serialization module for time::Date
pub mod iso_date_format {
    use super::{Date, Deserialize, Deserializer, Serializer, format_description, parse_iso_date, serde};

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = date
            .format(&format_description!("[year]-[month]-[day]"))
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let date_str = String::deserialize(deserializer)?;
        parse_iso_date(&date_str).map_err(serde::de::Error::custom)
    }
}

// Optional date serialization module
pub mod iso_date_format_option {
    use super::{Date, Deserialize, Deserializer, Serializer, format_description, serde};

    pub fn serialize<S>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => {
                let formatted = date
                    .format(&format_description!("[year]-[month]-[day]"))
                    .map_err(serde::ser::Error::custom)?;
                serializer.serialize_str(&formatted)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt = Option::<String>::deserialize(deserializer)?;

        match opt {
            Some(s) if !s.is_empty() => super::parse_iso_date(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}

// Timestamp serialization module for time::OffsetDateTime
pub mod iso_datetime_format {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use time::{OffsetDateTime, format_description::well_known::Rfc3339};

    pub fn serialize<S>(datetime: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = datetime
            .format(&Rfc3339)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let datetime_str = String::deserialize(deserializer)?;
        super::parse_iso_datetime(&datetime_str).map_err(serde::de::Error::custom)
    }
}

// Optional timestamp serialization
pub mod iso_datetime_format_option {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use time::{OffsetDateTime, format_description::well_known::Rfc3339};

    pub fn serialize<S>(
        datetime: &Option<OffsetDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match datetime {
            Some(dt) => {
                let formatted = dt.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
                serializer.serialize_str(&formatted)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt = Option::<String>::deserialize(deserializer)?;

        match opt {
            Some(s) if !s.is_empty() => super::parse_iso_datetime(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}
