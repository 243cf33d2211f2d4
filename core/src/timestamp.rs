//! The service's date-time format.
//!
//! POEditor sends timestamps such as `2021-06-15T10:00:00+0000`: ISO-8601
//! with a numeric zone offset and no colon. Fields that were never set come
//! back as an empty string, which decodes to the zero `Timestamp`.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// A point in time as reported by the service, or the zero value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Timestamp(Option<DateTime<FixedOffset>>);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(None);

    pub fn new(at: DateTime<FixedOffset>) -> Self {
        Self(Some(at))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_none()
    }

    pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        self.0.as_ref()
    }

    /// Parse the wire representation. The empty string is the zero value.
    pub fn parse(s: &str) -> Result<Self, Error> {
        if s.is_empty() {
            return Ok(Self::ZERO);
        }
        DateTime::parse_from_str(s, FORMAT)
            .or_else(|_| DateTime::parse_from_rfc3339(s))
            .map(Self::new)
            .map_err(|e| Error::Codec(format!("invalid timestamp `{s}`: {e}")))
    }

    /// Format for the wire; the zero value formats as the empty string.
    pub fn format(&self) -> String {
        self.0
            .map(|at| at.format(FORMAT).to_string())
            .unwrap_or_default()
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(at: DateTime<FixedOffset>) -> Self {
        Self::new(at)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.format())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Timestamp::parse(&s).map_err(de::Error::custom)
    }
}
