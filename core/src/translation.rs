//! Translation values.
//!
//! # Design
//! A translation's `content` is either a plain string or a plural pair, and
//! the wire format carries no tag to tell them apart. Decoding dispatches on
//! the JSON shape: a string is `Content::Singular`, an object is
//! `Content::Plural`, anything else is rejected. Encoding mirrors it, so a
//! value survives a round trip unchanged.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, ValidationError};
use crate::flag;
use crate::timestamp::Timestamp;

/// The two legal shapes of translated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Singular(String),
    Plural(Plural),
}

/// Plural forms of a translation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plural {
    pub one: String,
    pub other: String,
}

impl Content {
    pub fn singular(text: impl Into<String>) -> Self {
        Content::Singular(text.into())
    }

    pub fn plural(one: impl Into<String>, other: impl Into<String>) -> Self {
        Content::Plural(Plural {
            one: one.into(),
            other: other.into(),
        })
    }

    /// Shape dispatch shared by decoding and `TryFrom<Value>`. `None` means
    /// the value is neither a string nor a plural object.
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Content::Singular(s)),
            Value::Object(mut map) => {
                let mut take = |key: &str| match map.remove(key) {
                    None => Some(String::new()),
                    Some(Value::String(s)) => Some(s),
                    Some(_) => None,
                };
                let one = take("one")?;
                let other = take("other")?;
                Some(Content::Plural(Plural { one, other }))
            }
            _ => None,
        }
    }
}

impl Default for Content {
    fn default() -> Self {
        Content::Singular(String::new())
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Singular(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Singular(text)
    }
}

impl From<Plural> for Content {
    fn from(plural: Plural) -> Self {
        Content::Plural(plural)
    }
}

/// Builds content from untyped JSON supplied by a caller, refusing any shape
/// the service would not accept.
impl TryFrom<Value> for Content {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Content::from_value(value).ok_or(Error::Validation(ValidationError::UnsupportedContent))
    }
}

impl Serialize for Content {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Content::Singular(text) => serializer.serialize_str(text),
            Content::Plural(plural) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("one", &plural.one)?;
                map.serialize_entry("other", &plural.other)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Content {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let shape = json_shape(&value);
        Content::from_value(value).ok_or_else(|| {
            de::Error::custom(format!(
                "translation content must be a string or a plural object, got {shape}"
            ))
        })
    }
}

fn json_shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object with non-string plural forms",
    }
}

/// One term's localized value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub content: Content,
    #[serde(default, with = "flag")]
    pub fuzzy: bool,
    #[serde(default, with = "flag", skip_serializing_if = "std::ops::Not::not")]
    pub proofread: bool,
    #[serde(default, skip_serializing_if = "Timestamp::is_zero")]
    pub updated: Timestamp,
}

impl Translation {
    pub fn new(content: impl Into<Content>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn fuzzy(mut self, fuzzy: bool) -> Self {
        self.fuzzy = fuzzy;
        self
    }
}
