//! `0`/`1` flags.
//!
//! The service encodes booleans such as `fuzzy`, `public` and `proofreader`
//! as integers. Use with `#[serde(with = "flag")]`. Decoding also accepts
//! JSON booleans and the strings `"0"`/`"1"`.

use serde::de::{self, Deserializer, Unexpected};
use serde::{Deserialize, Serializer};
use serde_json::Value;

pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Bool(b) => Ok(b),
        Value::Number(n) => match n.as_u64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(de::Error::invalid_value(
                Unexpected::Other("number"),
                &"0 or 1",
            )),
        },
        Value::String(s) => match s.as_str() {
            "0" | "" => Ok(false),
            "1" => Ok(true),
            other => Err(de::Error::invalid_value(Unexpected::Str(other), &"0 or 1")),
        },
        Value::Null => Ok(false),
        _ => Err(de::Error::invalid_type(Unexpected::Other("non-flag"), &"0 or 1")),
    }
}
