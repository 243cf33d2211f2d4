//! The response envelope shared by every endpoint.
//!
//! # Design
//! Every response looks like
//! `{"response": {"status", "code", "message"}, "result": <payload>}`.
//! Decoding happens in two steps: the envelope is parsed with `result` left
//! as raw JSON, the status is classified, and only a successful envelope has
//! its `result` resolved into the caller's target type. Error envelopes often
//! carry no `result` at all, so resolving it first would mask the real error.

use std::num::IntErrorKind;

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ApiError, Error, Result};

/// The status block of an envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResponseStatus {
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(default, deserialize_with = "numeric_string")]
    pub code: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: String,
}

impl ResponseStatus {
    /// Decide whether the call succeeded.
    ///
    /// The code must be a non-negative integer; anything within 100 above 200
    /// is a success. The comparison is one-sided, so codes below 200 also
    /// pass. Live responses have not been seen to use that range.
    pub fn classify(&self) -> Result<()> {
        let code: u64 = match self.code.trim().parse() {
            Ok(code) => code,
            // Well-formed but wider than u64: certainly past the threshold.
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => {
                return Err(Error::Api(self.to_error()));
            }
            Err(e) => {
                return Err(Error::Codec(format!(
                    "invalid response code `{}`: {e}",
                    self.code
                )));
            }
        };
        if code.saturating_sub(200) <= 100 {
            return Ok(());
        }
        Err(Error::Api(self.to_error()))
    }

    pub fn to_error(&self) -> ApiError {
        ApiError {
            status: self.status.clone(),
            code: self.code.clone(),
            message: self.message.clone(),
        }
    }
}

/// A decoded envelope whose `result` has not been resolved yet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub response: ResponseStatus,
    #[serde(default)]
    pub result: Value,
}

impl Envelope {
    pub fn decode(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Resolve `result` into any type that can be built from JSON.
    pub fn into_result<T: DeserializeOwned>(self) -> Result<T> {
        T::deserialize(self.result)
            .map_err(|e| Error::Codec(format!("cannot decode result: {e}")))
    }

    /// Classify, then resolve. This is the whole success/failure pipeline for
    /// a single response body.
    pub fn resolve<T: DeserializeOwned>(self) -> Result<T> {
        self.response.classify()?;
        self.into_result()
    }
}

/// Strings that tolerate any JSON type, falling back to empty.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

/// The code is documented as a string but numbers are kept too, since the
/// classifier depends on it.
fn numeric_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::IgnoredAny;

    fn status(code: &str) -> ResponseStatus {
        ResponseStatus {
            status: "fail".to_string(),
            code: code.to_string(),
            message: "nope".to_string(),
        }
    }

    #[test]
    fn classify_200_is_success() {
        assert!(status("200").classify().is_ok());
    }

    #[test]
    fn classify_299_is_success() {
        assert!(status("299").classify().is_ok());
    }

    #[test]
    fn classify_300_is_still_inside_threshold() {
        assert!(status("300").classify().is_ok());
    }

    #[test]
    fn classify_301_is_api_error() {
        let err = status("301").classify().unwrap_err();
        match err {
            Error::Api(api) => {
                assert_eq!(api.status, "fail");
                assert_eq!(api.code, "301");
                assert_eq!(api.message, "nope");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn classify_codes_wider_than_u32_are_api_errors() {
        let err = status("5000000000").classify().unwrap_err();
        assert!(matches!(err, Error::Api(api) if api.code == "5000000000"));
        let err = status("99999999999999999999999").classify().unwrap_err();
        assert!(matches!(err, Error::Api(_)));
    }

    #[test]
    fn classify_below_200_passes() {
        assert!(status("0").classify().is_ok());
        assert!(status("150").classify().is_ok());
    }

    #[test]
    fn classify_service_error_code() {
        assert!(matches!(status("4011").classify(), Err(Error::Api(_))));
    }

    #[test]
    fn classify_non_numeric_is_codec_error() {
        assert!(matches!(status("abc").classify(), Err(Error::Codec(_))));
        assert!(matches!(status("").classify(), Err(Error::Codec(_))));
        assert!(matches!(status("-5").classify(), Err(Error::Codec(_))));
    }

    #[test]
    fn decode_tolerates_malformed_status_and_message() {
        let body = br#"{"response":{"status":7,"code":"200"},"result":{"url":"u"}}"#;
        let envelope = Envelope::decode(body).unwrap();
        assert_eq!(envelope.response.status, "");
        assert_eq!(envelope.response.message, "");
        assert_eq!(envelope.response.code, "200");
    }

    #[test]
    fn decode_accepts_numeric_code() {
        let envelope = Envelope::decode(br#"{"response":{"code":200}}"#).unwrap();
        assert_eq!(envelope.response.code, "200");
    }

    #[test]
    fn decode_rejects_non_json() {
        assert!(matches!(Envelope::decode(b"<html>"), Err(Error::Codec(_))));
    }

    #[derive(Debug, Deserialize)]
    struct Export {
        url: String,
    }

    #[test]
    fn resolve_populates_target() {
        let body = br#"{"response":{"status":"success","code":"200","message":"OK"},"result":{"url":"https://x/file.po"}}"#;
        let export: Export = Envelope::decode(body).unwrap().resolve().unwrap();
        assert_eq!(export.url, "https://x/file.po");
    }

    #[test]
    fn resolve_reports_api_error_before_result_shape() {
        let body = br#"{"response":{"status":"fail","code":"4041","message":"Invalid project"}}"#;
        let err = Envelope::decode(body).unwrap().resolve::<Export>().unwrap_err();
        assert!(matches!(err, Error::Api(api) if api.code == "4041"));
    }

    #[test]
    fn resolve_without_payload_into_ignored() {
        let body = br#"{"response":{"status":"success","code":"200","message":"OK"}}"#;
        assert!(Envelope::decode(body).unwrap().resolve::<IgnoredAny>().is_ok());
    }

    #[test]
    fn resolve_wrong_shape_is_codec_error() {
        let body = br#"{"response":{"status":"success","code":"200","message":""},"result":[1,2]}"#;
        let err = Envelope::decode(body).unwrap().resolve::<Export>().unwrap_err();
        assert!(matches!(err, Error::Codec(_)));
    }
}
