//! Error types for the POEditor client.
//!
//! # Design
//! Remote failures and local failures are kept apart. `Api` is the only
//! variant built from inspecting a response envelope; everything the client
//! can reject on its own lands in `Validation` before a request is sent.
//! Transport and decoding problems propagate unchanged.

use thiserror::Error;

/// Errors returned by every client operation.
#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced a usable response (connection failure,
    /// or a non-2xx reply whose body is not an envelope).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response could not be decoded: invalid JSON, a non-numeric
    /// `code`, an unrecognized content shape or a malformed timestamp.
    #[error("codec error: {0}")]
    Codec(String),

    /// The service reported a failure in its response envelope.
    #[error("API error: {0}")]
    Api(ApiError),

    /// The call was rejected locally before dispatch.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Reading an upload source or writing an export sink failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Codec(err.to_string())
    }
}

/// A failure reported by the service, copied verbatim from the envelope.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{status} {code}: {message}")]
pub struct ApiError {
    pub status: String,
    pub code: String,
    pub message: String,
}

/// Reasons a call is refused before anything goes over the wire.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("translation content must be a string or an object with `one`/`other`")]
    UnsupportedContent,

    #[error("language code is required when uploading translations")]
    MissingLanguage,

    #[error("updating must be one of terms, terms_translations or translations, got `{0}`")]
    UnsupportedUpdateTarget(String),

    #[error("cannot update field `{0}`; valid fields are name, description, reference_language")]
    UnsupportedUpdateField(String),

    #[error("unsupported file format `{0}`")]
    UnsupportedFileFormat(String),

    #[error("unsupported filter `{0}`")]
    UnsupportedFilter(String),

    #[error("POEDITOR_API_TOKEN environment variable is required")]
    MissingToken,
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_all_three_fields() {
        let err = ApiError {
            status: "fail".to_string(),
            code: "4011".to_string(),
            message: "Invalid API Token".to_string(),
        };
        assert_eq!(err.to_string(), "fail 4011: Invalid API Token");
        assert_eq!(
            Error::Api(err).to_string(),
            "API error: fail 4011: Invalid API Token"
        );
    }

    #[test]
    fn json_errors_become_codec_errors() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(Error::from(json_err), Error::Codec(_)));
    }

    #[test]
    fn validation_errors_convert() {
        let err: Error = ValidationError::MissingLanguage.into();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingLanguage)
        ));
    }
}
