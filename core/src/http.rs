//! HTTP request and response values, and the transport seam.
//!
//! # Design
//! The dispatcher describes every call as a plain `HttpRequest` and consumes
//! a plain `HttpResponse`; nothing in the codec layer touches the network.
//! Executing a request is the job of a `Transport`, which keeps request
//! building and response parsing deterministic and lets tests substitute an
//! in-memory transport.

use std::io::Write;

use crate::error::Result;

/// HTTP method for a request. API calls are POST; `Get` fetches the
/// temporary file behind an export URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A file attached to a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub contents: Vec<u8>,
}

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// No body, as for a download.
    Empty,
    /// `application/x-www-form-urlencoded`, used when no file is attached.
    Form(Vec<(String, String)>),
    /// `multipart/form-data`, used when at least one file is attached.
    Multipart {
        fields: Vec<(String, String)>,
        files: Vec<FilePart>,
    },
}

impl RequestBody {
    pub fn fields(&self) -> &[(String, String)] {
        match self {
            RequestBody::Empty => &[],
            RequestBody::Form(fields) => fields,
            RequestBody::Multipart { fields, .. } => fields,
        }
    }

    /// Value of the named form field, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields()
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn files(&self) -> &[FilePart] {
        match self {
            RequestBody::Empty | RequestBody::Form(_) => &[],
            RequestBody::Multipart { files, .. } => files,
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: RequestBody,
}

impl HttpRequest {
    /// A bodiless GET, used to fetch an exported file.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            body: RequestBody::Empty,
        }
    }
}

/// An HTTP response described as plain data. The body is kept as bytes so it
/// can be logged and decoded from the same buffer.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes requests on behalf of the client.
///
/// Implementations must be safe to share between threads: independent calls
/// using the same token may run concurrently.
pub trait Transport: Send + Sync {
    /// Send a request and return the raw response. Non-2xx statuses are
    /// returned as data, not errors.
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Send `request` and stream the response body into `sink`, returning the
    /// bytes copied. A non-2xx status, or a connection that fails while the
    /// body is read, is a transport error; a failed write to `sink` is an
    /// I/O error.
    fn download(&self, request: HttpRequest, sink: &mut dyn Write) -> Result<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_request_has_no_fields_or_files() {
        let req = HttpRequest::get("https://x/file.po");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "https://x/file.po");
        assert!(req.body.fields().is_empty());
        assert!(req.body.files().is_empty());
        assert_eq!(req.body.field("api_token"), None);
    }
}
