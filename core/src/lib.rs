//! Typed client for the POEditor translation-management API (v2).
//!
//! # Overview
//! Every endpoint is a form or multipart POST that answers with the same
//! envelope: `{"response": {"status", "code", "message"}, "result": ...}`.
//! This crate builds those requests, injects the identity fields, and decodes
//! the envelope into typed results or a typed error.
//!
//! ```no_run
//! use poeditor::{Client, FileFormat, Filter, Term};
//!
//! # fn main() -> poeditor::Result<()> {
//! let client = Client::new("api-token");
//! let project = client.project(42);
//! project.add_terms(&[Term::new("hello")])?;
//!
//! let mut file = Vec::new();
//! project
//!     .language("fr")
//!     .export(FileFormat::Po, &[Filter::Translated], &[], &mut file)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! - `Client` is stateless apart from its `Config`; project and language
//!   handles only add identity fields (`id`, `language`) to each call.
//! - Requests and responses are plain data (`http`); the network sits behind
//!   the `Transport` trait, with `ReqwestTransport` as the default.
//! - A translation's content is a `Content::Singular` string or a
//!   `Content::Plural` pair, chosen by the JSON shape on the wire.
//! - Remote failures are `Error::Api`; local rejections are
//!   `Error::Validation` and never reach the network.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod envelope;
pub mod error;
mod flag;
pub mod http;
pub mod timestamp;
pub mod translation;
pub mod transport;
pub mod types;

pub use client::{Client, LanguageHandle, ProjectHandle};
pub use config::Config;
pub use dispatch::{Dispatcher, Fields, Scope};
pub use envelope::{Envelope, ResponseStatus};
pub use error::{ApiError, Error, Result, ValidationError};
pub use http::{FilePart, HttpMethod, HttpRequest, HttpResponse, RequestBody, Transport};
pub use timestamp::Timestamp;
pub use translation::{Content, Plural, Translation};
pub use transport::ReqwestTransport;
pub use types::{
    AvailableLanguage, Contributor, CountResult, FileFormat, Filter, Language, Permission,
    Project, ProjectRef, Term, TermComment, TermKey, TermTranslation, TermUpdate, TermsResult,
    TranslationsResult, UpdateTarget, UploadOptions, UploadResult,
};
