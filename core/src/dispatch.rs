//! Request dispatch: identity injection, request building, response parsing.
//!
//! # Design
//! A call is split the same way for every endpoint:
//! - `build_request` merges the caller's form fields with the identity
//!   fields of the call's `Scope` and produces a plain `HttpRequest`;
//! - the `Transport` executes it;
//! - `parse_response` runs the envelope codec and the classifier, then
//!   resolves `result` into the requested type.
//!
//! Identity fields (`api_token`, `id`, `language`) always win over caller
//! fields with the same name. The merge is a separate function so that
//! precedence is explicit and testable.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::envelope::Envelope;
use crate::error::{Error, Result};
use crate::http::{FilePart, HttpMethod, HttpRequest, HttpResponse, RequestBody, Transport};

/// Caller-supplied form fields, ordered for deterministic requests.
pub type Fields = BTreeMap<String, String>;

/// Which identity fields a call carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Account,
    Project(u64),
    Language(u64, String),
}

impl Scope {
    /// Identity fields for this scope, in the order they are sent.
    pub fn identity(&self, api_token: &str) -> Vec<(&'static str, String)> {
        let mut fields = vec![("api_token", api_token.to_string())];
        match self {
            Scope::Account => {}
            Scope::Project(id) => fields.push(("id", id.to_string())),
            Scope::Language(id, code) => {
                fields.push(("id", id.to_string()));
                fields.push(("language", code.clone()));
            }
        }
        fields
    }
}

/// Merge identity fields into caller fields. Identity fields overwrite any
/// caller field of the same name.
pub fn merge_identity(mut fields: Fields, identity: Vec<(&'static str, String)>) -> Fields {
    for (name, value) in identity {
        if let Some(shadowed) = fields.insert(name.to_string(), value) {
            debug!(field = name, shadowed = %shadowed, "caller field replaced by identity field");
        }
    }
    fields
}

/// Issues calls against the API on behalf of `Client` and its handles.
#[derive(Clone)]
pub struct Dispatcher {
    config: Config,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.config.base_url)
            .field("debug", &self.config.debug)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(config: Config, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Build the POST for `path`. The body is url-encoded unless `files` is
    /// non-empty, in which case it is multipart.
    pub fn build_request(
        &self,
        path: &str,
        scope: &Scope,
        fields: Fields,
        files: Vec<FilePart>,
    ) -> HttpRequest {
        let fields: Vec<(String, String)> =
            merge_identity(fields, scope.identity(&self.config.api_token))
                .into_iter()
                .collect();
        let body = if files.is_empty() {
            RequestBody::Form(fields)
        } else {
            RequestBody::Multipart { fields, files }
        };
        HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}{path}", self.config.base_url),
            body,
        }
    }

    /// Decode, classify and resolve a response.
    pub fn parse_response<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T> {
        if self.config.debug {
            info!(
                target: "poeditor::wire",
                status = response.status,
                body = %String::from_utf8_lossy(&response.body),
                "raw response"
            );
        }
        let envelope = match Envelope::decode(&response.body) {
            Ok(envelope) => envelope,
            Err(err) if !response.is_success() => {
                return Err(Error::Transport(format!(
                    "HTTP {} with undecodable body: {err}",
                    response.status
                )));
            }
            Err(err) => return Err(err),
        };
        if let Err(err) = envelope.response.classify() {
            if let Error::Api(api) = &err {
                warn!(code = %api.code, message = %api.message, "API call failed");
            }
            return Err(err);
        }
        envelope.into_result()
    }

    /// Build, send and parse one call.
    pub fn call<T: DeserializeOwned>(
        &self,
        path: &str,
        scope: &Scope,
        fields: Fields,
        files: Vec<FilePart>,
    ) -> Result<T> {
        let request = self.build_request(path, scope, fields, files);
        debug!(path, ?scope, "dispatching request");
        let response = self.transport.execute(request)?;
        self.parse_response(response)
    }
}
