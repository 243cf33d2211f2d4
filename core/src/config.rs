//! Client configuration.

use crate::error::{Result, ValidationError};

pub const DEFAULT_BASE_URL: &str = "https://api.poeditor.com/v2";

/// Settings fixed at client construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_token: String,
    pub base_url: String,
    /// Log raw response bodies on the `poeditor::wire` target.
    pub debug: bool,
}

impl Config {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            debug: false,
        }
    }

    /// Load from `POEDITOR_API_TOKEN`, `POEDITOR_BASE_URL` and `DEBUG`.
    /// Debug output is enabled only when `DEBUG` is exactly `"true"`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_token = lookup("POEDITOR_API_TOKEN").ok_or(ValidationError::MissingToken)?;
        let mut config = Self::new(api_token);
        if let Some(base_url) = lookup("POEDITOR_BASE_URL") {
            config = config.with_base_url(&base_url);
        }
        config.debug = lookup("DEBUG").is_some_and(|v| v == "true");
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
