//! Domain types for the POEditor API.
//!
//! Response payloads are decoded straight from the envelope's `result` slot.
//! Request payloads (`Term`, `TermUpdate`, `TermTranslation`, ...) are
//! serialized into the JSON `data` form field, with empty values omitted.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::error::{Error, ValidationError};
use crate::flag;
use crate::timestamp::Timestamp;
use crate::translation::Translation;

/// A project as returned by `projects/list`, `projects/view` and friends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(deserialize_with = "numeric_id")]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, with = "flag")]
    pub public: bool,
    #[serde(default, with = "flag")]
    pub open: bool,
    #[serde(default)]
    pub reference_language: String,
    #[serde(default)]
    pub terms: u64,
    #[serde(default)]
    pub created: Timestamp,
}

/// A language of a project, with its progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub translations: u64,
    #[serde(default)]
    pub percentage: f64,
    #[serde(default)]
    pub updated: Timestamp,
}

/// A language the service supports, from `languages/available`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableLanguage {
    pub name: String,
    pub code: String,
}

/// Identity of a term within a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TermKey {
    pub term: String,
    #[serde(default)]
    pub context: String,
}

impl TermKey {
    pub fn new(term: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            context: context.into(),
        }
    }
}

/// A translatable phrase. When listed for a language it carries that
/// language's translation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub term: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub context: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub plural: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Timestamp::is_zero")]
    pub created: Timestamp,
    #[serde(default, skip_serializing_if = "Timestamp::is_zero")]
    pub updated: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<Translation>,
}

impl Term {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Self::default()
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn key(&self) -> TermKey {
        TermKey::new(self.term.clone(), self.context.clone())
    }
}

/// Changes to an existing term, addressed by its current key. Empty `new_*`
/// values are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TermUpdate {
    pub term: String,
    pub context: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub new_term: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub new_context: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub plural: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl TermUpdate {
    pub fn new(key: TermKey) -> Self {
        Self {
            term: key.term,
            context: key.context,
            ..Self::default()
        }
    }
}

/// A comment to attach to a term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermComment {
    pub term: String,
    pub context: String,
    pub comment: String,
}

/// A translation addressed to a term, for `translations/add` and
/// `translations/update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermTranslation {
    pub term: String,
    pub context: String,
    pub translation: Translation,
}

impl TermTranslation {
    pub fn new(key: TermKey, translation: Translation) -> Self {
        Self {
            term: key.term,
            context: key.context,
            translation,
        }
    }
}

/// Per-call counters. Endpoints report different subsets; absent ones are 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResult {
    #[serde(default)]
    pub parsed: u64,
    #[serde(default)]
    pub added: u64,
    #[serde(default)]
    pub updated: u64,
    #[serde(default)]
    pub deleted: u64,
    #[serde(default)]
    pub with_added_comment: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermsResult {
    #[serde(default)]
    pub terms: CountResult,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationsResult {
    #[serde(default)]
    pub translations: CountResult,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    #[serde(default)]
    pub terms: CountResult,
    #[serde(default)]
    pub translations: CountResult,
}

/// A project member and what they can access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub project: ProjectRef,
    #[serde(rename = "type")]
    pub role: String,
    #[serde(default, with = "flag")]
    pub proofreader: bool,
    #[serde(default)]
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    #[serde(deserialize_with = "numeric_id")]
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

/// Project ids arrive as numbers in most payloads and as strings in some.
fn numeric_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| de::Error::custom(format!("invalid project id {n}"))),
        serde_json::Value::String(s) => s
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid project id `{s}`"))),
        other => Err(de::Error::custom(format!("invalid project id {other}"))),
    }
}

/// Declares a closed set of wire keywords with `as_str`, `Display`,
/// `FromStr` and serde support.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $invalid:ident {
            $($variant:ident => $wire:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(ValidationError::$invalid(other.to_string()).into()),
                }
            }
        }
    };
}

wire_enum! {
    /// Export file formats.
    FileFormat, UnsupportedFileFormat {
        Po => "po",
        Pot => "pot",
        Mo => "mo",
        Xls => "xls",
        Csv => "csv",
        Resw => "resw",
        Resx => "resx",
        AndroidStrings => "android_strings",
        AppleStrings => "apple_strings",
        Xliff => "xliff",
        Properties => "properties",
        KeyValueJson => "key_value_json",
        Json => "json",
        Xmb => "xmb",
        Xtb => "xtb",
    }
}

wire_enum! {
    /// Term state filters for exports.
    Filter, UnsupportedFilter {
        Translated => "translated",
        Untranslated => "untranslated",
        Fuzzy => "fuzzy",
        NotFuzzy => "not_fuzzy",
        Automatic => "automatic",
        NotAutomatic => "not_automatic",
        Proofread => "proofread",
        NotProofread => "not_proofread",
    }
}

wire_enum! {
    /// What an upload updates.
    UpdateTarget, UnsupportedUpdateTarget {
        Terms => "terms",
        TermsTranslations => "terms_translations",
        Translations => "translations",
    }
}

/// Options for `ProjectHandle::upload`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    pub updating: UpdateTarget,
    /// Required unless `updating` is `UpdateTarget::Terms`.
    pub language: Option<String>,
    pub overwrite: bool,
    pub sync_terms: bool,
    pub tags: Vec<String>,
    pub read_from_source: bool,
    pub fuzzy_trigger: bool,
}

impl UploadOptions {
    pub fn new(updating: UpdateTarget) -> Self {
        Self {
            updating,
            language: None,
            overwrite: false,
            sync_terms: false,
            tags: Vec::new(),
            read_from_source: false,
            fuzzy_trigger: false,
        }
    }

    pub fn language(mut self, code: impl Into<String>) -> Self {
        self.language = Some(code.into());
        self
    }
}
