//! Typed operations for every POEditor endpoint.
//!
//! # Design
//! `Client` owns the dispatcher and carries no mutable state between calls.
//! Project- and language-scoped operations hang off lightweight handles
//! (`ProjectHandle`, `LanguageHandle`) that only remember the identity they
//! add to each request. Every operation is: validate locally, marshal the
//! endpoint's form fields, dispatch, and resolve the envelope's `result`.
//! Nothing is cached; each call re-fetches.

use std::io::{Read, Write};
use std::sync::Arc;

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::dispatch::{Dispatcher, Fields, Scope};
use crate::error::{Error, Result, ValidationError};
use crate::http::{FilePart, HttpRequest, Transport};
use crate::transport::ReqwestTransport;
use crate::types::{
    AvailableLanguage, Contributor, FileFormat, Filter, Language, Project, Term, TermComment,
    TermKey, TermTranslation, TermUpdate, TermsResult, TranslationsResult, UpdateTarget,
    UploadOptions, UploadResult,
};

const UPDATABLE_PROJECT_FIELDS: [&str; 3] = ["name", "description", "reference_language"];

#[derive(Deserialize)]
struct ProjectsResult {
    #[serde(default)]
    projects: Vec<Project>,
}

#[derive(Deserialize)]
struct ProjectResult {
    project: Project,
}

#[derive(Deserialize)]
struct LanguagesResult<L> {
    #[serde(default = "Vec::new")]
    languages: Vec<L>,
}

#[derive(Deserialize)]
struct TermsListResult {
    #[serde(default)]
    terms: Vec<Term>,
}

#[derive(Deserialize)]
struct ContributorsResult {
    #[serde(default)]
    contributors: Vec<Contributor>,
}

#[derive(Deserialize)]
struct ExportResult {
    url: String,
}

/// Encode a value as a JSON string for a form field such as `data` or `tags`.
fn json_field<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

fn fields<const N: usize>(pairs: [(&str, String); N]) -> Fields {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn flag_on(fields: &mut Fields, name: &str, on: bool) {
    if on {
        fields.insert(name.to_string(), "1".to_string());
    }
}

/// Entry point for the API.
#[derive(Debug, Clone)]
pub struct Client {
    dispatcher: Dispatcher,
}

impl Client {
    /// A client for the live service using the default transport.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self::with_config(Config::new(api_token))
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }

    pub fn with_transport(config: Config, transport: impl Transport + 'static) -> Self {
        Self {
            dispatcher: Dispatcher::new(config, Arc::new(transport)),
        }
    }

    /// Configure from the environment; see `Config::from_env`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::with_config(Config::from_env()?))
    }

    pub fn config(&self) -> &Config {
        self.dispatcher.config()
    }

    /// A handle for project-scoped operations. No request is made.
    pub fn project(&self, id: u64) -> ProjectHandle<'_> {
        ProjectHandle { client: self, id }
    }

    /// Every project the token can access.
    pub fn list_projects(&self) -> Result<Vec<Project>> {
        let res: ProjectsResult =
            self.dispatcher
                .call("/projects/list", &Scope::Account, Fields::new(), vec![])?;
        Ok(res.projects)
    }

    pub fn view_project(&self, id: u64) -> Result<Project> {
        self.project(id).view()
    }

    pub fn add_project(&self, name: &str, description: &str) -> Result<Project> {
        let res: ProjectResult = self.dispatcher.call(
            "/projects/add",
            &Scope::Account,
            fields([
                ("name", name.to_string()),
                ("description", description.to_string()),
            ]),
            vec![],
        )?;
        Ok(res.project)
    }

    /// Languages the service supports.
    pub fn available_languages(&self) -> Result<Vec<AvailableLanguage>> {
        let res: LanguagesResult<AvailableLanguage> =
            self.dispatcher
                .call("/languages/available", &Scope::Account, Fields::new(), vec![])?;
        Ok(res.languages)
    }
}

/// Operations on one project.
#[derive(Debug, Clone, Copy)]
pub struct ProjectHandle<'a> {
    client: &'a Client,
    id: u64,
}

impl<'a> ProjectHandle<'a> {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// A handle for language-scoped operations. No request is made.
    pub fn language(&self, code: impl Into<String>) -> LanguageHandle<'a> {
        LanguageHandle {
            project: *self,
            code: code.into(),
        }
    }

    fn call<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        fields: Fields,
        files: Vec<FilePart>,
    ) -> Result<T> {
        self.client
            .dispatcher
            .call(path, &Scope::Project(self.id), fields, files)
    }

    pub fn view(&self) -> Result<Project> {
        let res: ProjectResult = self.call("/projects/view", Fields::new(), vec![])?;
        Ok(res.project)
    }

    /// Update project settings. Only `name`, `description` and
    /// `reference_language` may be set; omitted keys are left unchanged.
    pub fn update<I, K, V>(&self, props: I) -> Result<Project>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut update = Fields::new();
        for (key, value) in props {
            let key = key.into();
            if !UPDATABLE_PROJECT_FIELDS.contains(&key.as_str()) {
                return Err(ValidationError::UnsupportedUpdateField(key).into());
            }
            update.insert(key, value.into());
        }
        let res: ProjectResult = self.call("/projects/update", update, vec![])?;
        Ok(res.project)
    }

    pub fn delete(&self) -> Result<()> {
        self.call::<IgnoredAny>("/projects/delete", Fields::new(), vec![])?;
        Ok(())
    }

    /// Upload a localization file. The file is sent as the multipart field
    /// `file`.
    pub fn upload(
        &self,
        file_name: &str,
        mut reader: impl Read,
        options: &UploadOptions,
    ) -> Result<UploadResult> {
        let language = options.language.as_deref().filter(|code| !code.is_empty());
        if options.updating != UpdateTarget::Terms && language.is_none() {
            return Err(ValidationError::MissingLanguage.into());
        }

        let mut form = fields([("updating", options.updating.to_string())]);
        if let Some(code) = language {
            form.insert("language".to_string(), code.to_string());
        }
        flag_on(&mut form, "overwrite", options.overwrite);
        flag_on(&mut form, "sync_terms", options.sync_terms);
        flag_on(&mut form, "read_from_source", options.read_from_source);
        flag_on(&mut form, "fuzzy_trigger", options.fuzzy_trigger);
        if !options.tags.is_empty() {
            form.insert("tags".to_string(), json_field(&options.tags)?);
        }

        let mut contents = Vec::new();
        reader.read_to_end(&mut contents)?;
        debug!(file_name, bytes = contents.len(), "uploading file");
        let file = FilePart {
            field: "file".to_string(),
            file_name: file_name.to_string(),
            contents,
        };
        self.call("/projects/upload", form, vec![file])
    }

    /// Replace the project's terms with `terms`. Terms not listed are deleted.
    pub fn sync_terms(&self, terms: &[Term]) -> Result<TermsResult> {
        self.call("/projects/sync", fields([("data", json_field(terms)?)]), vec![])
    }

    pub fn list_languages(&self) -> Result<Vec<Language>> {
        let res: LanguagesResult<Language> =
            self.call("/languages/list", Fields::new(), vec![])?;
        Ok(res.languages)
    }

    pub fn add_language(&self, code: &str) -> Result<LanguageHandle<'a>> {
        self.call::<IgnoredAny>(
            "/languages/add",
            fields([("language", code.to_string())]),
            vec![],
        )?;
        Ok(self.language(code))
    }

    /// Terms without translations.
    pub fn list_terms(&self) -> Result<Vec<Term>> {
        let res: TermsListResult = self.call("/terms/list", Fields::new(), vec![])?;
        Ok(res.terms)
    }

    pub fn add_terms(&self, terms: &[Term]) -> Result<TermsResult> {
        self.call("/terms/add", fields([("data", json_field(terms)?)]), vec![])
    }

    /// Update terms addressed by their current key. With `fuzzy_trigger`,
    /// translations of changed terms are marked fuzzy.
    pub fn update_terms(&self, updates: &[TermUpdate], fuzzy_trigger: bool) -> Result<TermsResult> {
        let mut form = fields([("data", json_field(updates)?)]);
        flag_on(&mut form, "fuzzy_trigger", fuzzy_trigger);
        self.call("/terms/update", form, vec![])
    }

    pub fn delete_terms(&self, keys: &[TermKey]) -> Result<TermsResult> {
        self.call("/terms/delete", fields([("data", json_field(keys)?)]), vec![])
    }

    pub fn add_comments(&self, comments: &[TermComment]) -> Result<TermsResult> {
        self.call(
            "/terms/add_comment",
            fields([("data", json_field(comments)?)]),
            vec![],
        )
    }

    pub fn list_contributors(&self) -> Result<Vec<Contributor>> {
        let res: ContributorsResult = self.call("/contributors/list", Fields::new(), vec![])?;
        Ok(res.contributors)
    }

    /// Add a user as project administrator.
    pub fn add_admin(&self, name: &str, email: &str) -> Result<()> {
        self.call::<IgnoredAny>(
            "/contributors/add",
            fields([
                ("name", name.to_string()),
                ("email", email.to_string()),
                ("admin", "1".to_string()),
            ]),
            vec![],
        )?;
        Ok(())
    }

    /// Remove a user from the whole project.
    pub fn remove_contributor(&self, email: &str) -> Result<()> {
        self.call::<IgnoredAny>(
            "/contributors/remove",
            fields([("email", email.to_string())]),
            vec![],
        )?;
        Ok(())
    }
}

/// Operations on one language of a project.
#[derive(Debug, Clone)]
pub struct LanguageHandle<'a> {
    project: ProjectHandle<'a>,
    code: String,
}

impl<'a> LanguageHandle<'a> {
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn project(&self) -> ProjectHandle<'a> {
        self.project
    }

    fn call<T: serde::de::DeserializeOwned>(&self, path: &str, fields: Fields) -> Result<T> {
        let scope = Scope::Language(self.project.id, self.code.clone());
        self.project
            .client
            .dispatcher
            .call(path, &scope, fields, vec![])
    }

    /// Terms with this language's translations.
    pub fn list_terms(&self) -> Result<Vec<Term>> {
        let res: TermsListResult = self.call("/terms/list", Fields::new())?;
        Ok(res.terms)
    }

    pub fn delete(&self) -> Result<()> {
        self.call::<IgnoredAny>("/languages/delete", Fields::new())?;
        Ok(())
    }

    pub fn add_translations(&self, translations: &[TermTranslation]) -> Result<TranslationsResult> {
        self.call(
            "/translations/add",
            fields([("data", json_field(translations)?)]),
        )
    }

    pub fn update_translations(
        &self,
        translations: &[TermTranslation],
    ) -> Result<TranslationsResult> {
        self.call(
            "/translations/update",
            fields([("data", json_field(translations)?)]),
        )
    }

    pub fn delete_translations(&self, keys: &[TermKey]) -> Result<TranslationsResult> {
        self.call("/translations/delete", fields([("data", json_field(keys)?)]))
    }

    /// Add a user as contributor to this language.
    pub fn add_contributor(&self, name: &str, email: &str) -> Result<()> {
        self.call::<IgnoredAny>(
            "/contributors/add",
            fields([("name", name.to_string()), ("email", email.to_string())]),
        )?;
        Ok(())
    }

    /// Remove a user from this language only.
    pub fn remove_contributor(&self, email: &str) -> Result<()> {
        self.call::<IgnoredAny>(
            "/contributors/remove",
            fields([("email", email.to_string())]),
        )?;
        Ok(())
    }

    /// Export the language and copy the file into `sink`.
    ///
    /// This is two requests: the export call returns a temporary URL, which
    /// is then downloaded. If the download fails after the export succeeded,
    /// the error is returned and `sink` may hold a partial file.
    pub fn export(
        &self,
        format: FileFormat,
        filters: &[Filter],
        tags: &[String],
        sink: &mut dyn Write,
    ) -> Result<u64> {
        let mut form = fields([("type", format.to_string())]);
        if !filters.is_empty() {
            form.insert("filters".to_string(), json_field(filters)?);
        }
        if !tags.is_empty() {
            form.insert("tags".to_string(), json_field(tags)?);
        }
        let res: ExportResult = self.call("/projects/export", form)?;
        debug!(url = %res.url, "downloading export");
        self.project
            .client
            .dispatcher
            .transport()
            .download(HttpRequest::get(res.url), sink)
            .map_err(|err| match err {
                Error::Io(io) => Error::Io(io),
                other => Error::Transport(format!("export download failed: {other}")),
            })
    }
}
