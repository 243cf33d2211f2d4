//! In-memory imitation of the POEditor v2 API.
//!
//! Every `POST /v2/{endpoint}` accepts a url-encoded or multipart form and
//! answers `200 OK` with the service's envelope. Failures are reported in the
//! envelope, not through the HTTP status. Exports are served from
//! `GET /files/{name}`.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};

pub const DEFAULT_TOKEN: &str = "test-token";

/// Timestamp stamped on everything the mock creates.
pub const NOW: &str = "2021-06-15T10:00:00+0000";

const FILE_FORMATS: [&str; 15] = [
    "po", "pot", "mo", "xls", "csv", "resw", "resx", "android_strings", "apple_strings",
    "xliff", "properties", "key_value_json", "json", "xmb", "xtb",
];

const AVAILABLE_LANGUAGES: [(&str, &str); 5] = [
    ("English", "en"),
    ("French", "fr"),
    ("German", "de"),
    ("Italian", "it"),
    ("Spanish", "es"),
];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub public: u8,
    pub open: u8,
    pub reference_language: String,
    pub terms: usize,
    pub created: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Term {
    pub term: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub plural: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: String,
}

impl Term {
    fn key(&self) -> (String, String) {
        (self.term.clone(), self.context.clone())
    }
}

#[derive(Clone, Debug, Deserialize)]
struct TermChange {
    term: String,
    #[serde(default)]
    context: String,
    #[serde(default)]
    new_term: String,
    #[serde(default)]
    new_context: String,
    #[serde(default)]
    reference: String,
    #[serde(default)]
    plural: String,
    #[serde(default)]
    comment: String,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct TranslationChange {
    term: String,
    #[serde(default)]
    context: String,
    #[serde(default)]
    translation: Option<Value>,
}

#[derive(Clone, Debug)]
struct Contributor {
    name: String,
    email: String,
    admin: bool,
    languages: Vec<String>,
}

type Key = (String, String);

#[derive(Debug)]
struct ProjectState {
    project: Project,
    terms: Vec<Term>,
    /// language code -> term key -> translation object
    languages: BTreeMap<String, BTreeMap<Key, Value>>,
    contributors: Vec<Contributor>,
}

struct Failure {
    code: &'static str,
    message: String,
}

impl Failure {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

type Reply = Result<Value, Failure>;

/// The fields and optional file of one submitted form.
#[derive(Debug, Default)]
pub struct Submission {
    pub fields: HashMap<String, String>,
    pub file: Option<Vec<u8>>,
}

impl Submission {
    fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    fn flag(&self, name: &str) -> bool {
        self.get(name) == Some("1")
    }

    fn data<T: for<'de> Deserialize<'de>>(&self) -> Result<Vec<T>, Failure> {
        let raw = self
            .get("data")
            .ok_or_else(|| Failure::new("4013", "Missing data"))?;
        serde_json::from_str(raw).map_err(|e| Failure::new("4014", format!("Invalid data: {e}")))
    }

    fn language(&self) -> Result<&str, Failure> {
        self.get("language")
            .filter(|l| !l.is_empty())
            .ok_or_else(|| Failure::new("4023", "Missing language"))
    }
}

/// Everything the mock knows about.
#[derive(Debug)]
pub struct Store {
    token: String,
    next_id: u64,
    projects: BTreeMap<u64, ProjectState>,
    files: HashMap<String, Vec<u8>>,
}

pub type Db = Arc<RwLock<Store>>;

impl Store {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            next_id: 1,
            projects: BTreeMap::new(),
            files: HashMap::new(),
        }
    }

    /// Handle one API call and return the full envelope.
    pub fn handle(&mut self, endpoint: &str, sub: &Submission, host: &str) -> Value {
        let reply = if sub.get("api_token") != Some(self.token.as_str()) {
            Err(Failure::new("4011", "Invalid API Token"))
        } else {
            self.route(endpoint, sub, host)
        };
        match reply {
            Ok(result) => json!({
                "response": {"status": "success", "code": "200", "message": "OK"},
                "result": result,
            }),
            Err(failure) => {
                warn!(endpoint, code = failure.code, message = %failure.message, "rejected call");
                json!({
                    "response": {"status": "fail", "code": failure.code, "message": failure.message},
                })
            }
        }
    }

    fn route(&mut self, endpoint: &str, sub: &Submission, host: &str) -> Reply {
        match endpoint {
            "projects/list" => {
                let projects: Vec<Project> =
                    self.projects.values().map(ProjectState::summary).collect();
                Ok(json!({ "projects": projects }))
            }
            "projects/add" => {
                let name = sub
                    .get("name")
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| Failure::new("4031", "Missing project name"))?;
                let id = self.next_id;
                self.next_id += 1;
                let state = ProjectState {
                    project: Project {
                        id,
                        name: name.to_string(),
                        description: sub.get("description").unwrap_or_default().to_string(),
                        public: 0,
                        open: 0,
                        reference_language: String::new(),
                        terms: 0,
                        created: NOW.to_string(),
                    },
                    terms: Vec::new(),
                    languages: BTreeMap::new(),
                    contributors: Vec::new(),
                };
                let project = state.summary();
                self.projects.insert(id, state);
                Ok(json!({ "project": project }))
            }
            "languages/available" => {
                let languages: Vec<Value> = AVAILABLE_LANGUAGES
                    .iter()
                    .map(|(name, code)| json!({"name": name, "code": code}))
                    .collect();
                Ok(json!({ "languages": languages }))
            }
            "projects/delete" => {
                let id = project_id(sub)?;
                self.projects
                    .remove(&id)
                    .map(|_| Value::Null)
                    .ok_or_else(|| Failure::new("4041", "Invalid project"))
            }
            "projects/export" => {
                let id = project_id(sub)?;
                let state = self
                    .projects
                    .get(&id)
                    .ok_or_else(|| Failure::new("4041", "Invalid project"))?;
                let (name, contents) = state.export(sub)?;
                self.files.insert(name.clone(), contents);
                Ok(json!({ "url": format!("http://{host}/files/{name}") }))
            }
            _ => {
                let id = project_id(sub)?;
                let state = self
                    .projects
                    .get_mut(&id)
                    .ok_or_else(|| Failure::new("4041", "Invalid project"))?;
                state.route(endpoint, sub)
            }
        }
    }

    pub fn file(&self, name: &str) -> Option<Vec<u8>> {
        self.files.get(name).cloned()
    }
}

fn project_id(sub: &Submission) -> Result<u64, Failure> {
    sub.get("id")
        .and_then(|id| id.parse().ok())
        .ok_or_else(|| Failure::new("4012", "Invalid project id"))
}

fn counts(pairs: &[(&str, usize)]) -> Value {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), json!(v)))
        .collect::<serde_json::Map<_, _>>()
        .into()
}

fn content_of(translation: &Value) -> Value {
    translation.get("content").cloned().unwrap_or(json!(""))
}

impl ProjectState {
    fn summary(&self) -> Project {
        Project {
            terms: self.terms.len(),
            ..self.project.clone()
        }
    }

    fn find_term(&self, key: &Key) -> Option<usize> {
        self.terms.iter().position(|t| &t.key() == key)
    }

    fn route(&mut self, endpoint: &str, sub: &Submission) -> Reply {
        match endpoint {
            "projects/view" => Ok(json!({ "project": self.summary() })),
            "projects/update" => {
                if let Some(name) = sub.get("name") {
                    self.project.name = name.to_string();
                }
                if let Some(description) = sub.get("description") {
                    self.project.description = description.to_string();
                }
                if let Some(reference) = sub.get("reference_language") {
                    self.project.reference_language = reference.to_string();
                }
                Ok(json!({ "project": self.summary() }))
            }
            "projects/upload" => self.upload(sub),
            "projects/sync" => {
                let incoming: Vec<Term> = sub.data()?;
                let keys: Vec<Key> = incoming.iter().map(Term::key).collect();
                let before = self.terms.len();
                self.terms.retain(|t| keys.contains(&t.key()));
                let deleted = before - self.terms.len();
                let mut added = 0;
                for term in incoming {
                    if self.find_term(&term.key()).is_none() {
                        self.terms.push(stamped(term));
                        added += 1;
                    }
                }
                self.prune_translations();
                Ok(json!({"terms": counts(&[
                    ("parsed", keys.len()), ("added", added), ("updated", 0), ("deleted", deleted),
                ])}))
            }
            "languages/list" => {
                let total = self.terms.len();
                let languages: Vec<Value> = self
                    .languages
                    .iter()
                    .map(|(code, translations)| {
                        let done = translations.len();
                        let percentage = if total == 0 {
                            0.0
                        } else {
                            (done as f64 * 10000.0 / total as f64).round() / 100.0
                        };
                        json!({
                            "name": language_name(code),
                            "code": code,
                            "translations": done,
                            "percentage": percentage,
                            "updated": if done == 0 { "" } else { NOW },
                        })
                    })
                    .collect();
                Ok(json!({ "languages": languages }))
            }
            "languages/add" => {
                let code = sub.language()?;
                if self.languages.contains_key(code) {
                    return Err(Failure::new("4050", "Language already added"));
                }
                self.languages.insert(code.to_string(), BTreeMap::new());
                Ok(Value::Null)
            }
            "languages/delete" => {
                let code = sub.language()?;
                self.languages
                    .remove(code)
                    .map(|_| Value::Null)
                    .ok_or_else(|| Failure::new("4044", "Invalid language"))
            }
            "terms/list" => {
                let language = sub.get("language").filter(|l| !l.is_empty());
                let translations = match language {
                    Some(code) => Some(
                        self.languages
                            .get(code)
                            .ok_or_else(|| Failure::new("4044", "Invalid language"))?,
                    ),
                    None => None,
                };
                let terms: Vec<Value> = self
                    .terms
                    .iter()
                    .map(|term| {
                        let mut value = json!(term);
                        if let Some(translations) = translations {
                            value["translation"] = translations.get(&term.key()).cloned().unwrap_or(
                                json!({"content": "", "fuzzy": 0, "proofread": 0, "updated": ""}),
                            );
                        }
                        value
                    })
                    .collect();
                Ok(json!({ "terms": terms }))
            }
            "terms/add" => {
                let incoming: Vec<Term> = sub.data()?;
                let parsed = incoming.len();
                let mut added = 0;
                for term in incoming {
                    if self.find_term(&term.key()).is_none() {
                        self.terms.push(stamped(term));
                        added += 1;
                    }
                }
                Ok(json!({"terms": counts(&[("parsed", parsed), ("added", added)])}))
            }
            "terms/update" => {
                let changes: Vec<TermChange> = sub.data()?;
                let parsed = changes.len();
                let mut updated = 0;
                for change in changes {
                    let key = (change.term.clone(), change.context.clone());
                    let Some(index) = self.find_term(&key) else {
                        continue;
                    };
                    let term = &mut self.terms[index];
                    if !change.new_term.is_empty() {
                        term.term = change.new_term;
                    }
                    if !change.new_context.is_empty() {
                        term.context = change.new_context;
                    }
                    if !change.reference.is_empty() {
                        term.reference = change.reference;
                    }
                    if !change.plural.is_empty() {
                        term.plural = change.plural;
                    }
                    if !change.comment.is_empty() {
                        term.comment = change.comment;
                    }
                    if !change.tags.is_empty() {
                        term.tags = change.tags;
                    }
                    term.updated = NOW.to_string();
                    let new_key = term.key();
                    for translations in self.languages.values_mut() {
                        if let Some(mut translation) = translations.remove(&key) {
                            if sub.flag("fuzzy_trigger") {
                                translation["fuzzy"] = json!(1);
                            }
                            translations.insert(new_key.clone(), translation);
                        }
                    }
                    updated += 1;
                }
                Ok(json!({"terms": counts(&[("parsed", parsed), ("updated", updated)])}))
            }
            "terms/delete" => {
                let keys: Vec<TermChange> = sub.data()?;
                let parsed = keys.len();
                let before = self.terms.len();
                let doomed: Vec<Key> = keys.into_iter().map(|k| (k.term, k.context)).collect();
                self.terms.retain(|t| !doomed.contains(&t.key()));
                self.prune_translations();
                Ok(json!({"terms": counts(&[
                    ("parsed", parsed), ("deleted", before - self.terms.len()),
                ])}))
            }
            "terms/add_comment" => {
                let comments: Vec<TermChange> = sub.data()?;
                let parsed = comments.len();
                let mut commented = 0;
                for change in comments {
                    if let Some(index) = self.find_term(&(change.term, change.context)) {
                        self.terms[index].comment = change.comment;
                        commented += 1;
                    }
                }
                Ok(json!({"terms": counts(&[
                    ("parsed", parsed), ("with_added_comment", commented),
                ])}))
            }
            "translations/add" | "translations/update" | "translations/delete" => {
                self.translations(endpoint, sub)
            }
            "contributors/list" => {
                let contributors: Vec<Value> = self
                    .contributors
                    .iter()
                    .map(|c| {
                        json!({
                            "name": c.name,
                            "email": c.email,
                            "permissions": [{
                                "project": {"id": self.project.id.to_string(), "name": self.project.name},
                                "type": if c.admin { "administrator" } else { "contributor" },
                                "proofreader": 0,
                                "languages": c.languages,
                            }],
                        })
                    })
                    .collect();
                Ok(json!({ "contributors": contributors }))
            }
            "contributors/add" => {
                let email = sub
                    .get("email")
                    .filter(|e| !e.is_empty())
                    .ok_or_else(|| Failure::new("4060", "Missing email"))?;
                let admin = sub.flag("admin");
                let language = sub.get("language").filter(|l| !l.is_empty());
                if !admin {
                    let code = language.ok_or_else(|| Failure::new("4023", "Missing language"))?;
                    if !self.languages.contains_key(code) {
                        return Err(Failure::new("4044", "Invalid language"));
                    }
                }
                match self.contributors.iter_mut().find(|c| c.email == email) {
                    Some(existing) => {
                        existing.admin |= admin;
                        if let Some(code) = language {
                            existing.languages.push(code.to_string());
                        }
                    }
                    None => self.contributors.push(Contributor {
                        name: sub.get("name").unwrap_or_default().to_string(),
                        email: email.to_string(),
                        admin,
                        languages: language.map(|l| vec![l.to_string()]).unwrap_or_default(),
                    }),
                }
                Ok(Value::Null)
            }
            "contributors/remove" => {
                let email = sub.get("email").unwrap_or_default();
                let index = self
                    .contributors
                    .iter()
                    .position(|c| c.email == email)
                    .ok_or_else(|| Failure::new("4061", "Invalid contributor"))?;
                match sub.get("language").filter(|l| !l.is_empty()) {
                    Some(code) => self.contributors[index].languages.retain(|l| l != code),
                    None => {
                        self.contributors.remove(index);
                    }
                }
                Ok(Value::Null)
            }
            other => Err(Failure::new("4040", format!("Unknown endpoint {other}"))),
        }
    }

    fn translations(&mut self, endpoint: &str, sub: &Submission) -> Reply {
        let code = sub.language()?.to_string();
        let changes: Vec<TranslationChange> = sub.data()?;
        let known: Vec<Key> = self.terms.iter().map(Term::key).collect();
        let translations = self
            .languages
            .get_mut(&code)
            .ok_or_else(|| Failure::new("4044", "Invalid language"))?;
        let parsed = changes.len();
        let mut touched = 0;
        for change in changes {
            let key = (change.term, change.context);
            if !known.contains(&key) {
                continue;
            }
            match endpoint {
                "translations/delete" => {
                    touched += usize::from(translations.remove(&key).is_some());
                }
                _ => {
                    let Some(mut translation) = change.translation.filter(Value::is_object) else {
                        continue;
                    };
                    let exists = translations.contains_key(&key);
                    if (endpoint == "translations/add") == exists {
                        continue;
                    }
                    translation["updated"] = json!(NOW);
                    if translation.get("proofread").is_none() {
                        translation["proofread"] = json!(0);
                    }
                    translations.insert(key, translation);
                    touched += 1;
                }
            }
        }
        let counter = match endpoint {
            "translations/add" => "added",
            "translations/update" => "updated",
            _ => "deleted",
        };
        Ok(json!({"translations": counts(&[("parsed", parsed), (counter, touched)])}))
    }

    /// Files are plain text: one term per line, optionally `term=translation`.
    fn upload(&mut self, sub: &Submission) -> Reply {
        let updating = sub.get("updating").unwrap_or_default();
        if !["terms", "terms_translations", "translations"].contains(&updating) {
            return Err(Failure::new("4048", "Invalid updating value"));
        }
        let file = sub
            .file
            .as_ref()
            .ok_or_else(|| Failure::new("4049", "Missing file"))?;
        let text = String::from_utf8_lossy(file);
        let entries: Vec<(String, Option<String>)> = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| match line.split_once('=') {
                Some((term, value)) => (term.trim().to_string(), Some(value.trim().to_string())),
                None => (line.trim().to_string(), None),
            })
            .collect();

        let mut terms_added = 0;
        if updating != "translations" {
            for (term, _) in &entries {
                let key = (term.clone(), String::new());
                if self.find_term(&key).is_none() {
                    self.terms.push(stamped(Term {
                        term: term.clone(),
                        ..Term::default()
                    }));
                    terms_added += 1;
                }
            }
        }

        let (mut added, mut updated) = (0, 0);
        if updating != "terms" {
            let code = sub.language()?;
            let known: Vec<Key> = self.terms.iter().map(Term::key).collect();
            let translations = self
                .languages
                .entry(code.to_string())
                .or_default();
            for (term, value) in &entries {
                let Some(value) = value else {
                    continue;
                };
                let key = (term.clone(), String::new());
                if !known.contains(&key) {
                    continue;
                }
                let exists = translations.contains_key(&key);
                if exists && !sub.flag("overwrite") {
                    continue;
                }
                translations.insert(
                    key,
                    json!({"content": value, "fuzzy": 0, "proofread": 0, "updated": NOW}),
                );
                if exists {
                    updated += 1;
                } else {
                    added += 1;
                }
            }
        }

        Ok(json!({
            "terms": counts(&[("parsed", entries.len()), ("added", terms_added), ("deleted", 0)]),
            "translations": counts(&[("parsed", entries.len()), ("added", added), ("updated", updated)]),
        }))
    }

    fn export(&self, sub: &Submission) -> Result<(String, Vec<u8>), Failure> {
        let code = sub.language()?;
        let translations = self
            .languages
            .get(code)
            .ok_or_else(|| Failure::new("4044", "Invalid language"))?;
        let format = sub.get("type").unwrap_or_default();
        if !FILE_FORMATS.contains(&format) {
            return Err(Failure::new("4046", "Invalid export type"));
        }
        let filters: Vec<String> = match sub.get("filters") {
            Some(raw) => serde_json::from_str(raw)
                .map_err(|_| Failure::new("4047", "Invalid filters"))?,
            None => Vec::new(),
        };

        let mut entries = serde_json::Map::new();
        for term in &self.terms {
            let translation = translations.get(&term.key());
            let fuzzy = translation.is_some_and(|t| t["fuzzy"] == json!(1));
            let keep = filters.iter().all(|filter| match filter.as_str() {
                "translated" => translation.is_some(),
                "untranslated" => translation.is_none(),
                "fuzzy" => fuzzy,
                "not_fuzzy" => !fuzzy,
                _ => true,
            });
            if keep {
                let content = translation.map(content_of).unwrap_or(json!(""));
                entries.insert(term.term.clone(), content);
            }
        }
        let contents = serde_json::to_vec_pretty(&Value::Object(entries))
            .map_err(|e| Failure::new("5000", e.to_string()))?;
        Ok((format!("{}-{code}.{format}", self.project.id), contents))
    }

    fn prune_translations(&mut self) {
        let known: Vec<Key> = self.terms.iter().map(Term::key).collect();
        for translations in self.languages.values_mut() {
            translations.retain(|key, _| known.contains(key));
        }
    }
}

fn stamped(mut term: Term) -> Term {
    term.created = NOW.to_string();
    term.updated = String::new();
    term
}

fn language_name(code: &str) -> &'static str {
    AVAILABLE_LANGUAGES
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(name, _)| *name)
        .unwrap_or("Unknown")
}

pub fn app() -> Router {
    app_with_token(DEFAULT_TOKEN)
}

pub fn app_with_token(token: &str) -> Router {
    let db: Db = Arc::new(RwLock::new(Store::new(token)));
    Router::new()
        .route("/v2/{*endpoint}", post(api))
        .route("/files/{name}", get(download))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn read_submission(request: Request) -> Result<Submission, String> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    if !is_multipart {
        let Form(fields) = Form::<HashMap<String, String>>::from_request(request, &())
            .await
            .map_err(|e| e.to_string())?;
        return Ok(Submission { fields, file: None });
    }

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| e.to_string())?;
    let mut submission = Submission::default();
    while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
        let name = field.name().unwrap_or_default().to_string();
        if field.file_name().is_some() {
            let bytes = field.bytes().await.map_err(|e| e.to_string())?;
            submission.file = Some(bytes.to_vec());
        } else {
            let value = field.text().await.map_err(|e| e.to_string())?;
            submission.fields.insert(name, value);
        }
    }
    Ok(submission)
}

async fn api(
    State(db): State<Db>,
    Path(endpoint): Path<String>,
    headers: HeaderMap,
    request: Request,
) -> Json<Value> {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost")
        .to_string();
    let submission = match read_submission(request).await {
        Ok(submission) => submission,
        Err(message) => {
            return Json(json!({
                "response": {"status": "fail", "code": "4000", "message": message},
            }));
        }
    };
    info!(endpoint, "handling call");
    Json(db.write().await.handle(&endpoint, &submission, &host))
}

async fn download(
    State(db): State<Db>,
    Path(name): Path<String>,
) -> Result<Vec<u8>, StatusCode> {
    db.read().await.file(&name).ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(pairs: &[(&str, &str)]) -> Submission {
        Submission {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            file: None,
        }
    }

    fn call(store: &mut Store, endpoint: &str, pairs: &[(&str, &str)]) -> Value {
        let mut fields = vec![("api_token", DEFAULT_TOKEN)];
        fields.extend_from_slice(pairs);
        store.handle(endpoint, &submission(&fields), "localhost:3000")
    }

    #[test]
    fn wrong_token_is_rejected() {
        let mut store = Store::new(DEFAULT_TOKEN);
        let reply = store.handle("projects/list", &submission(&[("api_token", "nope")]), "h");
        assert_eq!(reply["response"]["code"], "4011");
        assert_eq!(reply["response"]["status"], "fail");
    }

    #[test]
    fn add_project_then_view() {
        let mut store = Store::new(DEFAULT_TOKEN);
        let added = call(&mut store, "projects/add", &[("name", "Demo")]);
        assert_eq!(added["response"]["code"], "200");
        assert_eq!(added["result"]["project"]["id"], 1);
        let viewed = call(&mut store, "projects/view", &[("id", "1")]);
        assert_eq!(viewed["result"]["project"]["name"], "Demo");
        assert_eq!(viewed["result"]["project"]["created"], NOW);
    }

    #[test]
    fn unknown_project_fails() {
        let mut store = Store::new(DEFAULT_TOKEN);
        let reply = call(&mut store, "terms/list", &[("id", "99")]);
        assert_eq!(reply["response"]["code"], "4041");
    }

    #[test]
    fn terms_add_counts_duplicates_once() {
        let mut store = Store::new(DEFAULT_TOKEN);
        call(&mut store, "projects/add", &[("name", "Demo")]);
        let reply = call(
            &mut store,
            "terms/add",
            &[("id", "1"), ("data", r#"[{"term":"a"},{"term":"a"},{"term":"b"}]"#)],
        );
        assert_eq!(reply["result"]["terms"]["parsed"], 3);
        assert_eq!(reply["result"]["terms"]["added"], 2);
    }

    #[test]
    fn plural_translation_is_stored_verbatim() {
        let mut store = Store::new(DEFAULT_TOKEN);
        call(&mut store, "projects/add", &[("name", "Demo")]);
        call(&mut store, "languages/add", &[("id", "1"), ("language", "fr")]);
        call(&mut store, "terms/add", &[("id", "1"), ("data", r#"[{"term":"apple"}]"#)]);
        call(
            &mut store,
            "translations/add",
            &[
                ("id", "1"),
                ("language", "fr"),
                ("data", r#"[{"term":"apple","context":"","translation":{"content":{"one":"pomme","other":"pommes"},"fuzzy":0}}]"#),
            ],
        );
        let listed = call(&mut store, "terms/list", &[("id", "1"), ("language", "fr")]);
        assert_eq!(
            listed["result"]["terms"][0]["translation"]["content"],
            json!({"one": "pomme", "other": "pommes"})
        );
    }
}
