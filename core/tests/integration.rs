//! Full project lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every client
//! operation over real HTTP through the default `ReqwestTransport`. This
//! checks that form and multipart encoding, identity injection and envelope
//! decoding line up with a server that reads the wire format independently.

use std::net::SocketAddr;

use poeditor::{
    Client, Config, Content, Error, FileFormat, Filter, Term, TermComment, TermKey,
    TermTranslation, TermUpdate, Translation, UpdateTarget, UploadOptions,
};

fn start_mock_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn client(addr: SocketAddr, token: &str) -> Client {
    Client::with_config(Config::new(token).with_base_url(&format!("http://{addr}/v2")))
}

#[test]
fn project_lifecycle() {
    let addr = start_mock_server();
    let client = client(addr, mock_server::DEFAULT_TOKEN);

    // Step 1: no projects yet.
    assert!(client.list_projects().unwrap().is_empty());

    // Step 2: create a project and read it back.
    let created = client.add_project("Website", "Marketing site").unwrap();
    assert_eq!(created.name, "Website");
    assert!(!created.created.is_zero());
    let project = client.project(created.id);
    assert_eq!(client.view_project(created.id).unwrap(), created);

    // Step 3: update allowed fields.
    let updated = project
        .update([("description", "Public site"), ("reference_language", "en")])
        .unwrap();
    assert_eq!(updated.description, "Public site");
    assert_eq!(updated.reference_language, "en");

    // Step 4: languages.
    let french = project.add_language("fr").unwrap();
    project.add_language("de").unwrap();
    let codes: Vec<String> = project
        .list_languages()
        .unwrap()
        .into_iter()
        .map(|l| l.code)
        .collect();
    assert_eq!(codes, ["de", "fr"]);

    // Step 5: terms.
    let res = project
        .add_terms(&[
            Term::new("hello"),
            Term::new("apple").with_context("fruit"),
        ])
        .unwrap();
    assert_eq!(res.terms.parsed, 2);
    assert_eq!(res.terms.added, 2);

    let mut rename = TermUpdate::new(TermKey::new("hello", ""));
    rename.new_term = "hi".to_string();
    let res = project.update_terms(&[rename], false).unwrap();
    assert_eq!(res.terms.updated, 1);

    let res = project
        .add_comments(&[TermComment {
            term: "hi".to_string(),
            context: String::new(),
            comment: "greeting".to_string(),
        }])
        .unwrap();
    assert_eq!(res.terms.with_added_comment, 1);

    let terms = project.list_terms().unwrap();
    assert_eq!(terms.len(), 2);
    assert_eq!(terms[0].term, "hi");
    assert_eq!(terms[0].comment, "greeting");
    assert!(terms[0].translation.is_none());

    // Step 6: translations in both shapes.
    let res = french
        .add_translations(&[
            TermTranslation::new(TermKey::new("hi", ""), Translation::new("salut")),
            TermTranslation::new(
                TermKey::new("apple", "fruit"),
                Translation::new(Content::plural("pomme", "pommes")).fuzzy(true),
            ),
        ])
        .unwrap();
    assert_eq!(res.translations.added, 2);

    let terms = french.list_terms().unwrap();
    let hi = terms.iter().find(|t| t.term == "hi").unwrap();
    assert_eq!(
        hi.translation.as_ref().unwrap().content,
        Content::singular("salut")
    );
    let apple = terms.iter().find(|t| t.term == "apple").unwrap();
    let translation = apple.translation.as_ref().unwrap();
    assert_eq!(translation.content, Content::plural("pomme", "pommes"));
    assert!(translation.fuzzy);
    assert!(!translation.updated.is_zero());

    let res = french
        .update_translations(&[TermTranslation::new(
            TermKey::new("hi", ""),
            Translation::new("bonjour"),
        )])
        .unwrap();
    assert_eq!(res.translations.updated, 1);

    // Step 7: export, filtered to fuzzy terms.
    let mut file = Vec::new();
    let copied = french
        .export(FileFormat::KeyValueJson, &[Filter::Fuzzy], &[], &mut file)
        .unwrap();
    assert_eq!(copied, file.len() as u64);
    let exported: serde_json::Value = serde_json::from_slice(&file).unwrap();
    assert_eq!(
        exported,
        serde_json::json!({"apple": {"one": "pomme", "other": "pommes"}})
    );

    // Step 8: upload a file with new terms and translations.
    let upload = UploadOptions::new(UpdateTarget::TermsTranslations).language("de");
    let res = project
        .upload("de.txt", &b"hi=hallo\nbanana=Banane\n"[..], &upload)
        .unwrap();
    assert_eq!(res.terms.added, 1);
    assert_eq!(res.translations.added, 2);

    // Step 9: contributors.
    project.add_admin("Ann", "ann@example.com").unwrap();
    french.add_contributor("Bob", "bob@example.com").unwrap();
    let contributors = project.list_contributors().unwrap();
    assert_eq!(contributors.len(), 2);
    assert_eq!(contributors[0].permissions[0].role, "administrator");
    assert_eq!(contributors[1].permissions[0].languages, ["fr"]);
    assert_eq!(contributors[1].permissions[0].project.id, created.id);
    project.remove_contributor("ann@example.com").unwrap();
    assert_eq!(project.list_contributors().unwrap().len(), 1);

    // Step 10: deletions.
    let res = french
        .delete_translations(&[TermKey::new("hi", "")])
        .unwrap();
    assert_eq!(res.translations.deleted, 1);
    let res = project
        .delete_terms(&[TermKey::new("banana", "")])
        .unwrap();
    assert_eq!(res.terms.deleted, 1);
    french.delete().unwrap();
    assert_eq!(project.list_languages().unwrap().len(), 1);

    // Step 11: sync replaces the term list.
    let res = project.sync_terms(&[Term::new("only")]).unwrap();
    assert_eq!(res.terms.added, 1);
    assert_eq!(res.terms.deleted, 2);

    // Step 12: delete the project; it is gone afterwards.
    project.delete().unwrap();
    let err = project.view().unwrap_err();
    assert!(matches!(err, Error::Api(api) if api.code == "4041"));
    assert!(client.list_projects().unwrap().is_empty());
}

#[test]
fn wrong_token_surfaces_api_error() {
    let addr = start_mock_server();
    let client = client(addr, "wrong");

    match client.list_projects().unwrap_err() {
        Error::Api(api) => {
            assert_eq!(api.status, "fail");
            assert_eq!(api.code, "4011");
            assert_eq!(api.message, "Invalid API Token");
        }
        other => panic!("expected Api, got {other:?}"),
    }
}

#[test]
fn validation_failures_never_reach_the_server() {
    let addr = start_mock_server();
    let client = client(addr, mock_server::DEFAULT_TOKEN);
    let project = client.project(1);

    let err = project
        .upload(
            "fr.po",
            &b""[..],
            &UploadOptions::new(UpdateTarget::Translations),
        )
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let err = project.update([("open", "1")]).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    // The server saw nothing, so it still has no projects.
    assert!(client.list_projects().unwrap().is_empty());
}

#[test]
fn unreachable_server_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(addr, "T").list_projects().unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got {err:?}");
}
