//! Verify envelope handling and content decoding against the JSON test
//! vectors stored in `test-vectors/`.
//!
//! Each vector names a case, gives a raw input and the expected outcome.
//! Responses go through `Dispatcher::parse_response`, the same path every
//! endpoint uses.

use std::io::Write;
use std::sync::Arc;

use poeditor::{
    Config, Content, Dispatcher, Error, HttpRequest, HttpResponse, Result, Transport,
};
use serde::de::IgnoredAny;

struct Offline;

impl Transport for Offline {
    fn execute(&self, _request: HttpRequest) -> Result<HttpResponse> {
        panic!("test vectors never hit the network");
    }

    fn download(&self, _request: HttpRequest, _sink: &mut dyn Write) -> Result<u64> {
        panic!("test vectors never hit the network");
    }
}

fn dispatcher() -> Dispatcher {
    Dispatcher::new(Config::new("T"), Arc::new(Offline))
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[test]
fn envelope_test_vectors() {
    let raw = include_str!("../../test-vectors/envelope.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let d = dispatcher();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = HttpResponse {
            status: 200,
            body: case["body"].as_str().unwrap().as_bytes().to_vec(),
        };
        let result = d.parse_response::<IgnoredAny>(response);

        match case["expected"].as_str().unwrap() {
            "ok" => assert!(result.is_ok(), "{name}: expected success, got {result:?}"),
            "api" => match result {
                Err(Error::Api(api)) => {
                    assert_eq!(api.status, case["status"].as_str().unwrap(), "{name}: status");
                    assert_eq!(api.code, case["code"].as_str().unwrap(), "{name}: code");
                    assert_eq!(api.message, case["message"].as_str().unwrap(), "{name}: message");
                }
                other => panic!("{name}: expected Api, got {other:?}"),
            },
            "codec" => assert!(
                matches!(result, Err(Error::Codec(_))),
                "{name}: expected Codec, got {result:?}"
            ),
            other => panic!("{name}: unknown expectation: {other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Translation content
// ---------------------------------------------------------------------------

fn expected_content(expected: &serde_json::Value) -> Option<Content> {
    if expected.is_null() {
        return None;
    }
    if let Some(s) = expected.get("singular") {
        return Some(Content::singular(s.as_str().unwrap()));
    }
    let pair = expected["plural"].as_array().unwrap();
    Some(Content::plural(
        pair[0].as_str().unwrap(),
        pair[1].as_str().unwrap(),
    ))
}

#[test]
fn translation_test_vectors() {
    let raw = include_str!("../../test-vectors/translation.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let decoded = serde_json::from_value::<Content>(case["content"].clone());

        match expected_content(&case["expected"]) {
            Some(expected) => {
                let content = decoded.unwrap_or_else(|e| panic!("{name}: {e}"));
                assert_eq!(content, expected, "{name}: decoded value");

                // Re-encoding and decoding again yields the same value.
                let encoded = serde_json::to_value(&content).unwrap();
                let again: Content = serde_json::from_value(encoded).unwrap();
                assert_eq!(again, content, "{name}: round trip");
            }
            None => assert!(decoded.is_err(), "{name}: expected decode error"),
        }
    }
}

#[test]
fn translation_vectors_through_envelope_are_codec_errors() {
    let d = dispatcher();
    let body = r#"{"response":{"status":"success","code":"200","message":""},"result":{"terms":[{"term":"x","translation":{"content":[1]}}]}}"#;
    #[derive(serde::Deserialize, Debug)]
    struct Terms {
        #[allow(dead_code)]
        terms: Vec<poeditor::Term>,
    }
    let result = d.parse_response::<Terms>(HttpResponse {
        status: 200,
        body: body.as_bytes().to_vec(),
    });
    assert!(matches!(result, Err(Error::Codec(_))), "got {result:?}");
}
