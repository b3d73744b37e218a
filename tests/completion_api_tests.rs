//! Integration tests for the topic synthesizer against a mock HTTP server.

use repo_tagger::error::Error;
use repo_tagger::topics::{OpenAiClient, Synthesizer};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread().enable_all().build().expect("runtime")
}

fn completion_reply(content: &str) -> serde_json::Value {
    json!({
        "choices": [
            {"message": {"role": "assistant", "content": content}}
        ]
    })
}

#[test]
fn test_suggest_topics_parses_comma_separated_reply() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());

    rt.block_on(async {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({"model": "gpt-4o-mini"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_reply("rust, cli, web scraping")),
            )
            .expect(1)
            .mount(&server)
            .await;
    });

    let client =
        OpenAiClient::with_api_base("sk-test", "gpt-4o-mini", &server.uri()).expect("client");
    let topics = client.suggest_topics("# main.rs\nfn main() {}").expect("topics");

    assert_eq!(topics, vec!["rust", "cli", "web scraping"]);
    rt.block_on(server.verify());
}

#[test]
fn test_service_error_carries_status_and_body() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());

    rt.block_on(async {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(429).set_body_string(r#"{"error":"rate limited"}"#),
            )
            .mount(&server)
            .await;
    });

    let client =
        OpenAiClient::with_api_base("sk-test", "gpt-4o-mini", &server.uri()).expect("client");
    let err = client.suggest_topics("code").unwrap_err();

    match err {
        Error::Api { status, body, .. } => {
            assert_eq!(status.as_u16(), 429);
            assert!(body.contains("rate limited"));
        }
        other => panic!("expected Api error, got: {other}"),
    }
}

#[test]
fn test_reply_without_choices_is_malformed() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());

    rt.block_on(async {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;
    });

    let client =
        OpenAiClient::with_api_base("sk-test", "gpt-4o-mini", &server.uri()).expect("client");
    let err = client.suggest_topics("code").unwrap_err();

    assert!(matches!(err, Error::MalformedCompletion(_)), "got: {err}");
}
