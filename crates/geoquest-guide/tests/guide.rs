//! Integration tests for the Gemini client and guide using wiremock HTTP mocks.

use geoquest_core::GuideContext;
use geoquest_guide::{GeminiClient, Guide, GuideError};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn test_client(base_url: &str) -> GeminiClient {
    GeminiClient::with_base_url("test-key", "gemini-2.5-flash", 30, base_url)
        .expect("client construction should not fail")
}

fn lisbon() -> GuideContext {
    GuideContext {
        city: "Lisbon".to_owned(),
        country: "Portugal".to_owned(),
    }
}

#[tokio::test]
async fn ask_returns_model_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_string_contains("Secret location: Lisbon, Portugal."))
        .and(body_string_contains("Is it coastal?"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "Yes, it sits where a wide river meets the Atlantic. " }]
                },
                "finishReason": "STOP"
            }]
        })))
        .mount(&server)
        .await;

    let guide = Guide::new(test_client(&server.uri()));
    let answer = guide.ask("Is it coastal?", &lisbon()).await;
    assert_eq!(answer, "Yes, it sits where a wide river meets the Atlantic.");
}

#[tokio::test]
async fn rate_limit_becomes_weary_spirits_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "error": { "code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED" }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.generate("anything").await.unwrap_err();
    assert!(matches!(err, GuideError::RateLimited(_)));

    let guide = Guide::new(client);
    let answer = guide.ask("hint please", &lisbon()).await;
    assert!(answer.contains("weary"), "got: {answer}");
}

#[tokio::test]
async fn empty_candidate_becomes_speechless_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "   " }] }, "finishReason": "STOP" }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(matches!(
        client.generate("q").await,
        Err(GuideError::EmptyAnswer)
    ));
    let answer = Guide::new(client).ask("q", &lisbon()).await;
    assert!(answer.contains("speechless"));
}

#[tokio::test]
async fn safety_block_becomes_geography_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(matches!(
        client.generate("q").await,
        Err(GuideError::Blocked(ref r)) if r == "SAFETY"
    ));
    let answer = Guide::new(client).ask("q", &lisbon()).await;
    assert!(answer.contains("stick to the geography"));
}

#[tokio::test]
async fn invalid_key_becomes_credentials_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT",
                "details": [{ "reason": "API_KEY_INVALID", "domain": "googleapis.com" }]
            }
        })))
        .mount(&server)
        .await;

    let answer = Guide::new(test_client(&server.uri()))
        .ask("q", &lisbon())
        .await;
    assert!(answer.contains("credentials"), "got: {answer}");
}

#[tokio::test]
async fn unreachable_service_still_answers_in_character() {
    let guide = Guide::new(test_client("http://127.0.0.1:1"));
    let answer = guide.ask("q", &lisbon()).await;
    assert!(answer.starts_with("I encountered an issue"));
}
