//! Language-model assist against a mocked chat completion endpoint.

use std::sync::Arc;

use ado_assistant::config::AssistConfig;
use ado_assistant::{ClassificationSource, IntentAssist, IntentClassifier, LlmIntentAssist, QueryIntent};
use serde_json::json;
use wiremock::matchers::{bearer_token, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn assist_config(server: &MockServer) -> AssistConfig {
    AssistConfig {
        enabled: true,
        base_url: format!("{}/v1", server.uri()),
        model: "test-model".to_string(),
        api_key: Some("sk-test".to_string()),
        timeout_secs: 5,
    }
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
}

#[tokio::test]
async fn test_assist_classifies_unmatched_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(bearer_token("sk-test"))
        .and(body_partial_json(json!({"model": "test-model", "temperature": 0.0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("sprint_status")))
        .expect(1)
        .mount(&server)
        .await;

    let assist = LlmIntentAssist::from_config(&assist_config(&server)).unwrap();
    let classifier = IntentClassifier::with_assist(Arc::new(assist));

    let result = classifier.classify("how is the team tracking this cycle?").await;

    assert_eq!(result.intent, QueryIntent::SprintStatus);
    assert_eq!(result.source, ClassificationSource::Assist);
}

#[tokio::test]
async fn test_assist_not_consulted_when_rules_match() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("builds")))
        .expect(0)
        .mount(&server)
        .await;

    let assist = LlmIntentAssist::from_config(&assist_config(&server)).unwrap();
    let classifier = IntentClassifier::with_assist(Arc::new(assist));

    let result = classifier.classify("show me open bugs").await;

    assert_eq!(result.intent, QueryIntent::OpenBugs);
    assert_eq!(result.source, ClassificationSource::Rules);
}

#[tokio::test]
async fn test_assist_failure_keeps_generic() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_json(json!({"error": {"message": "Rate limit reached"}})),
        )
        .mount(&server)
        .await;

    let assist = LlmIntentAssist::from_config(&assist_config(&server)).unwrap();
    let err = assist.classify("anything").await.unwrap_err();
    assert!(err.to_string().contains("Rate limit reached"));

    let classifier = IntentClassifier::with_assist(Arc::new(assist));
    let result = classifier.classify("anything").await;

    assert_eq!(result.intent, QueryIntent::Generic);
    assert_eq!(result.source, ClassificationSource::Rules);
}

#[tokio::test]
async fn test_assist_none_keeps_generic() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("none")))
        .mount(&server)
        .await;

    let assist = LlmIntentAssist::from_config(&assist_config(&server)).unwrap();
    let classifier = IntentClassifier::with_assist(Arc::new(assist));

    let result = classifier.classify("tell me a joke").await;

    assert_eq!(result.intent, QueryIntent::Generic);
}
