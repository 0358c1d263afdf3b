//! HTTP surface driven through the router with a mocked Azure DevOps.

use std::sync::Arc;

use ado_assistant::config::ServerConfig;
use ado_assistant::{create_router, ApiState};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::*;

fn app(server: &MockServer) -> Router {
    create_router(
        Arc::new(ApiState::new(executor(server))),
        &ServerConfig::default(),
    )
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_connection_failure_is_reported_in_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let (status, body) = post_json(
        app(&server),
        "/test-connection",
        json!({"organization": ORG, "project": PROJECT, "pat": "expired"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], false);
    assert_eq!(body["reason"], "authorization");
}

#[tokio::test]
async fn test_query_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(project_path("_apis/wit/wiql")))
        .respond_with(ResponseTemplate::new(200).set_body_json(wiql_response(&[21])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(project_path("_apis/wit/workitems")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(list(vec![work_item(21, "Bug", "Active", 1)])),
        )
        .mount(&server)
        .await;

    let (status, body) = post_json(
        app(&server),
        "/query",
        json!({
            "organization": ORG,
            "project": PROJECT,
            "token": "pat",
            "query": "show me critical bugs"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["intent"], "open_bugs");
    assert_eq!(body["params"]["priority"], 1);
    assert_eq!(body["count"], 1);
    assert_eq!(body["items"][0]["id"], 21);
    assert_eq!(body["items"][0]["kind"], "Bug");
    assert!(body["answer"].as_str().unwrap().contains("Found 1 bug(s)"));
}

#[tokio::test]
async fn test_query_authorization_failure_maps_to_401() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(203).set_body_string("<html>Sign in</html>"))
        .mount(&server)
        .await;

    let (status, body) = post_json(
        app(&server),
        "/query",
        json!({"organization": ORG, "project": PROJECT, "token": "bad", "text": "open bugs"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "authorization");
}

#[tokio::test]
async fn test_query_vendor_error_maps_to_502() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "TF51005: The query references a field that does not exist."
        })))
        .mount(&server)
        .await;

    let (status, body) = post_json(
        app(&server),
        "/query",
        json!({"organization": ORG, "project": PROJECT, "token": "t", "text": "open bugs"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "api");
    assert!(body["error"].as_str().unwrap().contains("TF51005"));
}
