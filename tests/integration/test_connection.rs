//! Connection validator against a mocked Azure DevOps.

use ado_assistant::config::AdoConfig;
use ado_assistant::{validate_connection, AdoClient, FailureKind, SessionConfig};
use serde_json::json;
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::*;

fn project_endpoint() -> String {
    format!("/{}/_apis/projects/Fabrikam%20Fiber", ORG)
}

#[tokio::test]
async fn test_valid_credentials_connect() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(project_endpoint()))
        .and(query_param("api-version", "7.1"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "eb6e4656-77fc-42a1-9181-4c6d8e9da5d1",
            "name": "Fabrikam Fiber",
            "state": "wellFormed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let status = validate_connection(&client(&server), &session()).await;

    assert!(status.ok, "{}", status.message);
    assert_eq!(status.message, "Connected to contoso/Fabrikam Fiber");
    assert!(status.reason.is_none());
}

#[tokio::test]
async fn test_rejected_token_is_authorization_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(project_endpoint()))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let status = validate_connection(&client(&server), &session()).await;

    assert!(!status.ok);
    assert_eq!(status.reason, Some(FailureKind::Authorization));
}

#[tokio::test]
async fn test_sign_in_page_is_authorization_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(project_endpoint()))
        .respond_with(
            ResponseTemplate::new(203).set_body_string("<html><body>Sign In</body></html>"),
        )
        .mount(&server)
        .await;

    let status = validate_connection(&client(&server), &session()).await;

    assert!(!status.ok);
    assert_eq!(status.reason, Some(FailureKind::Authorization));
}

#[tokio::test]
async fn test_sign_in_redirect_is_authorization_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(project_endpoint()))
        .and(header("X-TFS-FedAuthRedirect", "Suppress"))
        .respond_with(ResponseTemplate::new(302).insert_header(
            "Location",
            format!("{}/_signin?realm=dev.azure.com", server.uri()).as_str(),
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/_signin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Sign In</html>"))
        .expect(0)
        .mount(&server)
        .await;

    let status = validate_connection(&client(&server), &session()).await;

    assert!(!status.ok);
    assert_eq!(status.reason, Some(FailureKind::Authorization));
    assert!(status.message.contains("personal access token"), "{}", status.message);
}

#[tokio::test]
async fn test_organization_with_url_characters_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let session = SessionConfig::new("evil.example/x?", PROJECT, "test-pat");
    let status = validate_connection(&client(&server), &session).await;

    assert!(!status.ok);
    assert_eq!(status.reason, Some(FailureKind::InvalidSession));
}

#[tokio::test]
async fn test_unknown_project_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(project_endpoint()))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "TF200016: The following project does not exist: Fabrikam Fiber.",
            "typeKey": "ProjectDoesNotExistWithNameException"
        })))
        .mount(&server)
        .await;

    let status = validate_connection(&client(&server), &session()).await;

    assert!(!status.ok);
    assert_eq!(status.reason, Some(FailureKind::NotFound));
    assert!(status.message.contains("TF200016"));
}

#[tokio::test]
async fn test_server_error_passes_vendor_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(project_endpoint()))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"message": "Service Unavailable"})),
        )
        .mount(&server)
        .await;

    let status = validate_connection(&client(&server), &session()).await;

    assert_eq!(status.reason, Some(FailureKind::Api));
    assert!(status.message.contains("503"));
    assert!(status.message.contains("Service Unavailable"));
}

#[tokio::test]
async fn test_unreachable_host_is_connectivity_failure() {
    // Bind then drop a listener to get a port nothing is serving on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = AdoConfig {
        base_url: format!("http://127.0.0.1:{}/{{organization}}", port),
        timeout_secs: 2,
        ..AdoConfig::default()
    };
    let client = AdoClient::new(config).unwrap();

    let status = validate_connection(&client, &session()).await;

    assert!(!status.ok);
    assert_eq!(status.reason, Some(FailureKind::Connectivity));
}

#[tokio::test]
async fn test_blank_session_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let session = SessionConfig::new(ORG, "", "");
    let status = validate_connection(&client(&server), &session).await;

    assert!(!status.ok);
    assert_eq!(status.reason, Some(FailureKind::InvalidSession));
}
