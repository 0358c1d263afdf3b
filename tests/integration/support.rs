//! Shared fixtures for the integration tests.

use ado_assistant::config::AdoConfig;
use ado_assistant::{AdoClient, IntentClassifier, QueryExecutor, SessionConfig};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const ORG: &str = "contoso";
pub const PROJECT: &str = "Fabrikam Fiber";

pub fn session() -> SessionConfig {
    SessionConfig::new(ORG, PROJECT, "test-pat")
}

/// Client configuration pointed at the mock server.
pub fn ado_config(server: &MockServer) -> AdoConfig {
    AdoConfig {
        base_url: format!("{}/{{organization}}", server.uri()),
        timeout_secs: 5,
        ..AdoConfig::default()
    }
}

pub fn client(server: &MockServer) -> AdoClient {
    AdoClient::new(ado_config(server)).unwrap()
}

pub fn executor(server: &MockServer) -> QueryExecutor {
    QueryExecutor::new(client(server), IntentClassifier::new())
}

/// Request path for a project-scoped endpoint; spaces arrive percent-encoded.
pub fn project_path(suffix: &str) -> String {
    format!("/{}/Fabrikam%20Fiber/{}", ORG, suffix)
}

pub fn wiql_response(ids: &[i64]) -> Value {
    json!({
        "queryType": "flat",
        "workItems": ids
            .iter()
            .map(|id| json!({"id": id, "url": format!("https://example.test/{}", id)}))
            .collect::<Vec<_>>()
    })
}

pub fn work_item(id: i64, kind: &str, state: &str, priority: i64) -> Value {
    json!({
        "id": id,
        "fields": {
            "System.Id": id,
            "System.Title": format!("{} {}", kind, id),
            "System.State": state,
            "System.WorkItemType": kind,
            "Microsoft.VSTS.Common.Priority": priority,
            "System.AssignedTo": {"displayName": "Ada Lovelace", "uniqueName": "ada@contoso.com"}
        }
    })
}

pub fn list(values: Vec<Value>) -> Value {
    json!({"count": values.len(), "value": values})
}
