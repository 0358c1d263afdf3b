//! Connection validation.

use serde::Serialize;

use crate::error::FailureKind;

use super::client::AdoClient;
use super::types::SessionConfig;

/// Outcome of a connection test, shaped for direct rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionStatus {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureKind>,
    /// Canonical project name as reported by the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

impl ConnectionStatus {
    fn connected(session: &SessionConfig, project: String) -> Self {
        Self {
            ok: true,
            message: format!(
                "Connected to {}/{}",
                session.organization, project
            ),
            reason: None,
            project: Some(project),
        }
    }

    fn failed(reason: FailureKind, message: String) -> Self {
        Self {
            ok: false,
            message,
            reason: Some(reason),
            project: None,
        }
    }
}

/// Perform one lightweight read and categorize the result.
pub async fn validate_connection(client: &AdoClient, session: &SessionConfig) -> ConnectionStatus {
    match client.get_project(session).await {
        Ok(project) => {
            tracing::info!(
                organization = %session.organization,
                project = %project.name,
                "Connection test succeeded"
            );
            ConnectionStatus::connected(session, project.name)
        }
        Err(e) => {
            tracing::info!(
                organization = %session.organization,
                project = %session.project,
                reason = e.kind().as_str(),
                "Connection test failed"
            );
            ConnectionStatus::failed(e.kind(), e.to_string())
        }
    }
}
