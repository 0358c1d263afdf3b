//! REST API request handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::ado::{validate_connection, SessionConfig};
use crate::error::{AdoError, AssistantError, FailureKind};
use crate::query::QueryExecutor;

/// Application state shared across handlers.
pub struct ApiState {
    /// Query executor, holding the vendor client and classifier.
    pub executor: QueryExecutor,
    pub started_at: std::time::Instant,
}

impl ApiState {
    /// Create new API state.
    pub fn new(executor: QueryExecutor) -> Self {
        Self {
            executor,
            started_at: std::time::Instant::now(),
        }
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query request: session credentials plus the question text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryRequest {
    #[serde(flatten)]
    pub session: SessionConfig,
    /// English question, e.g. "show me open bugs".
    #[serde(default, alias = "query")]
    pub text: String,
}

/// Service status response.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub assist_enabled: bool,
    pub uptime_seconds: u64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Handler failure mapped onto an HTTP status and error code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "invalid_request",
            message: message.into(),
        }
    }
}

impl From<AdoError> for ApiError {
    fn from(err: AdoError) -> Self {
        let kind = err.kind();
        let status = match kind {
            FailureKind::Authorization => StatusCode::UNAUTHORIZED,
            FailureKind::NotFound => StatusCode::NOT_FOUND,
            FailureKind::Connectivity | FailureKind::Api => StatusCode::BAD_GATEWAY,
            FailureKind::InvalidSession => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            code: kind.as_str(),
            message: err.to_string(),
        }
    }
}

impl From<AssistantError> for ApiError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::Ado(e) => e.into(),
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "internal",
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
                code: self.code.to_string(),
            }),
        )
            .into_response()
    }
}

// ============================================================================
// Handler Functions
// ============================================================================

/// GET / - Service status.
pub async fn root_handler(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    Json(StatusResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        assist_enabled: state.executor.classifier().has_assist(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        timestamp: chrono::Utc::now(),
    })
}

/// POST /test-connection - Validate session credentials.
///
/// Always answers 200; failures are reported in the body with a reason.
pub async fn test_connection_handler(
    State(state): State<Arc<ApiState>>,
    Json(session): Json<SessionConfig>,
) -> impl IntoResponse {
    let status = validate_connection(state.executor.client(), &session).await;
    Json(status)
}

/// POST /query - Answer a natural language question.
pub async fn query_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<QueryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let text = request.text.trim();
    if text.is_empty() {
        return Err(ApiError::bad_request("Query text is required"));
    }

    match state.executor.run(text, &request.session).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            tracing::warn!(
                organization = %request.session.organization,
                project = %request.session.project,
                error = %e,
                "Query failed"
            );
            Err(e.into())
        }
    }
}
