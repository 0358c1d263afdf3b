//! REST API router.

use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::handlers::{query_handler, root_handler, test_connection_handler, ApiState};
use crate::config::ServerConfig;
use crate::web::{create_web_ui_router, WebUiConfig};

/// Create the service router.
///
/// Endpoints:
/// - GET  /                 - Service status
/// - POST /test-connection  - Validate organization, project and token
/// - POST /query            - Answer a natural language question
/// - GET  /ui               - Embedded web page (when enabled)
pub fn create_router(state: Arc<ApiState>, config: &ServerConfig) -> Router {
    let api_routes = Router::new()
        .route("/", get(root_handler))
        .route("/test-connection", post(test_connection_handler))
        .route("/query", post(query_handler))
        .with_state(state);

    let web_config = WebUiConfig {
        enabled: config.web_ui,
        ..WebUiConfig::default()
    };
    let router = api_routes.merge(create_web_ui_router(&web_config));

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .allow_origin(Any);

        router.layer(cors)
    } else {
        router
    }
}
