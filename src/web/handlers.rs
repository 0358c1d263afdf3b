//! Web UI route handlers.

use axum::{routing::get, Router};

use crate::web::static_files::{serve_css, serve_index, serve_js};

/// Web UI configuration.
#[derive(Debug, Clone)]
pub struct WebUiConfig {
    /// Enable the web UI.
    pub enabled: bool,
    /// Path prefix for web UI routes.
    pub path_prefix: String,
}

impl Default for WebUiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path_prefix: "/ui".to_string(),
        }
    }
}

/// Create the web UI router.
///
/// Routes:
/// - GET /ui           - Query page
/// - GET /ui/style.css - CSS styles
/// - GET /ui/app.js    - JavaScript
pub fn create_web_ui_router(config: &WebUiConfig) -> Router {
    if !config.enabled {
        return Router::new();
    }

    let web_routes = Router::new()
        .route("/", get(serve_index))
        .route("/style.css", get(serve_css))
        .route("/app.js", get(serve_js));

    Router::new().nest(&config.path_prefix, web_routes)
}
