//! HTTP server startup.

use std::sync::Arc;

use tracing::{info, warn};

use crate::ado::AdoClient;
use crate::api::{create_router, ApiState};
use crate::config::Config;
use crate::error::Result;
use crate::query::{IntentClassifier, LlmIntentAssist, QueryExecutor};

/// Build the query executor from configuration.
///
/// An assist that cannot be constructed is logged and skipped; the service
/// then runs on the keyword rules alone.
pub fn build_executor(config: &Config) -> Result<QueryExecutor> {
    let client = AdoClient::new(config.ado.clone())?;

    let classifier = if config.assist.enabled {
        match LlmIntentAssist::from_config(&config.assist) {
            Ok(assist) => {
                info!(model = %config.assist.model, "Intent assist enabled");
                IntentClassifier::with_assist(Arc::new(assist))
            }
            Err(e) => {
                warn!(error = %e, "Intent assist unavailable, using keyword rules only");
                IntentClassifier::new()
            }
        }
    } else {
        IntentClassifier::new()
    };

    Ok(QueryExecutor::new(client, classifier))
}

/// Run the HTTP server until interrupted.
pub async fn run_http(config: Config) -> Result<()> {
    let executor = build_executor(&config)?;
    let state = Arc::new(ApiState::new(executor));
    let app = create_router(state, &config.server);

    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!("ADO Assistant listening on http://{}", listener.local_addr()?);
    if config.server.web_ui {
        info!("Web UI available at http://{}/ui", listener.local_addr()?);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("ADO Assistant shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
