//! ADO Assistant: natural language queries over Azure DevOps
//!
//! Translates English questions ("show me open bugs", "what's assigned to
//! me") into WIQL and REST calls against Azure DevOps, and returns
//! normalized, display-ready results over a small HTTP API.

pub mod ado;
pub mod api;
pub mod config;
pub mod error;
pub mod query;
pub mod server;
pub mod web;

pub use ado::{validate_connection, AdoClient, ConnectionStatus, SessionConfig};
pub use api::{create_router, ApiState};
pub use config::Config;
pub use error::{AdoError, AssistError, AssistantError, ConfigError, FailureKind, Result};
pub use query::{
    ClassificationResult, ClassificationSource, ExtractedParams, IntentAssist, IntentClassifier,
    LlmIntentAssist, QueryExecutor, QueryIntent, QueryResult, ResultItem,
};
pub use server::{build_executor, run_http};
pub use web::{create_web_ui_router, WebUiConfig};
