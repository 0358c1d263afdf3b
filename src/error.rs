//! Error types for the ADO assistant.

use serde::Serialize;
use thiserror::Error;

/// Main error type for assistant operations.
#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Ado(#[from] AdoError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Errors raised while talking to the Azure DevOps REST API.
#[derive(Error, Debug)]
pub enum AdoError {
    /// Network unreachable, DNS failure, refused connection or timeout.
    #[error("Cannot reach Azure DevOps: {0}")]
    Connectivity(String),

    /// The token was rejected or lacks the required scopes.
    #[error("Authorization failed: {0}")]
    Authorization(String),

    /// Organization or project does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success response, message passed through from the vendor.
    #[error("Azure DevOps API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response from Azure DevOps: {0}")]
    Decode(String),

    #[error("Invalid session: {0}")]
    InvalidSession(String),
}

impl AdoError {
    /// Short machine-readable category for this failure.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Connectivity(_) => FailureKind::Connectivity,
            Self::Authorization(_) => FailureKind::Authorization,
            Self::NotFound(_) => FailureKind::NotFound,
            Self::Api { .. } | Self::Decode(_) => FailureKind::Api,
            Self::InvalidSession(_) => FailureKind::InvalidSession,
        }
    }
}

/// Failure category reported to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Connectivity,
    Authorization,
    NotFound,
    Api,
    InvalidSession,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connectivity => "connectivity",
            Self::Authorization => "authorization",
            Self::NotFound => "not_found",
            Self::Api => "api",
            Self::InvalidSession => "invalid_session",
        }
    }
}

/// Errors from the optional language-model classifier.
#[derive(Error, Debug)]
pub enum AssistError {
    #[error("Assist not configured: {0}")]
    NotConfigured(String),

    #[error("Assist request failed: {0}")]
    Request(String),

    #[error("Assist API error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Result type alias for assistant operations.
pub type Result<T> = std::result::Result<T, AssistantError>;
