//! Configuration settings for the ADO assistant server.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Placeholder substituted with the organization name in `ado.base_url`.
pub const ORGANIZATION_PLACEHOLDER: &str = "{organization}";

/// Environment variable consulted when `assist.api_key` is not set.
pub const ASSIST_API_KEY_ENV: &str = "ADO_ASSISTANT_LLM_API_KEY";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub ado: AdoConfig,
    pub assist: AssistConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit path, default locations, or defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(path) = path {
            tracing::info!("Loading config from: {}", path);
            return Self::from_file(path);
        }

        let config_paths = [
            PathBuf::from("config.toml"),
            PathBuf::from("ado-assistant.toml"),
            dirs::config_dir()
                .map(|p| p.join("ado-assistant/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.is_file() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.ado.base_url.is_empty() {
            return Err(ConfigError::MissingField("ado.base_url".to_string()).into());
        }
        if !self.ado.base_url.contains(ORGANIZATION_PLACEHOLDER) {
            return Err(ConfigError::Invalid(format!(
                "ado.base_url must contain {}",
                ORGANIZATION_PLACEHOLDER
            ))
            .into());
        }
        if self.ado.api_version.is_empty() {
            return Err(ConfigError::MissingField("ado.api_version".to_string()).into());
        }
        if self.ado.timeout_secs == 0 {
            return Err(ConfigError::Invalid("ado.timeout_secs must be > 0".to_string()).into());
        }
        if self.ado.max_items == 0 || self.ado.max_items > 200 {
            return Err(
                ConfigError::Invalid("ado.max_items must be between 1 and 200".to_string()).into(),
            );
        }

        if self.assist.enabled {
            if self.assist.base_url.is_empty() {
                return Err(ConfigError::MissingField("assist.base_url".to_string()).into());
            }
            if self.assist.model.is_empty() {
                return Err(ConfigError::MissingField("assist.model".to_string()).into());
            }
        }

        Ok(())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// HTTP port
    pub port: u16,
    /// Enable permissive CORS for browser front-ends
    pub enable_cors: bool,
    /// Serve the embedded web page under /ui
    pub web_ui: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
            web_ui: true,
        }
    }
}

/// Azure DevOps client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdoConfig {
    /// Organization URL template, `{organization}` is substituted per request
    pub base_url: String,
    /// REST `api-version` sent with every call
    pub api_version: String,
    /// Outbound request timeout in seconds
    pub timeout_secs: u64,
    /// Upper bound on work item details fetched per query
    pub max_items: usize,
}

impl Default for AdoConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dev.azure.com/{organization}".to_string(),
            api_version: "7.1".to_string(),
            timeout_secs: 10,
            max_items: 200,
        }
    }
}

impl AdoConfig {
    /// Organization root URL with the placeholder substituted.
    pub fn organization_url(&self, organization: &str) -> String {
        self.base_url
            .replace(ORGANIZATION_PLACEHOLDER, organization)
            .trim_end_matches('/')
            .to_string()
    }
}

/// Optional language-model classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistConfig {
    /// Consult the model when the keyword rules find nothing
    pub enabled: bool,
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Chat model name
    pub model: String,
    /// API key (loaded from environment if not set)
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}
