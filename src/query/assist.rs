//! Optional language-model classifier.
//!
//! The rule table is always authoritative. An assist is only asked about text
//! the rules could not place, and any failure degrades silently to `Generic`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{AssistConfig, ASSIST_API_KEY_ENV};
use crate::error::AssistError;

use super::types::QueryIntent;

/// Capability interface for auxiliary intent classification.
#[async_trait]
pub trait IntentAssist: Send + Sync {
    /// Map free text to an intent, or `None` when unsure.
    async fn classify(&self, text: &str) -> Result<Option<QueryIntent>, AssistError>;

    /// Short identifier used in logs.
    fn name(&self) -> &str;
}

/// OpenAI-compatible chat completion classifier.
pub struct LlmIntentAssist {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

const SYSTEM_PROMPT: &str = "You classify questions about an Azure DevOps project. \
Answer with exactly one label from: open_bugs, my_items, sprint_status, pull_requests, \
builds, critical_issues, user_stories, completed_items, none. \
Answer none when the question fits no label.";

impl LlmIntentAssist {
    /// Create an assist from configuration.
    pub fn from_config(config: &AssistConfig) -> Result<Self, AssistError> {
        if !config.enabled {
            return Err(AssistError::NotConfigured("assist.enabled is false".to_string()));
        }

        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var(ASSIST_API_KEY_ENV).ok())
            .filter(|key| !key.is_empty());

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AssistError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    async fn complete(&self, text: &str) -> Result<String, AssistError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
            temperature: 0.0,
            max_tokens: 8,
        };

        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                AssistError::Request("Request timed out".to_string())
            } else {
                AssistError::Request(format!("Request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ErrorResponse>(&error_text)
                .map(|e| e.error.message)
                .unwrap_or(error_text);
            return Err(AssistError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| AssistError::Request(format!("Failed to parse response: {}", e)))?;

        Ok(reply
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}

#[async_trait]
impl IntentAssist for LlmIntentAssist {
    async fn classify(&self, text: &str) -> Result<Option<QueryIntent>, AssistError> {
        let reply = self.complete(text).await?;
        Ok(parse_label(&reply))
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// Read the first recognizable label out of a model reply.
fn parse_label(reply: &str) -> Option<QueryIntent> {
    reply
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
        .find_map(QueryIntent::from_label)
        .filter(|intent| *intent != QueryIntent::Generic)
}
