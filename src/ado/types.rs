//! Session credentials and Azure DevOps REST payloads.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AdoError;

// ============================================================================
// Session Configuration
// ============================================================================

/// Caller-supplied credentials for one request.
///
/// Never stored server-side; every operation borrows it explicitly.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Organization name (`dev.azure.com/{organization}`)
    pub organization: String,
    /// Project name, may contain spaces
    pub project: String,
    /// Personal access token
    #[serde(alias = "pat", skip_serializing)]
    pub token: String,
}

impl SessionConfig {
    pub fn new(
        organization: impl Into<String>,
        project: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            project: project.into(),
            token: token.into(),
        }
    }

    /// Reject sessions with blank fields before any network call is made.
    pub fn validate(&self) -> Result<(), AdoError> {
        let missing: Vec<&str> = [
            ("organization", &self.organization),
            ("project", &self.project),
            ("token", &self.token),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(AdoError::InvalidSession(format!(
                "missing {}",
                missing.join(", ")
            )));
        }

        // The organization is substituted into the URL host or path.
        if !is_valid_organization(&self.organization) {
            return Err(AdoError::InvalidSession(format!(
                "organization '{}' may only contain letters, digits, '.', '_' and '-'",
                self.organization
            )));
        }

        Ok(())
    }
}

fn is_valid_organization(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("token", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// REST payloads
// ============================================================================

/// Generic `{count, value}` list envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

/// Error body returned by the vendor on failed calls.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorError {
    pub message: String,
    #[serde(default)]
    pub type_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamProject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WiqlResponse {
    #[serde(default)]
    pub work_items: Vec<WorkItemReference>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkItemReference {
    pub id: i64,
    #[serde(default)]
    pub url: Option<String>,
}

/// Work item with a flat field map keyed by reference name.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkItem {
    pub id: i64,
    #[serde(default)]
    pub fields: HashMap<String, serde_json::Value>,
}

impl WorkItem {
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|v| v.as_str())
    }

    pub fn title(&self) -> &str {
        self.field_str(super::wiql::FIELD_TITLE).unwrap_or("No title")
    }

    pub fn state(&self) -> &str {
        self.field_str(super::wiql::FIELD_STATE).unwrap_or("Unknown")
    }

    pub fn work_item_type(&self) -> &str {
        self.field_str(super::wiql::FIELD_WORK_ITEM_TYPE)
            .unwrap_or("Unknown")
    }

    pub fn priority(&self) -> Option<i64> {
        self.fields
            .get(super::wiql::FIELD_PRIORITY)
            .and_then(|v| v.as_i64())
    }

    /// Display name of the assignee; identity fields arrive as objects.
    pub fn assigned_to(&self) -> Option<String> {
        match self.fields.get(super::wiql::FIELD_ASSIGNED_TO)? {
            serde_json::Value::Object(identity) => identity
                .get("displayName")
                .or_else(|| identity.get("uniqueName"))
                .and_then(|v| v.as_str())
                .map(str::to_string),
            serde_json::Value::String(name) if !name.is_empty() => Some(name.clone()),
            _ => None,
        }
    }

    pub fn closed_date(&self) -> Option<&str> {
        self.field_str(super::wiql::FIELD_CLOSED_DATE)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRef {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub unique_name: Option<String>,
}

impl IdentityRef {
    pub fn name(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .or(self.unique_name.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryRef {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub pull_request_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_by: IdentityRef,
    #[serde(default)]
    pub source_ref_name: Option<String>,
    #[serde(default)]
    pub target_ref_name: Option<String>,
    #[serde(default)]
    pub reviewers: Vec<IdentityRef>,
    #[serde(default)]
    pub repository: RepositoryRef,
    #[serde(default)]
    pub is_draft: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefinitionRef {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    pub id: i64,
    #[serde(default)]
    pub build_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub definition: DefinitionRef,
    #[serde(default)]
    pub requested_for: IdentityRef,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub source_branch: Option<String>,
}

/// Strip the `refs/heads/` prefix from a git ref for display.
pub fn short_ref(name: &str) -> &str {
    name.strip_prefix("refs/heads/").unwrap_or(name)
}
