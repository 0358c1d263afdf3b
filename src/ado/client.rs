//! Azure DevOps REST client.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::AdoConfig;
use crate::error::{AdoError, ConfigError, Result};

use super::types::*;

/// Maximum ids the work item batch endpoint accepts per call.
pub const WORK_ITEM_BATCH_LIMIT: usize = 200;

/// Asks the vendor to answer a rejected token with a status code instead of
/// redirecting to its sign-in page.
const FED_AUTH_REDIRECT_HEADER: &str = "X-TFS-FedAuthRedirect";

#[derive(Debug, Serialize)]
struct WiqlRequest<'a> {
    query: &'a str,
}

/// Thin wrapper over the vendor REST API.
///
/// Holds no credentials; every call takes the caller's [`SessionConfig`].
#[derive(Debug, Clone)]
pub struct AdoClient {
    http: Client,
    config: AdoConfig,
}

impl AdoClient {
    /// Create a client from configuration.
    pub fn new(config: AdoConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("ado-assistant/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| ConfigError::Invalid(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &AdoConfig {
        &self.config
    }

    /// Browser-facing organization URL, used to build links in results.
    pub fn organization_url(&self, session: &SessionConfig) -> String {
        self.config.organization_url(&session.organization)
    }

    /// Fetch a single project; the cheapest call that proves org, project and token.
    pub async fn get_project(
        &self,
        session: &SessionConfig,
    ) -> std::result::Result<TeamProject, AdoError> {
        let url = self.url(session, &["_apis", "projects", session.project.as_str()])?;
        let request = self.http.get(url).query(&[("api-version", self.api_version())]);
        self.send(request, session).await
    }

    /// Run a WIQL query and return the matched work item references in order.
    pub async fn query_wiql(
        &self,
        session: &SessionConfig,
        wiql: &str,
    ) -> std::result::Result<Vec<WorkItemReference>, AdoError> {
        let url = self.url(session, &[session.project.as_str(), "_apis", "wit", "wiql"])?;
        tracing::debug!(project = %session.project, %wiql, "Running WIQL query");

        let request = self
            .http
            .post(url)
            .query(&[("api-version", self.api_version())])
            .json(&WiqlRequest { query: wiql });
        let response: WiqlResponse = self.send(request, session).await?;
        Ok(response.work_items)
    }

    /// Fetch work item fields for the given ids, preserving the requested order.
    pub async fn get_work_items(
        &self,
        session: &SessionConfig,
        ids: &[i64],
        fields: &[&str],
    ) -> std::result::Result<Vec<WorkItem>, AdoError> {
        let mut items = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(WORK_ITEM_BATCH_LIMIT) {
            let url = self.url(session, &[session.project.as_str(), "_apis", "wit", "workitems"])?;
            let ids_param = chunk
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(",");

            let fields_param = fields.join(",");

            let request = self.http.get(url).query(&[
                ("ids", ids_param.as_str()),
                ("fields", fields_param.as_str()),
                ("errorPolicy", "omit"),
                ("api-version", self.api_version()),
            ]);

            // Omitted (deleted or inaccessible) items come back as nulls.
            let response: ListResponse<Option<WorkItem>> = self.send(request, session).await?;
            items.extend(response.value.into_iter().flatten());
        }

        Ok(items)
    }

    /// List pull requests in `status`; `top` of `None` returns every match.
    pub async fn list_pull_requests(
        &self,
        session: &SessionConfig,
        status: &str,
        top: Option<usize>,
    ) -> std::result::Result<Vec<PullRequest>, AdoError> {
        let url = self.url(session, &[session.project.as_str(), "_apis", "git", "pullrequests"])?;
        let mut request = self.http.get(url).query(&[
            ("searchCriteria.status", status),
            ("api-version", self.api_version()),
        ]);
        if let Some(top) = top {
            request = request.query(&[("$top", top)]);
        }
        let response: ListResponse<PullRequest> = self.send(request, session).await?;
        Ok(response.value)
    }

    pub async fn list_builds(
        &self,
        session: &SessionConfig,
        top: usize,
    ) -> std::result::Result<Vec<Build>, AdoError> {
        let url = self.url(session, &[session.project.as_str(), "_apis", "build", "builds"])?;
        let top = top.to_string();
        let request = self.http.get(url).query(&[
            ("$top", top.as_str()),
            ("api-version", self.api_version()),
        ]);
        let response: ListResponse<Build> = self.send(request, session).await?;
        Ok(response.value)
    }

    fn api_version(&self) -> &str {
        &self.config.api_version
    }

    /// Organization URL with path segments appended (segments are percent-encoded).
    fn url(&self, session: &SessionConfig, segments: &[&str]) -> std::result::Result<Url, AdoError> {
        session.validate()?;

        let base = self.organization_url(session);
        let mut url = Url::parse(&base).map_err(|_| {
            AdoError::NotFound(format!(
                "organization '{}' is not a valid Azure DevOps organization name",
                session.organization
            ))
        })?;

        url.path_segments_mut()
            .map_err(|_| AdoError::Decode(format!("cannot append path to {}", base)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        session: &SessionConfig,
    ) -> std::result::Result<T, AdoError> {
        let response = request
            .basic_auth("", Some(&session.token))
            .header(reqwest::header::ACCEPT, "application/json")
            .header(FED_AUTH_REDIRECT_HEADER, "Suppress")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();

        // Redirects are not followed; the only one the vendor issues to API
        // callers is the sign-in page for a rejected token.
        if status.is_redirection() {
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            return Err(redirect_error(status, &location));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AdoError::Connectivity(format!("failed to read response: {}", e)))?;

        // 203 is how the vendor answers a rejected token: a sign-in page.
        if status == StatusCode::NON_AUTHORITATIVE_INFORMATION {
            return Err(AdoError::Authorization(
                "the personal access token was rejected".to_string(),
            ));
        }

        if !status.is_success() {
            let error = classify_status(status, &body, session);
            tracing::warn!(
                status = status.as_u16(),
                organization = %session.organization,
                project = %session.project,
                error = %error,
                "Azure DevOps request failed"
            );
            return Err(error);
        }

        serde_json::from_str(&body)
            .map_err(|e| AdoError::Decode(format!("failed to parse response: {}", e)))
    }
}

fn map_transport_error(e: reqwest::Error) -> AdoError {
    if e.is_timeout() {
        AdoError::Connectivity("request timed out".to_string())
    } else if e.is_connect() {
        AdoError::Connectivity(format!("connection failed: {}", e))
    } else {
        AdoError::Connectivity(format!("request failed: {}", e))
    }
}

fn redirect_error(status: StatusCode, location: &str) -> AdoError {
    if location.contains("_signin") {
        AdoError::Authorization("the personal access token was rejected".to_string())
    } else {
        AdoError::Authorization(format!(
            "unexpected redirect ({}) to '{}'; check the token and organization",
            status.as_u16(),
            location
        ))
    }
}

/// Map a non-success status to an error kind, keeping the vendor's message.
fn classify_status(status: StatusCode, body: &str, session: &SessionConfig) -> AdoError {
    let vendor_message = serde_json::from_str::<VendorError>(body)
        .ok()
        .map(|e| e.message);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AdoError::Authorization(
            vendor_message.unwrap_or_else(|| {
                "the personal access token is invalid, expired, or lacks the required scopes"
                    .to_string()
            }),
        ),
        StatusCode::NOT_FOUND => AdoError::NotFound(vendor_message.unwrap_or_else(|| {
            format!(
                "organization '{}' or project '{}' does not exist",
                session.organization, session.project
            )
        })),
        _ => AdoError::Api {
            status: status.as_u16(),
            message: vendor_message.unwrap_or_else(|| truncate(body, 500)),
        },
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "no response body".to_string();
    }
    match trimmed.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
