//! Query Executor.
//!
//! Runs a classified query against the Azure DevOps REST API and normalizes
//! the response into a [`QueryResult`].

use std::time::Instant;

use crate::ado::wiql::DETAIL_FIELDS;
use crate::ado::{short_ref, AdoClient, Build, PullRequest, SessionConfig, WorkItem};
use crate::error::{AdoError, Result};

use super::answer;
use super::classifier::IntentClassifier;
use super::plan::QueryPlan;
use super::types::*;

// ============================================================================
// Query Executor
// ============================================================================

/// Classifies and executes natural language queries.
///
/// Shared read-only across requests; all per-request state lives in the
/// borrowed [`SessionConfig`] and the returned result.
#[derive(Clone)]
pub struct QueryExecutor {
    client: AdoClient,
    classifier: IntentClassifier,
}

impl QueryExecutor {
    pub fn new(client: AdoClient, classifier: IntentClassifier) -> Self {
        Self { client, classifier }
    }

    pub fn client(&self) -> &AdoClient {
        &self.client
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    /// Classify `text` and execute the resulting intent.
    pub async fn run(&self, text: &str, session: &SessionConfig) -> Result<QueryResult> {
        session.validate()?;

        let class_start = Instant::now();
        let classification = self.classifier.classify(text).await;
        let classification_time = class_start.elapsed().as_millis() as u64;

        tracing::info!(
            organization = %session.organization,
            project = %session.project,
            intent = classification.intent.label(),
            source = ?classification.source,
            "Executing query"
        );

        let mut result = self.execute(&classification, session).await?;
        result.stats.classification_time_ms = classification_time;
        Ok(result)
    }

    /// Execute an already classified query.
    pub async fn execute(
        &self,
        classification: &ClassificationResult,
        session: &SessionConfig,
    ) -> Result<QueryResult> {
        let exec_start = Instant::now();
        let intent = classification.intent;
        let params = &classification.params;

        let plan = QueryPlan::for_intent(
            intent,
            params,
            &session.project,
            self.client.config().max_items,
        );

        let (items, count, api_calls) = match plan {
            QueryPlan::WorkItems { wiql, limit } => {
                self.fetch_work_items(session, &wiql, limit).await?
            }
            QueryPlan::PullRequests { status, limit } => {
                // `count` covers every match; only the returned items are capped.
                let prs = self.client.list_pull_requests(session, status, None).await?;
                let org_url = self.client.organization_url(session);
                let items: Vec<_> = prs
                    .iter()
                    .take(limit)
                    .map(|pr| pull_request_item(pr, &org_url, &session.project))
                    .collect();
                (items, prs.len(), 1)
            }
            QueryPlan::Builds { top } => {
                let builds = self.client.list_builds(session, top).await?;
                let org_url = self.client.organization_url(session);
                let items: Vec<_> = builds
                    .iter()
                    .map(|b| build_item(b, &org_url, &session.project))
                    .collect();
                let count = items.len();
                (items, count, 1)
            }
        };

        let mut summary = ResultSummary::from_items(&items);
        if intent == QueryIntent::SprintStatus && !items.is_empty() {
            let completed = summary.state_count("Done") + summary.state_count("Closed");
            summary.completion_percent = Some(completed as f64 * 100.0 / items.len() as f64);
        }

        let answer = answer::render(intent, &items, count, &summary, params.days);

        let mut result = QueryResult::new(intent, items, count)
            .with_answer(answer)
            .with_summary(summary);
        result.params = params.clone();
        result.source = classification.source;
        result.stats = QueryStats {
            classification_time_ms: 0,
            execution_time_ms: exec_start.elapsed().as_millis() as u64,
            api_calls,
        };

        tracing::debug!(
            intent = intent.label(),
            count,
            returned = result.items.len(),
            api_calls,
            "Query complete"
        );

        Ok(result)
    }

    /// Run WIQL, then fetch details for the first `limit` matches.
    async fn fetch_work_items(
        &self,
        session: &SessionConfig,
        wiql: &str,
        limit: usize,
    ) -> std::result::Result<(Vec<ResultItem>, usize, u32), AdoError> {
        let refs = self.client.query_wiql(session, wiql).await?;
        let count = refs.len();
        if refs.is_empty() {
            return Ok((Vec::new(), 0, 1));
        }

        let ids: Vec<i64> = refs.iter().take(limit).map(|r| r.id).collect();
        let details = self
            .client
            .get_work_items(session, &ids, DETAIL_FIELDS)
            .await?;

        let org_url = self.client.organization_url(session);
        let items = details
            .iter()
            .map(|wi| work_item_item(wi, &org_url, &session.project))
            .collect();

        Ok((items, count, 2))
    }
}

// ============================================================================
// Normalization
// ============================================================================

fn project_url(org_url: &str, project: &str) -> String {
    format!("{}/{}", org_url, project.replace(' ', "%20"))
}

fn work_item_item(item: &WorkItem, org_url: &str, project: &str) -> ResultItem {
    ResultItem {
        id: item.id,
        title: item.title().to_string(),
        kind: item.work_item_type().to_string(),
        state: item.state().to_string(),
        assigned_to: item.assigned_to(),
        priority: item.priority(),
        url: Some(format!(
            "{}/_workitems/edit/{}",
            project_url(org_url, project),
            item.id
        )),
        detail: item.closed_date().map(|d| format!("Closed {}", d)),
    }
}

fn pull_request_item(pr: &PullRequest, org_url: &str, project: &str) -> ResultItem {
    let source = pr.source_ref_name.as_deref().map(short_ref).unwrap_or("?");
    let target = pr.target_ref_name.as_deref().map(short_ref).unwrap_or("?");
    let mut detail = format!("{} -> {} | Reviewers: {}", source, target, pr.reviewers.len());
    if pr.is_draft == Some(true) {
        detail.push_str(" | Draft");
    }

    ResultItem {
        id: pr.pull_request_id,
        title: pr.title.clone(),
        kind: "Pull Request".to_string(),
        state: pr.status.clone().unwrap_or_else(|| "unknown".to_string()),
        assigned_to: pr.created_by.name().map(str::to_string),
        priority: None,
        url: pr.repository.name.as_ref().map(|repo| {
            format!(
                "{}/_git/{}/pullrequest/{}",
                project_url(org_url, project),
                repo.replace(' ', "%20"),
                pr.pull_request_id
            )
        }),
        detail: Some(detail),
    }
}

fn build_item(build: &Build, org_url: &str, project: &str) -> ResultItem {
    let definition = build.definition.name.as_deref().unwrap_or("Unknown");
    let title = match &build.build_number {
        Some(number) => format!("{} ({})", definition, number),
        None => definition.to_string(),
    };

    // Builds without a result are still queued or running.
    let state = build
        .result
        .clone()
        .or_else(|| build.status.clone())
        .unwrap_or_else(|| "in progress".to_string());

    let mut detail = format!("Started: {}", build.start_time.as_deref().unwrap_or("N/A"));
    if let Some(branch) = &build.source_branch {
        detail.push_str(&format!(" | Branch: {}", short_ref(branch)));
    }

    ResultItem {
        id: build.id,
        title,
        kind: "Build".to_string(),
        state,
        assigned_to: build.requested_for.name().map(str::to_string),
        priority: None,
        url: Some(format!(
            "{}/_build/results?buildId={}",
            project_url(org_url, project),
            build.id
        )),
        detail: Some(detail),
    }
}
