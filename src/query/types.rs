//! Types for the natural language query system.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Query Intent
// ============================================================================

/// Classified purpose of a natural language query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
    /// Bugs that are not closed or resolved
    OpenBugs,
    /// Work items assigned to the token owner
    MyItems,
    /// Current sprint breakdown
    SprintStatus,
    /// Active pull requests
    PullRequests,
    /// Recent builds
    Builds,
    /// High priority work items
    CriticalIssues,
    /// User stories
    UserStories,
    /// Recently closed or completed items
    CompletedItems,
    /// All active work items
    #[default]
    Generic,
}

impl QueryIntent {
    pub const ALL: [QueryIntent; 9] = [
        Self::OpenBugs,
        Self::MyItems,
        Self::SprintStatus,
        Self::PullRequests,
        Self::Builds,
        Self::CriticalIssues,
        Self::UserStories,
        Self::CompletedItems,
        Self::Generic,
    ];

    /// Get a human-readable name for this intent.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::OpenBugs => "Open Bugs",
            Self::MyItems => "My Items",
            Self::SprintStatus => "Sprint Status",
            Self::PullRequests => "Pull Requests",
            Self::Builds => "Builds",
            Self::CriticalIssues => "Critical Issues",
            Self::UserStories => "User Stories",
            Self::CompletedItems => "Completed Items",
            Self::Generic => "All Work Items",
        }
    }

    /// Stable snake_case label, identical to the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            Self::OpenBugs => "open_bugs",
            Self::MyItems => "my_items",
            Self::SprintStatus => "sprint_status",
            Self::PullRequests => "pull_requests",
            Self::Builds => "builds",
            Self::CriticalIssues => "critical_issues",
            Self::UserStories => "user_stories",
            Self::CompletedItems => "completed_items",
            Self::Generic => "generic",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|intent| intent.label() == label)
    }
}

// ============================================================================
// Extracted Parameters
// ============================================================================

/// Parameters extracted from natural language queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedParams {
    /// Highest priority number to include (1 is most urgent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    /// Person named after "assigned to"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Query mentions "my" or "assigned to me"
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub mine: bool,
    /// Time window in days
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    /// Requested number of results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Include closed or resolved items
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub include_closed: bool,
}

impl ExtractedParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    pub fn with_days(mut self, days: u32) -> Self {
        self.days = Some(days);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

// ============================================================================
// Classification Result
// ============================================================================

/// Which classifier produced the intent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    #[default]
    Rules,
    Assist,
}

/// Result of query intent classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub intent: QueryIntent,
    pub params: ExtractedParams,
    pub source: ClassificationSource,
}

impl ClassificationResult {
    pub fn new(intent: QueryIntent) -> Self {
        Self {
            intent,
            params: ExtractedParams::default(),
            source: ClassificationSource::Rules,
        }
    }

    pub fn with_params(mut self, params: ExtractedParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_source(mut self, source: ClassificationSource) -> Self {
        self.source = source;
        self
    }
}

// ============================================================================
// Query Result
// ============================================================================

/// One display-ready record: a work item, pull request or build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    pub id: i64,
    pub title: String,
    /// Work item type, "Pull Request" or "Build"
    pub kind: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Aggregate counts over the returned items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub by_state: BTreeMap<String, usize>,
    pub by_type: BTreeMap<String, usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_percent: Option<f64>,
}

impl ResultSummary {
    pub fn from_items(items: &[ResultItem]) -> Self {
        let mut summary = Self::default();
        for item in items {
            *summary.by_state.entry(item.state.clone()).or_default() += 1;
            *summary.by_type.entry(item.kind.clone()).or_default() += 1;
        }
        summary
    }

    pub fn state_count(&self, state: &str) -> usize {
        self.by_state.get(state).copied().unwrap_or(0)
    }
}

/// Query execution statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryStats {
    pub classification_time_ms: u64,
    pub execution_time_ms: u64,
    /// Number of vendor API calls made
    pub api_calls: u32,
}

/// Result of one query, produced fresh per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub intent: QueryIntent,
    pub items: Vec<ResultItem>,
    /// Total matches reported by the server, may exceed `items.len()`
    pub count: usize,
    /// Human-readable rendering of the result
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<ResultSummary>,
    #[serde(default)]
    pub params: ExtractedParams,
    #[serde(default)]
    pub source: ClassificationSource,
    #[serde(default)]
    pub stats: QueryStats,
    pub timestamp: DateTime<Utc>,
}

impl QueryResult {
    pub fn new(intent: QueryIntent, items: Vec<ResultItem>, count: usize) -> Self {
        Self {
            intent,
            items,
            count,
            answer: String::new(),
            summary: None,
            params: ExtractedParams::default(),
            source: ClassificationSource::Rules,
            stats: QueryStats::default(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_summary(mut self, summary: ResultSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    pub fn with_answer(mut self, answer: String) -> Self {
        self.answer = answer;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
