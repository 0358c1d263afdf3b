//! Query Intent Classifier.
//!
//! Maps free text onto a [`QueryIntent`] with an ordered keyword rule table,
//! first match wins. When nothing matches, an optional [`IntentAssist`] may
//! be consulted before settling on [`QueryIntent::Generic`].

use std::sync::{Arc, LazyLock};

use regex::Regex;

use super::assist::IntentAssist;
use super::types::*;

/// Largest page the work item endpoints accept.
const MAX_LIMIT: usize = 200;

// ============================================================================
// Intent Classifier
// ============================================================================

/// Classifies natural language queries into intents.
#[derive(Clone, Default)]
pub struct IntentClassifier {
    assist: Option<Arc<dyn IntentAssist>>,
}

impl IntentClassifier {
    /// Create a rule-only classifier.
    pub fn new() -> Self {
        Self { assist: None }
    }

    /// Create a classifier that falls back to `assist` for unmatched text.
    pub fn with_assist(assist: Arc<dyn IntentAssist>) -> Self {
        Self {
            assist: Some(assist),
        }
    }

    pub fn has_assist(&self) -> bool {
        self.assist.is_some()
    }

    /// Classify using the keyword rules only. Never fails.
    pub fn classify_rules(&self, query: &str) -> ClassificationResult {
        let query_lower = query.to_lowercase();
        let params = extract_params(query, &query_lower);

        let intent = INTENT_RULES
            .iter()
            .find(|(_, pattern)| pattern.is_match(&query_lower))
            .map(|(intent, _)| *intent)
            .unwrap_or(QueryIntent::Generic);

        ClassificationResult::new(intent).with_params(params)
    }

    /// Classify a natural language query into an intent.
    ///
    /// The assist only ever replaces a `Generic` result; its errors are logged
    /// and otherwise ignored.
    pub async fn classify(&self, query: &str) -> ClassificationResult {
        let result = self.classify_rules(query);
        if result.intent != QueryIntent::Generic {
            return result;
        }

        let Some(assist) = &self.assist else {
            return result;
        };

        match assist.classify(query).await {
            Ok(Some(intent)) if intent != QueryIntent::Generic => {
                tracing::debug!(assist = assist.name(), intent = intent.label(), "Assist classified query");
                ClassificationResult {
                    intent,
                    ..result
                }
                .with_source(ClassificationSource::Assist)
            }
            Ok(_) => result,
            Err(e) => {
                tracing::warn!(assist = assist.name(), error = %e, "Assist classification failed, using rules");
                result
            }
        }
    }
}

// ============================================================================
// Parameter Extraction
// ============================================================================

/// Extract parameters; names keep their original casing.
fn extract_params(query: &str, query_lower: &str) -> ExtractedParams {
    let mut params = ExtractedParams::default();

    if let Some(caps) = PRIORITY_PATTERN.captures(query_lower) {
        params.priority = caps.get(1).and_then(|m| m.as_str().parse().ok());
    } else if CRITICAL_PATTERN.is_match(query_lower) {
        params.priority = Some(1);
    } else if HIGH_PRIORITY_PATTERN.is_match(query_lower) {
        params.priority = Some(2);
    }

    params.mine = MINE_PATTERN.is_match(query_lower);

    if let Some(caps) = ASSIGNEE_PATTERN.captures(query) {
        if let Some(name) = caps.get(1) {
            let name = trim_name(name.as_str());
            if !name.is_empty() && !is_common_word(&name) {
                params.assignee = Some(name);
            }
        }
    }

    params.days = extract_days(query_lower);

    for caps in LIMIT_PATTERN.captures_iter(query_lower) {
        // "last 7 days" is a time window, not a result count.
        if caps.get(3).is_some() {
            continue;
        }
        if let Some(limit) = caps.get(2).and_then(|m| m.as_str().parse::<usize>().ok()) {
            params.limit = Some(limit.clamp(1, MAX_LIMIT));
            break;
        }
    }

    params.include_closed =
        CLOSED_STATE_PATTERN.is_match(query_lower) && !OPEN_STATE_PATTERN.is_match(query_lower);

    params
}

fn extract_days(query: &str) -> Option<u32> {
    if let Some(caps) = DAYS_PATTERN.captures(query) {
        return caps.get(1).and_then(|m| m.as_str().parse().ok());
    }
    if TODAY_PATTERN.is_match(query) {
        Some(1)
    } else if WEEK_PATTERN.is_match(query) {
        Some(7)
    } else if MONTH_PATTERN.is_match(query) {
        Some(30)
    } else {
        None
    }
}

/// Drop trailing filler words captured after a name ("Ada this week").
fn trim_name(raw: &str) -> String {
    raw.split_whitespace()
        .take_while(|word| !is_common_word(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_common_word(word: &str) -> bool {
    matches!(
        word.to_lowercase().as_str(),
        "me" | "the"
            | "a"
            | "an"
            | "and"
            | "or"
            | "in"
            | "on"
            | "at"
            | "to"
            | "for"
            | "of"
            | "this"
            | "last"
            | "that"
            | "with"
            | "anyone"
            | "nobody"
            | "someone"
    )
}

// ============================================================================
// Regex Patterns (using LazyLock for static initialization)
// ============================================================================

/// Ordered rule table. Position is priority: a query mentioning both bugs
/// and "critical" resolves to `OpenBugs`, with the severity kept as a
/// priority parameter.
static INTENT_RULES: LazyLock<Vec<(QueryIntent, Regex)>> = LazyLock::new(|| {
    vec![
        (QueryIntent::OpenBugs, r"\b(bugs?|defects?)\b"),
        (
            QueryIntent::MyItems,
            r"\b(assigned\s+to\s+me|my|mine)\b",
        ),
        (QueryIntent::SprintStatus, r"\b(sprints?|iterations?)\b"),
        (
            QueryIntent::PullRequests,
            r"\b(pull[\s-]+requests?|prs?)\b",
        ),
        (QueryIntent::Builds, r"\b(builds?|pipelines?)\b"),
        (
            QueryIntent::CriticalIssues,
            r"\b(critical|high[\s-]+priority|urgent|blockers?|p1)\b",
        ),
        (
            QueryIntent::UserStories,
            r"\b(user\s+stor(y|ies)|stories|story)\b",
        ),
        (
            QueryIntent::CompletedItems,
            r"\b(closed|completed|done|finished)\b",
        ),
    ]
    .into_iter()
    .map(|(intent, pattern)| (intent, Regex::new(pattern).expect("Invalid regex")))
    .collect()
});

static PRIORITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:p|priority\s*)([1-4])\b").expect("Invalid regex")
});
static CRITICAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(critical|urgent|blockers?)\b").expect("Invalid regex"));
static HIGH_PRIORITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bhigh[\s-]+priority\b").expect("Invalid regex"));
static MINE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(assigned\s+to\s+me|my|mine)\b").expect("Invalid regex"));
static ASSIGNEE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bassigned\s+to\s+([\p{L}][\p{L}.'-]*(?:\s+[\p{L}][\p{L}.'-]*)?)")
        .expect("Invalid regex")
});
static DAYS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:last|past)\s+(\d+)\s+days?\b").expect("Invalid regex")
});
static TODAY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\btoday\b").expect("Invalid regex"));
static WEEK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bweek\b").expect("Invalid regex"));
static MONTH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bmonth\b").expect("Invalid regex"));
static LIMIT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(top|first|last|latest)\s+(\d+)(\s+days?)?\b").expect("Invalid regex")
});
static CLOSED_STATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(closed|resolved|fixed)\b").expect("Invalid regex"));
static OPEN_STATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(open|active)\b").expect("Invalid regex"));

// ============================================================================
// Tests
// ============================================================================
