//! Intent to API call translation.
//!
//! Each intent maps to exactly one call shape: a WIQL query for work item
//! intents, or a list endpoint for pull requests and builds.

use crate::ado::wiql::*;

use super::types::{ExtractedParams, QueryIntent};

const OPEN_EXCLUDED: &[&str] = &["Closed", "Resolved", "Done"];
const ACTIVE_EXCLUDED: &[&str] = &["Closed", "Done", "Removed"];
const GENERIC_EXCLUDED: &[&str] = &["Closed", "Done", "Removed", "Resolved"];
const COMPLETED_STATES: &[&str] = &["Closed", "Done", "Resolved"];

const DEFAULT_CRITICAL_PRIORITY: u8 = 2;
const DEFAULT_COMPLETED_DAYS: u32 = 7;
const DEFAULT_BUILD_COUNT: usize = 10;

/// Concrete vendor call for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPlan {
    WorkItems { wiql: String, limit: usize },
    PullRequests { status: &'static str, limit: usize },
    Builds { top: usize },
}

impl QueryPlan {
    /// Build the plan for an intent in `project`, capping detail fetches at `max_items`.
    pub fn for_intent(
        intent: QueryIntent,
        params: &ExtractedParams,
        project: &str,
        max_items: usize,
    ) -> Self {
        let limit = params
            .limit
            .unwrap_or_else(|| default_limit(intent))
            .min(max_items);

        match intent {
            QueryIntent::PullRequests => Self::PullRequests {
                status: "active",
                limit,
            },
            QueryIntent::Builds => Self::Builds {
                top: params.limit.unwrap_or(DEFAULT_BUILD_COUNT).min(max_items),
            },
            _ => Self::WorkItems {
                wiql: work_item_query(intent, params, project).render(),
                limit,
            },
        }
    }
}

fn default_limit(intent: QueryIntent) -> usize {
    match intent {
        QueryIntent::SprintStatus => 50,
        QueryIntent::Generic | QueryIntent::CompletedItems => 30,
        _ => 20,
    }
}

fn work_item_query(intent: QueryIntent, params: &ExtractedParams, project: &str) -> WiqlQuery {
    let base = WiqlQuery::for_project(project);

    let query = match intent {
        QueryIntent::OpenBugs => {
            let mut q = base
                .select(FIELD_ASSIGNED_TO)
                .select(FIELD_PRIORITY)
                .and_type("Bug");
            if !params.include_closed {
                q = q.and_state_not_in(OPEN_EXCLUDED);
            }
            if let Some(priority) = params.priority {
                q = q.and_max_priority(priority);
            }
            q.order_by(FIELD_PRIORITY, SortDirection::Asc)
                .order_by(FIELD_CHANGED_DATE, SortDirection::Desc)
        }
        QueryIntent::MyItems => base
            .select(FIELD_WORK_ITEM_TYPE)
            .and_assigned_to_me()
            .and_state_not_in(ACTIVE_EXCLUDED)
            .order_by(FIELD_PRIORITY, SortDirection::Asc)
            .order_by(FIELD_CHANGED_DATE, SortDirection::Desc),
        QueryIntent::SprintStatus => base
            .select(FIELD_WORK_ITEM_TYPE)
            .select(FIELD_ASSIGNED_TO)
            .and(format!("[{}] UNDER {}", FIELD_ITERATION_PATH, quote(project)))
            .and(format!("[{}] <> 'Removed'", FIELD_STATE))
            .order_by(FIELD_WORK_ITEM_TYPE, SortDirection::Asc)
            .order_by(FIELD_STATE, SortDirection::Asc),
        QueryIntent::CriticalIssues => base
            .select(FIELD_WORK_ITEM_TYPE)
            .select(FIELD_PRIORITY)
            .and_max_priority(params.priority.unwrap_or(DEFAULT_CRITICAL_PRIORITY))
            .and_state_not_in(OPEN_EXCLUDED)
            .order_by(FIELD_PRIORITY, SortDirection::Asc)
            .order_by(FIELD_CHANGED_DATE, SortDirection::Desc),
        QueryIntent::UserStories => {
            let q = base.select(FIELD_ASSIGNED_TO).and_type("User Story");
            match params.priority {
                Some(priority) => q
                    .select(FIELD_PRIORITY)
                    .and_max_priority(priority)
                    .order_by(FIELD_PRIORITY, SortDirection::Asc),
                None => q
                    .and_state_not_in(ACTIVE_EXCLUDED)
                    .order_by(FIELD_CHANGED_DATE, SortDirection::Desc),
            }
        }
        QueryIntent::CompletedItems => base
            .select(FIELD_WORK_ITEM_TYPE)
            .select(FIELD_CLOSED_DATE)
            .and_state_in(COMPLETED_STATES)
            .and(format!(
                "[{}] >= @Today - {}",
                FIELD_CLOSED_DATE,
                params.days.unwrap_or(DEFAULT_COMPLETED_DAYS)
            ))
            .order_by(FIELD_CLOSED_DATE, SortDirection::Desc),
        QueryIntent::Generic | QueryIntent::PullRequests | QueryIntent::Builds => base
            .select(FIELD_WORK_ITEM_TYPE)
            .and_state_not_in(GENERIC_EXCLUDED)
            .order_by(FIELD_CHANGED_DATE, SortDirection::Desc),
    };

    apply_assignee(intent, query, params)
}

/// Narrow by owner when the text names one; `MyItems` already filters on @Me.
fn apply_assignee(intent: QueryIntent, query: WiqlQuery, params: &ExtractedParams) -> WiqlQuery {
    if intent == QueryIntent::MyItems {
        return query;
    }
    match (&params.assignee, params.mine) {
        (Some(name), _) => query.and_assignee_contains(name),
        (None, true) => query.and_assigned_to_me(),
        (None, false) => query,
    }
}
