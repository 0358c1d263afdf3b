//! WIQL (Work Item Query Language) rendering.

pub const FIELD_ID: &str = "System.Id";
pub const FIELD_TITLE: &str = "System.Title";
pub const FIELD_STATE: &str = "System.State";
pub const FIELD_WORK_ITEM_TYPE: &str = "System.WorkItemType";
pub const FIELD_ASSIGNED_TO: &str = "System.AssignedTo";
pub const FIELD_TEAM_PROJECT: &str = "System.TeamProject";
pub const FIELD_ITERATION_PATH: &str = "System.IterationPath";
pub const FIELD_CHANGED_DATE: &str = "System.ChangedDate";
pub const FIELD_CLOSED_DATE: &str = "Microsoft.VSTS.Common.ClosedDate";
pub const FIELD_PRIORITY: &str = "Microsoft.VSTS.Common.Priority";

/// Fields requested when fetching work item details.
pub const DETAIL_FIELDS: &[&str] = &[
    FIELD_ID,
    FIELD_TITLE,
    FIELD_STATE,
    FIELD_WORK_ITEM_TYPE,
    FIELD_ASSIGNED_TO,
    FIELD_PRIORITY,
    FIELD_CLOSED_DATE,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Incrementally assembled flat WIQL query against `WorkItems`.
#[derive(Debug, Clone)]
pub struct WiqlQuery {
    fields: Vec<&'static str>,
    conditions: Vec<String>,
    order_by: Vec<(&'static str, SortDirection)>,
}

impl WiqlQuery {
    /// Start a query scoped to one team project.
    pub fn for_project(project: &str) -> Self {
        Self {
            fields: vec![FIELD_ID, FIELD_TITLE, FIELD_STATE],
            conditions: vec![format!("[{}] = {}", FIELD_TEAM_PROJECT, quote(project))],
            order_by: Vec::new(),
        }
    }

    pub fn select(mut self, field: &'static str) -> Self {
        if !self.fields.contains(&field) {
            self.fields.push(field);
        }
        self
    }

    /// Append a raw predicate joined with `AND`.
    pub fn and(mut self, condition: impl Into<String>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    pub fn and_type(self, work_item_type: &str) -> Self {
        self.and(format!(
            "[{}] = {}",
            FIELD_WORK_ITEM_TYPE,
            quote(work_item_type)
        ))
    }

    pub fn and_state_in(self, states: &[&str]) -> Self {
        self.and(format!("[{}] IN ({})", FIELD_STATE, quote_list(states)))
    }

    pub fn and_state_not_in(self, states: &[&str]) -> Self {
        self.and(format!("[{}] NOT IN ({})", FIELD_STATE, quote_list(states)))
    }

    pub fn and_max_priority(self, priority: u8) -> Self {
        self.and(format!("[{}] <= {}", FIELD_PRIORITY, priority))
    }

    pub fn and_assigned_to_me(self) -> Self {
        self.and(format!("[{}] = @Me", FIELD_ASSIGNED_TO))
    }

    pub fn and_assignee_contains(self, name: &str) -> Self {
        self.and(format!("[{}] CONTAINS {}", FIELD_ASSIGNED_TO, quote(name)))
    }

    pub fn order_by(mut self, field: &'static str, direction: SortDirection) -> Self {
        self.order_by.push((field, direction));
        self
    }

    pub fn render(&self) -> String {
        let select = self
            .fields
            .iter()
            .map(|f| format!("[{}]", f))
            .collect::<Vec<_>>()
            .join(", ");

        let mut wiql = format!(
            "SELECT {} FROM WorkItems WHERE {}",
            select,
            self.conditions.join(" AND ")
        );

        if !self.order_by.is_empty() {
            let order = self
                .order_by
                .iter()
                .map(|(field, direction)| match direction {
                    SortDirection::Asc => format!("[{}] ASC", field),
                    SortDirection::Desc => format!("[{}] DESC", field),
                })
                .collect::<Vec<_>>()
                .join(", ");
            wiql.push_str(" ORDER BY ");
            wiql.push_str(&order);
        }

        wiql
    }
}

/// Quote a string literal, doubling embedded single quotes.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn quote_list(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| quote(v))
        .collect::<Vec<_>>()
        .join(", ")
}
