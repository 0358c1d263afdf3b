//! Plain-text rendering of query results.

use std::fmt::Write;

use super::types::{QueryIntent, ResultItem, ResultSummary};

/// Items listed individually before the answer switches to "... and N more".
const SHOWN_ITEMS: usize = 10;

pub fn render(
    intent: QueryIntent,
    items: &[ResultItem],
    count: usize,
    summary: &ResultSummary,
    days: Option<u32>,
) -> String {
    if count == 0 {
        return empty_answer(intent, days);
    }

    let mut out = String::new();
    match intent {
        QueryIntent::OpenBugs => {
            let _ = writeln!(out, "Found {} bug(s):\n", count);
            list_items(&mut out, items, count, true);
        }
        QueryIntent::MyItems => {
            let _ = writeln!(out, "You have {} work item(s) assigned:\n", count);
            list_by_type(&mut out, items, 5);
        }
        QueryIntent::SprintStatus => {
            let _ = writeln!(out, "Current Sprint Status:\n");
            let _ = writeln!(out, "Total Work Items: {}\n", count);
            write_breakdown(&mut out, "By State", summary.by_state.iter());
            write_breakdown(&mut out, "By Type", summary.by_type.iter());
            if let Some(percent) = summary.completion_percent {
                let completed = summary.state_count("Done") + summary.state_count("Closed");
                let _ = writeln!(
                    out,
                    "Completion: {:.1}% ({}/{})",
                    percent,
                    completed,
                    items.len()
                );
            }
        }
        QueryIntent::PullRequests => {
            let _ = writeln!(out, "Found {} active pull request(s):\n", count);
            list_items(&mut out, items, count, false);
        }
        QueryIntent::Builds => {
            let _ = writeln!(out, "Recent builds:\n");
            list_items(&mut out, items, count, false);
            let _ = writeln!(
                out,
                "Summary: {} succeeded, {} failed",
                summary.state_count("succeeded"),
                summary.state_count("failed")
            );
        }
        QueryIntent::CriticalIssues => {
            let _ = writeln!(out, "Found {} critical/high priority item(s):\n", count);
            list_items(&mut out, items, count, true);
        }
        QueryIntent::UserStories => {
            let _ = writeln!(out, "Found {} user story(ies):\n", count);
            list_items(&mut out, items, count, true);
        }
        QueryIntent::CompletedItems => {
            let _ = writeln!(
                out,
                "Completed in the last {} day(s): {} item(s)\n",
                days.unwrap_or(7),
                count
            );
            list_by_type(&mut out, items, 3);
        }
        QueryIntent::Generic => {
            let _ = writeln!(out, "Active work items in project: {}\n", count);
            let mut by_type: Vec<_> = summary.by_type.iter().collect();
            by_type.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            write_breakdown(&mut out, "Breakdown by type", by_type.into_iter());
            let _ = writeln!(out, "Showing recent items:");
            for item in items.iter().take(5) {
                let _ = writeln!(out, "- #{}: {} [{}]", item.id, item.title, item.kind);
            }
        }
    }

    out.trim_end().to_string()
}

fn empty_answer(intent: QueryIntent, days: Option<u32>) -> String {
    match intent {
        QueryIntent::OpenBugs => "No bugs found matching your criteria.".to_string(),
        QueryIntent::MyItems => "You have no work items currently assigned to you.".to_string(),
        QueryIntent::SprintStatus => "No work items found in the current sprint.".to_string(),
        QueryIntent::PullRequests => "No active pull requests found.".to_string(),
        QueryIntent::Builds => "No recent builds found.".to_string(),
        QueryIntent::CriticalIssues => "No critical or high priority items found.".to_string(),
        QueryIntent::UserStories => "No user stories found.".to_string(),
        QueryIntent::CompletedItems => {
            format!("No items completed in the last {} day(s).", days.unwrap_or(7))
        }
        QueryIntent::Generic => "No active work items found in the project.".to_string(),
    }
}

/// List the first items; `count` is the total match count, which may exceed
/// the fetched items.
fn list_items(out: &mut String, items: &[ResultItem], count: usize, show_priority: bool) {
    let shown = items.len().min(SHOWN_ITEMS);
    for item in &items[..shown] {
        let _ = writeln!(out, "- #{}: {}", item.id, item.title);
        let _ = write!(out, "  {}: {}", item.kind, item.state);
        if show_priority {
            match item.priority {
                Some(p) => {
                    let _ = write!(out, " | Priority: {}", p);
                }
                None => out.push_str(" | Priority: Not set"),
            }
        }
        let _ = write!(
            out,
            " | {}",
            item.assigned_to.as_deref().unwrap_or("Unassigned")
        );
        if let Some(detail) = &item.detail {
            let _ = write!(out, " | {}", detail);
        }
        out.push_str("\n\n");
    }

    if count > shown {
        let _ = writeln!(out, "... and {} more", count - shown);
    }
}

/// Group under work item type headings, preserving first-seen type order.
fn list_by_type(out: &mut String, items: &[ResultItem], per_type: usize) {
    let mut types: Vec<&str> = Vec::new();
    for item in items {
        if !types.contains(&item.kind.as_str()) {
            types.push(&item.kind);
        }
    }

    for kind in types {
        let group: Vec<&ResultItem> = items.iter().filter(|i| i.kind == kind).collect();
        let _ = writeln!(out, "{} ({}):", kind, group.len());
        for item in group.iter().take(per_type) {
            let _ = writeln!(out, "- #{}: {} [{}]", item.id, item.title, item.state);
        }
        out.push('\n');
    }
}

fn write_breakdown<'a>(
    out: &mut String,
    heading: &str,
    entries: impl Iterator<Item = (&'a String, &'a usize)>,
) {
    let _ = writeln!(out, "{}:", heading);
    for (name, count) in entries {
        let _ = writeln!(out, "- {}: {}", name, count);
    }
    out.push('\n');
}
