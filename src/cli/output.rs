//! Output formatting for CLI commands.
//!
//! This module handles formatting output as either JSON or human-readable text.

use ado_assistant::{ClassificationResult, ConnectionStatus, QueryResult};
use anyhow::Result;

/// Print a query result.
pub fn print_query_result(result: &QueryResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!("{}", result.answer);
    println!();
    println!(
        "[{} via {:?} | {} match(es) | {} API call(s) | {}ms]",
        result.intent.display_name(),
        result.source,
        result.count,
        result.stats.api_calls,
        result.stats.classification_time_ms + result.stats.execution_time_ms
    );
    Ok(())
}

/// Print how a question was classified.
pub fn print_classification(result: &ClassificationResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!(
        "Intent: {} ({})",
        result.intent.display_name(),
        result.intent.label()
    );
    println!("Source: {:?}", result.source);

    let params = &result.params;
    if let Some(priority) = params.priority {
        println!("Priority: <= {}", priority);
    }
    if let Some(assignee) = &params.assignee {
        println!("Assignee: {}", assignee);
    }
    if params.mine {
        println!("Assignee: @Me");
    }
    if let Some(days) = params.days {
        println!("Days: {}", days);
    }
    if let Some(limit) = params.limit {
        println!("Limit: {}", limit);
    }
    if params.include_closed {
        println!("Include closed: yes");
    }
    Ok(())
}

/// Print a connection test result.
pub fn print_connection_status(status: &ConnectionStatus, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(status)?);
    } else if status.ok {
        println!("OK: {}", status.message);
    } else {
        let reason = status.reason.map(|r| r.as_str()).unwrap_or("unknown");
        println!("FAILED ({}): {}", reason, status.message);
    }
    Ok(())
}
