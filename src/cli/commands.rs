//! CLI command handlers.
//!
//! Each command runs the same code paths as the HTTP API, in-process.

use ado_assistant::{build_executor, validate_connection, Config, SessionConfig};
use anyhow::Result;

use super::output;

/// Run the query command.
pub async fn run_query(
    config: Config,
    text: String,
    session: SessionConfig,
    json_output: bool,
) -> Result<()> {
    let executor = build_executor(&config)?;
    let result = executor.run(&text, &session).await?;
    output::print_query_result(&result, json_output)
}

/// Run the classify command.
pub async fn run_classify(config: Config, text: String, json_output: bool) -> Result<()> {
    let executor = build_executor(&config)?;
    let classification = executor.classifier().classify(&text).await;
    output::print_classification(&classification, json_output)
}

/// Run the test-connection command.
pub async fn run_test_connection(
    config: Config,
    session: SessionConfig,
    json_output: bool,
) -> Result<()> {
    let executor = build_executor(&config)?;
    let status = validate_connection(executor.client(), &session).await;
    output::print_connection_status(&status, json_output)?;

    if !status.ok {
        anyhow::bail!("connection test failed");
    }
    Ok(())
}
