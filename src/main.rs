//! ADO Assistant entry point

use ado_assistant::{run_http, Config, SessionConfig};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

/// ADO Assistant: ask Azure DevOps questions in plain English
#[derive(Parser, Debug)]
#[command(name = "ado-assistant")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Session credentials for commands that call Azure DevOps.
#[derive(clap::Args, Debug)]
struct SessionArgs {
    /// Organization name
    #[arg(long, env = "ADO_ORGANIZATION")]
    org: String,
    /// Project name
    #[arg(long, env = "ADO_PROJECT")]
    project: String,
    /// Personal access token
    #[arg(long, env = "ADO_PAT", hide_env_values = true)]
    token: String,
}

impl From<SessionArgs> for SessionConfig {
    fn from(args: SessionArgs) -> Self {
        SessionConfig::new(args.org, args.project, args.token)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default behavior)
    Serve {
        /// Bind address. If not specified, uses config file value.
        #[arg(long)]
        host: Option<String>,
        /// HTTP port. If not specified, uses config file value.
        #[arg(short, long)]
        port: Option<u16>,
        /// Enable JSON logging format
        #[arg(long)]
        json_logs: bool,
    },
    /// Answer a question against a project
    Query {
        /// Question text, e.g. "show me open bugs"
        text: String,
        #[command(flatten)]
        session: SessionArgs,
    },
    /// Show how a question would be classified, without calling Azure DevOps
    Classify {
        /// Question text
        text: String,
    },
    /// Check that the organization, project and token are usable
    TestConnection {
        #[command(flatten)]
        session: SessionArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let is_serve = matches!(args.command, Some(Command::Serve { .. }) | None);

    if !is_serve {
        // Minimal logging for CLI commands
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::stderr)
            .init();
    }

    match args.command {
        Some(Command::Query { text, session }) => {
            let config = Config::load(args.config.as_deref())?;
            cli::run_query(config, text, session.into(), args.json).await
        }
        Some(Command::Classify { text }) => {
            let config = Config::load(args.config.as_deref())?;
            cli::run_classify(config, text, args.json).await
        }
        Some(Command::TestConnection { session }) => {
            let config = Config::load(args.config.as_deref())?;
            cli::run_test_connection(config, session.into(), args.json).await
        }
        Some(Command::Serve {
            host,
            port,
            json_logs,
        }) => run_server(&args.config, host, port, json_logs).await,
        None => run_server(&args.config, None, None, false).await,
    }
}

async fn run_server(
    config_path: &Option<String>,
    host: Option<String>,
    port: Option<u16>,
    json_logs: bool,
) -> anyhow::Result<()> {
    // Initialize tracing for server mode
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting ADO Assistant v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load(config_path.as_deref())?;
    if let Some(h) = host {
        config.server.host = h;
    }
    if let Some(p) = port {
        config.server.port = p;
    }

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        base_url = %config.ado.base_url,
        assist = config.assist.enabled,
        "Configuration loaded"
    );

    run_http(config).await?;

    Ok(())
}
