//! # Provis Server
//!
//! Minimal web front end for provisioning hostname-prefixed test instances:
//! submit a prefix, run the templated provisioning script in the background,
//! poll for completion, and fetch the captured transcript.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use provis_server::{AppState, Config, create_app};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "provis-server")]
#[command(about = "Web front end for provisioning hostname-prefixed test instances")]
struct Cli {
    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env().context("failed to load configuration")?;
    if let Some(port) = cli.port {
        config.server_port = port;
    }
    if let Some(host) = cli.host {
        config.server_host = host;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    config
        .ensure_directories()
        .context("failed to create data directories")?;

    info!(
        data_dir = %config.data_dir.display(),
        logs_dir = %config.logs_dir().display(),
        "data directories prepared"
    );
    if !config.script_template.exists() {
        warn!(
            template = %config.script_template.display(),
            "script template not found - jobs will fail until it exists"
        );
    }

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port)
        .parse()
        .context("invalid SERVER_HOST/SERVER_PORT combination")?;

    let state = AppState::new(Arc::new(config));
    let app = create_app(state);

    info!("Starting provis server on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
