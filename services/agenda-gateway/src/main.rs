//! Agenda gateway CLI
//!
//! Serves the booking UI's `/api` passthrough routes and page-data endpoints.

use std::path::PathBuf;

use agenda_gateway::{load_config, Config};
use clap::Parser;
use tracing::Level;

#[derive(Parser)]
#[command(name = "agenda-gateway")]
#[command(about = "Request-forwarding gateway for the appointment booking UI")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port (overrides config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Backend origin (overrides config file and PRIVATE_API_BASE)
    #[arg(long)]
    backend: Option<String>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, port={:?}, backend={:?}, log_level={:?}",
        args.config,
        args.port,
        args.backend,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    config.apply_env_overrides();

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(backend) = args.backend {
        config.backend.base_url = backend;
    }

    tracing::info!("Starting agenda gateway");
    agenda_gateway::run(config).await?;

    Ok(())
}
