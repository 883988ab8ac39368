//! FuzzyLab Web Server Binary
//!
//! This binary starts the FuzzyLab web server that exposes the catalog and
//! the inference engine as a JSON API, one document per session.
//!
//! # Usage
//!
//! ```bash
//! # Start with the configured settings (default 127.0.0.1:5000)
//! fuzzylab-web
//!
//! # Override port and sessions directory
//! fuzzylab-web --port 8080 --sessions-dir ./sessions
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fuzzylab::config::Config;
use fuzzylab::web;

/// FuzzyLab Web Server - JSON API for fuzzy inference systems
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (defaults to server.port from the config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (defaults to server.host from the config)
    #[arg(long)]
    host: Option<String>,

    /// Directory holding session documents.
    /// Defaults to paths.sessions_dir from the config:
    /// - Linux: ~/.config/FuzzyLab/sessions/
    /// - macOS: ~/Library/Application Support/FuzzyLab/sessions/
    /// - Windows: %APPDATA%\FuzzyLab\sessions\
    #[arg(short, long)]
    sessions_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {e}");
        Config::default()
    });
    if let Some(dir) = args.sessions_dir {
        config.paths.sessions_dir = dir;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    std::fs::create_dir_all(&config.paths.sessions_dir).context(format!(
        "Failed to create sessions directory: {}",
        config.paths.sessions_dir.display()
    ))?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    web::run_server(config, addr).await
}
