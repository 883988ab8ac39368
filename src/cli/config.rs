//! Configuration management CLI commands.

use crate::cli::common::{print_json, CliError, CliResult};
use crate::config::Config;
use crate::models::OpenTail;
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Configuration management commands
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Set configuration values
    Set(ConfigSetArgs),
}

/// Display current configuration
#[derive(Args, Debug, Clone)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Set configuration values
#[derive(Args, Debug, Clone)]
pub struct ConfigSetArgs {
    /// Directory holding session documents
    #[arg(long, value_name = "DIR")]
    sessions_dir: Option<PathBuf>,

    /// Grid points used to sample input terms
    #[arg(long, value_name = "N")]
    fuzzify_resolution: Option<usize>,

    /// Grid points of the aggregated output curve
    #[arg(long, value_name = "N")]
    aggregate_resolution: Option<usize>,

    /// Evaluate input terms in closed form (true or false)
    #[arg(long, value_name = "BOOL")]
    exact_fuzzification: Option<bool>,

    /// Open side treatment of *-open terms (truncate or shoulder)
    #[arg(long, value_name = "MODE")]
    open_tail: Option<String>,

    /// HTTP bind address
    #[arg(long, value_name = "HOST")]
    host: Option<String>,

    /// HTTP bind port
    #[arg(long, value_name = "PORT")]
    port: Option<u16>,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(),
            ConfigCommand::Set(args) => args.execute(),
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load()
            .map_err(|e| CliError::validation(format!("Failed to load configuration: {}", e)))?;

        if self.json {
            print_json(&config)?;
        } else {
            output_human_readable(&config);
        }

        Ok(())
    }
}

impl ConfigSetArgs {
    fn is_empty(&self) -> bool {
        self.sessions_dir.is_none()
            && self.fuzzify_resolution.is_none()
            && self.aggregate_resolution.is_none()
            && self.exact_fuzzification.is_none()
            && self.open_tail.is_none()
            && self.host.is_none()
            && self.port.is_none()
    }

    /// Execute set command
    pub fn execute(&self) -> CliResult<()> {
        if self.is_empty() {
            return Err(CliError::validation(
                "At least one configuration option must be specified",
            ));
        }

        let mut config = Config::load().unwrap_or_else(|_| Config::default());

        if let Some(path) = &self.sessions_dir {
            std::fs::create_dir_all(path).map_err(|e| {
                CliError::io(format!(
                    "Failed to create sessions directory {}: {}",
                    path.display(),
                    e
                ))
            })?;
            config.paths.sessions_dir.clone_from(path);
        }
        if let Some(n) = self.fuzzify_resolution {
            config.engine.fuzzify_resolution = n;
        }
        if let Some(n) = self.aggregate_resolution {
            config.engine.aggregate_resolution = n;
        }
        if let Some(exact) = self.exact_fuzzification {
            config.engine.exact_fuzzification = exact;
        }
        if let Some(mode) = &self.open_tail {
            config.engine.open_tail = match mode.to_lowercase().as_str() {
                "truncate" => OpenTail::Truncate,
                "shoulder" => OpenTail::Shoulder,
                _ => {
                    return Err(CliError::validation(
                        "Invalid open tail mode. Must be 'truncate' or 'shoulder'",
                    ))
                }
            };
        }
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        config
            .validate()
            .map_err(|e| CliError::validation(format!("Invalid configuration: {}", e)))?;
        config
            .save()
            .map_err(|e| CliError::io(format!("Failed to save configuration: {}", e)))?;

        println!("Configuration updated successfully.");

        Ok(())
    }
}

/// Output configuration in human-readable format
fn output_human_readable(config: &Config) {
    println!("FuzzyLab Configuration");
    println!("======================");
    println!();

    println!("Paths:");
    println!("  Sessions Directory: {}", config.paths.sessions_dir.display());
    println!();

    println!("Engine:");
    println!("  Fuzzify Resolution:   {}", config.engine.fuzzify_resolution);
    println!("  Aggregate Resolution: {}", config.engine.aggregate_resolution);
    println!("  Exact Fuzzification:  {}", config.engine.exact_fuzzification);
    println!(
        "  Open Tail:            {}",
        format!("{:?}", config.engine.open_tail).to_lowercase()
    );
    println!();

    println!("Server:");
    println!("  Address: {}:{}", config.server.host, config.server.port);
    println!();
}
