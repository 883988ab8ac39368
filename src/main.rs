//! FuzzyLab - Mamdani fuzzy inference systems from the terminal
//!
//! This application edits a fuzzy system stored as a JSON document
//! (variables, terms and rules) and runs inference against it.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fuzzylab::cli::{
    ClearOutputArgs, CliResult, ConfigArgs, ExportArgs, ImportArgs, InferArgs, ReportArgs,
    RuleArgs, TermArgs,
};
use fuzzylab::constants::APP_BINARY_NAME;

/// FuzzyLab - design and test Mamdani fuzzy inference systems
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create, modify, delete or show terms
    Term(TermArgs),
    /// Create or delete rules
    Rule(RuleArgs),
    /// Remove the output variable and its rules
    ClearOutput(ClearOutputArgs),
    /// Run inference for a set of crisp inputs
    Infer(InferArgs),
    /// Summarise variables and rules
    Report(ReportArgs),
    /// Export a document to a JSON file
    Export(ExportArgs),
    /// Replace a document with an imported JSON file
    Import(ImportArgs),
    /// Show or change the configuration
    Config(ConfigArgs),
}

impl Commands {
    fn execute(&self) -> CliResult<()> {
        match self {
            Self::Term(args) => args.execute(),
            Self::Rule(args) => args.execute(),
            Self::ClearOutput(args) => args.execute(),
            Self::Infer(args) => args.execute(),
            Self::Report(args) => args.execute(),
            Self::Export(args) => args.execute(),
            Self::Import(args) => args.execute(),
            Self::Config(args) => args.execute(),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output on stdout stays parseable
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = cli.command.execute() {
        eprintln!("{APP_BINARY_NAME}: {err}");
        std::process::exit(err.exit_code());
    }
}
