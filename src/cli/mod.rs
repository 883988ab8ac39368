//! CLI command handlers for FuzzyLab.
//!
//! This module provides headless, scriptable access to the catalog and the
//! inference engine. Every command works on a document file passed with
//! `--document`.

pub mod common;
pub mod config;
pub mod exchange;
pub mod infer;
pub mod output;
pub mod report;
pub mod rule;
pub mod term;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode};
pub use config::ConfigArgs;
pub use exchange::{ExportArgs, ImportArgs};
pub use infer::InferArgs;
pub use output::ClearOutputArgs;
pub use report::ReportArgs;
pub use rule::RuleArgs;
pub use term::TermArgs;
