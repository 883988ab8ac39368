//! System report command.

use std::path::PathBuf;

use clap::Args;

use crate::cli::common::{load_document, print_json, CliResult};
use crate::services::SystemReport;

/// Summarise the variables and rules of a document
#[derive(Debug, Clone, Args)]
pub struct ReportArgs {
    /// Path to the document file
    #[arg(short, long, value_name = "FILE")]
    pub document: PathBuf,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

impl ReportArgs {
    /// Execute the report command
    pub fn execute(&self) -> CliResult<()> {
        let catalog = load_document(&self.document)?;
        let report = SystemReport::from_catalog(&catalog);

        if self.json {
            return print_json(&report);
        }

        print!("{report}");
        if report.dangling.is_empty() {
            println!("✓ All rule references resolve");
        } else {
            println!("⚠ {} dangling rule reference(s)", report.dangling.len());
        }
        Ok(())
    }
}
