//! Clear-output command.

use std::path::PathBuf;

use clap::Args;

use crate::cli::common::{load_document, save_document, CliResult};

/// Remove the output variable and every rule concluding on it
#[derive(Debug, Clone, Args)]
pub struct ClearOutputArgs {
    /// Path to the document file
    #[arg(short, long, value_name = "FILE")]
    pub document: PathBuf,
}

impl ClearOutputArgs {
    /// Execute the clear-output command
    pub fn execute(&self) -> CliResult<()> {
        let mut catalog = load_document(&self.document)?;
        let cleared = catalog.clear_output();
        save_document(&self.document, &catalog)?;

        if cleared.variables.is_empty() {
            println!("✓ No output variable to clear");
        } else {
            println!(
                "✓ Cleared output {} and {} rule(s)",
                cleared.variables.join(", "),
                cleared.rules_removed
            );
        }
        Ok(())
    }
}
