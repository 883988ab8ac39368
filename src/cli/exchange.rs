//! Export and import commands.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::cli::common::{load_document, save_document, CliError, CliResult};
use crate::services::exchange::{self, ExportScope};

/// Export a document, or part of it, to a JSON file
#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    /// Path to the document file
    #[arg(short, long, value_name = "FILE")]
    pub document: PathBuf,

    /// What to export (full, variables, terms, rules)
    #[arg(long, value_name = "SCOPE", default_value = "full")]
    pub scope: ExportScope,

    /// Output file (defaults to a dated name in the current directory)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Replace a document with an imported one
#[derive(Debug, Clone, Args)]
pub struct ImportArgs {
    /// Path to the document file
    #[arg(short, long, value_name = "FILE")]
    pub document: PathBuf,

    /// JSON file to import
    #[arg(short, long, value_name = "FILE")]
    pub file: PathBuf,
}

impl ExportArgs {
    /// Execute the export command
    pub fn execute(&self) -> CliResult<()> {
        let catalog = load_document(&self.document)?;
        let bundle = exchange::export(&catalog, self.scope, chrono::Local::now().date_naive());

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&bundle.filename));
        let content = serde_json::to_string_pretty(&bundle.document)
            .map_err(|e| CliError::io(format!("Failed to serialize export: {e}")))?;
        fs::write(&output, content).map_err(|e| {
            CliError::io(format!("Failed to write {}: {e}", output.display()))
        })?;

        println!("✓ Exported {} to {}", self.scope, output.display());
        Ok(())
    }
}

impl ImportArgs {
    /// Execute the import command
    pub fn execute(&self) -> CliResult<()> {
        let content = fs::read_to_string(&self.file).map_err(|e| {
            CliError::io(format!("Failed to read {}: {e}", self.file.display()))
        })?;
        let catalog = exchange::parse_import_str(&content)?;
        save_document(&self.document, &catalog)?;

        println!(
            "✓ Imported {} variable(s) and {} rule(s) into {}",
            catalog.variables.len(),
            catalog.rules.len(),
            self.document.display()
        );
        Ok(())
    }
}
