//! Inference command.

use std::path::PathBuf;

use clap::Args;

use crate::cli::common::{load_document, parse_number, print_json, CliError, CliResult};
use crate::config::Config;
use crate::engine::{self, InferenceRequest, OutputValue};

/// Run inference on a document
#[derive(Debug, Clone, Args)]
pub struct InferArgs {
    /// Path to the document file
    #[arg(short, long, value_name = "FILE")]
    pub document: PathBuf,

    /// Crisp input as VARIABLE=VALUE (repeatable)
    #[arg(long = "input", value_name = "VARIABLE=VALUE", value_parser = parse_number)]
    pub inputs: Vec<(String, f64)>,

    /// Evaluate input terms in closed form instead of on the sampled grid
    #[arg(long)]
    pub exact: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

impl InferArgs {
    /// Execute the infer command
    pub fn execute(&self) -> CliResult<()> {
        let config =
            Config::load().map_err(|e| CliError::io(format!("Failed to load config: {e}")))?;
        let mut settings = config.engine;
        if self.exact {
            settings.exact_fuzzification = true;
        }

        let catalog = load_document(&self.document)?;
        let request = InferenceRequest::from_pairs(self.inputs.iter().cloned());
        let response = engine::infer(&catalog, &request, &settings)?;

        if self.json {
            return print_json(&response);
        }

        println!("Fuzzified:");
        for (variable, degrees) in &response.fuzzified {
            println!("  {} = {}", variable, response.inputs[variable]);
            for (term, degree) in degrees {
                println!("    {term:<16} {degree:.3}");
            }
        }

        println!("\nRules:");
        if response.rule_outputs.is_empty() {
            println!("  (none)");
        }
        for output in &response.rule_outputs {
            println!(
                "  {}: {} IS {} -> {:.3}",
                output.rule_id, output.output_variable, output.output_term, output.activation
            );
        }

        println!("\nResults:");
        if response.results.is_empty() {
            println!("  (none)");
        }
        for (variable, value) in &response.results {
            match value {
                OutputValue::Crisp(x) => println!("  {variable} = {x:.4}"),
                OutputValue::Class(Some(label)) => println!("  {variable} = {label}"),
                OutputValue::Class(None) => println!("  {variable} = (no terms)"),
            }
        }
        Ok(())
    }
}
