//! Rule management commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::common::{load_document, parse_pair, save_document, CliResult};
use crate::models::Antecedent;

/// Manage rules in a document
#[derive(Debug, Clone, Args)]
pub struct RuleArgs {
    /// Rule subcommand
    #[command(subcommand)]
    pub command: RuleCommand,
}

/// Rule management subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum RuleCommand {
    /// Append a rule
    Create(CreateRuleArgs),
    /// Delete a rule by id
    Delete(DeleteRuleArgs),
}

/// Append a rule
#[derive(Debug, Clone, Args)]
pub struct CreateRuleArgs {
    /// Path to the document file
    #[arg(short, long, value_name = "FILE")]
    pub document: PathBuf,

    /// Antecedent as VARIABLE=TERM (repeatable, combined with AND)
    #[arg(long = "input", value_name = "VARIABLE=TERM", value_parser = parse_pair, required = true)]
    pub inputs: Vec<(String, String)>,

    /// Consequent as VARIABLE=TERM
    #[arg(long, value_name = "VARIABLE=TERM", value_parser = parse_pair)]
    pub output: (String, String),
}

/// Delete a rule
#[derive(Debug, Clone, Args)]
pub struct DeleteRuleArgs {
    /// Path to the document file
    #[arg(short, long, value_name = "FILE")]
    pub document: PathBuf,

    /// Rule id as shown by `report`
    #[arg(long)]
    pub id: usize,
}

impl RuleArgs {
    /// Execute the rule command
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            RuleCommand::Create(args) => args.execute(),
            RuleCommand::Delete(args) => args.execute(),
        }
    }
}

impl CreateRuleArgs {
    /// Execute the create command
    pub fn execute(&self) -> CliResult<()> {
        let antecedents = self
            .inputs
            .iter()
            .map(|(variable, term)| Antecedent::new(variable, term))
            .collect();
        let (output_variable, output_term) = &self.output;

        let mut catalog = load_document(&self.document)?;
        let rule_id = catalog.create_rule(antecedents, output_variable, output_term)?;
        save_document(&self.document, &catalog)?;

        println!("✓ Created rule {rule_id}: {}", catalog.rules[rule_id]);
        Ok(())
    }
}

impl DeleteRuleArgs {
    /// Execute the delete command
    pub fn execute(&self) -> CliResult<()> {
        let mut catalog = load_document(&self.document)?;
        let rule = catalog.delete_rule(self.id)?;
        save_document(&self.document, &catalog)?;

        println!("✓ Deleted rule {}: {rule}", self.id);
        if self.id < catalog.rules.len() {
            println!("  Rules after {} were renumbered", self.id);
        }
        Ok(())
    }
}
