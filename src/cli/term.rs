//! Term management commands.
//!
//! Provides commands to create, modify, delete and show terms in a document.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::common::{load_document, parse_number, print_json, save_document, CliResult};
use crate::models::{
    DefuzzMethod, Domain, FunctionType, OpenSide, TermRecord, TermSpec, VariableKind,
};

/// Manage terms in a document
#[derive(Debug, Clone, Args)]
pub struct TermArgs {
    /// Term subcommand
    #[command(subcommand)]
    pub command: TermCommand,
}

/// Term management subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum TermCommand {
    /// Create a term (and its variable on first use)
    Create(CreateTermArgs),
    /// Replace a term's shape, optionally renaming it
    Modify(ModifyTermArgs),
    /// Delete the first term with a given name
    Delete(DeleteTermArgs),
    /// Show one term
    Show(ShowTermArgs),
}

/// Shape fields shared by create and modify.
#[derive(Debug, Clone, Args)]
pub struct ShapeArgs {
    /// Variable name
    #[arg(long, value_name = "NAME")]
    pub variable: String,

    /// Domain lower bound
    #[arg(long, allow_negative_numbers = true)]
    pub min: f64,

    /// Domain upper bound
    #[arg(long, allow_negative_numbers = true)]
    pub max: f64,

    /// Membership function (triangular, trapezoidal, gaussian, *-open, classification)
    #[arg(long = "function", value_name = "TYPE")]
    pub function_type: FunctionType,

    /// Function parameter as NAME=VALUE (repeatable)
    #[arg(long = "param", value_name = "NAME=VALUE", value_parser = parse_number)]
    pub params: Vec<(String, f64)>,

    /// Open side of *-open functions (left or right)
    #[arg(long = "open", value_name = "SIDE")]
    pub open_type: Option<OpenSide>,

    /// Defuzzification method of an output term
    #[arg(long = "defuzzify", value_name = "METHOD")]
    pub defuzzy_type: Option<DefuzzMethod>,
}

impl ShapeArgs {
    fn to_spec(&self, term_name: &str) -> TermSpec {
        TermSpec {
            variable_name: self.variable.clone(),
            domain: Domain::new(self.min, self.max),
            function_type: self.function_type,
            term_name: term_name.to_string(),
            params: self.params.iter().cloned().collect::<BTreeMap<_, _>>(),
            open_type: self.open_type,
            defuzzy_type: self.defuzzy_type,
        }
    }
}

/// Create a term
#[derive(Debug, Clone, Args)]
pub struct CreateTermArgs {
    /// Path to the document file
    #[arg(short, long, value_name = "FILE")]
    pub document: PathBuf,

    /// Variable kind (input or output)
    #[arg(long, value_name = "KIND")]
    pub kind: VariableKind,

    /// Term name
    #[arg(long, value_name = "NAME")]
    pub name: String,

    /// Shape of the term
    #[command(flatten)]
    pub shape: ShapeArgs,
}

/// Modify a term
#[derive(Debug, Clone, Args)]
pub struct ModifyTermArgs {
    /// Path to the document file
    #[arg(short, long, value_name = "FILE")]
    pub document: PathBuf,

    /// Current term name
    #[arg(long, value_name = "NAME")]
    pub term: String,

    /// New term name (defaults to the current one)
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// New shape of the term
    #[command(flatten)]
    pub shape: ShapeArgs,
}

/// Delete a term
#[derive(Debug, Clone, Args)]
pub struct DeleteTermArgs {
    /// Path to the document file
    #[arg(short, long, value_name = "FILE")]
    pub document: PathBuf,

    /// Term name
    #[arg(long, value_name = "NAME")]
    pub term: String,
}

/// Show a term
#[derive(Debug, Clone, Args)]
pub struct ShowTermArgs {
    /// Path to the document file
    #[arg(short, long, value_name = "FILE")]
    pub document: PathBuf,

    /// Variable name
    #[arg(long, value_name = "NAME")]
    pub variable: String,

    /// Term name
    #[arg(long, value_name = "NAME")]
    pub term: String,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ShowTermResponse {
    variable_name: String,
    kind: VariableKind,
    domain: Domain,
    #[serde(flatten)]
    term: TermRecord,
}

fn format_params(params: &BTreeMap<String, f64>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl TermArgs {
    /// Execute the term command
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            TermCommand::Create(args) => args.execute(),
            TermCommand::Modify(args) => args.execute(),
            TermCommand::Delete(args) => args.execute(),
            TermCommand::Show(args) => args.execute(),
        }
    }
}

impl CreateTermArgs {
    /// Execute the create command
    pub fn execute(&self) -> CliResult<()> {
        let mut catalog = load_document(&self.document)?;
        let term = catalog.create_term(self.kind, &self.shape.to_spec(&self.name))?;
        save_document(&self.document, &catalog)?;

        println!(
            "✓ Created {} term {}.{} ({})",
            self.kind,
            self.shape.variable,
            term.name,
            term.function.function_type()
        );
        Ok(())
    }
}

impl ModifyTermArgs {
    /// Execute the modify command
    pub fn execute(&self) -> CliResult<()> {
        let new_name = self.name.as_deref().unwrap_or(&self.term);
        let mut catalog = load_document(&self.document)?;
        let term = catalog.modify_term(&self.term, &self.shape.to_spec(new_name))?;
        save_document(&self.document, &catalog)?;

        println!("✓ Modified term {}.{}", self.shape.variable, term.name);
        Ok(())
    }
}

impl DeleteTermArgs {
    /// Execute the delete command
    pub fn execute(&self) -> CliResult<()> {
        let mut catalog = load_document(&self.document)?;
        let (variable, term) = catalog.delete_term(&self.term)?;
        save_document(&self.document, &catalog)?;

        println!("✓ Deleted term {}.{}", variable, term.name);
        Ok(())
    }
}

impl ShowTermArgs {
    /// Execute the show command
    pub fn execute(&self) -> CliResult<()> {
        let catalog = load_document(&self.document)?;
        let (variable, term) = catalog.get_term(&self.variable, &self.term)?;
        let response = ShowTermResponse {
            variable_name: variable.name.clone(),
            kind: variable.kind,
            domain: variable.domain,
            term: TermRecord::from(term),
        };

        if self.json {
            return print_json(&response);
        }

        println!(
            "{}.{} ({}, domain {})",
            response.variable_name, response.term.term_name, response.kind, response.domain
        );
        println!("  function: {}", response.term.function_type);
        if !response.term.params.is_empty() {
            println!("  params:   {}", format_params(&response.term.params));
        }
        if let Some(side) = response.term.open_type {
            println!("  open:     {side}");
        }
        if let Some(method) = response.term.defuzzy_type {
            println!("  defuzzify: {method}");
        }
        Ok(())
    }
}
