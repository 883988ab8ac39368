//! Data models for fuzzy inference systems.
//!
//! This module contains the variables, terms, rules and the catalog that
//! groups them, together with the JSON document format they persist to.
//! Models are designed to be independent of the web layer and the CLI.

pub mod catalog;
pub mod document;
pub mod rule;
pub mod term;
pub mod variable;

// Re-export all model types
pub use catalog::{Catalog, ClearedOutput, DanglingReference, TermSpec};
pub use document::{TermRecord, VariableRecord};
pub use rule::{Antecedent, Rule};
pub use term::{DefuzzMethod, FunctionType, MembershipFunction, OpenSide, OpenTail, Term};
pub use variable::{Domain, Variable, VariableKind};
