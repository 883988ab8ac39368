//! Rule firing strengths.

use serde::Serialize;

use super::fuzzify::Fuzzified;
use crate::models::{Antecedent, Rule};

/// Firing strength of one rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleOutput {
    /// Position of the rule in the catalog.
    pub rule_id: usize,
    /// Consequent variable.
    pub output_variable: String,
    /// Consequent term.
    pub output_term: String,
    /// Minimum degree across the antecedents.
    pub activation: f64,
    /// Antecedent clauses, echoed for display.
    pub inputs: Vec<Antecedent>,
}

fn degree(fuzzified: &Fuzzified, clause: &Antecedent) -> f64 {
    fuzzified
        .get(&clause.input_variable)
        .and_then(|terms| terms.get(&clause.input_term))
        .copied()
        .unwrap_or(0.0)
}

/// Evaluates every rule with the min t-norm.
///
/// Clauses whose variable or term has no degree count as 0, so a rule with a
/// dangling reference never fires.
#[must_use]
pub fn evaluate_rules(rules: &[Rule], fuzzified: &Fuzzified) -> Vec<RuleOutput> {
    rules
        .iter()
        .enumerate()
        .map(|(rule_id, rule)| RuleOutput {
            rule_id,
            output_variable: rule.output_variable.clone(),
            output_term: rule.output_term.clone(),
            activation: rule
                .inputs
                .iter()
                .map(|clause| degree(fuzzified, clause))
                .reduce(f64::min)
                .unwrap_or(0.0),
            inputs: rule.inputs.clone(),
        })
        .collect()
}
