//! System summary for display.

use std::fmt;

use serde::Serialize;

use crate::models::{Catalog, DanglingReference, DefuzzMethod, Domain, VariableKind};

/// One variable in a [`SystemReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableSummary {
    /// Variable name.
    pub name: String,
    /// Input or output.
    pub kind: VariableKind,
    /// Universe of discourse.
    pub domain: Domain,
    /// Term names in insertion order.
    pub terms: Vec<String>,
    /// Whether the output is a classification.
    pub classification: bool,
    /// Defuzzification method of a numeric output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defuzzify: Option<DefuzzMethod>,
}

/// One rule in a [`SystemReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSummary {
    /// Rule id.
    pub rule_id: usize,
    /// `IF ... THEN ...` rendering.
    pub text: String,
}

/// Human-oriented overview of a catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemReport {
    /// Inputs first, then the output.
    pub variables: Vec<VariableSummary>,
    /// Rules in id order.
    pub rules: Vec<RuleSummary>,
    /// Rule clauses pointing at missing variables or terms.
    pub dangling: Vec<DanglingReference>,
}

impl SystemReport {
    /// Builds the report for `catalog`.
    #[must_use]
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let variables = [VariableKind::Input, VariableKind::Output]
            .into_iter()
            .flat_map(|kind| catalog.variables_of(kind))
            .map(|v| {
                let classification = v.is_classification();
                VariableSummary {
                    name: v.name.clone(),
                    kind: v.kind,
                    domain: v.domain,
                    terms: v.terms.iter().map(|t| t.name.clone()).collect(),
                    classification,
                    defuzzify: (v.kind == VariableKind::Output && !classification)
                        .then(|| v.defuzz_method()),
                }
            })
            .collect();

        let rules = catalog
            .rules
            .iter()
            .enumerate()
            .map(|(rule_id, rule)| RuleSummary {
                rule_id,
                text: rule.to_string(),
            })
            .collect();

        Self {
            variables,
            rules,
            dangling: catalog.dangling_references(),
        }
    }
}

impl fmt::Display for SystemReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Variables:")?;
        if self.variables.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for v in &self.variables {
            write!(f, "  [{}] {} {}: {}", v.kind, v.name, v.domain, v.terms.join(", "))?;
            if v.classification {
                write!(f, " (classification)")?;
            } else if let Some(method) = v.defuzzify {
                write!(f, " (defuzzify: {method})")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Rules:")?;
        if self.rules.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for rule in &self.rules {
            writeln!(f, "  {}: {}", rule.rule_id, rule.text)?;
        }

        if !self.dangling.is_empty() {
            writeln!(f, "Warnings:")?;
            for d in &self.dangling {
                writeln!(
                    f,
                    "  Rule {} refers to missing {} term {}.{}",
                    d.rule_id, d.kind, d.variable, d.term
                )?;
            }
        }
        Ok(())
    }
}
