//! The variable/term/rule catalog of one fuzzy inference system.
//!
//! The catalog is the in-memory form of a session document. Every mutating
//! operation validates first and only then touches the catalog, so a failed
//! call leaves it unchanged.
//!
//! # Invariants
//!
//! - Variable names are unique within their kind.
//! - Term names are unique within their variable.
//! - All terms of a variable share the variable's domain.
//! - At most one output variable exists. [`Catalog::clear_output`] is the
//!   only operation that removes it.
//! - A classification output holds only classification terms.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{FisError, FisResult};
use crate::models::{
    Antecedent, DefuzzMethod, Domain, FunctionType, MembershipFunction, OpenSide, Rule, Term,
    Variable, VariableKind,
};

/// Term fields supplied by a caller to create or modify a term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermSpec {
    /// Owning variable.
    pub variable_name: String,
    /// Domain of the owning variable.
    pub domain: Domain,
    /// Membership-function family.
    pub function_type: FunctionType,
    /// Term name (the new name when modifying).
    pub term_name: String,
    /// Numeric parameters keyed by the family's parameter names.
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
    /// Open side for the `*-open` families.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_type: Option<OpenSide>,
    /// Defuzzification method (output terms only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defuzzy_type: Option<DefuzzMethod>,
}

/// Outcome of [`Catalog::clear_output`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClearedOutput {
    /// Names of the removed output variables.
    pub variables: Vec<String>,
    /// Number of rules removed with them.
    pub rules_removed: usize,
}

/// A rule clause that points at a variable or term that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
    /// Rule id (position).
    pub rule_id: usize,
    /// Kind of the referenced variable.
    pub kind: VariableKind,
    /// Referenced variable name.
    pub variable: String,
    /// Referenced term name.
    pub term: String,
}

/// All variables, terms and rules of one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    /// Variables of both kinds, in insertion order.
    pub variables: Vec<Variable>,
    /// Rules; a rule's id is its position.
    pub rules: Vec<Rule>,
}

fn validate_variable_name(name: &str) -> FisResult<()> {
    if name.is_empty() {
        return Err(FisError::validation("Variable name cannot be empty"));
    }
    Ok(())
}

fn validate_term_name(name: &str) -> FisResult<()> {
    if name.is_empty() {
        return Err(FisError::validation("Term name cannot be empty"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(FisError::validation(format!(
            "Term name '{name}' must contain only letters and digits"
        )));
    }
    Ok(())
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the catalog has no variables and no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.rules.is_empty()
    }

    /// Variables of one kind, in insertion order.
    pub fn variables_of(&self, kind: VariableKind) -> impl Iterator<Item = &Variable> {
        self.variables.iter().filter(move |v| v.kind == kind)
    }

    /// Looks up a variable by kind and name.
    #[must_use]
    pub fn variable(&self, kind: VariableKind, name: &str) -> Option<&Variable> {
        self.variables
            .iter()
            .find(|v| v.kind == kind && v.name == name)
    }

    fn variable_index(&self, kind: VariableKind, name: &str) -> Option<usize> {
        self.variables
            .iter()
            .position(|v| v.kind == kind && v.name == name)
    }

    /// The output variable, if one exists.
    #[must_use]
    pub fn output_variable(&self) -> Option<&Variable> {
        self.variables_of(VariableKind::Output).next()
    }

    /// Looks up a term by variable and term name, searching inputs first.
    pub fn get_term(&self, variable_name: &str, term_name: &str) -> FisResult<(&Variable, &Term)> {
        let mut seen_variable = false;
        for variable in self.variables.iter().filter(|v| v.name == variable_name) {
            seen_variable = true;
            if let Some(term) = variable.term(term_name) {
                return Ok((variable, term));
            }
        }
        if seen_variable {
            Err(FisError::not_found(format!(
                "Term '{term_name}' not found on variable '{variable_name}'"
            )))
        } else {
            Err(FisError::not_found(format!(
                "Variable '{variable_name}' not found"
            )))
        }
    }

    /// Validates a spec into a term, independent of existing catalog state.
    fn build_term(kind: VariableKind, spec: &TermSpec) -> FisResult<Term> {
        validate_variable_name(&spec.variable_name)?;
        validate_term_name(&spec.term_name)?;
        spec.domain.validate()?;

        let function =
            MembershipFunction::from_params(spec.function_type, &spec.params, spec.open_type)?;

        if kind == VariableKind::Input {
            if function.is_classification() {
                return Err(FisError::validation(
                    "Classification terms are only allowed on the output variable",
                ));
            }
            if spec.defuzzy_type.is_some() {
                return Err(FisError::validation(
                    "A defuzzification method only applies to output terms",
                ));
            }
        }

        function.validate(spec.domain)?;

        Ok(Term {
            name: spec.term_name.clone(),
            function,
            defuzzify: spec.defuzzy_type,
        })
    }

    /// Checks that `term` can live next to `others` in one variable.
    fn check_classification_mix<'a>(
        variable_name: &str,
        term: &Term,
        mut others: impl Iterator<Item = &'a Term>,
    ) -> FisResult<()> {
        let is_class = term.function.is_classification();
        if others.any(|t| t.function.is_classification() != is_class) {
            return Err(FisError::consistency(format!(
                "Variable '{variable_name}' cannot mix classification and numeric terms"
            )));
        }
        Ok(())
    }

    fn check_single_output(&self) -> FisResult<()> {
        if let Some(existing) = self.output_variable() {
            return Err(FisError::consistency(format!(
                "Output variable '{}' already exists; only one output variable is allowed",
                existing.name
            )));
        }
        Ok(())
    }

    /// Adds a variable with no terms.
    ///
    /// Terms are attached afterwards with [`Catalog::create_term`], which
    /// checks them against this variable's domain.
    pub fn add_variable(
        &mut self,
        kind: VariableKind,
        name: &str,
        domain: Domain,
    ) -> FisResult<&Variable> {
        validate_variable_name(name)?;
        domain.validate()?;
        if self.variable_index(kind, name).is_some() {
            return Err(FisError::validation(format!(
                "Variable '{name}' already exists"
            )));
        }
        if kind == VariableKind::Output {
            self.check_single_output()?;
        }
        self.variables.push(Variable::new(kind, name, domain));
        let index = self.variables.len() - 1;
        Ok(&self.variables[index])
    }

    /// Appends a term, creating its variable on first use.
    pub fn create_term(&mut self, kind: VariableKind, spec: &TermSpec) -> FisResult<Term> {
        let term = Self::build_term(kind, spec)?;

        match self.variable_index(kind, &spec.variable_name) {
            Some(index) => {
                let variable = &self.variables[index];
                if variable.domain != spec.domain {
                    return Err(FisError::consistency(format!(
                        "Variable '{}' already exists with domain {}, got {}",
                        variable.name, variable.domain, spec.domain
                    )));
                }
                if variable.term(&term.name).is_some() {
                    return Err(FisError::validation(format!(
                        "Term '{}' already exists on variable '{}'",
                        term.name, variable.name
                    )));
                }
                Self::check_classification_mix(&variable.name, &term, variable.terms.iter())?;
                self.variables[index].terms.push(term.clone());
            }
            None => {
                if kind == VariableKind::Output {
                    self.check_single_output()?;
                }
                let mut variable = Variable::new(kind, spec.variable_name.clone(), spec.domain);
                variable.terms.push(term.clone());
                self.variables.push(variable);
            }
        }

        Ok(term)
    }

    /// Replaces a term in place, optionally renaming it.
    ///
    /// The variable is located by name; when an input and the output share a
    /// name, the one holding `old_term_name` is modified. The domain may only
    /// change when the modified term is the variable's sole term.
    pub fn modify_term(&mut self, old_term_name: &str, spec: &TermSpec) -> FisResult<Term> {
        let index = self
            .variables
            .iter()
            .position(|v| v.name == spec.variable_name && v.term(old_term_name).is_some())
            .ok_or_else(|| {
                if self.variables.iter().any(|v| v.name == spec.variable_name) {
                    FisError::not_found(format!(
                        "Term '{old_term_name}' not found on variable '{}'",
                        spec.variable_name
                    ))
                } else {
                    FisError::not_found(format!(
                        "Variable '{}' not found",
                        spec.variable_name
                    ))
                }
            })?;

        let variable = &self.variables[index];
        let term = Self::build_term(variable.kind, spec)?;
        let term_index = variable.term_index(old_term_name).unwrap_or_default();

        if variable.domain != spec.domain && variable.terms.len() > 1 {
            return Err(FisError::consistency(format!(
                "Variable '{}' already exists with domain {}, got {}",
                variable.name, variable.domain, spec.domain
            )));
        }
        if let Some(clash) = variable.term_index(&term.name) {
            if clash != term_index {
                return Err(FisError::validation(format!(
                    "Term '{}' already exists on variable '{}'",
                    term.name, variable.name
                )));
            }
        }
        let others = variable
            .terms
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != term_index)
            .map(|(_, t)| t);
        Self::check_classification_mix(&variable.name, &term, others)?;

        let variable = &mut self.variables[index];
        variable.domain = spec.domain;
        variable.terms[term_index] = term.clone();
        Ok(term)
    }

    /// Removes the first term named `term_name`, searching variables in order.
    ///
    /// Rules referring to the term are left alone.
    pub fn delete_term(&mut self, term_name: &str) -> FisResult<(String, Term)> {
        for variable in &mut self.variables {
            if let Some(index) = variable.term_index(term_name) {
                let term = variable.terms.remove(index);
                return Ok((variable.name.clone(), term));
            }
        }
        Err(FisError::not_found(format!("Term '{term_name}' not found")))
    }

    /// Appends a rule and returns its id.
    ///
    /// References are not resolved here; dangling ones evaluate to 0 at
    /// inference time.
    pub fn create_rule(
        &mut self,
        inputs: Vec<Antecedent>,
        output_variable: &str,
        output_term: &str,
    ) -> FisResult<usize> {
        if inputs.is_empty() {
            return Err(FisError::validation(
                "A rule needs at least one input clause",
            ));
        }
        for clause in &inputs {
            if clause.input_variable.trim().is_empty() || clause.input_term.trim().is_empty() {
                return Err(FisError::validation(
                    "Rule input clauses need both a variable and a term name",
                ));
            }
        }
        if output_variable.trim().is_empty() || output_term.trim().is_empty() {
            return Err(FisError::validation(
                "A rule needs an output variable and an output term",
            ));
        }
        if let Some(existing) = self.output_variable() {
            if existing.name != output_variable {
                return Err(FisError::consistency(format!(
                    "Rule targets '{output_variable}' but the output variable is '{}'",
                    existing.name
                )));
            }
        }

        self.rules
            .push(Rule::new(inputs, output_variable, output_term));
        Ok(self.rules.len() - 1)
    }

    /// Removes a rule by id. Later rules shift down by one.
    pub fn delete_rule(&mut self, rule_id: usize) -> FisResult<Rule> {
        if rule_id >= self.rules.len() {
            return Err(FisError::not_found(format!("Rule {rule_id} not found")));
        }
        Ok(self.rules.remove(rule_id))
    }

    /// Removes the output variable and every rule concluding on it.
    pub fn clear_output(&mut self) -> ClearedOutput {
        let names: Vec<String> = self
            .variables_of(VariableKind::Output)
            .map(|v| v.name.clone())
            .collect();
        self.variables.retain(|v| v.kind != VariableKind::Output);

        let before = self.rules.len();
        self.rules
            .retain(|r| !names.iter().any(|n| *n == r.output_variable));

        ClearedOutput {
            variables: names,
            rules_removed: before - self.rules.len(),
        }
    }

    /// Rule clauses referring to variables or terms that do not exist.
    #[must_use]
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();
        let mut check = |rule_id: usize, kind: VariableKind, variable: &str, term: &str| {
            let found = self
                .variable(kind, variable)
                .is_some_and(|v| v.term(term).is_some());
            if !found {
                dangling.push(DanglingReference {
                    rule_id,
                    kind,
                    variable: variable.to_string(),
                    term: term.to_string(),
                });
            }
        };

        for (rule_id, rule) in self.rules.iter().enumerate() {
            for clause in &rule.inputs {
                check(
                    rule_id,
                    VariableKind::Input,
                    &clause.input_variable,
                    &clause.input_term,
                );
            }
            check(
                rule_id,
                VariableKind::Output,
                &rule.output_variable,
                &rule.output_term,
            );
        }
        dangling
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(variable: &str, term: &str, a: f64, b: f64, c: f64) -> TermSpec {
        TermSpec {
            variable_name: variable.to_string(),
            domain: Domain::new(0.0, 100.0),
            function_type: FunctionType::Triangular,
            term_name: term.to_string(),
            params: [("a", a), ("b", b), ("c", c)]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            open_type: None,
            defuzzy_type: None,
        }
    }

    fn class(variable: &str, term: &str) -> TermSpec {
        TermSpec {
            variable_name: variable.to_string(),
            domain: Domain::new(0.0, 1.0),
            function_type: FunctionType::Classification,
            term_name: term.to_string(),
            params: BTreeMap::new(),
            open_type: None,
            defuzzy_type: None,
        }
    }

    #[test]
    fn test_create_term_creates_variable() {
        let mut catalog = Catalog::new();
        catalog
            .create_term(VariableKind::Input, &tri("Temp", "Cold", 0.0, 0.0, 50.0))
            .unwrap();
        catalog
            .create_term(VariableKind::Input, &tri("Temp", "Hot", 50.0, 100.0, 100.0))
            .unwrap();

        let temp = catalog.variable(VariableKind::Input, "Temp").unwrap();
        assert_eq!(temp.terms.len(), 2);
        assert_eq!(temp.terms[0].name, "Cold");
        assert_eq!(temp.terms[1].name, "Hot");
    }

    #[test]
    fn test_variable_names_only_need_content() {
        let mut catalog = Catalog::new();
        catalog
            .create_term(VariableKind::Input, &tri("Room_Temp", "Cold", 0.0, 0.0, 50.0))
            .unwrap();
        assert!(catalog.variable(VariableKind::Input, "Room_Temp").is_some());

        let err = catalog
            .create_term(VariableKind::Input, &tri("", "Cold", 0.0, 0.0, 50.0))
            .unwrap_err();
        assert!(matches!(err, FisError::Validation(_)));
    }

    #[test]
    fn test_add_variable_checks_domain_and_output() {
        let mut catalog = Catalog::new();
        let err = catalog
            .add_variable(VariableKind::Input, "Temp", Domain::new(10.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, FisError::Validation(_)));

        catalog
            .add_variable(VariableKind::Output, "Power", Domain::new(0.0, 100.0))
            .unwrap();
        let err = catalog
            .add_variable(VariableKind::Output, "Speed", Domain::new(0.0, 100.0))
            .unwrap_err();
        assert!(matches!(err, FisError::Consistency(_)));
        assert!(catalog
            .add_variable(VariableKind::Output, "Power", Domain::new(0.0, 100.0))
            .is_err());
        assert_eq!(catalog.variables.len(), 1);
    }

    #[test]
    fn test_create_term_rejects_bad_names() {
        let mut catalog = Catalog::new();
        let err = catalog
            .create_term(VariableKind::Input, &tri("Temp", "", 0.0, 0.0, 50.0))
            .unwrap_err();
        assert!(matches!(err, FisError::Validation(_)));

        let err = catalog
            .create_term(VariableKind::Input, &tri("Temp", "very cold", 0.0, 0.0, 50.0))
            .unwrap_err();
        assert!(matches!(err, FisError::Validation(_)));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_create_term_rejects_duplicate_and_domain_mismatch() {
        let mut catalog = Catalog::new();
        catalog
            .create_term(VariableKind::Input, &tri("Temp", "Cold", 0.0, 0.0, 50.0))
            .unwrap();

        let dup = catalog
            .create_term(VariableKind::Input, &tri("Temp", "Cold", 0.0, 10.0, 50.0))
            .unwrap_err();
        assert!(matches!(dup, FisError::Validation(_)));

        let mut other_domain = tri("Temp", "Warm", 0.0, 10.0, 50.0);
        other_domain.domain = Domain::new(0.0, 50.0);
        let err = catalog
            .create_term(VariableKind::Input, &other_domain)
            .unwrap_err();
        assert!(matches!(err, FisError::Consistency(_)));
    }

    #[test]
    fn test_single_output_variable() {
        let mut catalog = Catalog::new();
        catalog
            .create_term(VariableKind::Output, &tri("Power", "Low", 0.0, 0.0, 50.0))
            .unwrap();
        let err = catalog
            .create_term(VariableKind::Output, &tri("Speed", "Low", 0.0, 0.0, 50.0))
            .unwrap_err();
        assert!(matches!(err, FisError::Consistency(_)));

        let cleared = catalog.clear_output();
        assert_eq!(cleared.variables, vec!["Power".to_string()]);
        catalog
            .create_term(VariableKind::Output, &tri("Speed", "Low", 0.0, 0.0, 50.0))
            .unwrap();
    }

    #[test]
    fn test_classification_cannot_mix() {
        let mut catalog = Catalog::new();
        catalog
            .create_term(VariableKind::Output, &class("Class", "A"))
            .unwrap();
        let mut numeric = tri("Class", "B", 0.0, 0.5, 1.0);
        numeric.domain = Domain::new(0.0, 1.0);
        let err = catalog
            .create_term(VariableKind::Output, &numeric)
            .unwrap_err();
        assert!(matches!(err, FisError::Consistency(_)));

        let err = catalog
            .create_term(VariableKind::Input, &class("Color", "Red"))
            .unwrap_err();
        assert!(matches!(err, FisError::Validation(_)));
    }

    #[test]
    fn test_modify_term_renames_in_place() {
        let mut catalog = Catalog::new();
        catalog
            .create_term(VariableKind::Input, &tri("Temp", "Cold", 0.0, 0.0, 50.0))
            .unwrap();
        catalog
            .create_term(VariableKind::Input, &tri("Temp", "Hot", 50.0, 100.0, 100.0))
            .unwrap();

        catalog
            .modify_term("Cold", &tri("Temp", "Chilly", 0.0, 10.0, 40.0))
            .unwrap();
        let temp = catalog.variable(VariableKind::Input, "Temp").unwrap();
        assert_eq!(temp.terms[0].name, "Chilly");
        assert_eq!(temp.terms[1].name, "Hot");

        let clash = catalog
            .modify_term("Chilly", &tri("Temp", "Hot", 0.0, 10.0, 40.0))
            .unwrap_err();
        assert!(matches!(clash, FisError::Validation(_)));

        let missing = catalog
            .modify_term("Warm", &tri("Temp", "Warm", 0.0, 10.0, 40.0))
            .unwrap_err();
        assert!(matches!(missing, FisError::NotFound(_)));
    }

    #[test]
    fn test_modify_sole_term_may_change_domain() {
        let mut catalog = Catalog::new();
        catalog
            .create_term(VariableKind::Input, &tri("Temp", "Cold", 0.0, 0.0, 50.0))
            .unwrap();
        let mut wider = tri("Temp", "Cold", 0.0, 0.0, 50.0);
        wider.domain = Domain::new(-20.0, 120.0);
        catalog.modify_term("Cold", &wider).unwrap();
        assert_eq!(
            catalog.variable(VariableKind::Input, "Temp").unwrap().domain,
            Domain::new(-20.0, 120.0)
        );
    }

    #[test]
    fn test_delete_term_keeps_rules() {
        let mut catalog = Catalog::new();
        catalog
            .create_term(VariableKind::Input, &tri("Temp", "Hot", 50.0, 100.0, 100.0))
            .unwrap();
        catalog
            .create_rule(vec![Antecedent::new("Temp", "Hot")], "Power", "High")
            .unwrap();

        let (variable, term) = catalog.delete_term("Hot").unwrap();
        assert_eq!(variable, "Temp");
        assert_eq!(term.name, "Hot");
        assert_eq!(catalog.rules.len(), 1);
        assert!(matches!(
            catalog.delete_term("Hot"),
            Err(FisError::NotFound(_))
        ));
        assert_eq!(catalog.dangling_references().len(), 2);
    }

    #[test]
    fn test_create_rule_validation() {
        let mut catalog = Catalog::new();
        assert!(catalog.create_rule(vec![], "Power", "High").is_err());
        assert!(catalog
            .create_rule(vec![Antecedent::new("", "Hot")], "Power", "High")
            .is_err());
        assert!(catalog
            .create_rule(vec![Antecedent::new("Temp", "Hot")], "", "High")
            .is_err());
        assert_eq!(
            catalog
                .create_rule(vec![Antecedent::new("Temp", "Hot")], "Power", "High")
                .unwrap(),
            0
        );
    }

    #[test]
    fn test_create_rule_respects_output_variable() {
        let mut catalog = Catalog::new();
        catalog
            .create_term(VariableKind::Output, &tri("Power", "Low", 0.0, 0.0, 50.0))
            .unwrap();
        let err = catalog
            .create_rule(vec![Antecedent::new("Temp", "Hot")], "Speed", "High")
            .unwrap_err();
        assert!(matches!(err, FisError::Consistency(_)));
    }

    #[test]
    fn test_delete_rule_and_clear_output() {
        let mut catalog = Catalog::new();
        catalog
            .create_term(VariableKind::Output, &class("Class", "A"))
            .unwrap();
        catalog
            .create_rule(vec![Antecedent::new("Temp", "Hot")], "Class", "A")
            .unwrap();
        catalog
            .create_rule(vec![Antecedent::new("Temp", "Cold")], "Class", "A")
            .unwrap();

        assert!(matches!(catalog.delete_rule(5), Err(FisError::NotFound(_))));
        let removed = catalog.delete_rule(0).unwrap();
        assert_eq!(removed.inputs[0].input_term, "Hot");

        let cleared = catalog.clear_output();
        assert_eq!(cleared.rules_removed, 1);
        assert!(catalog.rules.is_empty());
        assert!(catalog.output_variable().is_none());
    }
}
