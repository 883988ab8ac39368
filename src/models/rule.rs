//! IF/AND/THEN rules.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One antecedent clause: `<input_variable> IS <input_term>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Antecedent {
    /// Referenced input variable.
    pub input_variable: String,
    /// Referenced term of that variable.
    pub input_term: String,
}

impl Antecedent {
    /// Creates a clause.
    pub fn new(input_variable: impl Into<String>, input_term: impl Into<String>) -> Self {
        Self {
            input_variable: input_variable.into(),
            input_term: input_term.into(),
        }
    }
}

/// A rule whose antecedents are implicitly ANDed.
///
/// The references are names, not handles: deleting a term leaves the rule
/// in place and inference treats the missing clause as degree 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Antecedent clauses in display order.
    pub inputs: Vec<Antecedent>,
    /// Consequent variable.
    pub output_variable: String,
    /// Consequent term.
    pub output_term: String,
}

impl Rule {
    /// Creates a rule.
    pub fn new(
        inputs: Vec<Antecedent>,
        output_variable: impl Into<String>,
        output_term: impl Into<String>,
    ) -> Self {
        Self {
            inputs,
            output_variable: output_variable.into(),
            output_term: output_term.into(),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IF ")?;
        for (i, clause) in self.inputs.iter().enumerate() {
            if i > 0 {
                f.write_str(" AND ")?;
            }
            write!(f, "{} IS {}", clause.input_variable, clause.input_term)?;
        }
        write!(f, " THEN {} IS {}", self.output_variable, self.output_term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_display() {
        let rule = Rule::new(
            vec![
                Antecedent::new("Temp", "Hot"),
                Antecedent::new("Humidity", "High"),
            ],
            "Power",
            "High",
        );
        assert_eq!(
            rule.to_string(),
            "IF Temp IS Hot AND Humidity IS High THEN Power IS High"
        );
    }
}
