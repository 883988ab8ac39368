//! Linguistic variables and their domains.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FisError, FisResult};
use crate::models::Term;

/// Whether a variable is an antecedent input or the consequent output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    /// Input variable, fuzzified from crisp values.
    Input,
    /// Output variable, defuzzified or classified.
    Output,
}

impl VariableKind {
    /// Section name in the persisted document.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
        }
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariableKind {
    type Err = FisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "input" => Ok(Self::Input),
            "output" => Ok(Self::Output),
            other => Err(FisError::validation(format!(
                "Unknown variable kind '{other}' (expected input or output)"
            ))),
        }
    }
}

/// Closed universe of discourse `[min, max]`, serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Domain {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl Domain {
    /// Creates a domain without validating it.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Checks that both bounds are finite and `min <= max`.
    pub fn validate(&self) -> FisResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(FisError::validation(
                "Domain bounds must be finite numbers",
            ));
        }
        if self.min > self.max {
            return Err(FisError::validation(format!(
                "Domain minimum ({}) cannot be greater than domain maximum ({})",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Whether `x` lies inside the closed interval.
    #[must_use]
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Width of the interval.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

impl From<[f64; 2]> for Domain {
    fn from([min, max]: [f64; 2]) -> Self {
        Self { min, max }
    }
}

impl From<Domain> for [f64; 2] {
    fn from(domain: Domain) -> Self {
        [domain.min, domain.max]
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// A linguistic variable with its ordered terms.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Input or output.
    pub kind: VariableKind,
    /// Name, unique within its kind.
    pub name: String,
    /// Universe of discourse shared by all terms.
    pub domain: Domain,
    /// Terms in insertion order.
    pub terms: Vec<Term>,
}

impl Variable {
    /// Creates an empty variable.
    pub fn new(kind: VariableKind, name: impl Into<String>, domain: Domain) -> Self {
        Self {
            kind,
            name: name.into(),
            domain,
            terms: Vec::new(),
        }
    }

    /// Looks up a term by name.
    #[must_use]
    pub fn term(&self, name: &str) -> Option<&Term> {
        self.terms.iter().find(|t| t.name == name)
    }

    /// Position of a term by name.
    #[must_use]
    pub fn term_index(&self, name: &str) -> Option<usize> {
        self.terms.iter().position(|t| t.name == name)
    }

    /// Whether this is a classification output (all terms are class labels).
    #[must_use]
    pub fn is_classification(&self) -> bool {
        self.kind == VariableKind::Output
            && !self.terms.is_empty()
            && self.terms.iter().all(|t| t.function.is_classification())
    }

    /// Defuzzification method: the first one set on any term, else centroid.
    #[must_use]
    pub fn defuzz_method(&self) -> crate::models::DefuzzMethod {
        self.terms
            .iter()
            .find_map(|t| t.defuzzify)
            .unwrap_or_default()
    }
}
