//! JSON document format of a session.
//!
//! ```json
//! {
//!   "input":  { "Temp":  { "domain": [0, 100], "terms": [ TermRecord, ... ] } },
//!   "output": { "Power": { "domain": [0, 100], "terms": [ ... ] } },
//!   "Rule0":  { "inputs": [{ "input_variable": "Temp", "input_term": "Hot" }],
//!               "output_variable": "Power", "output_term": "High" }
//! }
//! ```
//!
//! Rules are read in `Rule<N>` order and written back densely numbered from
//! zero. Other top-level keys are ignored.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{FisError, FisResult};
use crate::models::{
    Catalog, DefuzzMethod, Domain, FunctionType, MembershipFunction, OpenSide, Rule, Term,
    TermSpec, Variable, VariableKind,
};

static RULE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Rule(\d+)$").expect("rule key pattern is valid"));

/// Persisted form of a term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermRecord {
    /// Term name.
    pub term_name: String,
    /// Membership-function family.
    pub function_type: FunctionType,
    /// Numeric parameters; empty for classification terms.
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
    /// Open side of `*-open` families.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_type: Option<OpenSide>,
    /// Defuzzification method of an output term.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defuzzy_type: Option<DefuzzMethod>,
}

impl From<&Term> for TermRecord {
    fn from(term: &Term) -> Self {
        Self {
            term_name: term.name.clone(),
            function_type: term.function.function_type(),
            params: term.function.params(),
            open_type: term.function.open_side(),
            defuzzy_type: term.defuzzify,
        }
    }
}

impl TryFrom<TermRecord> for Term {
    type Error = FisError;

    fn try_from(record: TermRecord) -> FisResult<Self> {
        let function =
            MembershipFunction::from_params(record.function_type, &record.params, record.open_type)
                .map_err(|e| {
                    FisError::validation(format!("Term '{}': {e}", record.term_name))
                })?;
        Ok(Self {
            name: record.term_name,
            function,
            defuzzify: record.defuzzy_type,
        })
    }
}

impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TermRecord::from(self).serialize(serializer)
    }
}

/// Persisted form of a variable (its name is the map key).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableRecord {
    /// Universe of discourse.
    pub domain: Domain,
    /// Terms in insertion order.
    #[serde(default)]
    pub terms: Vec<TermRecord>,
}

impl From<&Variable> for VariableRecord {
    fn from(variable: &Variable) -> Self {
        Self {
            domain: variable.domain,
            terms: variable.terms.iter().map(TermRecord::from).collect(),
        }
    }
}

impl Catalog {
    /// Renders the catalog in the persisted document layout.
    #[must_use]
    pub fn to_document(&self) -> Value {
        Value::Object(self.to_document_map())
    }

    /// Top-level entries of [`Catalog::to_document`].
    #[must_use]
    pub fn to_document_map(&self) -> Map<String, Value> {
        let mut doc = Map::new();
        for kind in [VariableKind::Input, VariableKind::Output] {
            let section: Map<String, Value> = self
                .variables_of(kind)
                .map(|v| {
                    let record = VariableRecord::from(v);
                    (
                        v.name.clone(),
                        serde_json::to_value(record).unwrap_or(Value::Null),
                    )
                })
                .collect();
            doc.insert(kind.as_str().to_string(), Value::Object(section));
        }
        for (id, rule) in self.rules.iter().enumerate() {
            doc.insert(
                format!("Rule{id}"),
                serde_json::to_value(rule).unwrap_or(Value::Null),
            );
        }
        doc
    }

    /// Parses a persisted document. Missing sections read as empty.
    ///
    /// Variables and terms go through [`Catalog::add_variable`] and
    /// [`Catalog::create_term`], so a document is held to the same rules as
    /// an interactive edit.
    pub fn from_document(value: Value) -> FisResult<Self> {
        let Value::Object(mut doc) = value else {
            return Err(FisError::validation("Document must be a JSON object"));
        };

        let mut catalog = Self::new();
        for kind in [VariableKind::Input, VariableKind::Output] {
            let section = match doc.remove(kind.as_str()) {
                None | Some(Value::Null) => continue,
                Some(Value::Object(section)) => section,
                Some(_) => {
                    return Err(FisError::validation(format!(
                        "Section '{kind}' must be an object"
                    )))
                }
            };
            for (name, value) in section {
                let record: VariableRecord = serde_json::from_value(value).map_err(|e| {
                    FisError::validation(format!("Variable '{name}' is malformed: {e}"))
                })?;
                catalog.add_variable(kind, &name, record.domain)?;
                for term in record.terms {
                    let term_name = term.term_name.clone();
                    let spec = TermSpec {
                        variable_name: name.clone(),
                        domain: record.domain,
                        function_type: term.function_type,
                        term_name: term.term_name,
                        params: term.params,
                        open_type: term.open_type,
                        defuzzy_type: term.defuzzy_type,
                    };
                    catalog.create_term(kind, &spec).map_err(|e| match e {
                        FisError::Validation(message) => FisError::validation(format!(
                            "Variable '{name}', term '{term_name}': {message}"
                        )),
                        other => other,
                    })?;
                }
            }
        }

        let mut rules: Vec<(u64, Rule)> = Vec::new();
        for (key, value) in doc {
            let Some(number) = RULE_KEY
                .captures(&key)
                .and_then(|caps| caps[1].parse::<u64>().ok())
            else {
                debug!("Ignoring unknown document key '{}'", key);
                continue;
            };
            let rule: Rule = serde_json::from_value(value)
                .map_err(|e| FisError::validation(format!("{key} is malformed: {e}")))?;
            rules.push((number, rule));
        }
        rules.sort_by_key(|(number, _)| *number);
        catalog.rules = rules.into_iter().map(|(_, rule)| rule).collect();

        Ok(catalog)
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_document().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_document(value).map_err(serde::de::Error::custom)
    }
}
