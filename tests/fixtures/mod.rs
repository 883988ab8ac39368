//! Shared test fixtures for integration tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use fuzzylab::models::{Antecedent, Catalog, Domain, FunctionType, TermSpec, VariableKind};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Builds a term spec over `[0, 100]` with parameters named in order.
pub fn term_spec(
    variable: &str,
    term: &str,
    function_type: FunctionType,
    params: &[f64],
) -> TermSpec {
    TermSpec {
        variable_name: variable.to_string(),
        domain: Domain::new(0.0, 100.0),
        function_type,
        term_name: term.to_string(),
        params: function_type
            .required_params()
            .iter()
            .zip(params)
            .map(|(k, v)| ((*k).to_string(), *v))
            .collect(),
        open_type: None,
        defuzzy_type: None,
    }
}

/// Thermostat system: Temp (Cold, Hot) drives Power (Low, High).
///
/// # Returns
/// A `Catalog` with two rules: Cold -> Low and Hot -> High.
pub fn thermostat_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    let tri = FunctionType::Triangular;
    for (kind, variable, term, params) in [
        (VariableKind::Input, "Temp", "Cold", [0.0, 0.0, 50.0]),
        (VariableKind::Input, "Temp", "Hot", [50.0, 100.0, 100.0]),
        (VariableKind::Output, "Power", "Low", [0.0, 0.0, 50.0]),
        (VariableKind::Output, "Power", "High", [50.0, 100.0, 100.0]),
    ] {
        catalog
            .create_term(kind, &term_spec(variable, term, tri, &params))
            .expect("valid term");
    }
    catalog
        .create_rule(vec![Antecedent::new("Temp", "Cold")], "Power", "Low")
        .expect("valid rule");
    catalog
        .create_rule(vec![Antecedent::new("Temp", "Hot")], "Power", "High")
        .expect("valid rule");
    catalog
}

/// The thermostat system in its persisted JSON layout.
pub fn thermostat_document() -> Value {
    json!({
        "input": {
            "Temp": {
                "domain": [0, 100],
                "terms": [
                    {"term_name": "Cold", "function_type": "triangular", "params": {"a": 0, "b": 0, "c": 50}},
                    {"term_name": "Hot", "function_type": "triangular", "params": {"a": 50, "b": 100, "c": 100}}
                ]
            }
        },
        "output": {
            "Power": {
                "domain": [0, 100],
                "terms": [
                    {"term_name": "Low", "function_type": "triangular", "params": {"a": 0, "b": 0, "c": 50}},
                    {"term_name": "High", "function_type": "triangular", "params": {"a": 50, "b": 100, "c": 100}}
                ]
            }
        },
        "Rule0": {
            "inputs": [{"input_variable": "Temp", "input_term": "Cold"}],
            "output_variable": "Power",
            "output_term": "Low"
        },
        "Rule1": {
            "inputs": [{"input_variable": "Temp", "input_term": "Hot"}],
            "output_variable": "Power",
            "output_term": "High"
        }
    })
}

/// Classification system: Score (Low, High) picks Grade (Fail, Pass).
pub fn classification_document() -> Value {
    json!({
        "input": {
            "Score": {
                "domain": [0, 10],
                "terms": [
                    {"term_name": "Low", "function_type": "triangular", "params": {"a": 0, "b": 0, "c": 6}},
                    {"term_name": "High", "function_type": "triangular", "params": {"a": 4, "b": 10, "c": 10}}
                ]
            }
        },
        "output": {
            "Grade": {
                "domain": [0, 1],
                "terms": [
                    {"term_name": "Fail", "function_type": "classification", "params": {}},
                    {"term_name": "Pass", "function_type": "classification", "params": {}}
                ]
            }
        },
        "Rule0": {
            "inputs": [{"input_variable": "Score", "input_term": "Low"}],
            "output_variable": "Grade",
            "output_term": "Fail"
        },
        "Rule1": {
            "inputs": [{"input_variable": "Score", "input_term": "High"}],
            "output_variable": "Grade",
            "output_term": "Pass"
        }
    })
}

/// Writes a JSON document to `path`.
pub fn write_document(document: &Value, path: &Path) -> std::io::Result<()> {
    fs::write(path, serde_json::to_string_pretty(document)?)
}

/// Writes a JSON document into a fresh temporary directory.
///
/// # Returns
/// The document path and the `TempDir` guard that keeps it alive.
pub fn create_temp_document(document: &Value) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("system.json");
    write_document(document, &path).expect("Failed to write document");
    (path, temp_dir)
}

/// Reads a document back as JSON.
pub fn read_document(path: &Path) -> Value {
    let content = fs::read_to_string(path).expect("Failed to read document");
    serde_json::from_str(&content).expect("Document should be valid JSON")
}
