//! Tests for the persisted document layout and the file store.

use chrono::NaiveDate;
use fuzzylab::error::FisError;
use fuzzylab::models::{Catalog, VariableKind};
use fuzzylab::services::exchange::{export, parse_import};
use fuzzylab::services::{read_catalog, write_catalog, ExportScope};
use serde_json::json;
use tempfile::TempDir;

mod fixtures;
use fixtures::*;

#[test]
fn test_document_matches_built_catalog() {
    let parsed = Catalog::from_document(thermostat_document()).unwrap();
    assert_eq!(parsed, thermostat_catalog());
}

#[test]
fn test_document_layout() {
    let document = thermostat_catalog().to_document();

    assert_eq!(document["input"]["Temp"]["domain"], json!([0.0, 100.0]));
    assert_eq!(document["input"]["Temp"]["terms"][1]["term_name"], "Hot");
    assert_eq!(
        document["input"]["Temp"]["terms"][1]["function_type"],
        "triangular"
    );
    assert_eq!(document["output"]["Power"]["terms"][0]["params"]["c"], 50.0);
    assert_eq!(document["Rule1"]["output_term"], "High");
    assert_eq!(document["Rule0"]["inputs"][0]["input_term"], "Cold");
}

#[test]
fn test_rules_renumber_after_delete() {
    let mut catalog = thermostat_catalog();
    catalog.delete_rule(0).unwrap();

    let document = catalog.to_document();
    assert_eq!(document["Rule0"]["output_term"], "High");
    assert!(document.get("Rule1").is_none());
}

#[test]
fn test_rules_load_in_numeric_order() {
    let mut document = thermostat_document();
    let map = document.as_object_mut().unwrap();
    let rule0 = map.remove("Rule0").unwrap();
    let rule1 = map.remove("Rule1").unwrap();
    map.insert("Rule10".to_string(), rule0);
    map.insert("Rule2".to_string(), rule1);

    let catalog = Catalog::from_document(document).unwrap();
    assert_eq!(catalog.rules[0].output_term, "High");
    assert_eq!(catalog.rules[1].output_term, "Low");
}

#[test]
fn test_unknown_keys_are_ignored() {
    let mut document = thermostat_document();
    document["notes"] = json!("drafted by hand");
    let catalog = Catalog::from_document(document).unwrap();
    assert_eq!(catalog.rules.len(), 2);
}

#[test]
fn test_malformed_term_is_rejected() {
    let document = json!({
        "input": {
            "Temp": {
                "domain": [0, 100],
                "terms": [{"term_name": "Cold", "function_type": "triangular", "params": {"a": 0}}]
            }
        }
    });
    let err = Catalog::from_document(document).unwrap_err();
    assert!(matches!(err, FisError::Validation(_)));
}

#[test]
fn test_store_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("system.json");

    // Missing file reads as an empty system
    assert!(read_catalog(&path).unwrap().is_empty());

    let catalog = thermostat_catalog();
    write_catalog(&path, &catalog).unwrap();
    assert_eq!(read_catalog(&path).unwrap(), catalog);
}

#[test]
fn test_corrupt_file_is_storage_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("system.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(read_catalog(&path), Err(FisError::Storage(_))));
}

#[test]
fn test_scoped_export_then_import() {
    let catalog = thermostat_catalog();
    let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

    let bundle = export(&catalog, ExportScope::Terms, date);
    assert_eq!(bundle.filename, "fuzzylab_terms_20240309.json");

    let imported = parse_import(bundle.document).unwrap();
    assert!(imported.rules.is_empty());
    assert_eq!(
        imported
            .variable(VariableKind::Output, "Power")
            .unwrap()
            .terms
            .len(),
        2
    );

    // Rules-only exports lack the sections an import needs
    let rules_only = export(&catalog, ExportScope::Rules, date);
    assert!(matches!(
        parse_import(rules_only.document),
        Err(FisError::Validation(_))
    ));
}

fn triangle(name: &str, a: f64, b: f64, c: f64) -> serde_json::Value {
    json!({"term_name": name, "function_type": "triangular", "params": {"a": a, "b": b, "c": c}})
}

#[test]
fn test_document_term_parameters_are_validated() {
    // a > b
    let document = json!({
        "input": {"Temp": {"domain": [0, 100], "terms": [triangle("Hot", 90.0, 10.0, 50.0)]}}
    });
    let err = Catalog::from_document(document).unwrap_err();
    assert!(matches!(err, FisError::Validation(_)));
    assert!(err.to_string().contains("Hot"));

    let document = json!({
        "output": {"Power": {"domain": [0, 100], "terms": [
            {"term_name": "Mid", "function_type": "gaussian", "params": {"mean": 50, "sigma": 0}}
        ]}}
    });
    assert!(matches!(
        Catalog::from_document(document),
        Err(FisError::Validation(_))
    ));
}

#[test]
fn test_document_reversed_domain_is_rejected() {
    let document = json!({
        "output": {"Speed": {"domain": [100, 0], "terms": []}}
    });
    assert!(matches!(
        Catalog::from_document(document),
        Err(FisError::Validation(_))
    ));
}

#[test]
fn test_document_duplicate_term_is_rejected() {
    let document = json!({
        "input": {"Temp": {"domain": [0, 100], "terms": [
            triangle("Hot", 50.0, 100.0, 100.0),
            triangle("Hot", 0.0, 50.0, 100.0)
        ]}}
    });
    let err = Catalog::from_document(document).unwrap_err();
    assert!(matches!(err, FisError::Validation(_)));
    assert!(err.to_string().contains("already exists"));
}

#[test]
fn test_document_second_output_is_rejected() {
    let document = json!({
        "output": {
            "Power": {"domain": [0, 100], "terms": [triangle("Low", 0.0, 0.0, 50.0)]},
            "Speed": {"domain": [0, 100], "terms": [triangle("Slow", 0.0, 0.0, 50.0)]}
        }
    });
    assert!(matches!(
        Catalog::from_document(document),
        Err(FisError::Consistency(_))
    ));

    // A term-less second output is still a second output
    let document = json!({
        "output": {
            "Power": {"domain": [0, 100], "terms": [triangle("Low", 0.0, 0.0, 50.0)]},
            "Speed": {"domain": [0, 100], "terms": []}
        }
    });
    assert!(matches!(
        Catalog::from_document(document),
        Err(FisError::Consistency(_))
    ));
}

#[test]
fn test_document_mixed_output_terms_are_rejected() {
    let document = json!({
        "output": {"Grade": {"domain": [0, 100], "terms": [
            {"term_name": "Pass", "function_type": "classification", "params": {}},
            triangle("Low", 0.0, 0.0, 50.0)
        ]}}
    });
    assert!(matches!(
        Catalog::from_document(document),
        Err(FisError::Consistency(_))
    ));
}

#[test]
fn test_import_rejects_invalid_terms() {
    let document = json!({
        "input": {"Temp": {"domain": [0, 100], "terms": [
            triangle("Hot", 90.0, 10.0, 50.0),
            triangle("Hot", 0.0, 50.0, 100.0)
        ]}},
        "output": {
            "Power": {"domain": [0, 100], "terms": [
                {"term_name": "Mid", "function_type": "gaussian", "params": {"mean": 50, "sigma": 0}}
            ]},
            "Speed": {"domain": [100, 0], "terms": []}
        }
    });
    assert!(parse_import(document).is_err());
}

#[test]
fn test_document_allows_any_nonempty_variable_name() {
    let document = json!({
        "input": {"Room_Temp": {"domain": [0, 100], "terms": [triangle("Cold", 0.0, 0.0, 50.0)]}},
        "output": {}
    });
    let catalog = parse_import(document).unwrap();
    assert!(catalog.variable(VariableKind::Input, "Room_Temp").is_some());
}

#[test]
fn test_corrupt_session_content_is_rejected_on_read() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("system.json");
    let document = json!({
        "input": {"Temp": {"domain": [0, 100], "terms": [triangle("Hot", 90.0, 10.0, 50.0)]}}
    });
    std::fs::write(&path, document.to_string()).unwrap();

    assert!(matches!(read_catalog(&path), Err(FisError::Validation(_))));
}
