//! End-to-end tests for the `fuzzylab` command line.

use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

mod fixtures;
use fixtures::*;

/// Path to the fuzzylab binary
fn fuzzylab_bin() -> &'static str {
    env!("CARGO_BIN_EXE_fuzzylab")
}

/// Runs the binary with an isolated config directory.
fn run(args: &[&str], config_home: &Path) -> Output {
    Command::new(fuzzylab_bin())
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Creates a triangular term over `[0, 100]` through the CLI.
fn create_triangle(
    doc: &str,
    kind: &str,
    variable: &str,
    name: &str,
    abc: [&str; 3],
    home: &Path,
) {
    let params = [
        format!("a={}", abc[0]),
        format!("b={}", abc[1]),
        format!("c={}", abc[2]),
    ];
    let output = run(
        &[
            "term", "create", "--document", doc, "--kind", kind, "--variable", variable,
            "--min", "0", "--max", "100", "--function", "triangular", "--name", name,
            "--param", &params[0], "--param", &params[1], "--param", &params[2],
        ],
        home,
    );
    assert_eq!(
        output.status.code(),
        Some(0),
        "term create should succeed. stderr: {}",
        stderr(&output)
    );
    assert!(stdout(&output).contains("✓ Created"));
}

#[test]
fn test_build_system_and_infer() {
    let temp_dir = TempDir::new().unwrap();
    let doc = temp_dir.path().join("system.json");
    let doc = doc.to_str().unwrap();
    let home = temp_dir.path();

    create_triangle(doc, "input", "Temp", "Cold", ["0", "0", "50"], home);
    create_triangle(doc, "input", "Temp", "Hot", ["50", "100", "100"], home);
    create_triangle(doc, "output", "Power", "Low", ["0", "0", "50"], home);
    create_triangle(doc, "output", "Power", "High", ["50", "100", "100"], home);

    for (input, output_term) in [("Temp=Cold", "Power=Low"), ("Temp=Hot", "Power=High")] {
        let output = run(
            &["rule", "create", "--document", doc, "--input", input, "--output", output_term],
            temp_dir.path(),
        );
        assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    }

    let output = run(
        &["infer", "--document", doc, "--input", "Temp=100", "--json"],
        temp_dir.path(),
    );
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let result: Value = serde_json::from_str(&stdout(&output)).expect("Should parse JSON output");
    let power = result["results"]["Power"].as_f64().unwrap();
    assert!((power - 250.0 / 3.0).abs() < 0.5, "power = {power}");
    assert_eq!(result["rule_outputs"].as_array().unwrap().len(), 2);
}

#[test]
fn test_infer_human_output() {
    let (doc, temp_dir) = create_temp_document(&thermostat_document());
    let output = run(
        &["infer", "--document", doc.to_str().unwrap(), "--input", "Temp=0"],
        temp_dir.path(),
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("Fuzzified:"));
    assert!(text.contains("Results:"));
    assert!(text.contains("Power = "));
}

#[test]
fn test_invalid_term_exits_with_validation_code() {
    let (doc, temp_dir) = create_temp_document(&thermostat_document());
    let before = read_document(&doc);

    // a > b
    let output = run(
        &[
            "term", "create", "--document", doc.to_str().unwrap(), "--kind", "input",
            "--variable", "Temp", "--min", "0", "--max", "100", "--function", "triangular",
            "--name", "Warm", "--param", "a=60", "--param", "b=40", "--param", "c=80",
        ],
        temp_dir.path(),
    );

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(read_document(&doc), before, "document must be unchanged");
}

#[test]
fn test_second_output_variable_is_rejected() {
    let (doc, temp_dir) = create_temp_document(&thermostat_document());
    let output = run(
        &[
            "term", "create", "--document", doc.to_str().unwrap(), "--kind", "output",
            "--variable", "Fan", "--min", "0", "--max", "10", "--function", "gaussian",
            "--name", "Slow", "--param", "mean=0", "--param", "sigma=2",
        ],
        temp_dir.path(),
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("output"));
}

#[test]
fn test_show_and_delete_term() {
    let (doc, temp_dir) = create_temp_document(&thermostat_document());
    let doc_str = doc.to_str().unwrap();

    let output = run(
        &["term", "show", "--document", doc_str, "--variable", "Temp", "--term", "Hot", "--json"],
        temp_dir.path(),
    );
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let shown: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(shown["kind"], "input");
    assert_eq!(shown["params"]["b"], 100.0);

    let output = run(&["term", "delete", "--document", doc_str, "--term", "Hot"], temp_dir.path());
    assert_eq!(output.status.code(), Some(0));

    let output = run(
        &["term", "show", "--document", doc_str, "--variable", "Temp", "--term", "Hot"],
        temp_dir.path(),
    );
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_delete_missing_rule() {
    let (doc, temp_dir) = create_temp_document(&thermostat_document());
    let output = run(
        &["rule", "delete", "--document", doc.to_str().unwrap(), "--id", "7"],
        temp_dir.path(),
    );
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_clear_output_removes_rules() {
    let (doc, temp_dir) = create_temp_document(&thermostat_document());
    let output = run(&["clear-output", "--document", doc.to_str().unwrap()], temp_dir.path());

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let saved = read_document(&doc);
    assert!(saved["output"].as_object().unwrap().is_empty());
    assert!(saved.get("Rule0").is_none());
    assert!(saved["input"]["Temp"].is_object());
}

#[test]
fn test_report_json() {
    let (doc, temp_dir) = create_temp_document(&classification_document());
    let output = run(
        &["report", "--document", doc.to_str().unwrap(), "--json"],
        temp_dir.path(),
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let report: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["variables"].as_array().unwrap().len(), 2);
    assert_eq!(report["variables"][1]["classification"], true);
    assert_eq!(report["rules"][0]["text"], "IF Score IS Low THEN Grade IS Fail");
    assert!(report["dangling"].as_array().unwrap().is_empty());
}

#[test]
fn test_export_then_import() {
    let (doc, temp_dir) = create_temp_document(&thermostat_document());
    let exported = temp_dir.path().join("export.json");
    let output = run(
        &[
            "export", "--document", doc.to_str().unwrap(), "--scope", "terms", "--output",
            exported.to_str().unwrap(),
        ],
        temp_dir.path(),
    );
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let target = temp_dir.path().join("copy.json");
    let output = run(
        &[
            "import", "--document", target.to_str().unwrap(), "--file",
            exported.to_str().unwrap(),
        ],
        temp_dir.path(),
    );
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let copy = read_document(&target);
    assert!(copy["output"]["Power"].is_object());
    assert!(copy.get("Rule0").is_none());
}

#[test]
fn test_import_missing_file_exits_with_io_code() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("copy.json");
    let missing = temp_dir.path().join("nope.json");
    let output = run(
        &[
            "import", "--document", target.to_str().unwrap(), "--file",
            missing.to_str().unwrap(),
        ],
        temp_dir.path(),
    );
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_corrupt_document_exits_with_io_code() {
    let temp_dir = TempDir::new().unwrap();
    let doc = temp_dir.path().join("broken.json");
    std::fs::write(&doc, "{ not json").unwrap();

    let output = run(&["report", "--document", doc.to_str().unwrap()], temp_dir.path());
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_config_set_and_show() {
    let temp_dir = TempDir::new().unwrap();

    let output = run(&["config", "set", "--fuzzify-resolution", "200"], temp_dir.path());
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let output = run(&["config", "show", "--json"], temp_dir.path());
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let config: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(config["engine"]["fuzzify_resolution"], 200);

    let output = run(&["config", "set", "--aggregate-resolution", "1"], temp_dir.path());
    assert_eq!(output.status.code(), Some(1));

    let output = run(&["config", "set"], temp_dir.path());
    assert_eq!(output.status.code(), Some(1));
}
