//! Export and import framing of session documents.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::APP_BINARY_NAME;
use crate::error::{FisError, FisResult};
use crate::models::{Catalog, VariableKind};

/// Which part of a document an export carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportScope {
    /// Variables, terms and rules.
    #[default]
    Full,
    /// Variable names and domains, without terms or rules.
    Variables,
    /// Variables with their terms, without rules.
    Terms,
    /// Rules only.
    Rules,
}

impl ExportScope {
    /// Lowercase name used in file names and query strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Variables => "variables",
            Self::Terms => "terms",
            Self::Rules => "rules",
        }
    }
}

impl fmt::Display for ExportScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportScope {
    type Err = FisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "variables" => Ok(Self::Variables),
            "terms" => Ok(Self::Terms),
            "rules" => Ok(Self::Rules),
            other => Err(FisError::validation(format!(
                "Unknown export scope '{other}' (expected full, variables, terms or rules)"
            ))),
        }
    }
}

/// A downloadable export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportBundle {
    /// Suggested file name.
    pub filename: String,
    /// Exported document (or subset).
    pub document: Value,
}

/// Exports `catalog` restricted to `scope`.
#[must_use]
pub fn export(catalog: &Catalog, scope: ExportScope, date: NaiveDate) -> ExportBundle {
    let mut doc = catalog.to_document_map();

    match scope {
        ExportScope::Full => {}
        ExportScope::Terms => doc.retain(|key, _| is_section(key)),
        ExportScope::Variables => {
            doc.retain(|key, _| is_section(key));
            for section in doc.values_mut() {
                if let Value::Object(variables) = section {
                    for record in variables.values_mut() {
                        if let Some(terms) = record.get_mut("terms") {
                            *terms = Value::Array(Vec::new());
                        }
                    }
                }
            }
        }
        ExportScope::Rules => doc.retain(|key, _| !is_section(key)),
    }

    ExportBundle {
        filename: format!(
            "{APP_BINARY_NAME}_{}_{}.json",
            scope,
            date.format("%Y%m%d")
        ),
        document: Value::Object(doc),
    }
}

fn is_section(key: &str) -> bool {
    key == VariableKind::Input.as_str() || key == VariableKind::Output.as_str()
}

/// Parses an uploaded document for import.
///
/// Both the `input` and the `output` sections must be present.
pub fn parse_import(document: Value) -> FisResult<Catalog> {
    let Value::Object(doc) = document else {
        return Err(FisError::validation("Imported file must contain a JSON object"));
    };
    let missing: Vec<&str> = [VariableKind::Input, VariableKind::Output]
        .into_iter()
        .map(VariableKind::as_str)
        .filter(|key| !matches!(doc.get(*key), Some(Value::Object(_))))
        .collect();
    if !missing.is_empty() {
        return Err(FisError::validation(format!(
            "Imported document is missing required section(s): {}",
            missing.join(", ")
        )));
    }
    Catalog::from_document(Value::Object(doc))
}

/// Parses uploaded file content for import.
pub fn parse_import_str(content: &str) -> FisResult<Catalog> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| FisError::validation(format!("Imported file is not valid JSON: {e}")))?;
    parse_import(value)
}
