//! Shared CLI types: error type, exit codes and argument parsers.

use std::fmt;
use std::path::Path;

use crate::error::FisError;
use crate::models::Catalog;
use crate::services::{read_catalog, write_catalog};

/// Process exit codes used by every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command completed.
    Success = 0,
    /// Invalid input, unknown reference or conflicting state.
    ValidationError = 1,
    /// File could not be read or written.
    IoError = 2,
}

/// Error reported by a CLI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    /// Exit code the process should terminate with.
    pub code: ExitCode,
    /// Message printed to stderr.
    pub message: String,
}

/// Result type of CLI commands.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Creates a validation error (exit code 1).
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::ValidationError,
            message: message.into(),
        }
    }

    /// Creates an I/O error (exit code 2).
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::IoError,
            message: message.into(),
        }
    }

    /// Numeric exit code.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.code as i32
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

impl From<FisError> for CliError {
    fn from(err: FisError) -> Self {
        match err {
            FisError::Storage(message) => Self::io(message),
            other => Self::validation(other.to_string()),
        }
    }
}

/// Loads the catalog stored in `document`.
pub fn load_document(document: &Path) -> CliResult<Catalog> {
    read_catalog(document).map_err(|e| match e {
        FisError::Storage(message) => CliError::io(format!("Failed to load document: {message}")),
        other => CliError::validation(format!("Invalid document {}: {other}", document.display())),
    })
}

/// Saves `catalog` to `document`.
pub fn save_document(document: &Path, catalog: &Catalog) -> CliResult<()> {
    write_catalog(document, catalog)
        .map_err(|e| CliError::io(format!("Failed to save document: {e}")))
}

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value)
            .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
    );
    Ok(())
}

fn split_assignment(s: &str) -> Result<(&str, &str), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing name in '{s}'"));
    }
    Ok((key, value.trim()))
}

/// Parses `NAME=VALUE` where both sides are strings.
pub fn parse_pair(s: &str) -> Result<(String, String), String> {
    let (key, value) = split_assignment(s)?;
    if value.is_empty() {
        return Err(format!("missing value in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Parses `NAME=NUMBER`.
pub fn parse_number(s: &str) -> Result<(String, f64), String> {
    let (key, value) = split_assignment(s)?;
    let number: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if !number.is_finite() {
        return Err(format!("'{value}' is not a finite number"));
    }
    Ok((key.to_string(), number))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("Temp=75").unwrap(), ("Temp".to_string(), 75.0));
        assert_eq!(parse_number(" a = -2.5 ").unwrap(), ("a".to_string(), -2.5));
        assert!(parse_number("Temp").is_err());
        assert!(parse_number("=3").is_err());
        assert!(parse_number("Temp=hot").is_err());
        assert!(parse_number("Temp=inf").is_err());
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            parse_pair("Temp=Hot").unwrap(),
            ("Temp".to_string(), "Hot".to_string())
        );
        assert!(parse_pair("Temp=").is_err());
    }

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(CliError::validation("x").exit_code(), 1);
        assert_eq!(CliError::io("x").exit_code(), 2);
        assert_eq!(
            CliError::from(FisError::Storage("disk".into())).code,
            ExitCode::IoError
        );
        assert_eq!(
            CliError::from(FisError::consistency("dup")).code,
            ExitCode::ValidationError
        );
    }
}
