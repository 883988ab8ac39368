//! FuzzyLab Library
//!
//! This library provides the core of FuzzyLab: the catalog of fuzzy
//! variables, terms and rules, its JSON document format, the Mamdani
//! inference engine, and the services shared by the CLI and the web API.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod models;
pub mod services;

/// JSON API over session documents.
#[cfg(feature = "web")]
pub mod web;
