//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and the default numeric settings of the
//! inference engine.

use crate::models::OpenTail;

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "FuzzyLab";

/// The binary name of the application (used in command examples, lowercase with hyphens).
pub const APP_BINARY_NAME: &str = "fuzzylab";

/// Number of grid points used to sample a term when fuzzifying a crisp input.
pub const DEFAULT_FUZZIFY_RESOLUTION: usize = 100;

/// Number of grid points used to build the aggregated output curve.
pub const DEFAULT_AGGREGATE_RESOLUTION: usize = 1000;

/// How `*-open` membership functions treat their open side.
///
/// The shipped behaviour truncates both tails to zero, exactly like the
/// closed families. `OpenTail::Shoulder` is available through the engine
/// configuration for systems that want a true one-sided plateau.
pub const OPEN_TAIL_POLICY: OpenTail = OpenTail::Truncate;

/// Default port of the HTTP API.
pub const DEFAULT_PORT: u16 = 5000;

/// Default bind address of the HTTP API.
pub const DEFAULT_HOST: &str = "127.0.0.1";
