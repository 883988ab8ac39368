//! Mamdani inference engine.
//!
//! Inference runs in three stages over an immutable [`Catalog`]:
//!
//! 1. [`fuzzify`] maps crisp inputs to term degrees.
//! 2. [`evaluate_rules`] fires every rule with the min t-norm.
//! 3. [`resolve`] aggregates the fired consequents per output variable and
//!    reduces them to a crisp value or a class label.
//!
//! The engine never mutates the catalog and never touches storage.

pub mod fuzzify;
pub mod membership;
pub mod resolve;
pub mod rules;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{
    DEFAULT_AGGREGATE_RESOLUTION, DEFAULT_FUZZIFY_RESOLUTION, OPEN_TAIL_POLICY,
};
use crate::error::{FisError, FisResult};
use crate::models::{Catalog, OpenTail, Variable};

pub use fuzzify::{fuzzify, fuzzify_variable, Fuzzified};
pub use resolve::{defuzzify, resolve, OutputValue};
pub use rules::{evaluate_rules, RuleOutput};

/// Numeric knobs of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Grid points used to sample input terms.
    pub fuzzify_resolution: usize,
    /// Grid points of the aggregated output curve.
    pub aggregate_resolution: usize,
    /// Evaluate input terms in closed form instead of interpolating samples.
    pub exact_fuzzification: bool,
    /// Treatment of the open side of `*-open` terms.
    pub open_tail: OpenTail,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            fuzzify_resolution: DEFAULT_FUZZIFY_RESOLUTION,
            aggregate_resolution: DEFAULT_AGGREGATE_RESOLUTION,
            exact_fuzzification: false,
            open_tail: OPEN_TAIL_POLICY,
        }
    }
}

/// Crisp input values keyed by input variable name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InferenceRequest {
    /// Values; variables without a value are skipped during fuzzification.
    pub inputs: BTreeMap<String, f64>,
}

impl InferenceRequest {
    /// Creates a request from `(variable, value)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            inputs: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Full trace of one inference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceResponse {
    /// Echo of the crisp inputs.
    pub inputs: BTreeMap<String, f64>,
    /// Term degrees of every supplied input variable.
    pub fuzzified: Fuzzified,
    /// Firing strength of every rule.
    pub rule_outputs: Vec<RuleOutput>,
    /// Crisp value or label per output variable.
    pub results: BTreeMap<String, OutputValue>,
}

/// Runs one inference over `catalog`.
pub fn infer(
    catalog: &Catalog,
    request: &InferenceRequest,
    settings: &EngineSettings,
) -> FisResult<InferenceResponse> {
    if let Some((name, value)) = request.inputs.iter().find(|(_, v)| !v.is_finite()) {
        return Err(FisError::validation(format!(
            "Input '{name}' must be a finite number, got {value}"
        )));
    }

    let fuzzified = fuzzify(catalog, &request.inputs, settings);
    let rule_outputs = evaluate_rules(&catalog.rules, &fuzzified);
    let results = resolve(catalog, &rule_outputs, settings);

    debug!(
        "Inference over {} inputs fired {} of {} rules",
        fuzzified.len(),
        rule_outputs.iter().filter(|r| r.activation > 0.0).count(),
        rule_outputs.len()
    );

    Ok(InferenceResponse {
        inputs: request.inputs.clone(),
        fuzzified,
        rule_outputs,
        results,
    })
}

/// Sampled shape of one term, for plotting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MembershipCurve {
    /// Term name.
    pub term_name: String,
    /// Grid over the variable's domain.
    pub x: Vec<f64>,
    /// Degree at each grid point.
    pub y: Vec<f64>,
}

/// Samples every term of `variable` on the fuzzification grid.
///
/// Classification terms have no shape and are reported with an all-zero curve.
#[must_use]
pub fn membership_curves(variable: &Variable, settings: &EngineSettings) -> Vec<MembershipCurve> {
    let domain = variable.domain;
    let xs = membership::linspace(domain.min, domain.max, settings.fuzzify_resolution);
    variable
        .terms
        .iter()
        .map(|term| MembershipCurve {
            term_name: term.name.clone(),
            y: membership::sample(&term.function, &xs, domain, settings.open_tail),
            x: xs.clone(),
        })
        .collect()
}
