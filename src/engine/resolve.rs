//! Aggregation, defuzzification and classification of rule outputs.

use std::collections::BTreeMap;

use serde::Serialize;

use super::membership::{linspace, sample};
use super::rules::RuleOutput;
use super::EngineSettings;
use crate::models::{Catalog, DefuzzMethod, Variable, VariableKind};

/// Result for one output variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutputValue {
    /// Crisp value of a numeric output.
    Crisp(f64),
    /// Winning label of a classification output, `None` when it has no terms.
    Class(Option<String>),
}

impl OutputValue {
    /// The crisp value, if this is a numeric result.
    #[must_use]
    pub fn as_crisp(&self) -> Option<f64> {
        match self {
            Self::Crisp(value) => Some(*value),
            Self::Class(_) => None,
        }
    }

    /// The label, if this is a classification result.
    #[must_use]
    pub fn as_label(&self) -> Option<&str> {
        match self {
            Self::Crisp(_) => None,
            Self::Class(label) => label.as_deref(),
        }
    }
}

/// Activation per `(output_variable, output_term)`, max-combined across rules.
#[must_use]
pub fn combine_activations(outputs: &[RuleOutput]) -> BTreeMap<(&str, &str), f64> {
    let mut combined: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    for output in outputs {
        let key = (output.output_variable.as_str(), output.output_term.as_str());
        let entry = combined.entry(key).or_insert(0.0);
        *entry = entry.max(output.activation);
    }
    combined
}

fn activation_of(combined: &BTreeMap<(&str, &str), f64>, variable: &str, term: &str) -> f64 {
    combined.get(&(variable, term)).copied().unwrap_or(0.0)
}

/// Aggregated curve of a numeric output: each term clipped at its activation,
/// then combined with max.
#[must_use]
pub fn aggregate(
    variable: &Variable,
    combined: &BTreeMap<(&str, &str), f64>,
    settings: &EngineSettings,
) -> (Vec<f64>, Vec<f64>) {
    let domain = variable.domain;
    let xs = linspace(domain.min, domain.max, settings.aggregate_resolution);
    let mut ys: Vec<f64> = vec![0.0; xs.len()];

    for term in &variable.terms {
        let level = activation_of(combined, &variable.name, &term.name);
        if level <= 0.0 {
            continue;
        }
        let curve = sample(&term.function, &xs, domain, settings.open_tail);
        for (y, mu) in ys.iter_mut().zip(curve) {
            *y = y.max(mu.min(level));
        }
    }
    (xs, ys)
}

fn trapezoid_area(xs: &[f64], ys: &[f64]) -> f64 {
    xs.windows(2)
        .zip(ys.windows(2))
        .map(|(x, y)| (x[1] - x[0]) * (y[0] + y[1]) / 2.0)
        .sum()
}

fn maxima(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let peak = ys.iter().copied().fold(0.0, f64::max);
    let tolerance = peak * 1e-9;
    xs.iter()
        .zip(ys)
        .filter(|(_, y)| peak - **y <= tolerance)
        .map(|(x, _)| *x)
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn mean_of_maxima(xs: &[f64], ys: &[f64]) -> f64 {
    let points = maxima(xs, ys);
    if points.is_empty() {
        return 0.0;
    }
    points.iter().sum::<f64>() / points.len() as f64
}

fn centroid(xs: &[f64], ys: &[f64]) -> f64 {
    let area = trapezoid_area(xs, ys);
    if area <= 0.0 {
        return mean_of_maxima(xs, ys);
    }
    let moment: f64 = xs
        .windows(2)
        .zip(ys.windows(2))
        .map(|(x, y)| (x[1] - x[0]) * (x[0] * y[0] + x[1] * y[1]) / 2.0)
        .sum();
    moment / area
}

fn bisector(xs: &[f64], ys: &[f64]) -> f64 {
    let area = trapezoid_area(xs, ys);
    if area <= 0.0 {
        return mean_of_maxima(xs, ys);
    }
    let half = area / 2.0;
    let mut accumulated = 0.0;
    for (x, y) in xs.windows(2).zip(ys.windows(2)) {
        let segment = (x[1] - x[0]) * (y[0] + y[1]) / 2.0;
        if accumulated + segment >= half {
            if segment <= 0.0 {
                return x[0];
            }
            return x[0] + (half - accumulated) / segment * (x[1] - x[0]);
        }
        accumulated += segment;
    }
    xs.last().copied().unwrap_or(0.0)
}

/// Reduces an aggregated curve to one crisp value.
///
/// An all-zero curve yields 0.
#[must_use]
pub fn defuzzify(xs: &[f64], ys: &[f64], method: DefuzzMethod) -> f64 {
    if xs.is_empty() || ys.iter().all(|y| *y <= 0.0) {
        return 0.0;
    }
    match method {
        DefuzzMethod::Centroid => centroid(xs, ys),
        DefuzzMethod::Bisector => bisector(xs, ys),
        DefuzzMethod::Mom => mean_of_maxima(xs, ys),
        DefuzzMethod::Som => maxima(xs, ys).first().copied().unwrap_or(0.0),
        DefuzzMethod::Lom => maxima(xs, ys).last().copied().unwrap_or(0.0),
    }
}

/// Label with the highest activation; the earliest term wins ties.
#[must_use]
pub fn classify(variable: &Variable, combined: &BTreeMap<(&str, &str), f64>) -> Option<String> {
    let mut best: Option<(&str, f64)> = None;
    for term in &variable.terms {
        let level = activation_of(combined, &variable.name, &term.name);
        if best.is_none_or(|(_, top)| level > top) {
            best = Some((term.name.as_str(), level));
        }
    }
    best.map(|(name, _)| name.to_string())
}

/// Resolves every output variable of the catalog.
///
/// An output variable without terms has nothing to fire and resolves to 0.
#[must_use]
pub fn resolve(
    catalog: &Catalog,
    outputs: &[RuleOutput],
    settings: &EngineSettings,
) -> BTreeMap<String, OutputValue> {
    let combined = combine_activations(outputs);

    catalog
        .variables_of(VariableKind::Output)
        .map(|variable| {
            let value = if variable.terms.is_empty() {
                OutputValue::Crisp(0.0)
            } else if variable.is_classification() {
                OutputValue::Class(classify(variable, &combined))
            } else {
                let (xs, ys) = aggregate(variable, &combined, settings);
                OutputValue::Crisp(defuzzify(&xs, &ys, variable.defuzz_method()))
            };
            (variable.name.clone(), value)
        })
        .collect()
}
