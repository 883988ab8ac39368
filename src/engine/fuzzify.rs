//! Crisp input to membership degrees.

use std::collections::BTreeMap;

use tracing::debug;

use super::membership::{evaluate, interp, linspace, sample};
use super::EngineSettings;
use crate::models::{Catalog, Variable, VariableKind};

/// Membership degrees keyed by input variable, then by term.
pub type Fuzzified = BTreeMap<String, BTreeMap<String, f64>>;

/// Degree of each term of `variable` at `x`.
///
/// By default every term is sampled on a grid over the domain and `x` is
/// interpolated against the samples, clamping outside the domain. With
/// `exact_fuzzification` the closed form is evaluated at `x` clamped into the
/// domain. A zero-width domain is always evaluated directly.
#[must_use]
pub fn fuzzify_variable(
    variable: &Variable,
    x: f64,
    settings: &EngineSettings,
) -> BTreeMap<String, f64> {
    let domain = variable.domain;
    let direct = settings.exact_fuzzification || domain.width() == 0.0;
    let grid = if direct {
        Vec::new()
    } else {
        linspace(domain.min, domain.max, settings.fuzzify_resolution)
    };

    variable
        .terms
        .iter()
        .map(|term| {
            let degree = if direct {
                let clamped = x.clamp(domain.min, domain.max);
                evaluate(&term.function, clamped, domain, settings.open_tail)
            } else {
                let samples = sample(&term.function, &grid, domain, settings.open_tail);
                interp(x, &grid, &samples)
            };
            (term.name.clone(), degree)
        })
        .collect()
}

/// Fuzzifies every input variable that has a value in `inputs`.
///
/// Values for unknown variables are ignored; variables without a value are
/// absent from the result.
#[must_use]
pub fn fuzzify(
    catalog: &Catalog,
    inputs: &BTreeMap<String, f64>,
    settings: &EngineSettings,
) -> Fuzzified {
    for name in inputs.keys() {
        if catalog.variable(VariableKind::Input, name).is_none() {
            debug!("Ignoring value for unknown input variable '{}'", name);
        }
    }

    catalog
        .variables_of(VariableKind::Input)
        .filter_map(|variable| {
            inputs
                .get(&variable.name)
                .map(|&x| (variable.name.clone(), fuzzify_variable(variable, x, settings)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Domain, MembershipFunction, Term};

    fn temp() -> Variable {
        let mut v = Variable::new(VariableKind::Input, "Temp", Domain::new(0.0, 100.0));
        v.terms.push(Term::new(
            "Cold",
            MembershipFunction::Triangular {
                a: 0.0,
                b: 0.0,
                c: 50.0,
            },
        ));
        v.terms.push(Term::new(
            "Hot",
            MembershipFunction::Triangular {
                a: 50.0,
                b: 100.0,
                c: 100.0,
            },
        ));
        v
    }

    #[test]
    fn test_fuzzify_interpolates() {
        let degrees = fuzzify_variable(&temp(), 75.0, &EngineSettings::default());
        assert!(degrees["Cold"].abs() < 1e-9);
        assert!((degrees["Hot"] - 0.5).abs() < 0.02);
    }

    #[test]
    fn test_fuzzify_clamps_outside_domain() {
        let degrees = fuzzify_variable(&temp(), 150.0, &EngineSettings::default());
        assert!((degrees["Hot"] - 1.0).abs() < 1e-9);
        let degrees = fuzzify_variable(&temp(), -10.0, &EngineSettings::default());
        assert!((degrees["Cold"] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_exact_mode_matches_formula() {
        let settings = EngineSettings {
            exact_fuzzification: true,
            ..EngineSettings::default()
        };
        let degrees = fuzzify_variable(&temp(), 75.0, &settings);
        assert_eq!(degrees["Hot"], 0.5);
    }

    #[test]
    fn test_zero_width_domain() {
        let mut v = Variable::new(VariableKind::Input, "Fixed", Domain::new(5.0, 5.0));
        v.terms.push(Term::new(
            "Only",
            MembershipFunction::Triangular {
                a: 5.0,
                b: 5.0,
                c: 5.0,
            },
        ));
        let degrees = fuzzify_variable(&v, 5.0, &EngineSettings::default());
        assert_eq!(degrees["Only"], 1.0);
    }

    #[test]
    fn test_fuzzify_only_supplied_inputs() {
        let mut catalog = Catalog::new();
        catalog.variables.push(temp());
        catalog.variables.push(Variable::new(
            VariableKind::Input,
            "Humidity",
            Domain::new(0.0, 100.0),
        ));

        let inputs = BTreeMap::from([("Temp".to_string(), 20.0), ("Wind".to_string(), 3.0)]);
        let result = fuzzify(&catalog, &inputs, &EngineSettings::default());
        assert_eq!(result.len(), 1);
        assert!(result.contains_key("Temp"));
    }
}
