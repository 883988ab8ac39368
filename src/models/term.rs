//! Linguistic terms and their membership-function shapes.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FisError, FisResult};
use crate::models::Domain;

/// Membership-function family tag, as stored in the `function_type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionType {
    /// Piecewise-linear peak over `a <= b <= c`.
    #[serde(rename = "triangular")]
    Triangular,
    /// Piecewise-linear plateau over `a <= b <= c <= d`.
    #[serde(rename = "trapezoidal")]
    Trapezoidal,
    /// Bell curve around `mean` with spread `sigma`.
    #[serde(rename = "gaussian")]
    Gaussian,
    /// Triangular ramp with one side collapsed onto an outer vertex.
    #[serde(rename = "triangular-open")]
    TriangularOpen,
    /// Trapezoidal ramp with one side collapsed onto an outer vertex.
    #[serde(rename = "trapezoidal-open")]
    TrapezoidalOpen,
    /// Gaussian with a recorded open side.
    #[serde(rename = "gaussian-open")]
    GaussianOpen,
    /// Class label without numeric parameters.
    #[serde(rename = "classification")]
    Classification,
}

impl FunctionType {
    /// Every function type, in display order.
    pub const ALL: [Self; 7] = [
        Self::Triangular,
        Self::Trapezoidal,
        Self::Gaussian,
        Self::TriangularOpen,
        Self::TrapezoidalOpen,
        Self::GaussianOpen,
        Self::Classification,
    ];

    /// Wire name of this function type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Triangular => "triangular",
            Self::Trapezoidal => "trapezoidal",
            Self::Gaussian => "gaussian",
            Self::TriangularOpen => "triangular-open",
            Self::TrapezoidalOpen => "trapezoidal-open",
            Self::GaussianOpen => "gaussian-open",
            Self::Classification => "classification",
        }
    }

    /// Whether this is one of the `*-open` families.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(
            self,
            Self::TriangularOpen | Self::TrapezoidalOpen | Self::GaussianOpen
        )
    }

    /// Parameter keys required by this family.
    #[must_use]
    pub const fn required_params(self) -> &'static [&'static str] {
        match self {
            Self::Triangular | Self::TriangularOpen => &["a", "b", "c"],
            Self::Trapezoidal | Self::TrapezoidalOpen => &["a", "b", "c", "d"],
            Self::Gaussian | Self::GaussianOpen => &["mean", "sigma"],
            Self::Classification => &[],
        }
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FunctionType {
    type Err = FisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ft| ft.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FisError::validation(format!("Unknown function type '{s}'")))
    }
}

/// Which side of an open membership function is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenSide {
    /// Ramp starts at the left vertex.
    Left,
    /// Ramp ends at the right vertex.
    Right,
}

impl fmt::Display for OpenSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

impl FromStr for OpenSide {
    type Err = FisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(FisError::validation(format!(
                "Unknown open type '{other}' (expected left or right)"
            ))),
        }
    }
}

/// Treatment of the open side of `*-open` membership functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenTail {
    /// Zero outside the term's own support, like the closed families.
    #[default]
    Truncate,
    /// Hold at 1 from the collapsed vertex out to the domain boundary.
    Shoulder,
}

/// Defuzzification method of a numeric output variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefuzzMethod {
    /// Center of gravity of the aggregated curve.
    #[default]
    Centroid,
    /// Point splitting the area under the curve in half.
    Bisector,
    /// Mean of the points where the curve is maximal.
    Mom,
    /// Smallest point where the curve is maximal.
    Som,
    /// Largest point where the curve is maximal.
    Lom,
}

impl DefuzzMethod {
    /// Wire name of this method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Centroid => "centroid",
            Self::Bisector => "bisector",
            Self::Mom => "mom",
            Self::Som => "som",
            Self::Lom => "lom",
        }
    }
}

impl fmt::Display for DefuzzMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DefuzzMethod {
    type Err = FisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "centroid" => Ok(Self::Centroid),
            "bisector" => Ok(Self::Bisector),
            "mom" => Ok(Self::Mom),
            "som" => Ok(Self::Som),
            "lom" => Ok(Self::Lom),
            other => Err(FisError::validation(format!(
                "Unknown defuzzification method '{other}'"
            ))),
        }
    }
}

/// Shape of a term, carrying exactly the parameters its family needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MembershipFunction {
    /// Triangle with feet at `a`, `c` and peak at `b`.
    Triangular {
        /// Left foot.
        a: f64,
        /// Peak.
        b: f64,
        /// Right foot.
        c: f64,
    },
    /// Trapezoid with feet at `a`, `d` and plateau over `[b, c]`.
    Trapezoidal {
        /// Left foot.
        a: f64,
        /// Plateau start.
        b: f64,
        /// Plateau end.
        c: f64,
        /// Right foot.
        d: f64,
    },
    /// Gaussian bell.
    Gaussian {
        /// Center of the bell.
        mean: f64,
        /// Standard deviation, strictly positive.
        sigma: f64,
    },
    /// Triangle with one interior vertex collapsed onto an outer one.
    TriangularOpen {
        /// Left foot.
        a: f64,
        /// Peak.
        b: f64,
        /// Right foot.
        c: f64,
        /// Open side.
        side: OpenSide,
    },
    /// Trapezoid with one interior vertex collapsed onto an outer one.
    TrapezoidalOpen {
        /// Left foot.
        a: f64,
        /// Plateau start.
        b: f64,
        /// Plateau end.
        c: f64,
        /// Right foot.
        d: f64,
        /// Open side.
        side: OpenSide,
    },
    /// Gaussian bell with a recorded open side.
    GaussianOpen {
        /// Center of the bell.
        mean: f64,
        /// Standard deviation, strictly positive.
        sigma: f64,
        /// Open side.
        side: OpenSide,
    },
    /// Class label; no numeric shape.
    Classification,
}

impl MembershipFunction {
    /// Builds a shape from the loosely-typed record fields.
    ///
    /// Open families get their open side collapsed: triangular left sets
    /// `b = a`, right sets `b = c`; trapezoidal left sets `b = a`, right sets
    /// `c = d`.
    pub fn from_params(
        function_type: FunctionType,
        params: &BTreeMap<String, f64>,
        open_type: Option<OpenSide>,
    ) -> FisResult<Self> {
        let get = |key: &str| -> FisResult<f64> {
            let value = params.get(key).copied().ok_or_else(|| {
                FisError::validation(format!(
                    "Missing parameter '{key}' for {function_type} function"
                ))
            })?;
            if value.is_finite() {
                Ok(value)
            } else {
                Err(FisError::validation(format!(
                    "Parameter '{key}' must be a finite number"
                )))
            }
        };
        let side = || {
            open_type.ok_or_else(|| {
                FisError::validation(format!(
                    "{function_type} function requires an open_type (left or right)"
                ))
            })
        };

        let shape = match function_type {
            FunctionType::Triangular => Self::Triangular {
                a: get("a")?,
                b: get("b")?,
                c: get("c")?,
            },
            FunctionType::Trapezoidal => Self::Trapezoidal {
                a: get("a")?,
                b: get("b")?,
                c: get("c")?,
                d: get("d")?,
            },
            FunctionType::Gaussian => Self::Gaussian {
                mean: get("mean")?,
                sigma: get("sigma")?,
            },
            FunctionType::TriangularOpen => {
                let (a, c, side) = (get("a")?, get("c")?, side()?);
                let b = match side {
                    OpenSide::Left => a,
                    OpenSide::Right => c,
                };
                Self::TriangularOpen { a, b, c, side }
            }
            FunctionType::TrapezoidalOpen => {
                let (a, mut b, mut c, d, side) =
                    (get("a")?, get("b")?, get("c")?, get("d")?, side()?);
                match side {
                    OpenSide::Left => b = a,
                    OpenSide::Right => c = d,
                }
                Self::TrapezoidalOpen { a, b, c, d, side }
            }
            FunctionType::GaussianOpen => Self::GaussianOpen {
                mean: get("mean")?,
                sigma: get("sigma")?,
                side: side()?,
            },
            FunctionType::Classification => Self::Classification,
        };

        Ok(shape)
    }

    /// Family tag of this shape.
    #[must_use]
    pub const fn function_type(&self) -> FunctionType {
        match self {
            Self::Triangular { .. } => FunctionType::Triangular,
            Self::Trapezoidal { .. } => FunctionType::Trapezoidal,
            Self::Gaussian { .. } => FunctionType::Gaussian,
            Self::TriangularOpen { .. } => FunctionType::TriangularOpen,
            Self::TrapezoidalOpen { .. } => FunctionType::TrapezoidalOpen,
            Self::GaussianOpen { .. } => FunctionType::GaussianOpen,
            Self::Classification => FunctionType::Classification,
        }
    }

    /// Open side, for the open families.
    #[must_use]
    pub const fn open_side(&self) -> Option<OpenSide> {
        match self {
            Self::TriangularOpen { side, .. }
            | Self::TrapezoidalOpen { side, .. }
            | Self::GaussianOpen { side, .. } => Some(*side),
            _ => None,
        }
    }

    /// Whether this shape is a class label.
    #[must_use]
    pub const fn is_classification(&self) -> bool {
        matches!(self, Self::Classification)
    }

    /// Numeric parameters as stored in the document `params` map.
    #[must_use]
    pub fn params(&self) -> BTreeMap<String, f64> {
        let pairs: Vec<(&str, f64)> = match *self {
            Self::Triangular { a, b, c } | Self::TriangularOpen { a, b, c, .. } => {
                vec![("a", a), ("b", b), ("c", c)]
            }
            Self::Trapezoidal { a, b, c, d } | Self::TrapezoidalOpen { a, b, c, d, .. } => {
                vec![("a", a), ("b", b), ("c", c), ("d", d)]
            }
            Self::Gaussian { mean, sigma } | Self::GaussianOpen { mean, sigma, .. } => {
                vec![("mean", mean), ("sigma", sigma)]
            }
            Self::Classification => Vec::new(),
        };
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    /// Checks vertex ordering, domain containment and sigma positivity.
    pub fn validate(&self, domain: Domain) -> FisResult<()> {
        let within = |name: &str, value: f64| -> FisResult<()> {
            if domain.contains(value) {
                Ok(())
            } else {
                Err(FisError::validation(format!(
                    "Parameter '{name}' = {value} lies outside the domain {domain}"
                )))
            }
        };

        match *self {
            Self::Triangular { a, b, c } | Self::TriangularOpen { a, b, c, .. } => {
                if !(a <= b && b <= c) {
                    return Err(FisError::validation(
                        "Invalid parameters: a <= b <= c required",
                    ));
                }
                within("a", a)?;
                within("b", b)?;
                within("c", c)
            }
            Self::Trapezoidal { a, b, c, d } | Self::TrapezoidalOpen { a, b, c, d, .. } => {
                if !(a <= b && b <= c && c <= d) {
                    return Err(FisError::validation(
                        "Invalid parameters: a <= b <= c <= d required",
                    ));
                }
                within("a", a)?;
                within("b", b)?;
                within("c", c)?;
                within("d", d)
            }
            Self::Gaussian { mean, sigma } | Self::GaussianOpen { mean, sigma, .. } => {
                if sigma <= 0.0 {
                    return Err(FisError::validation("Sigma must be positive"));
                }
                within("mean", mean)
            }
            Self::Classification => Ok(()),
        }
    }
}

/// A named membership function attached to a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    /// Term name, unique within its variable.
    pub name: String,
    /// Shape of the membership function.
    pub function: MembershipFunction,
    /// Defuzzification method, meaningful on output terms only.
    pub defuzzify: Option<DefuzzMethod>,
}

impl Term {
    /// Creates a term without a defuzzification method.
    pub fn new(name: impl Into<String>, function: MembershipFunction) -> Self {
        Self {
            name: name.into(),
            function,
            defuzzify: None,
        }
    }

    /// Sets the defuzzification method.
    #[must_use]
    pub fn with_defuzzify(mut self, method: DefuzzMethod) -> Self {
        self.defuzzify = Some(method);
        self
    }
}
