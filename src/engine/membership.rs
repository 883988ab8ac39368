//! Membership function library.
//!
//! Pure evaluators `μ(x) -> [0, 1]` for the triangular, trapezoidal and
//! Gaussian families plus grid helpers. The piecewise-linear families follow
//! the usual conventions for degenerate vertices: when two vertices coincide
//! the shared vertex evaluates to 1 and no ramp is drawn between them.

use crate::models::{Domain, MembershipFunction, OpenSide, OpenTail};

/// Triangular membership with feet `a`, `c` and peak `b`.
#[must_use]
pub fn trimf(x: f64, a: f64, b: f64, c: f64) -> f64 {
    if x == b {
        1.0
    } else if a != b && a < x && x < b {
        (x - a) / (b - a)
    } else if b != c && b < x && x < c {
        (c - x) / (c - b)
    } else {
        0.0
    }
}

/// Trapezoidal membership with feet `a`, `d` and plateau `[b, c]`.
#[must_use]
pub fn trapmf(x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    if x < a || x > d {
        0.0
    } else if x <= b {
        trimf(x, a, b, b)
    } else if x >= c {
        trimf(x, c, c, d)
    } else {
        1.0
    }
}

/// Gaussian membership centered on `mean` with spread `sigma`.
#[must_use]
pub fn gaussmf(x: f64, mean: f64, sigma: f64) -> f64 {
    (-((x - mean).powi(2)) / (2.0 * sigma.powi(2))).exp()
}

/// `n` evenly spaced points from `min` to `max`, both included.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn linspace(min: f64, max: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { max } else { min + step * i as f64 })
                .collect()
        }
    }
}

/// Linear interpolation of `x` against the sampled curve `(xp, fp)`.
///
/// `xp` must be non-decreasing. Values left of the grid take `fp[0]`,
/// values right of it take the last sample.
#[must_use]
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let (Some(&first), Some(&last)) = (xp.first(), xp.last()) else {
        return 0.0;
    };
    if x <= first {
        return fp[0];
    }
    if x >= last {
        return fp[fp.len() - 1];
    }

    // First index whose grid point is strictly greater than x
    let upper = xp.partition_point(|&p| p <= x);
    let lower = upper - 1;
    let dx = xp[upper] - xp[lower];
    if dx == 0.0 {
        return fp[lower];
    }
    let t = (x - xp[lower]) / dx;
    fp[lower] + t * (fp[upper] - fp[lower])
}

fn shoulder(x: f64, side: OpenSide, left_vertex: f64, right_vertex: f64) -> bool {
    match side {
        OpenSide::Left => x <= left_vertex,
        OpenSide::Right => x >= right_vertex,
    }
}

/// Evaluates a term's shape at `x`.
///
/// The open families are zero outside `domain`. Under
/// [`OpenTail::Truncate`] they are otherwise the closed formula (so also zero
/// outside their own support); under [`OpenTail::Shoulder`] the open side
/// holds at 1 out to the domain boundary. Classification terms have no curve
/// and evaluate to 0.
#[must_use]
pub fn evaluate(function: &MembershipFunction, x: f64, domain: Domain, tail: OpenTail) -> f64 {
    match *function {
        MembershipFunction::Triangular { a, b, c } => trimf(x, a, b, c),
        MembershipFunction::Trapezoidal { a, b, c, d } => trapmf(x, a, b, c, d),
        MembershipFunction::Gaussian { mean, sigma } => gaussmf(x, mean, sigma),
        MembershipFunction::TriangularOpen { a, b, c, side } => {
            if !domain.contains(x) {
                0.0
            } else if tail == OpenTail::Shoulder && shoulder(x, side, b, b) {
                1.0
            } else {
                trimf(x, a, b, c)
            }
        }
        MembershipFunction::TrapezoidalOpen { a, b, c, d, side } => {
            if !domain.contains(x) {
                0.0
            } else if tail == OpenTail::Shoulder && shoulder(x, side, b, c) {
                1.0
            } else {
                trapmf(x, a, b, c, d)
            }
        }
        MembershipFunction::GaussianOpen { mean, sigma, side } => {
            if !domain.contains(x) {
                0.0
            } else if tail == OpenTail::Shoulder && shoulder(x, side, mean, mean) {
                1.0
            } else {
                gaussmf(x, mean, sigma)
            }
        }
        MembershipFunction::Classification => 0.0,
    }
}

/// Evaluates a term's shape at every point of `xs`.
#[must_use]
pub fn sample(
    function: &MembershipFunction,
    xs: &[f64],
    domain: Domain,
    tail: OpenTail,
) -> Vec<f64> {
    xs.iter()
        .map(|&x| evaluate(function, x, domain, tail))
        .collect()
}
