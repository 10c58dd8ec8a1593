//! Double-exponential quadrature for the intermediate frequency range.
//!
//! The Fourier integral `int_0^inf f(t) trig(omega t) dt` is substituted with
//! `omega t = (pi/h) phi(u)`, `phi(u) = u / (1 - exp(-chi(u)))`,
//! `chi(u) = 2p sinh(u) + 2q u`. For large `u` the nodes approach the zeros of
//! the trigonometric factor double-exponentially fast, so the trapezoidal sum
//! needs no explicit truncation of the oscillating tail. The nodes and weights
//! depend only on the trigonometric kind, a coarse `beta` band and the
//! refinement level; they are built once per process and shared read-only.

use std::f64::consts::PI;

use kww_core::{EvalConfig, Transform, QUADRATURE_LEVEL_LIMIT};
use once_cell::sync::{Lazy, OnceCell};

use crate::breakdown::{Breakdown, Partial};

/// Half-width of the coarsest node table.
const BASE_HALF_WIDTH: usize = 40;
/// Accuracy that fixes the step width of every table.
const NODE_ACCURACY: f64 = 2.2e-16;
/// Smallest integral magnitude the tables are sized for.
const NODE_FLOOR: f64 = 2e-20;

/// Trigonometric factor of the integrand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Cosine,
    Sine,
}

impl Kind {
    fn index(self) -> usize {
        match self {
            Kind::Cosine => 0,
            Kind::Sine => 1,
        }
    }
}

/// `beta` band selecting the substitution parameters `(p, q)`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Band {
    index: usize,
    p: f64,
    q: f64,
}

const BANDS: usize = 3;

impl Band {
    fn for_beta(beta: f64) -> Self {
        if beta < 0.15 {
            Band {
                index: 0,
                p: 1.8,
                q: 0.2,
            }
        } else if beta < 0.25 {
            Band {
                index: 1,
                p: 1.6,
                q: 0.4,
            }
        } else {
            Band {
                index: 2,
                p: 1.4,
                q: 0.6,
            }
        }
    }
}

/// Abscissae (in units of `omega t`) and weights of one trapezoidal sum.
#[derive(Debug)]
struct NodeTable {
    abscissae: Vec<f64>,
    weights: Vec<f64>,
}

impl NodeTable {
    fn build(kind: Kind, band: Band, level: usize) -> Self {
        let half = BASE_HALF_WIDTH << level;
        let n = half as f64;
        let h = ((42.0 * n / NODE_ACCURACY / NODE_FLOOR).ln() / band.p).ln() / n;
        let mut abscissae = Vec::with_capacity(2 * half + 1);
        let mut weights = Vec::with_capacity(2 * half + 1);
        // (-1)^j for j = -half
        let mut parity = if half % 2 == 0 { 1.0 } else { -1.0 };
        for j in -(half as i64)..=(half as i64) {
            let k = match kind {
                Kind::Cosine => j as f64 - 0.5,
                Kind::Sine => j as f64,
            };
            let u = k * h;
            let chi = 2.0 * band.p * u.sinh() + 2.0 * band.q * u;
            let dchi = 2.0 * band.p * u.cosh() + 2.0 * band.q;
            let (abscissa, weight) = if u == 0.0 {
                // removable singularity of phi at the origin
                let a = PI / h / dchi;
                (a, 0.5 * a.sin())
            } else {
                let e = (-chi).exp();
                let one_minus_e = -(-chi).exp_m1();
                let a = PI / h * u / one_minus_e;
                let dphi = 1.0 / one_minus_e - u * e * dchi / (one_minus_e * one_minus_e);
                let trig = if e > 1.0 {
                    match kind {
                        Kind::Cosine => (PI * k / one_minus_e).cos(),
                        Kind::Sine => (PI * k / one_minus_e).sin(),
                    }
                } else {
                    // shift by the integer (or half-integer) multiple of pi
                    parity * (PI * k * e / one_minus_e).sin()
                };
                (a, dphi * trig)
            };
            abscissae.push(abscissa);
            weights.push(weight);
            parity = -parity;
        }
        tracing::debug!(
            kind = ?kind,
            band = band.index,
            level,
            nodes = abscissae.len(),
            "built quadrature node table"
        );
        Self { abscissae, weights }
    }
}

static TABLES: Lazy<Vec<OnceCell<NodeTable>>> = Lazy::new(|| {
    (0..2 * BANDS * QUADRATURE_LEVEL_LIMIT)
        .map(|_| OnceCell::new())
        .collect()
});

fn table(kind: Kind, band: Band, level: usize) -> &'static NodeTable {
    let slot = (kind.index() * BANDS + band.index) * QUADRATURE_LEVEL_LIMIT + level;
    TABLES[slot].get_or_init(|| NodeTable::build(kind, band, level))
}

/// Evaluates `transform` by successive refinement of the trapezoidal sum.
///
/// Accepts the result once two consecutive levels agree to the tolerance.
/// Refuses it when the absolute-value sum shows the digits were lost to
/// cancellation, which happens at frequencies far below the oscillation
/// scale of the integrand.
pub(crate) fn integrate(
    transform: Transform,
    beta: f64,
    omega: f64,
    config: &EvalConfig,
) -> Result<Partial, Breakdown> {
    let (kind, divide_by_t) = match transform {
        Transform::Cosine => (Kind::Cosine, false),
        Transform::Sine => (Kind::Sine, false),
        Transform::Primitive => (Kind::Sine, true),
    };
    let band = Band::for_beta(beta);
    let levels = config.max_quadrature_levels.min(QUADRATURE_LEVEL_LIMIT);

    let mut previous = 0.0_f64;
    let mut nodes = 0;
    for level in 0..levels {
        let table = table(kind, band, level);
        let mut sum = 0.0_f64;
        let mut abs_sum = 0.0;
        for (&abscissa, &weight) in table.abscissae.iter().zip(&table.weights) {
            let t = abscissa / omega;
            let mut f = (-t.powf(beta)).exp();
            if divide_by_t {
                f /= t;
            }
            let contribution = weight * f;
            sum += contribution;
            abs_sum += contribution.abs();
        }
        nodes += table.abscissae.len();
        tracing::trace!(level, sum, abs_sum, "quadrature refinement");

        if sum < 0.0 {
            return Err(Breakdown::NegativeSum);
        }
        if config.noise_floor * abs_sum > config.tolerance * sum {
            return Err(Breakdown::Cancellation);
        }
        if level > 0
            && (sum - previous).abs() + config.noise_floor * abs_sum < config.tolerance * sum
        {
            return Ok(Partial::converged(sum * PI / omega, nodes));
        }
        previous = sum;
    }
    Err(Breakdown::NotConverged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debye_cosine_transform_matches_lorentzian() {
        let config = EvalConfig::default();
        for omega in [0.3, 1.0, 4.0] {
            let partial = integrate(Transform::Cosine, 1.0, omega, &config).unwrap();
            let exact = 1.0 / (1.0 + omega * omega);
            assert!(((partial.value - exact) / exact).abs() < 1e-11, "omega={omega}");
        }
    }

    #[test]
    fn tables_are_shared_between_calls() {
        let band = Band::for_beta(0.5);
        let first = table(Kind::Sine, band, 0) as *const NodeTable;
        let second = table(Kind::Sine, band, 0) as *const NodeTable;
        assert_eq!(first, second);
        assert_eq!(table(Kind::Sine, band, 1).abscissae.len(), 4 * BASE_HALF_WIDTH + 1);
    }

    #[test]
    fn sine_table_has_finite_nodes() {
        let table = table(Kind::Sine, Band::for_beta(0.1), 2);
        assert!(table.abscissae.iter().all(|a| a.is_finite() && *a > 0.0));
        assert!(table.weights.iter().all(|w| w.is_finite()));
    }
}
