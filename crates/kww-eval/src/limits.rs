//! Switch-points between the low-series, quadrature and high-series regimes.
//!
//! Each switch-point is an empirical fit, as a function of `beta`, to the
//! frequency up to which (low) or from which (high) the series still reaches
//! full accuracy for the given transform. Below `low` the moment series is
//! tried first; above `high` the inverse-power series is; in between the
//! quadrature runs directly.

use kww_core::{ShapeExponent, Transform};
use serde::{Deserialize, Serialize};

/// Pivot of the piecewise high-frequency fits.
const HIGH_PIVOT: f64 = 0.82;

/// Frequencies bounding the series regimes for one transform and exponent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwitchPoints {
    /// Largest frequency handed to the low-frequency series.
    pub low: f64,
    /// Smallest frequency handed to the high-frequency series.
    pub high: f64,
}

impl SwitchPoints {
    /// Returns the switch-points of `transform` at exponent `beta`.
    pub fn of(transform: Transform, beta: ShapeExponent) -> Self {
        let b = beta.get();
        Self {
            low: low_limit(transform, b),
            high: high_limit(transform, b),
        }
    }
}

/// Convenience wrapper over [`SwitchPoints::of`].
pub fn switch_points(transform: Transform, beta: ShapeExponent) -> SwitchPoints {
    SwitchPoints::of(transform, beta)
}

fn low_limit(transform: Transform, b: f64) -> f64 {
    let inv = 1.0 / b;
    let exponent = match transform {
        Transform::Cosine => {
            -0.02194 * inv * inv - 4.130 * inv + 2.966189 + 0.030104 * b + 1.062 * b * b
        }
        Transform::Sine => {
            -0.03208 * inv * inv - 4.314 * inv + 3.516200 - 0.50287 * b + 1.240 * b * b
        }
        Transform::Primitive => {
            -0.02259971 * inv * inv - 4.099837 * inv + 3.100445 - 0.1838126 * b
                + 1.118149 * b * b
        }
    };
    exponent.exp()
}

fn high_limit(transform: Transform, b: f64) -> f64 {
    if b < HIGH_PIVOT {
        let inv = 1.0 / b;
        let exponent = match transform {
            Transform::Cosine => {
                0.006923209 * inv * inv - 1.321692 * inv - 1.44582 + 2.516339 * b
                    + 0.2973773 * b * b
            }
            Transform::Sine => {
                0.07847516 * inv * inv - 2.585876 * inv + 4.999414 - 8.460926 * b
                    + 6.289183 * b * b
            }
            Transform::Primitive => {
                0.003809101 * inv * inv - 1.955504 * inv - 1.938468 + 5.893199 * b
                    - 2.197289 * b * b
            }
        };
        exponent.exp()
    } else {
        let d = b - HIGH_PIVOT;
        let (c0, c1, c2, c3) = match transform {
            Transform::Cosine => (-0.746496154631, 6.057558, -3.41052, 0.7932314),
            Transform::Sine => (-0.962597724393, 5.818057, -3.026212, 0.5485754),
            Transform::Primitive => (-0.962597724393, 7.074977, -5.231151, 1.717068),
        };
        (c0 + d * (c1 + d * (c2 + d * c3))).exp()
    }
}
