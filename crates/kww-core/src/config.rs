//! Tolerances and iteration caps governing an evaluation.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, KwwError};

/// Largest number of quadrature refinement levels backed by node tables.
pub const QUADRATURE_LEVEL_LIMIT: usize = 12;

fn config_error(code: &str, message: impl Into<String>) -> KwwError {
    KwwError::Config(ErrorInfo::new(code, message))
}

fn default_tolerance() -> f64 {
    1e-12
}

fn default_noise_floor() -> f64 {
    f64::EPSILON
}

fn default_max_series_terms() -> usize {
    200
}

fn default_max_quadrature_levels() -> usize {
    QUADRATURE_LEVEL_LIMIT
}

/// Accuracy targets and caps shared by all three regimes.
///
/// `tolerance` is the relative accuracy a partial result must reach before it
/// is accepted. `noise_floor` models the rounding error carried by every
/// summed term: a sum whose absolute-value total times `noise_floor` exceeds
/// `tolerance` times its value has lost too many digits to cancellation and is
/// rejected. The switch-points between regimes are tuned for the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Relative accuracy target for series truncation and quadrature refinement.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Relative rounding error attributed to each summed term.
    #[serde(default = "default_noise_floor")]
    pub noise_floor: f64,
    /// Maximum number of terms summed by either series.
    #[serde(default = "default_max_series_terms")]
    pub max_series_terms: usize,
    /// Maximum number of quadrature refinement levels (node count doubles per level).
    #[serde(default = "default_max_quadrature_levels")]
    pub max_quadrature_levels: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            noise_floor: default_noise_floor(),
            max_series_terms: default_max_series_terms(),
            max_quadrature_levels: default_max_quadrature_levels(),
        }
    }
}

impl EvalConfig {
    /// Checks that the configuration describes a terminating, meaningful evaluation.
    pub fn validate(&self) -> Result<(), KwwError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(config_error(
                "invalid-tolerance",
                format!("tolerance must lie in (0, 1), got {}", self.tolerance),
            ));
        }
        if !(self.noise_floor.is_finite() && self.noise_floor > 0.0) {
            return Err(config_error(
                "invalid-noise-floor",
                format!("noise floor must be positive, got {}", self.noise_floor),
            ));
        }
        if self.noise_floor >= self.tolerance {
            return Err(config_error(
                "noise-above-tolerance",
                "noise floor must be smaller than the tolerance",
            ));
        }
        if self.max_series_terms < 2 {
            return Err(config_error(
                "invalid-series-cap",
                "series need at least two terms to test convergence",
            ));
        }
        if self.max_quadrature_levels < 2 || self.max_quadrature_levels > QUADRATURE_LEVEL_LIMIT {
            return Err(config_error(
                "invalid-quadrature-cap",
                format!(
                    "quadrature levels must lie in [2, {QUADRATURE_LEVEL_LIMIT}], got {}",
                    self.max_quadrature_levels
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        EvalConfig::default().validate().unwrap();
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: EvalConfig = serde_json::from_str(r#"{"tolerance":1e-10}"#).unwrap();
        assert_eq!(config.tolerance, 1e-10);
        assert_eq!(config.max_series_terms, 200);
        assert_eq!(config.max_quadrature_levels, QUADRATURE_LEVEL_LIMIT);
    }

    #[test]
    fn rejects_excess_levels() {
        let config = EvalConfig {
            max_quadrature_levels: QUADRATURE_LEVEL_LIMIT + 1,
            ..EvalConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
