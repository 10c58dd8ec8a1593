//! Input validation for the shape exponent and reduced frequency.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, KwwError};

/// Number of ulps above one that are still accepted and clamped onto `beta = 1`.
pub const BETA_CLAMP_ULPS: f64 = 4.0;

fn domain_error(code: &str, message: impl Into<String>) -> KwwError {
    KwwError::Domain(ErrorInfo::new(code, message))
}

/// Stretching exponent `beta` of the relaxation function `exp(-t^beta)`.
///
/// Always lies in `(0, 1]`. Values a few ulps above one (rounding noise from
/// upstream arithmetic) are clamped onto one; anything else outside the
/// interval is rejected.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ShapeExponent(f64);

impl ShapeExponent {
    /// Pure exponential (Debye) relaxation.
    pub const DEBYE: ShapeExponent = ShapeExponent(1.0);

    /// Validates a raw exponent.
    pub fn new(beta: f64) -> Result<Self, KwwError> {
        if !beta.is_finite() {
            return Err(domain_error("beta-non-finite", "beta must be finite")
                .with_value("beta", beta));
        }
        if beta <= 0.0 {
            return Err(domain_error("beta-non-positive", "beta must be positive")
                .with_value("beta", beta));
        }
        if beta > 1.0 {
            if beta - 1.0 <= BETA_CLAMP_ULPS * f64::EPSILON {
                return Ok(Self::DEBYE);
            }
            return Err(domain_error("beta-above-one", "beta must not exceed 1")
                .with_value("beta", beta)
                .with_domain_hint());
        }
        Ok(Self(beta))
    }

    /// Returns the validated value.
    pub fn get(self) -> f64 {
        self.0
    }

    /// True when the relaxation reduces to a pure exponential.
    pub fn is_debye(self) -> bool {
        self.0 == 1.0
    }
}

impl TryFrom<f64> for ShapeExponent {
    type Error = KwwError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ShapeExponent> for f64 {
    fn from(value: ShapeExponent) -> Self {
        value.0
    }
}

/// Reduced frequency `omega * tau`, finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ReducedFrequency(f64);

impl ReducedFrequency {
    /// The zero-frequency limit.
    pub const ZERO: ReducedFrequency = ReducedFrequency(0.0);

    /// Validates a raw frequency.
    pub fn new(omega: f64) -> Result<Self, KwwError> {
        if !omega.is_finite() {
            return Err(domain_error("omega-non-finite", "omega must be finite")
                .with_value("omega", omega));
        }
        if omega < 0.0 {
            return Err(domain_error("omega-negative", "omega must be non-negative")
                .with_value("omega", omega)
                .with_domain_hint());
        }
        // folds -0.0 onto +0.0
        Ok(Self(omega.abs()))
    }

    /// Returns the validated value.
    pub fn get(self) -> f64 {
        self.0
    }

    /// True at the zero-frequency boundary.
    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl TryFrom<f64> for ReducedFrequency {
    type Error = KwwError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReducedFrequency> for f64 {
    fn from(value: ReducedFrequency) -> Self {
        value.0
    }
}

/// Validates a `(beta, omega)` pair, checking `beta` first.
pub fn validate(beta: f64, omega: f64) -> Result<(ShapeExponent, ReducedFrequency), KwwError> {
    Ok((ShapeExponent::new(beta)?, ReducedFrequency::new(omega)?))
}

trait DomainContext {
    fn with_value(self, key: &str, value: f64) -> Self;
    fn with_domain_hint(self) -> Self;
}

impl DomainContext for KwwError {
    fn with_value(self, key: &str, value: f64) -> Self {
        match self {
            KwwError::Domain(info) => {
                KwwError::Domain(info.with_context(key, format!("{value:e}")))
            }
            other => other,
        }
    }

    fn with_domain_hint(self) -> Self {
        match self {
            KwwError::Domain(info) => KwwError::Domain(
                info.with_hint("the transform is defined for 0 < beta <= 1 and omega >= 0"),
            ),
            other => other,
        }
    }
}
