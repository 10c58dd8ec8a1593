use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage and loss components of the KWW spectral density.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralResult {
    /// Cosine transform `int_0^inf cos(omega t) exp(-t^beta) dt` (storage part).
    pub real: f64,
    /// Sine transform `int_0^inf sin(omega t) exp(-t^beta) dt` (loss part).
    pub imag: f64,
}

impl SpectralResult {
    /// Builds a result from its two components.
    pub fn new(real: f64, imag: f64) -> Self {
        Self { real, imag }
    }

    /// Returns the components as a `(real, imag)` tuple.
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.real, self.imag)
    }
}

/// Component of the Fourier-Laplace transform being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    /// Cosine transform, the real (storage) component.
    Cosine,
    /// Sine transform, the imaginary (loss) component.
    Sine,
    /// Primitive of the cosine transform, `int_0^omega` of the real part.
    Primitive,
}

impl Transform {
    /// All transforms in canonical order.
    pub const ALL: [Transform; 3] = [Transform::Cosine, Transform::Sine, Transform::Primitive];

    /// Short label used in reports and error context.
    pub fn label(self) -> &'static str {
        match self {
            Transform::Cosine => "cosine",
            Transform::Sine => "sine",
            Transform::Primitive => "primitive",
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Numerical technique that produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// Closed form at `beta = 1` or `omega = 0`.
    Exact,
    /// Moment series in powers of `omega`.
    LowSeries,
    /// Double-exponential quadrature of the defining integral.
    Quadrature,
    /// Expansion in inverse powers of `omega`.
    HighSeries,
}

impl Regime {
    /// Short label used in reports and error context.
    pub fn label(self) -> &'static str {
        match self {
            Regime::Exact => "exact",
            Regime::LowSeries => "low-series",
            Regime::Quadrature => "quadrature",
            Regime::HighSeries => "high-series",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Single-component evaluation together with how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Component that was evaluated.
    pub transform: Transform,
    /// Stretching exponent after validation.
    pub beta: f64,
    /// Reduced frequency after validation.
    pub omega: f64,
    /// Value of the component.
    pub value: f64,
    /// Regime that produced the value.
    pub regime: Regime,
    /// Series terms summed, or quadrature nodes visited; zero for exact values.
    pub terms: usize,
}
