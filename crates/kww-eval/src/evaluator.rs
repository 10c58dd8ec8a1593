//! Regime selection and the public evaluation entry points.

use kww_core::{
    validate, EvalConfig, Evaluation, ErrorInfo, KwwError, ReducedFrequency, Regime,
    ShapeExponent, SpectralResult, Transform,
};
use serde::{Deserialize, Serialize};

use crate::breakdown::{Breakdown, Partial};
use crate::limits::SwitchPoints;
use crate::{quadrature, series};

/// How the evaluator picks the numerical regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "regime")]
pub enum Strategy {
    /// Classify `(beta, omega)` against the switch-points and fall back to
    /// quadrature whenever a series breaks down.
    #[default]
    Auto,
    /// Run exactly one regime with no fallback. Intended for diagnostics and
    /// cross-checks; `omega = 0` is still answered exactly.
    Force(Regime),
}

/// Stateless KWW evaluator bound to one [`EvalConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Evaluator {
    config: EvalConfig,
}

impl Evaluator {
    /// Creates an evaluator after validating the configuration.
    pub fn new(config: EvalConfig) -> Result<Self, KwwError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Evaluates both components of the spectral density.
    pub fn evaluate(&self, beta: f64, omega: f64) -> Result<SpectralResult, KwwError> {
        let (beta, omega) = validate(beta, omega)?;
        let real = self.run(Transform::Cosine, beta, omega, Strategy::Auto)?;
        let imag = self.run(Transform::Sine, beta, omega, Strategy::Auto)?;
        Ok(SpectralResult::new(real.value, imag.value))
    }

    /// Evaluates the real (storage) component only.
    pub fn evaluate_real(&self, beta: f64, omega: f64) -> Result<f64, KwwError> {
        self.single(Transform::Cosine, beta, omega)
    }

    /// Evaluates the imaginary (loss) component only.
    pub fn evaluate_imag(&self, beta: f64, omega: f64) -> Result<f64, KwwError> {
        self.single(Transform::Sine, beta, omega)
    }

    /// Evaluates the primitive `int_0^omega` of the real component.
    pub fn evaluate_primitive(&self, beta: f64, omega: f64) -> Result<f64, KwwError> {
        self.single(Transform::Primitive, beta, omega)
    }

    /// Evaluates one component and reports which regime produced it.
    pub fn evaluate_with(
        &self,
        beta: f64,
        omega: f64,
        transform: Transform,
        strategy: Strategy,
    ) -> Result<Evaluation, KwwError> {
        let (beta, omega) = validate(beta, omega)?;
        self.run(transform, beta, omega, strategy)
    }

    fn single(&self, transform: Transform, beta: f64, omega: f64) -> Result<f64, KwwError> {
        self.evaluate_with(beta, omega, transform, Strategy::Auto)
            .map(|evaluation| evaluation.value)
    }

    pub(crate) fn run(
        &self,
        transform: Transform,
        beta: ShapeExponent,
        omega: ReducedFrequency,
        strategy: Strategy,
    ) -> Result<Evaluation, KwwError> {
        let evaluation = if omega.is_zero() {
            zero_frequency(transform, beta)?
        } else {
            match strategy {
                Strategy::Auto => self.auto(transform, beta, omega)?,
                Strategy::Force(regime) => self.forced(transform, beta, omega, regime)?,
            }
        };
        tracing::trace!(
            %transform,
            beta = evaluation.beta,
            omega = evaluation.omega,
            regime = %evaluation.regime,
            terms = evaluation.terms,
            "evaluated"
        );
        Ok(evaluation)
    }

    fn auto(
        &self,
        transform: Transform,
        beta: ShapeExponent,
        omega: ReducedFrequency,
    ) -> Result<Evaluation, KwwError> {
        if beta.is_debye() {
            return Ok(debye(transform, omega));
        }
        let (b, w) = (beta.get(), omega.get());
        let points = SwitchPoints::of(transform, beta);
        let attempt = if w < points.low {
            Some((
                Regime::LowSeries,
                series::low_frequency(transform, b, w, &self.config),
            ))
        } else if w > points.high {
            Some((
                Regime::HighSeries,
                series::high_frequency(transform, b, w, &self.config),
            ))
        } else {
            None
        };

        if let Some((regime, outcome)) = attempt {
            match outcome {
                Ok(partial) if partial.value > 0.0 || partial.underflowed => {
                    return Ok(record(transform, beta, omega, regime, partial));
                }
                Ok(partial) => tracing::debug!(
                    %transform,
                    beta = b,
                    omega = w,
                    %regime,
                    value = partial.value,
                    "series result not positive, falling back to quadrature"
                ),
                Err(reason) => tracing::debug!(
                    %transform,
                    beta = b,
                    omega = w,
                    %regime,
                    %reason,
                    "series broke down, falling back to quadrature"
                ),
            }
        }

        quadrature::integrate(transform, b, w, &self.config)
            .map(|partial| record(transform, beta, omega, Regime::Quadrature, partial))
            .map_err(|reason| reason.into_error(Regime::Quadrature, transform, b, w))
    }

    fn forced(
        &self,
        transform: Transform,
        beta: ShapeExponent,
        omega: ReducedFrequency,
        regime: Regime,
    ) -> Result<Evaluation, KwwError> {
        let (b, w) = (beta.get(), omega.get());
        let outcome = match regime {
            Regime::Exact if beta.is_debye() => return Ok(debye(transform, omega)),
            Regime::Exact => {
                return Err(KwwError::Config(
                    ErrorInfo::new(
                        "exact-unavailable",
                        "closed forms exist only for beta = 1 or omega = 0",
                    )
                    .with_context("beta", format!("{b:e}"))
                    .with_context("omega", format!("{w:e}")),
                ))
            }
            Regime::LowSeries => series::low_frequency(transform, b, w, &self.config),
            Regime::HighSeries => series::high_frequency(transform, b, w, &self.config),
            Regime::Quadrature => quadrature::integrate(transform, b, w, &self.config),
        };
        match outcome {
            Ok(partial) if partial.value > 0.0 || partial.underflowed => {
                Ok(record(transform, beta, omega, regime, partial))
            }
            Ok(_) => Err(Breakdown::NegativeSum.into_error(regime, transform, b, w)),
            Err(reason) => Err(reason.into_error(regime, transform, b, w)),
        }
    }
}

fn record(
    transform: Transform,
    beta: ShapeExponent,
    omega: ReducedFrequency,
    regime: Regime,
    partial: Partial,
) -> Evaluation {
    Evaluation {
        transform,
        beta: beta.get(),
        omega: omega.get(),
        value: partial.value,
        regime,
        terms: partial.terms,
    }
}

fn exact(transform: Transform, beta: f64, omega: f64, value: f64) -> Evaluation {
    Evaluation {
        transform,
        beta,
        omega,
        value,
        regime: Regime::Exact,
        terms: 0,
    }
}

/// Pure exponential relaxation: Lorentzian storage and loss, `atan` primitive.
fn debye(transform: Transform, omega: ReducedFrequency) -> Evaluation {
    let w = omega.get();
    let value = match transform {
        Transform::Cosine => 1.0 / (1.0 + w * w),
        Transform::Sine => w / (1.0 + w * w),
        Transform::Primitive => w.atan(),
    };
    exact(transform, 1.0, w, value)
}

/// Zero-frequency limit: the mean relaxation time `Gamma(1/beta)/beta` for the
/// real part, zero for the odd components.
fn zero_frequency(transform: Transform, beta: ShapeExponent) -> Result<Evaluation, KwwError> {
    let b = beta.get();
    let value = match transform {
        Transform::Cosine => {
            let value = libm::tgamma(1.0 / b) / b;
            if !value.is_finite() {
                return Err(Breakdown::Overflow.into_error(Regime::Exact, transform, b, 0.0));
            }
            value
        }
        Transform::Sine | Transform::Primitive => 0.0,
    };
    Ok(exact(transform, b, 0.0, value))
}

/// Evaluates both components with the default configuration.
pub fn evaluate(beta: f64, omega: f64) -> Result<SpectralResult, KwwError> {
    Evaluator::default().evaluate(beta, omega)
}

/// Evaluates the real (storage) component with the default configuration.
pub fn evaluate_real(beta: f64, omega: f64) -> Result<f64, KwwError> {
    Evaluator::default().evaluate_real(beta, omega)
}

/// Evaluates the imaginary (loss) component with the default configuration.
pub fn evaluate_imag(beta: f64, omega: f64) -> Result<f64, KwwError> {
    Evaluator::default().evaluate_imag(beta, omega)
}

/// Evaluates the primitive of the real component with the default configuration.
pub fn evaluate_primitive(beta: f64, omega: f64) -> Result<f64, KwwError> {
    Evaluator::default().evaluate_primitive(beta, omega)
}

/// Evaluates one component with an explicit strategy and the default configuration.
pub fn evaluate_with(
    beta: f64,
    omega: f64,
    transform: Transform,
    strategy: Strategy,
) -> Result<Evaluation, KwwError> {
    Evaluator::default().evaluate_with(beta, omega, transform, strategy)
}
