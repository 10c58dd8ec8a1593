use std::fmt;

use kww_core::{ErrorInfo, KwwError, Regime, Transform};
use serde::{Deserialize, Serialize};

/// Reason a single regime failed to deliver a value at the target accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Breakdown {
    /// A term or transformed abscissa exceeded the floating-point range.
    Overflow,
    /// Cancellation between terms consumed the significant digits.
    Cancellation,
    /// An asymptotic series started growing before reaching the tolerance.
    Divergence,
    /// The partial sum dropped below the smallest normal number.
    Underflow,
    /// The series term cap was hit.
    TermCap,
    /// The sum came out with the wrong sign for a positive quantity.
    NegativeSum,
    /// Successive quadrature refinements never agreed.
    NotConverged,
}

impl Breakdown {
    /// Stable code recorded in [`KwwError::Convergence`].
    pub fn code(self) -> &'static str {
        match self {
            Breakdown::Overflow => "overflow",
            Breakdown::Cancellation => "cancellation",
            Breakdown::Divergence => "divergence",
            Breakdown::Underflow => "underflow",
            Breakdown::TermCap => "term-cap",
            Breakdown::NegativeSum => "negative-sum",
            Breakdown::NotConverged => "not-converged",
        }
    }

    pub(crate) fn into_error(
        self,
        regime: Regime,
        transform: Transform,
        beta: f64,
        omega: f64,
    ) -> KwwError {
        KwwError::Convergence(
            ErrorInfo::new(
                self.code(),
                format!("{regime} failed to reach the target accuracy"),
            )
            .with_context("regime", regime.label())
            .with_context("transform", transform.label())
            .with_context("beta", format!("{beta:e}"))
            .with_context("omega", format!("{omega:e}")),
        )
    }
}

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Value produced by one regime before the evaluator accepts it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Partial {
    pub value: f64,
    pub terms: usize,
    /// The leading term already lies below the normal range; `value` is that term.
    pub underflowed: bool,
}

impl Partial {
    pub fn converged(value: f64, terms: usize) -> Self {
        Self {
            value,
            terms,
            underflowed: false,
        }
    }

    pub fn underflowed(value: f64) -> Self {
        Self {
            value,
            terms: 1,
            underflowed: true,
        }
    }
}
