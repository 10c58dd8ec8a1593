//! Series expansions in `omega` (low frequency) and `1/omega` (high frequency).
//!
//! Terms are assembled from log-Gamma values so that large factorials and
//! Gamma functions never overflow on their own. Both series stop once the
//! next term, plus the rounding noise accumulated by all summed terms, falls
//! below the tolerance relative to the partial sum.

use std::f64::consts::FRAC_PI_2;

use kww_core::{EvalConfig, Transform};

use crate::breakdown::{Breakdown, Partial};

/// Largest log-magnitude accepted for a single term.
const LOG_TERM_LIMIT: f64 = (f64::MAX_EXP / 2) as f64;

/// Index layout of one expansion: the first power index and whether the
/// terms carry the extra `1/(n+1)` factor of the primitive.
#[derive(Debug, Clone, Copy)]
struct Layout {
    offset: u32,
    primitive: bool,
}

impl Layout {
    fn low(transform: Transform) -> Self {
        match transform {
            Transform::Cosine => Layout {
                offset: 0,
                primitive: false,
            },
            Transform::Sine => Layout {
                offset: 1,
                primitive: false,
            },
            Transform::Primitive => Layout {
                offset: 0,
                primitive: true,
            },
        }
    }
}

fn checked_exp(log_term: f64) -> Result<f64, Breakdown> {
    if log_term > LOG_TERM_LIMIT {
        return Err(Breakdown::Overflow);
    }
    Ok(log_term.exp())
}

/// Moment expansion `(1/beta) sum_k (-1)^k Gamma((n+1)/beta)/n! omega^n`, `n = 2k + offset`.
///
/// For `beta < 1` the moments grow faster than the factorials and the
/// expansion is only asymptotic, so it is abandoned as soon as the terms
/// start growing again: the smallest term bounds the attainable accuracy.
pub(crate) fn low_frequency(
    transform: Transform,
    beta: f64,
    omega: f64,
    config: &EvalConfig,
) -> Result<Partial, Breakdown> {
    let layout = Layout::low(transform);
    let ln_omega = omega.ln();
    let term = |n: f64| -> Result<f64, Breakdown> {
        let power = if layout.primitive { n + 1.0 } else { n };
        let log_term =
            libm::lgamma((n + 1.0) / beta) - libm::lgamma(n + 1.0) + power * ln_omega;
        let value = checked_exp(log_term)?;
        Ok(if layout.primitive {
            value / (n + 1.0)
        } else {
            value
        })
    };

    let mut n = f64::from(layout.offset);
    let mut current = term(n)?;
    let mut sum = 0.0;
    let mut abs_sum = 0.0;
    let mut sign = 1.0;
    for count in 1..=config.max_series_terms {
        n += 2.0;
        let next = term(n)?;
        sum += sign * current;
        abs_sum += current;
        if count == 1 && sum < f64::MIN_POSITIVE {
            return Ok(Partial::underflowed(sum / beta));
        }
        if config.noise_floor * abs_sum + next <= config.tolerance * sum {
            return Ok(Partial::converged(sum / beta, count));
        }
        if config.noise_floor * abs_sum >= config.tolerance * sum {
            return Err(Breakdown::Cancellation);
        }
        if beta < 1.0 && next > current {
            return Err(Breakdown::Divergence);
        }
        if sum < f64::MIN_POSITIVE {
            return Err(Breakdown::Underflow);
        }
        sign = -sign;
        current = next;
    }
    Err(Breakdown::TermCap)
}

/// Expansion in `omega^(-k beta - 1)` with coefficients `Gamma(k beta + 1)/k!`.
///
/// The cosine transform carries `sin(k beta pi/2)` and starts at `k = 1`; the
/// sine transform carries `cos(k beta pi/2)` and starts at `k = 0`. The
/// primitive integrates the cosine expansion term by term and is reported as
/// `pi/2` minus the sum, so convergence is judged against that difference.
pub(crate) fn high_frequency(
    transform: Transform,
    beta: f64,
    omega: f64,
    config: &EvalConfig,
) -> Result<Partial, Breakdown> {
    let primitive = transform == Transform::Primitive;
    let ln_omega = omega.ln();
    let term = |k: f64| -> Result<f64, Breakdown> {
        let x = k * beta + 1.0;
        let power = if primitive { 1.0 - x } else { -x };
        let log_term = libm::lgamma(x) - libm::lgamma(k + 1.0) + power * ln_omega;
        let value = checked_exp(log_term)?;
        Ok(if primitive { value / (k * beta) } else { value })
    };
    let phase = |k: f64| -> f64 {
        let angle = FRAC_PI_2 * k * beta;
        match transform {
            Transform::Sine => angle.cos(),
            Transform::Cosine | Transform::Primitive => angle.sin(),
        }
    };

    let mut k = if transform == Transform::Sine { 0.0 } else { 1.0 };
    let mut current = term(k)?;
    let mut sum = 0.0_f64;
    let mut abs_sum = 0.0;
    let mut sign = 1.0;
    let mut count = 0;
    loop {
        if count == config.max_series_terms {
            return Err(Breakdown::TermCap);
        }
        count += 1;
        let next = term(k + 1.0)?;
        let contribution = sign * current * phase(k);
        sum += contribution;
        abs_sum += contribution.abs();
        k += 1.0;
        if count == 1 && sum.abs() < f64::MIN_POSITIVE {
            return Ok(Partial::underflowed(sum.max(0.0)));
        }
        let reference = if primitive {
            (FRAC_PI_2 - sum).abs()
        } else {
            sum.abs()
        };
        if config.noise_floor * abs_sum + next <= config.tolerance * reference {
            break;
        }
        if sum.abs() < f64::MIN_POSITIVE {
            return Err(Breakdown::Underflow);
        }
        sign = -sign;
        current = next;
    }

    if primitive {
        if sum >= FRAC_PI_2 {
            return Err(Breakdown::NegativeSum);
        }
        return Ok(Partial::converged(FRAC_PI_2 - sum, count));
    }
    Ok(Partial::converged(sum, count))
}
