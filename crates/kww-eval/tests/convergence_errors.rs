//! Inputs inside the domain that no regime can evaluate to full accuracy.

use kww_eval::{evaluate_real, evaluate_with, BatchOpts, Evaluator, Regime, Strategy, Transform};

/// Smallest exponent evaluated without gaps over the full frequency range.
const BETA_FLOOR: f64 = 0.03;

#[test]
fn static_value_overflow_is_a_convergence_error() {
    // Gamma(200) / 0.005 exceeds f64::MAX
    let err = evaluate_real(0.005, 0.0).expect_err("overflowing static value");
    assert!(err.is_convergence(), "{err}");
    assert_eq!(err.info().code, "overflow");
    assert_eq!(err.info().context.get("regime").map(String::as_str), Some("exact"));
}

#[test]
fn exhausted_quadrature_is_a_convergence_error() {
    let err = evaluate_real(0.02, 1e-110).expect_err("below the tuned exponent range");
    assert!(err.is_convergence(), "{err}");
    assert_eq!(err.info().code, "not-converged");
    let context = &err.info().context;
    assert_eq!(context.get("regime").map(String::as_str), Some("quadrature"));
    assert_eq!(context.get("transform").map(String::as_str), Some("cosine"));
}

#[test]
fn forced_quadrature_failure_is_not_rescued_by_a_series() {
    let err = evaluate_with(0.3, 1e-100, Transform::Sine, Strategy::Force(Regime::Quadrature))
        .expect_err("quadrature cannot resolve such low frequencies");
    assert!(err.is_convergence(), "{err}");
    assert_eq!(err.info().code, "not-converged");
    let auto = evaluate_with(0.3, 1e-100, Transform::Sine, Strategy::Auto).expect("series");
    assert_eq!(auto.regime, Regime::LowSeries);
}

#[test]
fn exponent_floor_has_no_gaps_over_the_frequency_range() {
    let evaluator = Evaluator::default();
    let omegas: Vec<f64> = (-3000..=3000)
        .map(|i| 10f64.powf(f64::from(i) / 10.0))
        .collect();
    for transform in Transform::ALL {
        let values = evaluator
            .evaluate_component_batch(transform, BETA_FLOOR, &omegas, &BatchOpts::default())
            .unwrap_or_else(|err| panic!("{transform} at beta={BETA_FLOOR}: {err}"));
        assert!(values.iter().all(|v| v.is_finite() && *v >= 0.0));
    }
}
