use kww_eval::{
    evaluate_with, switch_points, EvalConfig, Evaluator, Regime, ShapeExponent, Strategy,
    Transform,
};

#[test]
fn series_and_quadrature_agree_where_both_apply() {
    let mut compared = Vec::new();
    for transform in Transform::ALL {
        for beta in [0.2, 0.45, 0.7, 0.9] {
            let points = switch_points(transform, ShapeExponent::new(beta).expect("beta"));
            for omega in [0.9 * points.low, 1.1 * points.high] {
                let auto = evaluate_with(beta, omega, transform, Strategy::Auto)
                    .expect("automatic evaluation");
                let quadrature =
                    evaluate_with(beta, omega, transform, Strategy::Force(Regime::Quadrature))
                        .expect("forced quadrature");
                assert_eq!(quadrature.regime, Regime::Quadrature);
                let relative = ((auto.value - quadrature.value) / quadrature.value).abs();
                assert!(
                    relative < 1e-10,
                    "{transform} beta={beta} omega={omega:e}: {} via {} vs {}",
                    auto.value,
                    auto.regime,
                    quadrature.value
                );
                compared.push(auto.regime);
            }
        }
    }
    assert!(compared.contains(&Regime::LowSeries));
    assert!(compared.contains(&Regime::HighSeries));
}

#[test]
fn forced_series_reports_breakdown_instead_of_falling_back() {
    let err = evaluate_with(0.3, 50.0, Transform::Cosine, Strategy::Force(Regime::LowSeries))
        .expect_err("moment series cannot converge at high frequency");
    assert!(err.is_convergence(), "{err}");
    assert_eq!(err.info().context.get("regime").map(String::as_str), Some("low-series"));
}

#[test]
fn forced_exact_requires_debye_exponent() {
    let err = evaluate_with(0.5, 1.0, Transform::Cosine, Strategy::Force(Regime::Exact))
        .expect_err("no closed form");
    assert_eq!(err.info().code, "exact-unavailable");

    let exact = evaluate_with(1.0, 1.0, Transform::Cosine, Strategy::Force(Regime::Exact))
        .expect("closed form");
    assert_eq!(exact.value, 0.5);
}

#[test]
fn evaluator_rejects_invalid_configuration() {
    let config = EvalConfig {
        tolerance: 0.0,
        ..EvalConfig::default()
    };
    let err = Evaluator::new(config).expect_err("zero tolerance");
    assert_eq!(err.info().code, "invalid-tolerance");
}

#[test]
fn looser_tolerance_uses_fewer_terms() {
    let strict = Evaluator::new(EvalConfig::default()).expect("default config");
    let loose = Evaluator::new(EvalConfig {
        tolerance: 1e-6,
        ..EvalConfig::default()
    })
    .expect("loose config");
    assert_eq!(strict.config(), &EvalConfig::default());
    assert_eq!(loose.config().tolerance, 1e-6);
    let omega = 1e-3;
    let a = strict
        .evaluate_with(0.6, omega, Transform::Cosine, Strategy::Force(Regime::LowSeries))
        .expect("strict series");
    let b = loose
        .evaluate_with(0.6, omega, Transform::Cosine, Strategy::Force(Regime::LowSeries))
        .expect("loose series");
    assert!(b.terms < a.terms);
    assert!(((a.value - b.value) / a.value).abs() < 1e-6);
}
