use kww_eval::{evaluate, evaluate_real, evaluate_with, KwwError, Regime, Strategy, Transform};

fn code_of(err: &KwwError) -> &str {
    err.info().code.as_str()
}

#[test]
fn invalid_exponents_are_rejected_before_evaluation() {
    let cases = [
        (0.0, "beta-non-positive"),
        (-0.3, "beta-non-positive"),
        (1.5, "beta-above-one"),
        (f64::NAN, "beta-non-finite"),
        (f64::INFINITY, "beta-non-finite"),
    ];
    for (beta, code) in cases {
        let err = evaluate(beta, 1.0).expect_err("beta must be rejected");
        assert!(err.is_domain(), "{err}");
        assert_eq!(code_of(&err), code);
    }
}

#[test]
fn invalid_frequencies_are_rejected() {
    let cases = [
        (-1.0, "omega-negative"),
        (f64::NAN, "omega-non-finite"),
        (f64::INFINITY, "omega-non-finite"),
        (f64::NEG_INFINITY, "omega-non-finite"),
    ];
    for (omega, code) in cases {
        let err = evaluate_real(0.5, omega).expect_err("omega must be rejected");
        assert!(err.is_domain(), "{err}");
        assert_eq!(code_of(&err), code);
    }
}

#[test]
fn exponent_just_above_one_is_clamped_to_debye() {
    let beta = f64::from_bits(1.0_f64.to_bits() + 2);
    let evaluation =
        evaluate_with(beta, 2.0, Transform::Sine, Strategy::Auto).expect("clamped exponent");
    assert_eq!(evaluation.beta, 1.0);
    assert_eq!(evaluation.regime, Regime::Exact);
    assert!((evaluation.value - 0.4).abs() < 1e-15);
}

#[test]
fn domain_error_serializes_with_family_tag() {
    let err = evaluate(1.5, 1.0).expect_err("beta above one");
    let value = serde_json::to_value(&err).expect("serialize error");
    assert_eq!(value["family"], "Domain");
    assert_eq!(value["detail"]["code"], "beta-above-one");
}
