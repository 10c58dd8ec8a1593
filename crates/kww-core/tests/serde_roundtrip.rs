use kww_core::{
    Evaluation, EvalConfig, KwwError, ReducedFrequency, Regime, ShapeExponent, SpectralResult,
    Transform,
};

#[test]
fn spectral_result_round_trips_json() {
    let result = SpectralResult::new(0.5, 0.25);
    let json = serde_json::to_string(&result).expect("serialize");
    let decoded: SpectralResult = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, result);
    assert_eq!(decoded.as_tuple(), (0.5, 0.25));
}

#[test]
fn evaluation_uses_snake_case_tags() {
    let evaluation = Evaluation {
        transform: Transform::Primitive,
        beta: 0.5,
        omega: 2.0,
        value: 1.25,
        regime: Regime::HighSeries,
        terms: 17,
    };
    let json = serde_json::to_value(evaluation).expect("serialize");
    assert_eq!(json["transform"], "primitive");
    assert_eq!(json["regime"], "high_series");
    let decoded: Evaluation = serde_json::from_value(json).expect("deserialize");
    assert_eq!(decoded, evaluation);
}

#[test]
fn validated_newtypes_reject_invalid_payloads() {
    let beta: ShapeExponent = serde_json::from_str("0.75").expect("valid beta");
    assert_eq!(beta.get(), 0.75);
    assert!(serde_json::from_str::<ShapeExponent>("1.5").is_err());
    assert!(serde_json::from_str::<ReducedFrequency>("-2.0").is_err());
}

#[test]
fn config_round_trips_json() {
    let config = EvalConfig {
        tolerance: 1e-10,
        ..EvalConfig::default()
    };
    let json = serde_json::to_string(&config).expect("serialize");
    let decoded: EvalConfig = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, config);
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = ShapeExponent::new(0.0).unwrap_err();
    let json = serde_json::to_value(&err).expect("serialize");
    assert_eq!(json["family"], "Domain");
    assert_eq!(json["detail"]["code"], "beta-non-positive");
    let decoded: KwwError = serde_json::from_value(json).expect("deserialize");
    assert_eq!(decoded, err);
}
