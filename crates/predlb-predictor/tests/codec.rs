use predlb_predictor::codec::{decode_values, encode_values};
use predlb_predictor::config::PredictorConfig;
use predlb_predictor::flows::to_percentage;

#[test]
fn special_values_survive_the_wire() {
    let values = [
        Some(0.02),
        None,
        Some(f64::NAN),
        Some(f64::INFINITY),
        Some(f64::NEG_INFINITY),
        Some(0.1 + 0.2),
        Some(-1.5e-300),
    ];
    let encoded = encode_values(&values).unwrap();
    assert_eq!(
        &encoded[..39],
        r#"[0.02,null,"NaN","Infinity","-Infinity""#
    );

    let decoded = decode_values(&encoded).unwrap();
    assert_eq!(decoded.len(), values.len());
    for (original, decoded) in values.iter().zip(&decoded) {
        match (original, decoded) {
            (Some(a), Some(b)) if a.is_nan() => assert!(b.is_nan()),
            (a, b) => assert_eq!(a.map(f64::to_bits), b.map(f64::to_bits)),
        }
    }
}

#[test]
fn unknown_strings_are_rejected() {
    assert!(decode_values(r#"["nan"]"#).is_err());
    assert!(decode_values("{}").is_err());
}

#[test]
fn probabilities_become_rounded_percentages() {
    assert_eq!(to_percentage(0.75), 75.0);
    assert_eq!(to_percentage(0.421749), 42.17);
    assert_eq!(to_percentage(0.0), 0.0);
}

#[test]
fn base_url_joins_scheme_host_and_port() {
    let config = PredictorConfig {
        scheme: "https".into(),
        host: "scoring.local".into(),
        port: 8443,
        ..PredictorConfig::default()
    };
    assert_eq!(config.base_url(), "https://scoring.local:8443");
}
