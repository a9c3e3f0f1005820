//! Display helpers for views and reports. An absent value always renders as
//! an empty string, never as an error.

use predlb_core::models::features::FeatureValue;

/// Labels longer than this are cut for presentation.
pub const MAX_LABEL_LENGTH: usize = 100;

pub fn format_probability(probability: Option<f64>) -> String {
    match probability {
        Some(p) if p.is_finite() => format!("{p:.2} %"),
        _ => String::new(),
    }
}

pub fn truncate_label(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_LENGTH {
        return label.to_string();
    }
    let cut: String = label.chars().take(MAX_LABEL_LENGTH).collect();
    format!("{cut}...")
}

pub fn format_feature_value(value: Option<&FeatureValue>) -> String {
    match value {
        Some(FeatureValue::Number(n)) if n.is_nan() => String::new(),
        Some(FeatureValue::Number(n)) if n.fract() == 0.0 => format!("{n}"),
        Some(FeatureValue::Number(n)) => {
            let rounded = (n * 10_000.0).round() / 10_000.0;
            format!("{rounded}")
        }
        Some(FeatureValue::Text(s)) => s.clone(),
        None => String::new(),
    }
}
