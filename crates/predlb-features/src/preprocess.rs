use predlb_core::models::features::{FeatureValue, FeatureVector};

use crate::config::{DataConfig, FeatureType};
use crate::error::FeatureError;
use crate::extract::RawFeatures;

/// Encode one raw feature according to its declared type.
///
/// - nominal: one indicator per option, labeled `{label}_{option}`; the
///   matching option is `1`, every other `0` (all `0` when nothing matches).
/// - ordinal: 1-based rank in the declared order; unrecognized or missing
///   values become `None`.
/// - numerical: passed through; missing or non-numeric values become `None`.
///
/// The result always holds at least one entry.
pub fn transform(feature_type: &FeatureType, label: &str, value: Option<&FeatureValue>) -> FeatureVector {
    let mut encoded = FeatureVector::default();
    match feature_type {
        FeatureType::Nominal { options } => {
            let category = value.map(FeatureValue::as_category);
            for option in options {
                let hit = category.as_deref() == Some(option.as_str());
                encoded.push(format!("{label}_{option}"), Some(if hit { 1.0 } else { 0.0 }));
            }
        }
        FeatureType::Ordinal { order } => {
            let rank = value.and_then(|v| {
                let category = v.as_category();
                order
                    .iter()
                    .position(|c| *c == category)
                    .map(|idx| (idx + 1) as f64)
            });
            encoded.push(label, rank);
        }
        FeatureType::Numerical => {
            let number = value.and_then(|v| {
                let parsed = v.as_number();
                if parsed.is_none() {
                    tracing::debug!(feature = label, "non-numeric value for numerical feature");
                }
                parsed
            });
            encoded.push(label, number);
        }
    }
    encoded
}

/// Encode a whole raw vector. Fails only when a label has no declared type.
pub fn preprocess(config: &DataConfig, raw: &RawFeatures) -> Result<FeatureVector, FeatureError> {
    let mut vector = FeatureVector::default();
    for entry in raw.entries() {
        let feature_type = config.feature_type(&entry.label)?;
        vector.extend(transform(feature_type, &entry.label, entry.value.as_ref()));
    }
    Ok(vector)
}
