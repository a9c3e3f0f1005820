use predlb_core::models::features::FeatureValue;
use predlb_core::models::record::{FeatureEntry, ModalityRecord};
use predlb_core::models::subject::Subject;

use crate::config::{DataConfig, FeatureBlock, ModalityConfig};
use crate::get_modality;

/// Labeled raw values, before type-specific encoding. Labels and values are
/// parallel; a feature without data keeps its label with a `None` value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFeatures {
    entries: Vec<FeatureEntry>,
}

impl RawFeatures {
    pub fn push(&mut self, label: impl Into<String>, value: Option<FeatureValue>) {
        self.entries.push(FeatureEntry {
            label: label.into(),
            value,
        });
    }

    pub fn extend(&mut self, other: RawFeatures) {
        self.entries.extend(other.entries);
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<Option<&FeatureValue>> {
        self.entries.iter().map(|e| e.value.as_ref()).collect()
    }

    pub fn entries(&self) -> &[FeatureEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether at least one feature carries a value.
    pub fn has_values(&self) -> bool {
        self.entries.iter().any(|e| e.value.is_some())
    }
}

/// Builds fixed-shape raw vectors from stored records.
///
/// The width depends on configuration only: every configured predictor
/// feature appears exactly once, in configured order, whether or not the
/// underlying record exists.
pub struct FeatureExtractor<'a> {
    config: &'a DataConfig,
}

impl<'a> FeatureExtractor<'a> {
    pub fn new(config: &'a DataConfig) -> Self {
        Self { config }
    }

    /// Demographic block of the vector.
    pub fn extract_subject(&self, subject: &Subject) -> RawFeatures {
        select(&self.config.subject, |name| subject.feature_value(name))
    }

    /// Block contributed by one modality. A missing record yields `None`
    /// for each of its predictor features.
    pub fn extract_modality(
        &self,
        modality: &ModalityConfig,
        record: Option<&ModalityRecord>,
    ) -> RawFeatures {
        let stored = record
            .map(|r| get_modality(modality.modality).get_features(r))
            .unwrap_or_default();
        select(&modality.block, |name| {
            stored
                .iter()
                .find(|entry| entry.label == name)
                .and_then(|entry| entry.value.clone())
        })
    }

    /// Full session vector: subject block, then each configured modality in
    /// order.
    ///
    /// Returns `None` when the session holds no record of any configured
    /// modality, since there is nothing to predict on.
    pub fn extract_session(
        &self,
        subject: &Subject,
        records: &[ModalityRecord],
    ) -> Option<RawFeatures> {
        let has_data = self
            .config
            .modalities
            .iter()
            .any(|m| records.iter().any(|r| r.modality == m.modality));
        if !has_data {
            return None;
        }

        let mut features = self.extract_subject(subject);
        for modality in &self.config.modalities {
            let record = records.iter().find(|r| r.modality == modality.modality);
            features.extend(self.extract_modality(modality, record));
        }
        Some(features)
    }
}

fn select(block: &FeatureBlock, lookup: impl Fn(&str) -> Option<FeatureValue>) -> RawFeatures {
    let mut features = RawFeatures::default();
    for name in block.predictor_feature_names() {
        features.push(name.clone(), lookup(name));
    }
    features
}
