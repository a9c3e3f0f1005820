use predlb_core::models::features::FeatureValue;
use predlb_core::models::record::{FeatureEntry, ModalityKind, ModalityRecord, RecordData};

use crate::config::ModalityConfig;
use crate::Modality;

/// Modality whose records are imported feature tables (acoustic,
/// actigraphy, handwriting, psychology, TCS, CEI).
pub struct FeatureBased {
    kind: ModalityKind,
    name: &'static str,
}

impl FeatureBased {
    pub fn new(kind: ModalityKind, name: &'static str) -> Self {
        Self { kind, name }
    }
}

impl Modality for FeatureBased {
    fn kind(&self) -> ModalityKind {
        self.kind
    }

    fn name(&self) -> &str {
        self.name
    }

    fn get_features(&self, record: &ModalityRecord) -> Vec<FeatureEntry> {
        match &record.data {
            RecordData::FeatureTable { features } => features.clone(),
            RecordData::Questionnaire { .. } => {
                tracing::warn!(
                    modality = %self.kind,
                    session_id = %record.session_id,
                    "feature-based modality holds questionnaire answers, ignoring"
                );
                Vec::new()
            }
        }
    }
}

/// Questionnaire modality. Answers are stored as 1-based option indices and
/// surface as numeric features named by question id.
pub struct QuestionnaireBased;

impl Modality for QuestionnaireBased {
    fn kind(&self) -> ModalityKind {
        ModalityKind::Questionnaire
    }

    fn name(&self) -> &str {
        "Questionnaire"
    }

    fn feature_names<'c>(&self, config: &'c ModalityConfig) -> Vec<&'c str> {
        if config.questionnaire.is_empty() {
            config.block.feature_names()
        } else {
            config.questionnaire.iter().map(|q| q.id.as_str()).collect()
        }
    }

    fn get_features(&self, record: &ModalityRecord) -> Vec<FeatureEntry> {
        match &record.data {
            RecordData::Questionnaire { answers } => answers
                .iter()
                .map(|(id, answer)| FeatureEntry {
                    label: id.clone(),
                    value: answer.map(|a| FeatureValue::Number(f64::from(a))),
                })
                .collect(),
            RecordData::FeatureTable { features } => features.clone(),
        }
    }
}
