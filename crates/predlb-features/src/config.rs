//! Declarative data configuration.
//!
//! Describes, per modality, which features exist, how each is typed, and
//! which of them feed the predictor. The order of `modalities` is the order
//! the trained model expects its inputs in.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use predlb_core::models::record::ModalityKind;

use crate::error::FeatureError;

/// How a raw feature value is encoded for the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeatureType {
    /// One-hot over `options`.
    Nominal { options: Vec<String> },
    /// 1-based rank within `order`.
    Ordinal { order: Vec<String> },
    /// Passed through unchanged.
    Numerical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    #[serde(flatten)]
    pub kind: FeatureType,
    /// Presentation name, if different from the label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A group of declared features and the subset used for prediction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureBlock {
    #[serde(default)]
    pub features: BTreeMap<String, FeatureSpec>,
    #[serde(default)]
    pub predictor_features: Vec<String>,
}

impl FeatureBlock {
    pub fn feature_names(&self) -> Vec<&str> {
        self.features.keys().map(String::as_str).collect()
    }

    pub fn predictor_feature_names(&self) -> &[String] {
        &self.predictor_features
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionnaireItem {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalityConfig {
    pub modality: ModalityKind,
    #[serde(flatten)]
    pub block: FeatureBlock,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questionnaire: Vec<QuestionnaireItem>,
}

impl ModalityConfig {
    pub fn questions(&self) -> Vec<&str> {
        self.questionnaire.iter().map(|q| q.question.as_str()).collect()
    }

    /// Answer options per question, numbered from 1.
    pub fn options(&self) -> Vec<Vec<(u8, &str)>> {
        self.questionnaire
            .iter()
            .map(|q| {
                q.options
                    .iter()
                    .zip(1u8..)
                    .map(|(option, number)| (number, option.as_str()))
                    .collect()
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Demographic features prepended to every session vector.
    #[serde(default)]
    pub subject: FeatureBlock,
    #[serde(default)]
    pub modalities: Vec<ModalityConfig>,
}

impl DataConfig {
    /// Parse and validate a configuration document.
    pub fn from_json(json: &str) -> Result<Self, FeatureError> {
        let config: DataConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, FeatureError> {
        let contents = std::fs::read_to_string(path).map_err(|source| FeatureError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&contents)?;
        tracing::info!(
            path = %path.display(),
            modalities = config.modalities.len(),
            width = config.predictor_width(),
            "data configuration loaded"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FeatureError> {
        let mut seen_modalities = HashSet::new();
        for modality in &self.modalities {
            if !seen_modalities.insert(modality.modality) {
                return Err(FeatureError::Config(format!(
                    "modality '{}' is configured more than once",
                    modality.modality
                )));
            }
        }

        let mut seen_labels = HashSet::new();
        for (owner, block) in self.blocks() {
            validate_block(&owner, block)?;
            for label in block.features.keys() {
                if !seen_labels.insert(label.as_str()) {
                    return Err(FeatureError::Config(format!(
                        "feature '{label}' is declared in more than one block"
                    )));
                }
            }
        }
        Ok(())
    }

    fn blocks(&self) -> impl Iterator<Item = (String, &FeatureBlock)> {
        std::iter::once(("subject".to_string(), &self.subject)).chain(
            self.modalities
                .iter()
                .map(|m| (m.modality.to_string(), &m.block)),
        )
    }

    pub fn modality(&self, kind: ModalityKind) -> Option<&ModalityConfig> {
        self.modalities.iter().find(|m| m.modality == kind)
    }

    pub fn feature_spec(&self, label: &str) -> Option<&FeatureSpec> {
        self.blocks().find_map(|(_, block)| block.features.get(label))
    }

    pub fn feature_type(&self, label: &str) -> Result<&FeatureType, FeatureError> {
        self.feature_spec(label)
            .map(|spec| &spec.kind)
            .ok_or_else(|| FeatureError::UnknownFeature(label.to_string()))
    }

    /// Presentation title of a feature, falling back to its label.
    pub fn feature_title<'a>(&'a self, label: &'a str) -> &'a str {
        self.feature_spec(label)
            .and_then(|spec| spec.name.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or(label)
    }

    /// Number of raw predictor features across the subject block and all
    /// configured modalities.
    pub fn predictor_width(&self) -> usize {
        self.blocks()
            .map(|(_, block)| block.predictor_features.len())
            .sum()
    }
}

fn validate_block(owner: &str, block: &FeatureBlock) -> Result<(), FeatureError> {
    let mut seen = HashSet::new();
    for name in &block.predictor_features {
        if !seen.insert(name.as_str()) {
            return Err(FeatureError::Config(format!(
                "{owner}: predictor feature '{name}' is listed twice"
            )));
        }
        if !block.features.contains_key(name) {
            return Err(FeatureError::Config(format!(
                "{owner}: predictor feature '{name}' has no declaration"
            )));
        }
    }

    for (label, spec) in &block.features {
        let categories = match &spec.kind {
            FeatureType::Nominal { options } => options,
            FeatureType::Ordinal { order } => order,
            FeatureType::Numerical => continue,
        };
        if categories.is_empty() {
            return Err(FeatureError::Config(format!(
                "{owner}: feature '{label}' declares no categories"
            )));
        }
        let unique: HashSet<_> = categories.iter().collect();
        if unique.len() != categories.len() {
            return Err(FeatureError::Config(format!(
                "{owner}: feature '{label}' repeats a category"
            )));
        }
    }
    Ok(())
}
