//! predlb-features
//!
//! Turns stored examination data into model input. Pure computation over a
//! declarative [`config::DataConfig`]; no storage or network access.
//!
//! - [`extract`] builds the fixed-shape raw vector for a session.
//! - [`preprocess`] encodes raw values by declared feature type.
//! - [`present`] formats values and probabilities for display.

pub mod config;
pub mod error;
pub mod extract;
pub mod modalities;
pub mod preprocess;
pub mod present;

use predlb_core::models::record::{FeatureEntry, ModalityKind, ModalityRecord};

use config::ModalityConfig;

/// Capability interface implemented per kind of modality.
pub trait Modality: Send + Sync {
    fn kind(&self) -> ModalityKind;

    /// Human-readable name (e.g., "Acoustic", "TCS").
    fn name(&self) -> &str;

    /// Names of all features this modality declares.
    fn feature_names<'c>(&self, config: &'c ModalityConfig) -> Vec<&'c str> {
        config.block.feature_names()
    }

    /// Every feature stored in a record, in stored order.
    fn get_features(&self, record: &ModalityRecord) -> Vec<FeatureEntry>;
}

/// Return all supported modalities.
pub fn all_modalities() -> Vec<Box<dyn Modality>> {
    ModalityKind::ALL.into_iter().map(get_modality).collect()
}

/// Look up the implementation for a modality kind.
pub fn get_modality(kind: ModalityKind) -> Box<dyn Modality> {
    match kind {
        ModalityKind::Questionnaire => Box::new(modalities::QuestionnaireBased),
        ModalityKind::Acoustic => Box::new(modalities::FeatureBased::new(kind, "Acoustic")),
        ModalityKind::Actigraphy => Box::new(modalities::FeatureBased::new(kind, "Actigraphy")),
        ModalityKind::Handwriting => Box::new(modalities::FeatureBased::new(kind, "Handwriting")),
        ModalityKind::Psychology => Box::new(modalities::FeatureBased::new(kind, "Psychology")),
        ModalityKind::Tcs => Box::new(modalities::FeatureBased::new(kind, "TCS")),
        ModalityKind::Cei => Box::new(modalities::FeatureBased::new(kind, "CEI")),
    }
}
