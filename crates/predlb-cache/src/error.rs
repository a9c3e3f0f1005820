use thiserror::Error;

use predlb_features::error::FeatureError;
use predlb_storage::error::StorageError;

/// Failures that are defects rather than "no prediction available".
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("feature error: {0}")]
    Features(#[from] FeatureError),
}

impl PredictionError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PredictionError::Storage(e) if e.is_not_found())
    }
}
