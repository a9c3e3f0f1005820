use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown modality: {0}")]
    UnknownModality(String),

    #[error("invalid subject code: {0:?}")]
    InvalidSubjectCode(String),

    #[error("feature labels and values differ in length ({labels} labels, {values} values)")]
    LengthMismatch { labels: usize, values: usize },

    #[error("invalid uuid: {0}")]
    InvalidUuid(#[from] uuid::Error),
}
