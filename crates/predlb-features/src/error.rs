use thiserror::Error;

/// Errors here are deployment defects, not data conditions. Missing data is
/// expressed as `None` values instead.
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("invalid data configuration: {0}")]
    Config(String),

    #[error("feature '{0}' has no type declaration")]
    UnknownFeature(String),

    #[error("failed to read data configuration {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed data configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] predlb_core::error::CoreError),
}
