use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictorError {
    #[error("transport error calling {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    /// The service rejected the access token (401 or 422).
    #[error("{endpoint} requires a fresh access token (status {status})")]
    AuthRequired { endpoint: String, status: u16 },

    #[error("{endpoint} returned status {status}")]
    Status { endpoint: String, status: u16 },

    #[error("malformed response from {endpoint}: {message}")]
    MalformedResponse { endpoint: String, message: String },

    #[error("no {0} token stored for this user")]
    MissingToken(&'static str),

    #[error("feature value codec error: {0}")]
    Codec(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PredictorError {
    /// Whether the service answered at all. Transport failures leave stored
    /// credentials untouched.
    pub fn is_transport(&self) -> bool {
        matches!(self, PredictorError::Transport { .. })
    }
}
