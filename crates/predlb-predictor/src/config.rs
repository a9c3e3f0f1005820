use serde::{Deserialize, Serialize};

/// Connection settings for the remote scoring service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    /// Verify the server's TLS certificate.
    pub verify: bool,
    pub timeout_secs: u64,
    /// Model the service should score with.
    pub model_identifier: String,
    /// When false, no remote call is ever made and predictions are absent.
    pub use_api_predictor: bool,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            verify: true,
            timeout_secs: 10,
            model_identifier: "lbd".to_string(),
            use_api_predictor: true,
        }
    }
}

impl PredictorConfig {
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}
