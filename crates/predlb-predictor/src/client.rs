use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use ureq::Agent;
use ureq::http::Response;

use crate::config::PredictorConfig;
use crate::error::PredictorError;

/// Blocking HTTP client bound to one scoring service.
#[derive(Clone)]
pub struct ApiClient {
    agent: Agent,
    base_url: String,
}

/// Build an HTTP agent honoring the configured timeout and TLS verification.
pub fn build_agent(config: &PredictorConfig) -> Agent {
    let tls = ureq::tls::TlsConfig::builder()
        .disable_verification(!config.verify)
        .build();
    let agent_config = Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
        .http_status_as_error(false)
        .tls_config(tls)
        .build();
    Agent::new_with_config(agent_config)
}

impl ApiClient {
    pub fn new(config: &PredictorConfig) -> Self {
        Self {
            agent: build_agent(config),
            base_url: config.base_url(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a JSON body and return the status with the raw response.
    pub(crate) fn post<B: Serialize>(
        &self,
        endpoint: &str,
        bearer: Option<&str>,
        body: &B,
    ) -> Result<Response<ureq::Body>, PredictorError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let mut request = self.agent.post(&url);
        if let Some(token) = bearer {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        request.send_json(body).map_err(|e| PredictorError::Transport {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }
}

/// Decode a successful JSON response body.
pub(crate) fn read_json<T: DeserializeOwned>(
    endpoint: &str,
    mut response: Response<ureq::Body>,
) -> Result<T, PredictorError> {
    response
        .body_mut()
        .read_json::<T>()
        .map_err(|e| PredictorError::MalformedResponse {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
}
