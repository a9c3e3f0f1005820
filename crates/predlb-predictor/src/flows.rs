use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use predlb_core::models::features::FeatureVector;

use crate::client::{ApiClient, read_json};
use crate::codec::encode_values;
use crate::error::PredictorError;

pub const SIGNUP: &str = "signup";
pub const LOGIN: &str = "login";
pub const REFRESH: &str = "refresh";
pub const PREDICT: &str = "predict";

/// Status codes the service uses for a missing or expired access token.
pub const LOG_IN_REQUIRED: [u16; 2] = [401, 422];

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

/// Tokens issued by a successful log-in.
#[derive(Debug, Clone, Deserialize)]
pub struct Tokens {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Deserialize)]
struct Refreshed {
    access_token: String,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    model: &'a str,
    features: WireFeatures<'a>,
}

#[derive(Serialize)]
struct WireFeatures<'a> {
    values: String,
    labels: &'a [String],
}

#[derive(Deserialize)]
struct PredictResponse {
    predicted: Value,
}

fn check_status(endpoint: &str, status: u16) -> Result<(), PredictorError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(PredictorError::Status {
            endpoint: endpoint.to_string(),
            status,
        })
    }
}

/// Register a user with the scoring service.
pub fn sign_up(client: &ApiClient, username: &str, password: &str) -> Result<(), PredictorError> {
    info!(username, "signing up predictor user");
    let response = client.post(SIGNUP, None, &Credentials { username, password })?;
    check_status(SIGNUP, response.status().as_u16())
}

/// Exchange credentials for an access/refresh token pair.
pub fn log_in(client: &ApiClient, username: &str, password: &str) -> Result<Tokens, PredictorError> {
    info!(username, "logging in predictor user");
    let response = client.post(LOGIN, None, &Credentials { username, password })?;
    check_status(LOGIN, response.status().as_u16())?;
    read_json(LOGIN, response)
}

/// Obtain a new access token. The refresh token itself is kept.
pub fn refresh_access_token(client: &ApiClient, refresh_token: &str) -> Result<String, PredictorError> {
    #[derive(Serialize)]
    struct Body<'a> {
        refresh_token: &'a str,
    }

    let response = client.post(REFRESH, None, &Body { refresh_token })?;
    check_status(REFRESH, response.status().as_u16())?;
    let refreshed: Refreshed = read_json(REFRESH, response)?;
    Ok(refreshed.access_token)
}

/// Score a feature vector and return the class-1 probability as a
/// percentage rounded to 2 decimals.
pub fn predict_proba(
    client: &ApiClient,
    access_token: &str,
    model: &str,
    features: &FeatureVector,
) -> Result<f64, PredictorError> {
    let request = PredictRequest {
        model,
        features: WireFeatures {
            values: encode_values(features.values())?,
            labels: features.labels(),
        },
    };
    let response = client.post(PREDICT, Some(access_token), &request)?;
    let status = response.status().as_u16();
    if LOG_IN_REQUIRED.contains(&status) {
        return Err(PredictorError::AuthRequired {
            endpoint: PREDICT.to_string(),
            status,
        });
    }
    check_status(PREDICT, status)?;

    let body: PredictResponse = read_json(PREDICT, response)?;
    let positive = positive_class(&body.predicted).ok_or_else(|| PredictorError::MalformedResponse {
        endpoint: PREDICT.to_string(),
        message: format!("no class-1 probability in {}", body.predicted),
    })?;
    Ok(to_percentage(positive))
}

/// Class-1 probability from either `[[p0, p1]]` or `[p0, p1]`.
fn positive_class(predicted: &Value) -> Option<f64> {
    let row = match predicted.get(0)? {
        Value::Array(_) => predicted.get(0)?,
        _ => predicted,
    };
    row.get(1)?.as_f64()
}

pub fn to_percentage(probability: f64) -> f64 {
    (probability * 100.0 * 100.0).round() / 100.0
}
