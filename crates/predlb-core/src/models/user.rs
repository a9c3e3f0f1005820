use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A clinician account. Owns the credentials used against the remote
/// prediction service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub organization: Option<String>,
    #[serde(default)]
    pub predictor: PredictorCredentials,
    pub created_at: jiff::Timestamp,
}

impl User {
    pub fn new(username: impl Into<String>, organization: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            organization,
            predictor: PredictorCredentials::default(),
            created_at: jiff::Timestamp::now(),
        }
    }
}

/// Where a user stands with the remote prediction service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// Never signed up.
    Unregistered,
    /// Signed up, but no access token on record.
    Unauthenticated,
    /// Holds an access token (which may still turn out to be expired).
    Authenticated,
}

/// Remote predictor credentials and tokens, persisted on the user record.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictorCredentials {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub registered: bool,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl PredictorCredentials {
    pub fn auth_state(&self) -> AuthState {
        if !self.registered {
            AuthState::Unregistered
        } else if self.access_token.as_deref().is_none_or(str::is_empty) {
            AuthState::Unauthenticated
        } else {
            AuthState::Authenticated
        }
    }

    pub fn clear_tokens(&mut self) {
        self.access_token = None;
        self.refresh_token = None;
    }
}

// Passwords and tokens must never reach the logs.
impl fmt::Debug for PredictorCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictorCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("registered", &self.registered)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
