use std::sync::Arc;

use tracing::{info, warn};

use predlb_core::models::features::FeatureVector;
use predlb_core::models::user::{AuthState, User};
use predlb_storage::RecordStore;

use crate::client::ApiClient;
use crate::config::PredictorConfig;
use crate::error::PredictorError;
use crate::flows;

/// Source of LBD probabilities.
///
/// Implementations never fail: any problem reaching or authenticating with
/// the scoring service yields `None`. Credential changes are written back to
/// `user` as they happen.
pub trait ProbabilityPredictor: Send + Sync {
    fn predict_probability(&self, user: &mut User, features: &FeatureVector, model: &str) -> Option<f64>;

    /// Register the user with the scoring service if needed. Returns
    /// whether the user is registered afterwards.
    fn sign_up(&self, _user: &mut User) -> bool {
        false
    }
}

/// Predictor used when the remote service is switched off.
pub struct DisabledPredictor;

impl ProbabilityPredictor for DisabledPredictor {
    fn predict_probability(&self, _user: &mut User, _features: &FeatureVector, _model: &str) -> Option<f64> {
        None
    }
}

/// Pick the predictor implementation for a configuration.
pub fn build_predictor(config: &PredictorConfig, store: Arc<RecordStore>) -> Arc<dyn ProbabilityPredictor> {
    if config.use_api_predictor {
        Arc::new(ApiPredictor::new(config, store))
    } else {
        info!("remote predictor disabled, predictions will be absent");
        Arc::new(DisabledPredictor)
    }
}

/// Predictor backed by the remote scoring service.
///
/// Per call: sign up if the user never registered, log in if no access
/// token is held, then predict. A predict rejected for an expired token is
/// retried exactly once after a refresh.
pub struct ApiPredictor {
    client: ApiClient,
    store: Arc<RecordStore>,
}

impl ApiPredictor {
    pub fn new(config: &PredictorConfig, store: Arc<RecordStore>) -> Self {
        Self {
            client: ApiClient::new(config),
            store,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Register the user unless already registered.
    pub fn ensure_registered(&self, user: &mut User) -> Result<(), PredictorError> {
        if user.predictor.registered {
            return Ok(());
        }
        flows::sign_up(&self.client, &user.predictor.username, &user.predictor.password)?;
        user.predictor.registered = true;
        self.persist(user);
        Ok(())
    }

    fn ensure_logged_in(&self, user: &mut User) -> Result<(), PredictorError> {
        if user.predictor.auth_state() == AuthState::Authenticated {
            return Ok(());
        }
        let tokens = flows::log_in(&self.client, &user.predictor.username, &user.predictor.password)?;
        user.predictor.access_token = Some(tokens.access_token);
        user.predictor.refresh_token = Some(tokens.refresh_token);
        self.persist(user);
        Ok(())
    }

    fn refresh(&self, user: &mut User) -> Result<(), PredictorError> {
        let Some(refresh_token) = user.predictor.refresh_token.clone() else {
            user.predictor.clear_tokens();
            self.persist(user);
            return Err(PredictorError::MissingToken("refresh"));
        };
        match flows::refresh_access_token(&self.client, &refresh_token) {
            Ok(access_token) => {
                user.predictor.access_token = Some(access_token);
                self.persist(user);
                Ok(())
            }
            Err(e) if e.is_transport() => Err(e),
            Err(e) => {
                // Rejected refresh: start over from log-in next time.
                user.predictor.clear_tokens();
                self.persist(user);
                Err(e)
            }
        }
    }

    fn predict_once(&self, user: &User, features: &FeatureVector, model: &str) -> Result<f64, PredictorError> {
        let token = user
            .predictor
            .access_token
            .as_deref()
            .ok_or(PredictorError::MissingToken("access"))?;
        flows::predict_proba(&self.client, token, model, features)
    }

    fn run(&self, user: &mut User, features: &FeatureVector, model: &str) -> Result<f64, PredictorError> {
        self.ensure_registered(user)?;
        self.ensure_logged_in(user)?;
        match self.predict_once(user, features, model) {
            Err(PredictorError::AuthRequired { status, .. }) => {
                info!(user_id = %user.id, status, "access token rejected, refreshing");
                self.refresh(user)?;
                self.predict_once(user, features, model)
            }
            other => other,
        }
    }

    fn persist(&self, user: &User) {
        if let Err(e) = self.store.save_user(user) {
            warn!(user_id = %user.id, error = %e, "failed to persist predictor credentials");
        }
    }
}

impl ProbabilityPredictor for ApiPredictor {
    fn sign_up(&self, user: &mut User) -> bool {
        match self.ensure_registered(user) {
            Ok(()) => true,
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "predictor sign-up failed");
                false
            }
        }
    }

    fn predict_probability(&self, user: &mut User, features: &FeatureVector, model: &str) -> Option<f64> {
        if features.is_empty() {
            return None;
        }
        match self.run(user, features, model) {
            Ok(probability) => {
                info!(user_id = %user.id, model, probability, "prediction received");
                Some(probability)
            }
            Err(e) => {
                warn!(user_id = %user.id, model, error = %e, "prediction unavailable");
                None
            }
        }
    }
}
