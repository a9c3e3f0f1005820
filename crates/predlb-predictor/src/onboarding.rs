use rand::Rng;
use rand::distributions::Alphanumeric;
use tracing::info;

use predlb_core::models::user::{PredictorCredentials, User};

use crate::predictor::ProbabilityPredictor;

const PASSWORD_LENGTH: usize = 32;

/// Fresh, unregistered predictor credentials.
pub fn generate_credentials() -> PredictorCredentials {
    let password: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PASSWORD_LENGTH)
        .map(char::from)
        .collect();
    PredictorCredentials {
        username: format!("predlb-{}", uuid::Uuid::new_v4().simple()),
        password,
        ..PredictorCredentials::default()
    }
}

/// Give a newly created user predictor credentials and register them with
/// the scoring service.
///
/// Registration is best effort. A failure leaves the user unregistered and
/// the next prediction attempt signs up again.
pub fn onboard(user: &mut User, predictor: &dyn ProbabilityPredictor) {
    user.predictor = generate_credentials();
    if predictor.sign_up(user) {
        info!(user_id = %user.id, username = %user.predictor.username, "predictor user registered");
    }
}
