//! Cache key conventions for predicted probabilities.
//!
//! The session key embeds the subject code so that both entries touched by a
//! data mutation can be derived from the session alone.

use uuid::Uuid;

pub const LBD_PROBABILITY_PREFIX: &str = "lbd_probability";

/// Joins the subject code and session id in a session key.
pub const SESSION_KEY_SEPARATOR: &str = "_session_";

pub fn subject_probability(subject_code: &str) -> String {
    format!("{LBD_PROBABILITY_PREFIX}_subject_{subject_code}")
}

pub fn session_probability(subject_code: &str, session_id: Uuid) -> String {
    format!("{LBD_PROBABILITY_PREFIX}_subject_{subject_code}{SESSION_KEY_SEPARATOR}{session_id}")
}
