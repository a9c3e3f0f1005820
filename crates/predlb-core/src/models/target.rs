use uuid::Uuid;

use crate::cache_keys;
use crate::models::session::ExaminationSession;

/// An entity a probability can be requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionTarget {
    Subject { code: String },
    Session { subject_code: String, session_id: Uuid },
}

impl PredictionTarget {
    pub fn subject(code: impl Into<String>) -> Self {
        PredictionTarget::Subject { code: code.into() }
    }

    pub fn session(session: &ExaminationSession) -> Self {
        PredictionTarget::Session {
            subject_code: session.subject_code.clone(),
            session_id: session.id,
        }
    }

    pub fn subject_code(&self) -> &str {
        match self {
            PredictionTarget::Subject { code } => code,
            PredictionTarget::Session { subject_code, .. } => subject_code,
        }
    }

    pub fn cache_key(&self) -> String {
        match self {
            PredictionTarget::Subject { code } => cache_keys::subject_probability(code),
            PredictionTarget::Session {
                subject_code,
                session_id,
            } => cache_keys::session_probability(subject_code, *session_id),
        }
    }
}
