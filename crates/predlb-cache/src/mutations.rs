//! Storage mutations that change prediction inputs.
//!
//! Each call site saves through the [`RecordStore`] and then invalidates
//! the affected cache entries itself, so a later request never sees a
//! probability computed from superseded data.

use predlb_core::models::record::ModalityRecord;
use predlb_core::models::session::ExaminationSession;
use predlb_core::models::subject::Subject;
use predlb_core::models::target::PredictionTarget;
use predlb_core::models::user::User;
use predlb_predictor::ProbabilityPredictor;
use predlb_predictor::onboarding::onboard;
use predlb_storage::RecordStore;

use crate::error::PredictionError;
use crate::prediction::PredictionCache;

pub fn create_subject(
    store: &RecordStore,
    cache: &PredictionCache,
    subject: &Subject,
) -> Result<(), PredictionError> {
    store.create_subject(subject)?;
    cache.invalidate(&PredictionTarget::subject(&subject.code))
}

/// Replace a subject's profile.
pub fn save_subject(
    store: &RecordStore,
    cache: &PredictionCache,
    subject: &Subject,
) -> Result<(), PredictionError> {
    let mut updated = subject.clone();
    updated.updated_at = jiff::Timestamp::now();
    store.save_subject(&updated)?;
    cache.invalidate(&PredictionTarget::subject(&subject.code))
}

/// Insert or replace a session's modality record.
pub fn save_record(
    store: &RecordStore,
    cache: &PredictionCache,
    record: &ModalityRecord,
) -> Result<ExaminationSession, PredictionError> {
    store.save_record(record)?;
    let session = store.get_session(record.session_id)?;
    cache.invalidate(&PredictionTarget::session(&session))?;
    Ok(session)
}

/// Create a clinician account, onboarding it with the scoring service.
pub fn create_user(
    store: &RecordStore,
    predictor: &dyn ProbabilityPredictor,
    username: &str,
    organization: Option<String>,
) -> Result<User, PredictionError> {
    let mut user = User::new(username, organization);
    onboard(&mut user, predictor);
    store.save_user(&user)?;
    Ok(user)
}
