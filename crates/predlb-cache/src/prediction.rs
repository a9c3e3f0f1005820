use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tracing::{debug, info};
use uuid::Uuid;

use predlb_core::cache_keys;
use predlb_core::models::session::ExaminationSession;
use predlb_core::models::subject::Subject;
use predlb_core::models::target::PredictionTarget;
use predlb_core::models::user::User;
use predlb_features::config::DataConfig;
use predlb_features::extract::FeatureExtractor;
use predlb_features::preprocess::preprocess;
use predlb_predictor::ProbabilityPredictor;
use predlb_storage::RecordStore;

use crate::error::PredictionError;
use crate::store::CacheStore;

/// Memoizes probabilities for subjects and sessions.
///
/// Only successful predictions are cached; an absent prediction is
/// recomputed on the next request.
pub struct PredictionCache {
    store: Arc<RecordStore>,
    // Bumped by every invalidation. A compute that started under an older
    // generation returns its result but does not write it back.
    generation: RwLock<u64>,
    cache: Arc<dyn CacheStore>,
    predictor: Arc<dyn ProbabilityPredictor>,
    data: Arc<DataConfig>,
    model: String,
    ttl: Duration,
}

impl PredictionCache {
    pub fn new(
        store: Arc<RecordStore>,
        cache: Arc<dyn CacheStore>,
        predictor: Arc<dyn ProbabilityPredictor>,
        data: Arc<DataConfig>,
        model: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            generation: RwLock::new(0),
            cache,
            predictor,
            data,
            model: model.into(),
            ttl,
        }
    }

    pub fn predictor(&self) -> &dyn ProbabilityPredictor {
        self.predictor.as_ref()
    }

    /// Cached probability for a target, computing it on a miss.
    ///
    /// `Ok(None)` means no prediction is available. Errors are reserved for
    /// storage and configuration defects.
    pub fn get_or_compute(
        &self,
        user: &mut User,
        target: &PredictionTarget,
    ) -> Result<Option<f64>, PredictionError> {
        let started = self.current_generation();
        match target {
            PredictionTarget::Subject { code } => self.subject_probability(user, code, started),
            PredictionTarget::Session { session_id, .. } => {
                let session = self.store.get_session(*session_id)?;
                let subject = self.store.get_subject(&session.subject_code)?;
                self.session_probability(user, &subject, &session, started)
            }
        }
    }

    fn current_generation(&self) -> u64 {
        *self.generation.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `write` only if no invalidation happened since `started`. The
    /// read guard is held across the write so an invalidation cannot slip
    /// in between the check and the write.
    fn write_back<F>(&self, started: u64, key: &str, write: F) -> Result<(), PredictionError>
    where
        F: FnOnce() -> Result<(), PredictionError>,
    {
        let generation = self.generation.read().unwrap_or_else(PoisonError::into_inner);
        if *generation != started {
            debug!(key = %key, "inputs changed during compute, result not cached");
            return Ok(());
        }
        write()
    }

    /// Newest session that yields a prediction decides the subject's
    /// probability. The result is also written to the subject record.
    fn subject_probability(
        &self,
        user: &mut User,
        code: &str,
        started: u64,
    ) -> Result<Option<f64>, PredictionError> {
        let key = cache_keys::subject_probability(code);
        if let Some(probability) = self.cache.get(&key) {
            debug!(key = %key, "prediction cache hit");
            return Ok(Some(probability));
        }

        let subject = self.store.get_subject(code)?;
        let sessions = self.store.list_sessions(code)?;
        for session in sessions.iter().rev() {
            if let Some(probability) = self.session_probability(user, &subject, session, started)? {
                self.write_back(started, &key, || {
                    self.cache.set(&key, probability, self.ttl);
                    Ok(self.store.set_subject_probability(code, Some(probability))?)
                })?;
                info!(
                    subject = code,
                    session_number = session.session_number,
                    probability,
                    "subject probability computed"
                );
                return Ok(Some(probability));
            }
        }
        debug!(subject = code, sessions = sessions.len(), "no session yields a prediction");
        // The stored copy must not outlive the inputs it was computed from.
        self.write_back(started, &key, || Ok(self.store.set_subject_probability(code, None)?))?;
        Ok(None)
    }

    fn session_probability(
        &self,
        user: &mut User,
        subject: &Subject,
        session: &ExaminationSession,
        started: u64,
    ) -> Result<Option<f64>, PredictionError> {
        let key = cache_keys::session_probability(&subject.code, session.id);
        if let Some(probability) = self.cache.get(&key) {
            debug!(key = %key, "prediction cache hit");
            return Ok(Some(probability));
        }
        debug!(key = %key, "prediction cache miss");

        let records = self.store.list_records(session.id)?;
        let Some(raw) = FeatureExtractor::new(&self.data).extract_session(subject, &records) else {
            return Ok(None);
        };
        let features = preprocess(&self.data, &raw)?;

        let probability = self.predictor.predict_probability(user, &features, &self.model);
        if let Some(probability) = probability {
            self.write_back(started, &key, || {
                self.cache.set(&key, probability, self.ttl);
                Ok(())
            })?;
        }
        Ok(probability)
    }

    /// Drop cached probabilities a change to `target` could affect.
    ///
    /// A session drops its own entry and its subject's. A subject drops its
    /// entry and those of all its sessions, since subject features feed
    /// every session vector.
    ///
    /// Computes already in flight still return their result to their caller
    /// but no longer write it to the cache or the subject record.
    pub fn invalidate(&self, target: &PredictionTarget) -> Result<(), PredictionError> {
        let keys = match target {
            PredictionTarget::Session { subject_code, session_id } => vec![
                cache_keys::session_probability(subject_code, *session_id),
                cache_keys::subject_probability(subject_code),
            ],
            PredictionTarget::Subject { code } => {
                let mut keys = vec![cache_keys::subject_probability(code)];
                keys.extend(
                    self.store
                        .list_sessions(code)?
                        .iter()
                        .map(|s| cache_keys::session_probability(code, s.id)),
                );
                keys
            }
        };
        info!(key = %target.cache_key(), entries = keys.len(), "invalidating cached predictions");
        let mut generation = self.generation.write().unwrap_or_else(PoisonError::into_inner);
        *generation += 1;
        self.cache.delete_many(&keys);
        Ok(())
    }

    pub fn invalidate_session(&self, session_id: Uuid) -> Result<(), PredictionError> {
        let session = self.store.get_session(session_id)?;
        self.invalidate(&PredictionTarget::session(&session))
    }
}
