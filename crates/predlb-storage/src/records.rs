use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use predlb_core::models::record::{ModalityKind, ModalityRecord};
use predlb_core::models::session::ExaminationSession;
use predlb_core::models::subject::{validate_code, Subject};
use predlb_core::models::user::User;
use predlb_core::object_keys;

use crate::error::StorageError;
use crate::objects::{FsBackend, MemoryBackend, ObjectBackend};
use crate::state::{load_json, load_json_opt, save_json};

/// Typed access to users, subjects, sessions, and modality records.
///
/// The store does not invalidate cached predictions itself. Call sites that
/// mutate prediction inputs are responsible for that.
pub struct RecordStore {
    backend: Box<dyn ObjectBackend>,
    // Held across every read-modify-write of a subject document and across
    // session numbering, so concurrent writers never drop each other's
    // fields and numbers stay dense.
    subjects: Mutex<()>,
}

impl RecordStore {
    pub fn new(backend: impl ObjectBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            subjects: Mutex::new(()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    pub fn on_disk(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        Ok(Self::new(FsBackend::new(root)?))
    }

    // ── Users ───────────────────────────────────────────────────────────────

    pub fn get_user(&self, id: Uuid) -> Result<User, StorageError> {
        load_json(self.backend.as_ref(), &object_keys::user(id))
    }

    pub fn save_user(&self, user: &User) -> Result<(), StorageError> {
        tracing::debug!(user_id = %user.id, "saving user");
        save_json(self.backend.as_ref(), &object_keys::user(user.id), user)
    }

    // ── Subjects ────────────────────────────────────────────────────────────

    pub fn get_subject(&self, code: &str) -> Result<Subject, StorageError> {
        validate_code(code)?;
        load_json(self.backend.as_ref(), &object_keys::subject(code))
    }

    fn lock_subjects(&self) -> MutexGuard<'_, ()> {
        self.subjects.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a new subject. Fails if the code is taken.
    pub fn create_subject(&self, subject: &Subject) -> Result<(), StorageError> {
        validate_code(&subject.code)?;
        let _guard = self.lock_subjects();
        let key = object_keys::subject(&subject.code);
        if self.backend.exists(&key)? {
            return Err(StorageError::AlreadyExists { key });
        }
        save_json(self.backend.as_ref(), &key, subject)
    }

    /// Insert or replace a subject's profile.
    ///
    /// `lbd_probability` and `last_examined_on` are maintained by the store
    /// and keep their stored values; the caller's copy may be stale.
    pub fn save_subject(&self, subject: &Subject) -> Result<(), StorageError> {
        validate_code(&subject.code)?;
        let key = object_keys::subject(&subject.code);
        let _guard = self.lock_subjects();

        let mut updated = subject.clone();
        if let Some(stored) = load_json_opt::<Subject>(self.backend.as_ref(), &key)? {
            updated.lbd_probability = stored.lbd_probability;
            updated.last_examined_on = stored.last_examined_on;
            updated.created_at = stored.created_at;
        }
        tracing::debug!(subject = %subject.code, "saving subject");
        save_json(self.backend.as_ref(), &key, &updated)
    }

    pub fn list_subjects(&self) -> Result<Vec<Subject>, StorageError> {
        self.backend
            .list(object_keys::SUBJECTS_PREFIX)?
            .iter()
            .map(|key| load_json(self.backend.as_ref(), key))
            .collect()
    }

    /// Refresh the denormalized probability without touching the profile.
    pub fn set_subject_probability(
        &self,
        code: &str,
        probability: Option<f64>,
    ) -> Result<(), StorageError> {
        let _guard = self.lock_subjects();
        let mut subject = self.get_subject(code)?;
        if subject.lbd_probability == probability {
            return Ok(());
        }
        subject.lbd_probability = probability;
        save_json(self.backend.as_ref(), &object_keys::subject(code), &subject)
    }

    // ── Sessions ────────────────────────────────────────────────────────────

    /// Create the next session for a subject, numbered one past the current
    /// maximum.
    pub fn create_session(
        &self,
        subject_code: &str,
        examined_on: Option<jiff::Timestamp>,
        description: Option<String>,
    ) -> Result<ExaminationSession, StorageError> {
        let _guard = self.lock_subjects();

        // The subject must exist.
        self.get_subject(subject_code)?;

        let next_number = self
            .list_sessions(subject_code)?
            .last()
            .map_or(1, |s| s.session_number + 1);

        let now = jiff::Timestamp::now();
        let session = ExaminationSession {
            id: Uuid::new_v4(),
            subject_code: subject_code.to_string(),
            session_number: next_number,
            description,
            examined_on,
            created_at: now,
            updated_at: now,
        };
        save_json(self.backend.as_ref(), &object_keys::session(session.id), &session)?;
        self.refresh_last_examined_on(subject_code)?;

        tracing::info!(
            subject = %subject_code,
            session_number = next_number,
            "examination session created"
        );
        Ok(session)
    }

    /// Update an existing session's metadata. The number and owner are kept.
    pub fn save_session(&self, session: &ExaminationSession) -> Result<(), StorageError> {
        let key = object_keys::session(session.id);
        let existing: ExaminationSession = load_json(self.backend.as_ref(), &key)?;
        let mut updated = session.clone();
        updated.subject_code = existing.subject_code;
        updated.session_number = existing.session_number;
        updated.updated_at = jiff::Timestamp::now();
        let _guard = self.lock_subjects();
        save_json(self.backend.as_ref(), &key, &updated)?;
        self.refresh_last_examined_on(&updated.subject_code)
    }

    pub fn get_session(&self, id: Uuid) -> Result<ExaminationSession, StorageError> {
        load_json(self.backend.as_ref(), &object_keys::session(id))
    }

    /// Sessions of a subject, ordered by session number ascending.
    pub fn list_sessions(&self, subject_code: &str) -> Result<Vec<ExaminationSession>, StorageError> {
        let mut sessions = Vec::new();
        for key in self.backend.list(object_keys::SESSIONS_PREFIX)? {
            let session: ExaminationSession = load_json(self.backend.as_ref(), &key)?;
            if session.subject_code == subject_code {
                sessions.push(session);
            }
        }
        sessions.sort_by_key(|s| s.session_number);
        Ok(sessions)
    }

    // Callers hold the subjects lock.
    fn refresh_last_examined_on(&self, subject_code: &str) -> Result<(), StorageError> {
        let latest = self
            .list_sessions(subject_code)?
            .iter()
            .filter_map(|s| s.examined_on)
            .max();
        let Some(latest) = latest else {
            return Ok(());
        };
        let mut subject = self.get_subject(subject_code)?;
        if subject.last_examined_on != Some(latest) {
            subject.last_examined_on = Some(latest);
            save_json(self.backend.as_ref(), &object_keys::subject(subject_code), &subject)?;
        }
        Ok(())
    }

    // ── Modality records ────────────────────────────────────────────────────

    pub fn get_record(
        &self,
        session_id: Uuid,
        modality: ModalityKind,
    ) -> Result<Option<ModalityRecord>, StorageError> {
        load_json_opt(self.backend.as_ref(), &object_keys::record(session_id, modality))
    }

    /// Insert or replace the record of one modality for a session.
    pub fn save_record(&self, record: &ModalityRecord) -> Result<(), StorageError> {
        // The session must exist.
        self.get_session(record.session_id)?;
        let key = object_keys::record(record.session_id, record.modality);
        let mut stored = record.clone();
        if let Some(previous) = load_json_opt::<ModalityRecord>(self.backend.as_ref(), &key)? {
            stored.created_at = previous.created_at;
            stored.updated_at = jiff::Timestamp::now();
        }
        tracing::debug!(
            session_id = %record.session_id,
            modality = %record.modality,
            "saving modality record"
        );
        save_json(self.backend.as_ref(), &key, &stored)
    }

    pub fn list_records(&self, session_id: Uuid) -> Result<Vec<ModalityRecord>, StorageError> {
        self.backend
            .list(&object_keys::session_records_prefix(session_id))?
            .iter()
            .map(|key| load_json(self.backend.as_ref(), key))
            .collect()
    }
}
