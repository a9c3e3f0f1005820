//! Object key/path conventions.
//!
//! Pure string functions. These define the canonical layout of records in
//! the backing object store, whether in memory or on disk.

use uuid::Uuid;

use crate::models::record::ModalityKind;

pub const USERS_PREFIX: &str = "users/";

pub const SUBJECTS_PREFIX: &str = "subjects/";

pub const SESSIONS_PREFIX: &str = "sessions/";

pub fn user(id: Uuid) -> String {
    format!("users/{id}.json")
}

pub fn subject(code: &str) -> String {
    format!("subjects/{code}.json")
}

pub fn session(id: Uuid) -> String {
    format!("sessions/{id}.json")
}

pub fn session_records_prefix(session_id: Uuid) -> String {
    format!("records/{session_id}/")
}

pub fn record(session_id: Uuid, modality: ModalityKind) -> String {
    format!("records/{session_id}/{modality}.json")
}
