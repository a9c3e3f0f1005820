use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One numbered visit of a subject. Numbers are dense per subject and start
/// at 1; the store assigns them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExaminationSession {
    pub id: Uuid,
    pub subject_code: String,
    pub session_number: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub examined_on: Option<jiff::Timestamp>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}
