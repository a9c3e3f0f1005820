use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::features::FeatureValue;

/// One category of clinical examination data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalityKind {
    Acoustic,
    Actigraphy,
    Handwriting,
    Psychology,
    Tcs,
    Cei,
    Questionnaire,
}

impl ModalityKind {
    pub const ALL: [ModalityKind; 7] = [
        ModalityKind::Acoustic,
        ModalityKind::Actigraphy,
        ModalityKind::Handwriting,
        ModalityKind::Psychology,
        ModalityKind::Tcs,
        ModalityKind::Cei,
        ModalityKind::Questionnaire,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModalityKind::Acoustic => "acoustic",
            ModalityKind::Actigraphy => "actigraphy",
            ModalityKind::Handwriting => "handwriting",
            ModalityKind::Psychology => "psychology",
            ModalityKind::Tcs => "tcs",
            ModalityKind::Cei => "cei",
            ModalityKind::Questionnaire => "questionnaire",
        }
    }
}

impl fmt::Display for ModalityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModalityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModalityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoreError::UnknownModality(s.to_string()))
    }
}

/// A single labeled entry of an imported feature table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEntry {
    pub label: String,
    pub value: Option<FeatureValue>,
}

/// Stored payload of a modality record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordData {
    /// Key/value feature table, in file order.
    FeatureTable { features: Vec<FeatureEntry> },
    /// Questionnaire answers as 1-based option indices, keyed by question id.
    Questionnaire {
        answers: std::collections::BTreeMap<String, Option<u8>>,
    },
}

/// Examination data of one modality for one session. At most one per
/// (session, modality); saving replaces the previous record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModalityRecord {
    pub session_id: Uuid,
    pub modality: ModalityKind,
    #[serde(default)]
    pub description: Option<String>,
    pub data: RecordData,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl ModalityRecord {
    pub fn new(session_id: Uuid, modality: ModalityKind, data: RecordData) -> Self {
        let now = jiff::Timestamp::now();
        Self {
            session_id,
            modality,
            description: None,
            data,
            created_at: now,
            updated_at: now,
        }
    }
}
