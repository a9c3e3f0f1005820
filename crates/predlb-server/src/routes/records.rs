use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use uuid::Uuid;

use predlb_cache::mutations;
use predlb_core::models::record::{ModalityKind, ModalityRecord, RecordData};

use crate::error::ApiError;
use crate::routes::blocking;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RecordBody {
    #[serde(default)]
    pub description: Option<String>,
    pub data: RecordData,
}

/// Insert or replace one modality record of a session. Cached predictions
/// for the session and its subject are dropped.
pub async fn put_record(
    State(state): State<AppState>,
    Path((session_id, modality)): Path<(Uuid, String)>,
    Json(body): Json<RecordBody>,
) -> Result<Json<ModalityRecord>, ApiError> {
    let modality: ModalityKind = modality.parse()?;
    let is_questionnaire = matches!(body.data, RecordData::Questionnaire { .. });
    if is_questionnaire != (modality == ModalityKind::Questionnaire) {
        return Err(ApiError::BadRequest(format!(
            "record data does not match modality '{modality}'"
        )));
    }

    let mut record = ModalityRecord::new(session_id, modality, body.data);
    record.description = body.description;

    let saved = blocking(move || {
        mutations::save_record(&state.store, &state.cache, &record)?;
        state
            .store
            .get_record(session_id, modality)?
            .ok_or_else(|| ApiError::Internal(format!("record {modality} of {session_id} vanished")))
    })
    .await?;
    Ok(Json(saved))
}
