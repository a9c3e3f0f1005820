use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use predlb_core::models::record::ModalityRecord;
use predlb_core::models::session::ExaminationSession;

use crate::error::ApiError;
use crate::routes::blocking;
use crate::state::AppState;

#[derive(Deserialize, Default)]
pub struct CreateSession {
    #[serde(default)]
    pub examined_on: Option<jiff::Timestamp>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Serialize)]
pub struct SessionDetail {
    #[serde(flatten)]
    pub session: ExaminationSession,
    pub records: Vec<ModalityRecord>,
}

pub async fn list_sessions(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Vec<ExaminationSession>>, ApiError> {
    let sessions = blocking(move || {
        // 404 for an unknown subject rather than an empty list.
        state.store.get_subject(&code)?;
        Ok(state.store.list_sessions(&code)?)
    })
    .await?;
    Ok(Json(sessions))
}

pub async fn create_session(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(req): Json<CreateSession>,
) -> Result<(StatusCode, Json<ExaminationSession>), ApiError> {
    let session = blocking(move || {
        Ok(state
            .store
            .create_session(&code, req.examined_on, req.description)?)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionDetail>, ApiError> {
    let detail = blocking(move || {
        let session = state.store.get_session(id)?;
        let records = state.store.list_records(id)?;
        Ok(SessionDetail { session, records })
    })
    .await?;
    Ok(Json(detail))
}
