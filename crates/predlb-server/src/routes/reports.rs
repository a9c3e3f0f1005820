use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use serde::Serialize;
use uuid::Uuid;

use predlb_core::models::record::ModalityKind;
use predlb_core::models::subject::Subject;
use predlb_core::models::target::PredictionTarget;

use crate::error::ApiError;
use crate::routes::predictions::ProbabilityView;
use crate::routes::{acting_user_id, blocking, load_user};
use crate::state::AppState;

#[derive(Serialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub session_number: u32,
    pub examined_on: Option<jiff::Timestamp>,
    pub modalities: Vec<ModalityKind>,
    pub lbd_probability: ProbabilityView,
}

/// Everything a subject report renders: the profile, the subject-level
/// probability, and each session with its own probability.
#[derive(Serialize)]
pub struct SubjectReport {
    pub subject: Subject,
    pub lbd_probability: ProbabilityView,
    pub sessions: Vec<SessionSummary>,
}

pub async fn subject_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> Result<Json<SubjectReport>, ApiError> {
    let user_id = acting_user_id(&headers)?;
    let report = blocking(move || {
        let mut user = load_user(&state.store, user_id)?;
        let overall = state
            .cache
            .get_or_compute(&mut user, &PredictionTarget::subject(&code))?;

        let mut sessions = Vec::new();
        for session in state.store.list_sessions(&code)? {
            let probability = state
                .cache
                .get_or_compute(&mut user, &PredictionTarget::session(&session))?;
            let modalities = state
                .store
                .list_records(session.id)?
                .into_iter()
                .map(|r| r.modality)
                .collect();
            sessions.push(SessionSummary {
                id: session.id,
                session_number: session.session_number,
                examined_on: session.examined_on,
                modalities,
                lbd_probability: ProbabilityView::new(probability),
            });
        }

        // Read after prediction so the denormalized probability is current.
        let subject = state.store.get_subject(&code)?;
        Ok(SubjectReport {
            subject,
            lbd_probability: ProbabilityView::new(overall),
            sessions,
        })
    })
    .await?;
    Ok(Json(report))
}
