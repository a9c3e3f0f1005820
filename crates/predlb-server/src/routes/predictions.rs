use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use serde::Serialize;
use uuid::Uuid;

use predlb_core::models::target::PredictionTarget;
use predlb_features::present::format_probability;

use crate::error::ApiError;
use crate::routes::{acting_user_id, blocking, load_user};
use crate::state::AppState;

/// A probability as consumers render it. `probability` is `null` when no
/// prediction is available, and `display` is then empty.
#[derive(Debug, Serialize)]
pub struct ProbabilityView {
    pub probability: Option<f64>,
    pub display: String,
}

impl ProbabilityView {
    pub fn new(probability: Option<f64>) -> Self {
        Self {
            probability,
            display: format_probability(probability),
        }
    }
}

pub async fn subject_probability(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> Result<Json<ProbabilityView>, ApiError> {
    let user_id = acting_user_id(&headers)?;
    let probability = blocking(move || {
        let mut user = load_user(&state.store, user_id)?;
        Ok(state
            .cache
            .get_or_compute(&mut user, &PredictionTarget::subject(code))?)
    })
    .await?;
    Ok(Json(ProbabilityView::new(probability)))
}

pub async fn session_probability(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<ProbabilityView>, ApiError> {
    let user_id = acting_user_id(&headers)?;
    let probability = blocking(move || {
        let mut user = load_user(&state.store, user_id)?;
        let session = state.store.get_session(id)?;
        Ok(state
            .cache
            .get_or_compute(&mut user, &PredictionTarget::session(&session))?)
    })
    .await?;
    Ok(Json(ProbabilityView::new(probability)))
}
