use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use predlb_cache::mutations;
use predlb_core::models::user::{AuthState, User};

use crate::error::ApiError;
use crate::routes::blocking;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateUser {
    pub username: String,
    #[serde(default)]
    pub organization: Option<String>,
}

/// Public view of a user. Predictor secrets are never returned.
#[derive(Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub organization: Option<String>,
    pub predictor_username: String,
    pub predictor_registered: bool,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            organization: user.organization.clone(),
            predictor_username: user.predictor.username.clone(),
            predictor_registered: user.predictor.auth_state() != AuthState::Unregistered,
        }
    }
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUser>,
) -> Result<(StatusCode, Json<UserView>), ApiError> {
    if req.username.trim().is_empty() {
        return Err(ApiError::BadRequest("username must not be empty".to_string()));
    }
    let user = blocking(move || {
        let user = mutations::create_user(
            &state.store,
            state.predictor.as_ref(),
            req.username.trim(),
            req.organization,
        )?;
        Ok(user)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(UserView::from(&user))))
}
