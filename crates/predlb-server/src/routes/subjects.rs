use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use predlb_cache::mutations;
use predlb_core::models::subject::{Sex, Subject};

use crate::error::ApiError;
use crate::routes::blocking;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateSubject {
    pub code: String,
    pub age: u16,
    pub sex: Sex,
    #[serde(flatten)]
    pub profile: SubjectProfile,
}

/// Editable profile fields.
#[derive(Deserialize, Default)]
pub struct SubjectProfile {
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub diagnosed: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateSubject {
    pub age: Option<u16>,
    pub sex: Option<Sex>,
    #[serde(flatten)]
    pub profile: SubjectProfile,
}

fn apply_profile(subject: &mut Subject, profile: SubjectProfile) {
    if profile.nationality.is_some() {
        subject.nationality = profile.nationality;
    }
    if profile.organization.is_some() {
        subject.organization = profile.organization;
    }
    if let Some(diagnosed) = profile.diagnosed {
        subject.diagnosed = diagnosed;
    }
    if profile.description.is_some() {
        subject.description = profile.description;
    }
}

pub async fn list_subjects(State(state): State<AppState>) -> Result<Json<Vec<Subject>>, ApiError> {
    let subjects = blocking(move || Ok(state.store.list_subjects()?)).await?;
    Ok(Json(subjects))
}

pub async fn get_subject(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Subject>, ApiError> {
    let subject = blocking(move || Ok(state.store.get_subject(&code)?)).await?;
    Ok(Json(subject))
}

pub async fn create_subject(
    State(state): State<AppState>,
    Json(req): Json<CreateSubject>,
) -> Result<(StatusCode, Json<Subject>), ApiError> {
    let mut subject = Subject::new(req.code, req.age, req.sex)?;
    apply_profile(&mut subject, req.profile);

    let created = subject.clone();
    blocking(move || Ok(mutations::create_subject(&state.store, &state.cache, &created)?)).await?;
    Ok((StatusCode::CREATED, Json(subject)))
}

pub async fn update_subject(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(req): Json<UpdateSubject>,
) -> Result<Json<Subject>, ApiError> {
    let subject = blocking(move || {
        let mut subject = state.store.get_subject(&code)?;
        if let Some(age) = req.age {
            subject.age = age;
        }
        if let Some(sex) = req.sex {
            subject.sex = sex;
        }
        apply_profile(&mut subject, req.profile);
        mutations::save_subject(&state.store, &state.cache, &subject)?;
        Ok(state.store.get_subject(&code)?)
    })
    .await?;
    Ok(Json(subject))
}
