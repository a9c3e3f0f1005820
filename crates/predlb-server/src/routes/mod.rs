pub mod health;
pub mod modalities;
pub mod predictions;
pub mod records;
pub mod reports;
pub mod sessions;
pub mod subjects;
pub mod users;

use axum::http::HeaderMap;
use uuid::Uuid;

use predlb_core::models::user::User;
use predlb_storage::RecordStore;

use crate::error::ApiError;

/// Header naming the clinician a request acts for.
pub const USER_HEADER: &str = "x-user-id";

/// Run store and pipeline work off the async executor.
pub(crate) async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await?
}

pub(crate) fn acting_user_id(headers: &HeaderMap) -> Result<Uuid, ApiError> {
    let value = headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized(format!("missing {USER_HEADER} header")))?;
    value
        .parse()
        .map_err(|_| ApiError::Unauthorized(format!("malformed {USER_HEADER} header")))
}

pub(crate) fn load_user(store: &RecordStore, id: Uuid) -> Result<User, ApiError> {
    store.get_user(id).map_err(|e| {
        if e.is_not_found() {
            ApiError::Unauthorized(format!("unknown user {id}"))
        } else {
            e.into()
        }
    })
}
