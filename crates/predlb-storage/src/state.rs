use serde::{de::DeserializeOwned, Serialize};

use crate::error::StorageError;
use crate::objects::ObjectBackend;

/// Load a JSON document.
pub fn load_json<T: DeserializeOwned>(
    backend: &dyn ObjectBackend,
    key: &str,
) -> Result<T, StorageError> {
    let body = backend.get(key)?;
    Ok(serde_json::from_slice(&body)?)
}

/// Load a JSON document, mapping a missing key to `None`.
pub fn load_json_opt<T: DeserializeOwned>(
    backend: &dyn ObjectBackend,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match load_json(backend, key) {
        Ok(value) => Ok(Some(value)),
        Err(StorageError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Save a JSON document, replacing any previous version.
pub fn save_json<T: Serialize>(
    backend: &dyn ObjectBackend,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let body = serde_json::to_vec_pretty(value)?;
    backend.put(key, body)
}
