use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use crate::error::StorageError;

/// Minimal key/value object store the record layer is built on.
///
/// Keys are `/`-separated paths such as `sessions/{id}.json`.
pub trait ObjectBackend: Send + Sync {
    /// Get an object body.
    fn get(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Put an object, replacing any previous body.
    fn put(&self, key: &str, body: Vec<u8>) -> Result<(), StorageError>;

    /// Delete an object. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// List keys under a prefix, sorted.
    fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;

    fn exists(&self, key: &str) -> Result<bool, StorageError> {
        match self.get(key) {
            Ok(_) => Ok(true),
            Err(StorageError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Process-local backend. Contents are lost on exit.
#[derive(Default)]
pub struct MemoryBackend {
    objects: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObjectBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })
    }

    fn put(&self, key: &str, body: Vec<u8>) -> Result<(), StorageError> {
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), body);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let objects = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        Ok(objects
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect())
    }
}

/// Local-disk backend rooted at a directory. Writes go to a temp file that
/// is renamed into place, so readers never observe a partial document.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|source| StorageError::Io {
            key: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        key.split('/')
            .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }
}

fn io_error(key: &str, source: std::io::Error) -> StorageError {
    if source.kind() == ErrorKind::NotFound {
        StorageError::NotFound {
            key: key.to_string(),
        }
    } else {
        StorageError::Io {
            key: key.to_string(),
            source,
        }
    }
}

impl ObjectBackend for FsBackend {
    fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        std::fs::read(self.path_for(key)).map_err(|e| io_error(key, e))
    }

    fn put(&self, key: &str, body: Vec<u8>) -> Result<(), StorageError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_error(key, e))?;
        }
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &body).map_err(|e| io_error(key, e))?;
        std::fs::rename(&tmp_path, &path).map_err(|e| io_error(key, e))?;
        tracing::debug!(path = %path.display(), "object written");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        // Walk from the deepest complete directory named by the prefix.
        let dir_part = match prefix.rfind('/') {
            Some(idx) => &prefix[..idx],
            None => "",
        };
        let mut keys = Vec::new();
        let start = self.path_for(dir_part);
        if start.is_dir() {
            walk(&start, dir_part, &mut keys).map_err(|e| io_error(prefix, e))?;
        }
        keys.retain(|key| key.starts_with(prefix) && !key.ends_with(".tmp"));
        keys.sort();
        Ok(keys)
    }
}

fn walk(dir: &Path, key_prefix: &str, keys: &mut Vec<String>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let key = if key_prefix.is_empty() {
            name
        } else {
            format!("{key_prefix}/{name}")
        };
        if entry.file_type()?.is_dir() {
            walk(&entry.path(), &key, keys)?;
        } else {
            keys.push(key);
        }
    }
    Ok(())
}
