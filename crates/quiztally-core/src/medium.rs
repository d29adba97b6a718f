//! Key-value persistence media.
//!
//! A medium stores whole string values under string keys and replaces them
//! atomically. The response store layers its collection on top of one key.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::StorageError;

/// Trait for local key-value persistence backends.
#[async_trait]
pub trait KeyValueMedium: Send + Sync {
    /// Human-readable medium name (e.g. "memory").
    fn name(&self) -> &str;

    /// Read the value under `key`, or `None` if nothing was ever written.
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value under `key`. Either the whole value is written or
    /// the previous value is left untouched.
    async fn write(&self, key: &str, value: String) -> Result<(), StorageError>;
}

fn check_quota(key: &str, value: &str, quota: Option<u64>) -> Result<(), StorageError> {
    let size = value.len() as u64;
    match quota {
        Some(limit) if size > limit => Err(StorageError::QuotaExceeded {
            key: key.to_string(),
            size,
            limit,
        }),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// In-memory medium
// ---------------------------------------------------------------------------

/// A process-local medium, used for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryMedium {
    values: Mutex<HashMap<String, String>>,
    quota_bytes: Option<u64>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes whose value is larger than `bytes`.
    pub fn with_quota(mut self, bytes: u64) -> Self {
        self.quota_bytes = Some(bytes);
        self
    }

    /// Seed a raw value, bypassing the quota.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }
}

#[async_trait]
impl KeyValueMedium for MemoryMedium {
    fn name(&self) -> &str {
        "memory"
    }

    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    async fn write(&self, key: &str, value: String) -> Result<(), StorageError> {
        check_quota(key, &value, self.quota_bytes)?;
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Directory-backed medium
// ---------------------------------------------------------------------------

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so a failed write never leaves a truncated value behind.
#[derive(Debug, Clone)]
pub struct FileMedium {
    dir: PathBuf,
    quota_bytes: Option<u64>,
}

impl FileMedium {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            quota_bytes: None,
        }
    }

    /// Reject writes whose value is larger than `bytes`.
    pub fn with_quota(mut self, bytes: u64) -> Self {
        self.quota_bytes = Some(bytes);
        self
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn write_atomic(dir: &Path, target: &Path, value: &str) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(value.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl KeyValueMedium for FileMedium {
    fn name(&self) -> &str {
        "file"
    }

    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    async fn write(&self, key: &str, value: String) -> Result<(), StorageError> {
        check_quota(key, &value, self.quota_bytes)?;

        let dir = self.dir.clone();
        let target = self.path_for(key);
        tracing::debug!("writing {} bytes to {}", value.len(), target.display());

        let result = tokio::task::spawn_blocking(move || write_atomic(&dir, &target, &value))
            .await
            .unwrap_or_else(|join_err| Err(std::io::Error::other(join_err)));

        result.map_err(|source| StorageError::Write {
            key: key.to_string(),
            source,
        })
    }
}
