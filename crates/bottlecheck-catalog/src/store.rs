//! Durable on-disk store for the raw catalog response.
//!
//! One JSON file per key under the cache directory, shaped
//! `{"data": <raw response>, "timestamp": <epoch ms>}`. Writes go to a
//! temporary sibling first and are renamed into place, so a crash mid-write
//! never leaves a truncated record behind.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Key of the catalog record.
pub const CACHE_KEY: &str = "baxusApiCache";

/// A persisted catalog response and the time it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub data: serde_json::Value,
    /// Fetch time in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl CacheRecord {
    #[must_use]
    pub fn new(data: serde_json::Value, fetched_at: DateTime<Utc>) -> Self {
        Self {
            data,
            timestamp: fetched_at.timestamp_millis(),
        }
    }

    /// The fetch time, or `None` if the stored timestamp is out of range.
    #[must_use]
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Reads the record stored under `key`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Io`] if the file exists but cannot be read.
    /// - [`StoreError::Json`] if the file is not a valid record.
    pub async fn load(&self, key: &str) -> Result<Option<CacheRecord>, StoreError> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Writes `record` under `key`, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory or file cannot be written.
    pub async fn save(&self, key: &str, record: &CacheRecord) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec(record)?;

        if let Err(e) = tokio::fs::write(&tmp, &bytes).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Deletes the record stored under `key`. Missing records are not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be removed.
    pub async fn remove(&self, key: &str) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn load_missing_key_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.load(CACHE_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_preserves_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        let record = CacheRecord {
            data: json!([{"_id": "a"}]),
            timestamp: 1_700_000_000_000,
        };
        store.save(CACHE_KEY, &record).await.unwrap();

        assert!(dir.path().join("nested/baxusApiCache.json").exists());
        assert!(!dir.path().join("nested/baxusApiCache.json.tmp").exists());
        assert_eq!(store.load(CACHE_KEY).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn corrupt_record_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("baxusApiCache.json"), b"{\"data\": [").unwrap();
        let store = FileStore::new(dir.path());
        let err = store.load(CACHE_KEY).await.unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store
            .save(CACHE_KEY, &CacheRecord { data: json!([]), timestamp: 0 })
            .await
            .unwrap();
        store.remove(CACHE_KEY).await.unwrap();
        store.remove(CACHE_KEY).await.unwrap();
        assert!(store.load(CACHE_KEY).await.unwrap().is_none());
    }

    #[test]
    fn record_round_trips_timestamp() {
        let at = DateTime::from_timestamp_millis(1_700_000_123_456).unwrap();
        let record = CacheRecord::new(json!([]), at);
        assert_eq!(record.timestamp, 1_700_000_123_456);
        assert_eq!(record.fetched_at(), Some(at));
    }
}
