//! Time-bounded catalog cache with single-flight refresh.
//!
//! Lookup order on every call:
//! 1. the in-memory snapshot, if still within the TTL;
//! 2. the durable record under [`CACHE_KEY`], if still within the TTL (this
//!    is what lets a fresh process skip the network);
//! 3. one fetch from the remote endpoint, persisted on success.
//!
//! The state mutex is held across the fetch, so callers arriving while a
//! fetch is in flight wait for it instead of starting their own. Callers
//! that waited through a failed fetch receive that same error rather than
//! issuing another request.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use bottlecheck_core::{AppConfig, CatalogSnapshot};
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;

use crate::client::CatalogClient;
use crate::error::FetchError;
use crate::store::{CacheRecord, FileStore, CACHE_KEY};
use crate::types::decode_listings;

/// A fetch error shared between every caller that waited on the same fetch.
pub type SharedFetchError = Arc<FetchError>;

/// Snapshot bookkeeping for [`CatalogCache::status`].
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStatus {
    pub entries: usize,
    pub fetched_at: DateTime<Utc>,
    pub age: TimeDelta,
    pub fresh: bool,
}

#[derive(Default)]
struct CacheState {
    snapshot: Option<Arc<CatalogSnapshot>>,
    last_error: Option<SharedFetchError>,
}

pub struct CatalogCache {
    client: CatalogClient,
    store: FileStore,
    ttl: TimeDelta,
    state: Mutex<CacheState>,
    /// Completed fetch attempts; bumped while holding `state`.
    attempts: AtomicU64,
}

impl CatalogCache {
    #[must_use]
    pub fn new(client: CatalogClient, store: FileStore, ttl: TimeDelta) -> Self {
        Self {
            client,
            store,
            ttl,
            state: Mutex::new(CacheState::default()),
            attempts: AtomicU64::new(0),
        }
    }

    /// Builds the client and durable store from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the catalog client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let client = CatalogClient::new(
            &config.catalog_url,
            config.catalog_page_size,
            config.request_timeout_secs,
            &config.user_agent,
        )?;
        let store = FileStore::new(config.cache_dir.clone());
        Ok(Self::new(client, store, config.cache_ttl()))
    }

    #[must_use]
    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Returns a snapshot that is fresh as of now, fetching if necessary.
    ///
    /// # Errors
    ///
    /// Returns the [`FetchError`] of the fetch this call performed or waited
    /// on. The previously held snapshot is left untouched.
    pub async fn get_snapshot(&self) -> Result<Arc<CatalogSnapshot>, SharedFetchError> {
        self.get_snapshot_at(Utc::now()).await
    }

    /// [`CatalogCache::get_snapshot`] with an explicit clock reading.
    ///
    /// # Errors
    ///
    /// See [`CatalogCache::get_snapshot`].
    pub async fn get_snapshot_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Arc<CatalogSnapshot>, SharedFetchError> {
        let attempts_seen = self.attempts.load(Ordering::Acquire);
        let mut state = self.state.lock().await;

        if let Some(snapshot) = state
            .snapshot
            .as_ref()
            .filter(|s| s.is_fresh_at(now, self.ttl))
        {
            tracing::debug!(entries = snapshot.len(), "catalog cache hit (memory)");
            return Ok(Arc::clone(snapshot));
        }

        if self.attempts.load(Ordering::Acquire) != attempts_seen {
            if let Some(err) = &state.last_error {
                tracing::debug!("sharing result of failed in-flight catalog fetch");
                return Err(Arc::clone(err));
            }
        }

        if let Some(snapshot) = self.load_persisted(now).await {
            tracing::debug!(entries = snapshot.len(), "catalog cache hit (durable store)");
            let snapshot = Arc::new(snapshot);
            state.snapshot = Some(Arc::clone(&snapshot));
            return Ok(snapshot);
        }

        self.fetch_locked(&mut state, now).await
    }

    /// Fetches unconditionally, replacing the snapshot on success.
    ///
    /// # Errors
    ///
    /// Returns the [`FetchError`] of the fetch; the previous snapshot is kept.
    pub async fn refresh(&self) -> Result<Arc<CatalogSnapshot>, SharedFetchError> {
        self.refresh_at(Utc::now()).await
    }

    /// [`CatalogCache::refresh`] with an explicit clock reading.
    ///
    /// # Errors
    ///
    /// See [`CatalogCache::refresh`].
    pub async fn refresh_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Arc<CatalogSnapshot>, SharedFetchError> {
        let mut state = self.state.lock().await;
        self.fetch_locked(&mut state, now).await
    }

    /// Describes the snapshot currently held in memory, or else the durable
    /// record. Never touches the network.
    pub async fn status(&self) -> Option<CacheStatus> {
        self.status_at(Utc::now()).await
    }

    /// [`CatalogCache::status`] with an explicit clock reading.
    pub async fn status_at(&self, now: DateTime<Utc>) -> Option<CacheStatus> {
        let state = self.state.lock().await;
        let snapshot = match &state.snapshot {
            Some(snapshot) => Arc::clone(snapshot),
            None => Arc::new(self.load_record().await?),
        };
        Some(CacheStatus {
            entries: snapshot.len(),
            fetched_at: snapshot.fetched_at,
            age: snapshot.age_at(now),
            fresh: snapshot.is_fresh_at(now, self.ttl),
        })
    }

    async fn fetch_locked(
        &self,
        state: &mut CacheState,
        now: DateTime<Utc>,
    ) -> Result<Arc<CatalogSnapshot>, SharedFetchError> {
        let started = Instant::now();
        tracing::info!(url = self.client.url(), "fetching catalog");

        let result = match self.client.fetch_raw().await {
            Ok(raw) => decode_listings(&raw, self.client.url()).map(|entries| (raw, entries)),
            Err(e) => Err(e),
        };
        self.attempts.fetch_add(1, Ordering::Release);

        match result {
            Ok((raw, entries)) => {
                tracing::info!(
                    entries = entries.len(),
                    elapsed = ?started.elapsed(),
                    "catalog fetched"
                );
                if let Err(e) = self.store.save(CACHE_KEY, &CacheRecord::new(raw, now)).await {
                    tracing::warn!(
                        dir = %self.store.dir().display(),
                        error = %e,
                        "could not persist catalog cache record"
                    );
                }
                let snapshot = Arc::new(CatalogSnapshot::new(entries, now));
                state.snapshot = Some(Arc::clone(&snapshot));
                state.last_error = None;
                Ok(snapshot)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    elapsed = ?started.elapsed(),
                    "catalog fetch failed"
                );
                let err = Arc::new(e);
                state.last_error = Some(Arc::clone(&err));
                Err(err)
            }
        }
    }

    /// Loads the durable record if it is still within the TTL at `now`.
    async fn load_persisted(&self, now: DateTime<Utc>) -> Option<CatalogSnapshot> {
        self.load_record()
            .await
            .filter(|snapshot| snapshot.is_fresh_at(now, self.ttl))
    }

    /// Loads and decodes the durable record regardless of age. Unreadable
    /// records are discarded so the next fetch rewrites them.
    async fn load_record(&self) -> Option<CatalogSnapshot> {
        let record = match self.store.load(CACHE_KEY).await {
            Ok(record) => record?,
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable catalog cache record");
                self.discard_record().await;
                return None;
            }
        };

        let Some(fetched_at) = record.fetched_at() else {
            tracing::warn!(
                timestamp = record.timestamp,
                "discarding catalog cache record with out-of-range timestamp"
            );
            self.discard_record().await;
            return None;
        };

        match decode_listings(&record.data, CACHE_KEY) {
            Ok(entries) => Some(CatalogSnapshot::new(entries, fetched_at)),
            Err(e) => {
                tracing::warn!(error = %e, "discarding undecodable catalog cache record");
                self.discard_record().await;
                None
            }
        }
    }

    async fn discard_record(&self) {
        if let Err(e) = self.store.remove(CACHE_KEY).await {
            tracing::warn!(error = %e, "could not remove catalog cache record");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_cache(dir: &std::path::Path) -> CatalogCache {
        // Port 9 (discard) on localhost: any accidental fetch fails fast.
        let client = CatalogClient::new("http://127.0.0.1:9/listings", 10, 1, "test").unwrap();
        CatalogCache::new(client, FileStore::new(dir), TimeDelta::minutes(10))
    }

    #[tokio::test]
    async fn status_is_none_without_any_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let cache = offline_cache(dir.path());
        assert!(cache.status_at(Utc::now()).await.is_none());
    }

    #[tokio::test]
    async fn status_reads_durable_record() {
        let dir = tempfile::tempdir().unwrap();
        let fetched_at = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let record = CacheRecord::new(
            serde_json::json!([{"_id": "a", "_source": {"name": "A", "price": 10}}]),
            fetched_at,
        );
        FileStore::new(dir.path()).save(CACHE_KEY, &record).await.unwrap();

        let cache = offline_cache(dir.path());
        let status = cache
            .status_at(fetched_at + TimeDelta::minutes(11))
            .await
            .unwrap();
        assert_eq!(status.entries, 1);
        assert_eq!(status.fetched_at, fetched_at);
        assert_eq!(status.age, TimeDelta::minutes(11));
        assert!(!status.fresh);
    }

    #[tokio::test]
    async fn corrupt_record_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("baxusApiCache.json"), b"not json").unwrap();
        let cache = offline_cache(dir.path());
        assert!(cache.status_at(Utc::now()).await.is_none());
        assert!(!dir.path().join("baxusApiCache.json").exists());
    }
}
