//! Cache-aside access to the contest listing
//!
//! [`ContestService`] answers every query from the single cache entry and
//! only goes upstream when that entry is absent. A refresh fetches the
//! listing, normalizes it, writes it through to the store and returns it.
//! Errors on that path are returned as-is; stale data is never served in
//! their place.
//!
//! Concurrent misses each refresh independently unless miss coalescing is
//! enabled, in which case they queue behind one refresh and read its result
//! back from the store.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cache::{CacheError, CacheStore};
use crate::data::{filter_by_platform, normalize, ContestResult, ContestSource, FetchError};

/// Key of the single cache entry
pub const CACHE_KEY: &str = "contest";

/// How long a refreshed listing is served before the next refresh
pub const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Errors surfaced by contest queries
#[derive(Debug, Error)]
pub enum ContestError {
    /// The upstream listing could not be fetched
    #[error("Failed to fetch contests: {0}")]
    Fetch(#[from] FetchError),

    /// The upstream payload was not the expected JSON shape
    #[error("Malformed contest payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// The cache store failed or holds an unreadable entry
    #[error("Failed to read contest cache: {0}")]
    CacheRead(#[source] CacheError),

    /// The refreshed listing could not be written to the cache store
    #[error("Failed to write contest cache: {0}")]
    CacheWrite(#[source] CacheError),
}

/// Read-through cache over a contest source
#[derive(Clone)]
pub struct ContestService {
    store: Arc<dyn CacheStore>,
    source: Arc<dyn ContestSource>,
    key: String,
    ttl: Duration,
    /// Held while refreshing when misses are coalesced
    refresh_lock: Option<Arc<Mutex<()>>>,
}

impl ContestService {
    /// Creates a service with the default key and TTL and no miss coalescing
    pub fn new(store: Arc<dyn CacheStore>, source: Arc<dyn ContestSource>) -> Self {
        Self {
            store,
            source,
            key: CACHE_KEY.to_string(),
            ttl: CACHE_TTL,
            refresh_lock: None,
        }
    }

    /// Sets how long refreshed listings stay cached
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Stores the listing under a different key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Collapses concurrent misses into a single upstream fetch
    pub fn with_coalesced_misses(mut self, enabled: bool) -> Self {
        self.refresh_lock = enabled.then(|| Arc::new(Mutex::new(())));
        self
    }

    /// Returns every ongoing and upcoming contest
    ///
    /// Served from the cache when the entry is present; otherwise the listing
    /// is refreshed from upstream and written back before returning.
    pub async fn get_all_contests(&self) -> Result<ContestResult, ContestError> {
        if let Some(result) = self.cached().await? {
            debug!(key = %self.key, contests = result.len(), "contest cache hit");
            return Ok(result);
        }
        info!(key = %self.key, "contest cache miss");

        let Some(lock) = &self.refresh_lock else {
            return self.refresh().await;
        };

        let _guard = lock.lock().await;
        // Another caller may have refreshed while we waited
        if let Some(result) = self.cached().await? {
            debug!(key = %self.key, "contest cache filled by concurrent refresh");
            return Ok(result);
        }
        self.refresh().await
    }

    /// Returns the contests hosted on `platform`, matched case-insensitively
    pub async fn get_contests_for_platform(
        &self,
        platform: &str,
    ) -> Result<ContestResult, ContestError> {
        let all = self.get_all_contests().await?;
        Ok(filter_by_platform(&all, &platform.to_lowercase()))
    }

    /// Reads and decodes the cache entry; `None` only when it is absent
    async fn cached(&self) -> Result<Option<ContestResult>, ContestError> {
        let Some(bytes) = self
            .store
            .get(&self.key)
            .await
            .map_err(ContestError::CacheRead)?
        else {
            return Ok(None);
        };

        let result = serde_json::from_slice(&bytes)
            .map_err(|e| ContestError::CacheRead(CacheError::Serialization(e)))?;
        Ok(Some(result))
    }

    /// Fetches, normalizes and stores a fresh listing
    async fn refresh(&self) -> Result<ContestResult, ContestError> {
        let body = self.source.fetch().await?;
        let result = normalize(&body)?;

        let encoded = serde_json::to_vec(&result)
            .map_err(|e| ContestError::CacheWrite(CacheError::Serialization(e)))?;
        self.store
            .set(&self.key, &encoded, self.ttl)
            .await
            .map_err(ContestError::CacheWrite)?;

        info!(
            ongoing = result.ongoing.len(),
            upcoming = result.upcoming.len(),
            ttl_secs = self.ttl.as_secs(),
            "contest cache refreshed"
        );
        Ok(result)
    }
}
