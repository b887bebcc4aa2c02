//! In-process cache store

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CacheError, CacheStore};

/// Keeps entries in a shared map; clones share the same entries
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// key → (expires_at, value)
    entries: Arc<RwLock<HashMap<String, (Instant, Vec<u8>)>>>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops `key`, as if it had expired or been evicted
    pub async fn evict(&self, key: &str) {
        self.entries.write().await.remove(key);
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|(expires_at, _)| Instant::now() < *expires_at)
            .map(|(_, value)| value.clone()))
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or_else(|| CacheError::InvalidValue {
                key: key.to_string(),
                reason: format!("ttl of {}s overflows the expiry time", ttl.as_secs()),
            })?;
        self.entries
            .write()
            .await
            .insert(key.to_string(), (expires_at, value.to_vec()));
        Ok(())
    }
}
