use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a cache backend
#[derive(Debug, Error)]
pub enum CacheError {
    /// Redis connection or command failure
    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    /// Filesystem failure in the file store
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored entry or value could not be (de)serialized
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The value cannot be stored by this backend
    #[error("Invalid cache value for key '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

/// A key-value store whose entries expire after a TTL
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Reads `key`, returning `Ok(None)` when it is absent or expired
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Writes `value` under `key`, replacing any previous entry
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError>;
}
