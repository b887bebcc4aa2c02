//! Disk-backed cache store
//!
//! Stores each key as a JSON file holding the value and its expiry
//! timestamp. Useful when no shared Redis instance is configured: the cache
//! still survives between CLI invocations.

use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tokio::{fs, task};
use tracing::debug;

use super::{CacheError, CacheStore};

/// Wrapper struct for cached data stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    /// The cached value
    data: String,
    /// When the value was cached
    cached_at: DateTime<Utc>,
    /// When the cache entry expires
    expires_at: DateTime<Utc>,
}

/// Stores cache entries as JSON files in a directory
///
/// Uses the XDG cache directory (`~/.cache/contest-cache/` on Linux) unless
/// a directory is given explicitly. Expired entries read as absent.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl FileStore {
    /// Creates a new FileStore using the XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "contest-cache")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a new FileStore with a custom cache directory
    pub fn with_dir(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Directory the entries are written to
    pub fn cache_dir(&self) -> &PathBuf {
        &self.cache_dir
    }

    /// Returns the path to a cache file for the given key
    fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl CacheStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let content = match fs::read(self.cache_path(key)).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let entry: CacheEntry = serde_json::from_slice(&content)?;

        if Utc::now() > entry.expires_at {
            debug!(key, expires_at = %entry.expires_at, "file cache entry expired");
            return Ok(None);
        }
        Ok(Some(entry.data.into_bytes()))
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        let data = String::from_utf8(value.to_vec()).map_err(|e| CacheError::InvalidValue {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        let ttl = chrono::Duration::from_std(ttl).map_err(|e| CacheError::InvalidValue {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| CacheError::InvalidValue {
                key: key.to_string(),
                reason: format!("ttl of {}s overflows the expiry time", ttl.num_seconds()),
            })?;
        let entry = CacheEntry {
            data,
            cached_at: now,
            expires_at,
        };
        let json = serde_json::to_vec_pretty(&entry)?;

        let dir = self.cache_dir.clone();
        let path = self.cache_path(key);
        // Each writer stages into its own temp file, then renames over the entry
        task::spawn_blocking(move || -> Result<(), CacheError> {
            std::fs::create_dir_all(&dir)?;
            let mut tmp = NamedTempFile::new_in(&dir)?;
            tmp.write_all(&json)?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| CacheError::Io(std::io::Error::new(ErrorKind::Other, e)))??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = FileStore::with_dir(temp_dir.path());
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_set_creates_file_in_cache_directory() {
        let (store, temp_dir) = create_test_store();

        store
            .set("contest", br#"{"ongoing":[]}"#, Duration::from_secs(3600))
            .await
            .expect("Write should succeed");

        let expected_path = temp_dir.path().join("contest.json");
        assert!(expected_path.exists(), "Cache file should exist");

        let content = std::fs::read_to_string(&expected_path).expect("Should read file");
        assert!(content.contains("\"expires_at\""));
        assert!(content.contains("ongoing"));
    }

    #[tokio::test]
    async fn test_get_returns_none_for_missing_key() {
        let (store, _temp_dir) = create_test_store();

        let value = store.get("nonexistent").await.expect("Read should succeed");
        assert!(value.is_none(), "Should return None for missing key");
    }

    #[tokio::test]
    async fn test_get_returns_fresh_value() {
        let (store, _temp_dir) = create_test_store();

        store
            .set("contest", b"fresh", Duration::from_secs(3600))
            .await
            .expect("Write should succeed");

        let value = store.get("contest").await.expect("Read should succeed");
        assert_eq!(value.as_deref(), Some(&b"fresh"[..]));
    }

    #[tokio::test]
    async fn test_expired_entry_reads_as_absent() {
        let (store, _temp_dir) = create_test_store();

        store
            .set("contest", b"stale", Duration::ZERO)
            .await
            .expect("Write should succeed");

        // Small delay to ensure expiry
        tokio::time::sleep(Duration::from_millis(10)).await;

        let value = store.get("contest").await.expect("Read should succeed");
        assert!(value.is_none(), "Entry with zero TTL should be expired");
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_an_error() {
        let (store, temp_dir) = create_test_store();
        std::fs::write(temp_dir.path().join("contest.json"), "not json").unwrap();

        let err = store.get("contest").await.unwrap_err();
        assert!(matches!(err, CacheError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_non_utf8_value_is_rejected() {
        let (store, _temp_dir) = create_test_store();

        let err = store
            .set("contest", &[0xff, 0xfe], Duration::from_secs(60))
            .await
            .unwrap_err();
        assert!(matches!(err, CacheError::InvalidValue { .. }));
    }

    #[tokio::test]
    async fn test_set_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested_path = temp_dir.path().join("nested").join("cache");
        let store = FileStore::with_dir(nested_path.clone());

        store
            .set("contest", b"{}", Duration::from_secs(60))
            .await
            .expect("Write should succeed");

        assert!(nested_path.join("contest.json").exists(), "Cache file should exist");
    }

    #[tokio::test]
    async fn test_overwrite_existing_entry() {
        let (store, _temp_dir) = create_test_store();

        store.set("contest", b"first", Duration::from_secs(60)).await.unwrap();
        store.set("contest", b"second", Duration::from_secs(60)).await.unwrap();

        let value = store.get("contest").await.unwrap();
        assert_eq!(value.as_deref(), Some(&b"second"[..]), "Cache should contain latest data");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_on_one_key_all_succeed() {
        let (store, temp_dir) = create_test_store();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    let value = format!("{{\"writer\":{}}}", i);
                    store
                        .set("contest", value.as_bytes(), Duration::from_secs(60))
                        .await
                })
            })
            .collect();

        for handle in handles {
            handle
                .await
                .expect("Writer task panicked")
                .expect("Concurrent write should succeed");
        }

        let value = store.get("contest").await.unwrap().expect("Entry should exist");
        let value = String::from_utf8(value).unwrap();
        assert!(value.starts_with("{\"writer\":"), "Last writer should win: {}", value);

        let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "contest.json")
            .collect();
        assert!(leftovers.is_empty(), "Temp files should be renamed away");
    }

    #[tokio::test]
    async fn test_overflowing_ttl_is_rejected() {
        let (store, _temp_dir) = create_test_store();

        let err = store
            .set("contest", b"{}", Duration::from_secs(10_000_000_000_000))
            .await
            .unwrap_err();
        assert!(matches!(err, CacheError::InvalidValue { .. }));
        assert!(store.get("contest").await.unwrap().is_none());
    }

    #[test]
    fn test_new_creates_xdg_compliant_path() {
        if let Some(store) = FileStore::new() {
            let path_str = store.cache_dir().to_string_lossy();
            assert!(
                path_str.contains("contest-cache"),
                "Cache path should contain project name"
            );
        }
        // Test passes if new() returns None (e.g., no home directory in CI)
    }
}
