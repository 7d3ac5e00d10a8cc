//! Result cache keyed by engine identity, query and locale.
//!
//! Storage is delegated to a [`KeyValueStore`]; eviction and TTLs are the
//! store's concern.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{Result, SearchError, SearchResult};

/// Minimal key-value storage backend.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the bytes stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Filesystem store: one file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Keys are hashed so arbitrary queries map to short, valid file names.
    fn path_for(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.directory.join(format!("{}.json", hex::encode(digest)))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        tokio::fs::create_dir_all(&self.directory).await?;
        tokio::fs::write(self.path_for(key), value).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Serializes result lists into a [`KeyValueStore`].
///
/// Cheap to clone; clones share the store.
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn KeyValueStore>,
}

impl ResultCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// A cache backed by a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Builds the cache key. Whitespace runs in the query collapse into a
    /// single `_` so incidental formatting does not fragment the cache.
    pub fn build_key(engine: &str, query: &str, locale: Option<&str>) -> String {
        let query = query.split_whitespace().collect::<Vec<_>>().join("_");
        format!("{}|{}|{}", engine, query, locale.unwrap_or_default())
    }

    /// Stores `results` for the triple, replacing any previous entry.
    pub async fn save(
        &self,
        results: &[SearchResult],
        engine: &str,
        query: &str,
        locale: Option<&str>,
    ) -> Result<()> {
        let key = Self::build_key(engine, query, locale);
        let json = serde_json::to_vec(results)?;
        self.store.set(&key, json).await?;
        debug!(key = %key, count = results.len(), "Cached search results");
        Ok(())
    }

    /// Loads cached results. Absent and empty entries are both `None`.
    pub async fn load(
        &self,
        engine: &str,
        query: &str,
        locale: Option<&str>,
    ) -> Result<Option<Vec<SearchResult>>> {
        let key = Self::build_key(engine, query, locale);
        let Some(bytes) = self.store.get(&key).await? else {
            return Ok(None);
        };

        let results: Vec<SearchResult> = serde_json::from_slice(&bytes).map_err(|e| {
            SearchError::Cache(format!(
                "Could not decode cached search results for key {}: {}",
                key, e
            ))
        })?;

        Ok((!results.is_empty()).then_some(results))
    }

    /// Drops the entry for the triple.
    pub async fn invalidate(&self, engine: &str, query: &str, locale: Option<&str>) -> Result<()> {
        self.store
            .delete(&Self::build_key(engine, query, locale))
            .await
    }
}
