//! JSON-file backed embedding cache
//!
//! The store is a flat JSON object mapping hex MD5 keys to float arrays.
//! Persisting writes a sibling temp file and renames it over the store, so
//! readers never observe a half-written file.

use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::domain::embedding::{CacheStats, EmbeddingCache, EmbeddingKey};
use crate::domain::DomainError;

#[derive(Debug)]
pub struct JsonFileEmbeddingCache {
    path: PathBuf,
    entries: RwLock<HashMap<EmbeddingKey, Vec<f32>>>,
    pending: AtomicUsize,
    persist_lock: Mutex<()>,
}

impl JsonFileEmbeddingCache {
    /// Create an empty cache backed by `path`; call `load` to read it
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: RwLock::new(HashMap::new()),
            pending: AtomicUsize::new(0),
            persist_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    async fn write_snapshot(
        &self,
        snapshot: &BTreeMap<EmbeddingKey, Vec<f32>>,
    ) -> Result<(), DomainError> {
        let bytes = serde_json::to_vec(snapshot)
            .map_err(|e| DomainError::cache(format!("Failed to serialize cache: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::cache(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, bytes).await.map_err(|e| {
            DomainError::cache(format!("Failed to write {}: {}", temp.display(), e))
        })?;

        tokio::fs::rename(&temp, &self.path).await.map_err(|e| {
            DomainError::cache(format!(
                "Failed to move {} into place: {}",
                temp.display(),
                e
            ))
        })
    }

    async fn read_store(&self) -> Option<HashMap<EmbeddingKey, Vec<f32>>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No embedding cache file, starting empty");
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read embedding cache, starting empty");
                return None;
            }
        };

        match serde_json::from_slice(&raw) {
            Ok(entries) => Some(entries),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Corrupt embedding cache, starting empty");
                None
            }
        }
    }
}

#[async_trait]
impl EmbeddingCache for JsonFileEmbeddingCache {
    async fn get(&self, key: &EmbeddingKey) -> Option<Vec<f32>> {
        self.entries.read().await.get(key).cloned()
    }

    async fn put(&self, key: EmbeddingKey, vector: Vec<f32>) {
        let previous = self.entries.write().await.insert(key, vector);

        if previous.is_none() {
            self.pending.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn pending_writes(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    async fn persist(&self) -> Result<usize, DomainError> {
        let _guard = self.persist_lock.lock().await;
        let taken = self.pending.swap(0, Ordering::SeqCst);

        let snapshot: BTreeMap<EmbeddingKey, Vec<f32>> = self
            .entries
            .read()
            .await
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let count = snapshot.len();

        match self.write_snapshot(&snapshot).await {
            Ok(()) => {
                info!(entries = count, path = %self.path.display(), "Embedding cache persisted");
                Ok(count)
            }
            Err(e) => {
                self.pending.fetch_add(taken, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    async fn load(&self) -> usize {
        let loaded = self.read_store().await.unwrap_or_default();
        let count = loaded.len();

        *self.entries.write().await = loaded;
        self.pending.store(0, Ordering::SeqCst);

        info!(entries = count, path = %self.path.display(), "Embedding cache loaded");
        count
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let _guard = self.persist_lock.lock().await;

        self.entries.write().await.clear();
        self.pending.store(0, Ordering::SeqCst);

        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::cache(format!(
                "Failed to delete {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.entries.read().await.len(),
            cache_file_exists: tokio::fs::try_exists(&self.path).await.unwrap_or(false),
        }
    }
}
