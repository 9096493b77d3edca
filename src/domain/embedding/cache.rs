//! Embedding cache trait definition

use std::fmt::Debug;

use async_trait::async_trait;
use serde::Serialize;

use super::EmbeddingKey;
use crate::domain::DomainError;

/// Snapshot of cache occupancy for operational endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub cache_file_exists: bool,
}

/// Process-wide key → vector store with durable backing.
///
/// Reads and writes are safe under concurrent callers. Entries are never
/// updated once written; a second `put` for the same key replaces the value
/// with an identical one.
#[async_trait]
pub trait EmbeddingCache: Send + Sync + Debug {
    /// Look up a cached vector
    async fn get(&self, key: &EmbeddingKey) -> Option<Vec<f32>>;

    /// Store a vector and count it towards the next persist
    async fn put(&self, key: EmbeddingKey, vector: Vec<f32>);

    /// Insertions since the last successful persist
    fn pending_writes(&self) -> usize;

    /// Write all entries to the backing store, returning the entry count
    async fn persist(&self) -> Result<usize, DomainError>;

    /// Replace in-memory contents with the backing store.
    ///
    /// A missing or unreadable store yields an empty cache, never an error.
    async fn load(&self) -> usize;

    /// Drop all entries and delete the backing store
    async fn clear(&self) -> Result<(), DomainError>;

    /// Entry count and backing-store presence
    async fn stats(&self) -> CacheStats;
}
