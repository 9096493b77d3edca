//! Startup embedding warmup

use std::time::Instant;

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use super::EmbeddingService;
use crate::domain::answer::millis;
use crate::domain::EmbeddingSource;

/// Outcome of one warmup run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WarmupReport {
    pub queries: usize,
    pub cache_hits: usize,
    pub computed: usize,
    /// Queries whose embedding fell back to the zero vector
    pub failed: Vec<String>,
    pub persisted: bool,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone)]
pub struct WarmupService {
    embeddings: EmbeddingService,
    queries: Vec<String>,
}

impl WarmupService {
    pub fn new(embeddings: EmbeddingService, queries: Vec<String>) -> Self {
        Self {
            embeddings,
            queries,
        }
    }

    /// Embed every warmup query, then persist the cache once.
    ///
    /// Individual failures and a failed persist are logged and reported,
    /// never returned as errors.
    pub async fn run(&self) -> WarmupReport {
        let started = Instant::now();

        let embedded = join_all(
            self.queries
                .iter()
                .map(|query| self.embeddings.embed_question(query)),
        )
        .await;

        let mut report = WarmupReport {
            queries: self.queries.len(),
            ..Default::default()
        };

        for (query, result) in self.queries.iter().zip(embedded) {
            match result.source() {
                EmbeddingSource::Cache => report.cache_hits += 1,
                EmbeddingSource::Provider => report.computed += 1,
                EmbeddingSource::Fallback => {
                    warn!(query = %query, "Warmup query fell back to zero vector");
                    report.failed.push(query.clone());
                }
            }
        }

        match self.embeddings.persist().await {
            Ok(_) => report.persisted = true,
            Err(e) => warn!(error = %e, "Failed to persist embedding cache after warmup"),
        }

        report.elapsed_ms = millis(started.elapsed());

        info!(
            queries = report.queries,
            cache_hits = report.cache_hits,
            computed = report.computed,
            failed = report.failed.len(),
            elapsed_ms = report.elapsed_ms,
            "Warmup complete"
        );

        report
    }
}
