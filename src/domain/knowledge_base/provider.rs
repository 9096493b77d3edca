//! Vector index provider trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::entity::{IndexQuery, RetrievalMatch};
use crate::domain::error::DomainError;

/// Provider trait for nearest-neighbour lookups.
///
/// Implementations translate the query into the backend's wire format and
/// must return matches sorted by descending score.
#[async_trait]
pub trait VectorIndexProvider: Send + Sync + Debug {
    /// Get the provider type name
    fn provider_type(&self) -> &'static str;

    /// Return up to `top_k` matches from the query's namespace
    async fn query(&self, query: IndexQuery) -> Result<Vec<RetrievalMatch>, DomainError>;
}
