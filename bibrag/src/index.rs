//! Vector index trait: the read-only boundary this layer sits on.
//!
//! The index is built and populated elsewhere; every operation here only
//! reads it. Implementations wrap a concrete store behind a uniform async
//! interface; [`InMemoryIndex`](crate::InMemoryIndex) is the bundled one
//! for development and tests.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;

/// An equality predicate over one metadata field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    /// The metadata field to compare.
    pub field: String,
    /// The value the field must equal.
    pub value: String,
}

impl FieldFilter {
    /// Build a filter requiring `field == value`.
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self { field: field.into(), value: value.into() }
    }

    /// Whether the given metadata satisfies this filter.
    pub fn matches(&self, metadata: &HashMap<String, String>) -> bool {
        metadata.get(&self.field).is_some_and(|v| *v == self.value)
    }
}

/// A chunk row returned by a metadata fetch, in stored order.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredChunk {
    /// The chunk's text content.
    pub content: String,
    /// Key-value metadata written at ingestion time.
    pub metadata: HashMap<String, String>,
}

/// A chunk row returned by a semantic query, with its ranking distance.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    /// The chunk's text content.
    pub content: String,
    /// Key-value metadata written at ingestion time.
    pub metadata: HashMap<String, String>,
    /// Native nearness value, smaller is closer. `None` when the backend
    /// exposes only relative ranking.
    pub distance: Option<f64>,
}

/// A read-only vector index over ingested document chunks.
///
/// All methods are safely concurrent: no method mutates the index, so
/// callers may share one handle across tasks without locking. Calls may
/// suspend on backend I/O or on an embedding call made internally by
/// `query`; nothing here enforces a timeout.
///
/// # Example
///
/// ```rust,ignore
/// use bibrag::{VectorIndex, FieldFilter};
///
/// let hits = index.query("media effects on behavior", 10, None).await?;
/// let rows = index.get(Some(&FieldFilter::equals("itemType", "book")), Some(100)).await?;
/// let total = index.count().await?;
/// ```
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Fetch chunks in the index's default stored order.
    ///
    /// `filter` restricts rows to those whose metadata satisfies the
    /// predicate; `limit` caps how many rows are returned. The stored order
    /// is backend-defined but stable for an unchanged index.
    async fn get(
        &self,
        filter: Option<&FieldFilter>,
        limit: Option<usize>,
    ) -> Result<Vec<StoredChunk>>;

    /// Rank the `n_results` chunks nearest to `query_text`.
    ///
    /// Results come back in ascending distance order; ties keep the
    /// backend's internal order. Embedding of the query text happens inside
    /// the index, not in this layer.
    async fn query(
        &self,
        query_text: &str,
        n_results: usize,
        filter: Option<&FieldFilter>,
    ) -> Result<Vec<ScoredChunk>>;

    /// Exact number of chunks in the index.
    async fn count(&self) -> Result<usize>;
}
