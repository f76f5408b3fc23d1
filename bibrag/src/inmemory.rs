//! In-memory vector index using cosine distance.
//!
//! This module provides [`InMemoryIndex`], a [`VectorIndex`] backed by a
//! `Vec` protected by a `tokio::sync::RwLock`. Chunks keep insertion order,
//! which is the stored order reported by [`get`](VectorIndex::get). It is
//! suitable for development, testing, and small personal libraries.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use bibrag::{InMemoryIndex, VectorIndex};
//!
//! let index = InMemoryIndex::new(Arc::new(my_embedder));
//! index.insert("chunk text", metadata).await?;
//! let hits = index.query("search text", 5, None).await?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::index::{FieldFilter, ScoredChunk, StoredChunk, VectorIndex};

struct IndexedChunk {
    content: String,
    metadata: HashMap<String, String>,
    embedding: Vec<f32>,
}

/// An in-memory vector index using cosine distance for ranking.
///
/// Text is embedded on insertion and on query through the injected
/// [`EmbeddingProvider`]. All operations are async-safe via
/// `tokio::sync::RwLock`.
pub struct InMemoryIndex {
    embedder: Arc<dyn EmbeddingProvider>,
    chunks: RwLock<Vec<IndexedChunk>>,
}

impl InMemoryIndex {
    /// Create an empty index that embeds through the given provider.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { embedder, chunks: RwLock::new(Vec::new()) }
    }

    /// Embed and append a single chunk.
    ///
    /// # Errors
    ///
    /// Returns the embedding provider's error if embedding fails.
    pub async fn insert(
        &self,
        content: impl Into<String>,
        metadata: HashMap<String, String>,
    ) -> Result<()> {
        let content = content.into();
        let embedding = self.embedder.embed(&content).await?;
        let mut chunks = self.chunks.write().await;
        chunks.push(IndexedChunk { content, metadata, embedding });
        Ok(())
    }

    /// Embed and append a batch of chunks, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns the embedding provider's error if embedding fails; no chunk
    /// from the batch is stored in that case.
    pub async fn insert_batch(&self, batch: Vec<StoredChunk>) -> Result<()> {
        let texts: Vec<&str> = batch.iter().map(|c| c.content.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        let mut chunks = self.chunks.write().await;
        for (chunk, embedding) in batch.into_iter().zip(embeddings) {
            chunks.push(IndexedChunk {
                content: chunk.content,
                metadata: chunk.metadata,
                embedding,
            });
        }
        Ok(())
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn get(
        &self,
        filter: Option<&FieldFilter>,
        limit: Option<usize>,
    ) -> Result<Vec<StoredChunk>> {
        let chunks = self.chunks.read().await;
        let rows = chunks
            .iter()
            .filter(|c| filter.is_none_or(|f| f.matches(&c.metadata)))
            .take(limit.unwrap_or(usize::MAX))
            .map(|c| StoredChunk { content: c.content.clone(), metadata: c.metadata.clone() })
            .collect();
        Ok(rows)
    }

    async fn query(
        &self,
        query_text: &str,
        n_results: usize,
        filter: Option<&FieldFilter>,
    ) -> Result<Vec<ScoredChunk>> {
        let query_embedding = self.embedder.embed(query_text).await?;
        let chunks = self.chunks.read().await;

        let mut scored: Vec<ScoredChunk> = chunks
            .iter()
            .filter(|c| filter.is_none_or(|f| f.matches(&c.metadata)))
            .map(|c| {
                let distance = 1.0 - f64::from(cosine_similarity(&c.embedding, &query_embedding));
                ScoredChunk {
                    content: c.content.clone(),
                    metadata: c.metadata.clone(),
                    distance: Some(distance),
                }
            })
            .collect();

        // Stable sort keeps stored order among equal distances.
        scored.sort_by(|a, b| {
            a.distance.partial_cmp(&b.distance).unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(n_results);
        Ok(scored)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.chunks.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = [0.6f32, 0.8];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        assert!((cosine_similarity(&[1.0, 0.0], &[0.0, 1.0])).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
