//! Embedding provider trait used by index implementations.
//!
//! This layer never embeds text itself; providers are consumed by
//! [`VectorIndex`](crate::VectorIndex) implementations on ingestion and on
//! `query`, which is why the trait lives here at all.

use async_trait::async_trait;

use crate::error::Result;

/// Turns text into fixed-length embedding vectors.
///
/// Implementations wrap whatever model the index was built with; all
/// vectors a provider produces must have [`dimensions`] entries.
///
/// [`dimensions`]: EmbeddingProvider::dimensions
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one piece of text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed several texts, one vector per input, in input order.
    ///
    /// By default this loops over [`embed`](EmbeddingProvider::embed) one
    /// text at a time; providers with a batch endpoint should replace it.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Length of every vector this provider produces.
    fn dimensions(&self) -> usize;
}
