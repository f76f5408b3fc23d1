//! Shared fixtures: a deterministic embedder, canned and failing index
//! stubs, and corpus builders.

// Each test binary compiles this module and uses a subset of it.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bibrag::{
    EmbeddingProvider, FieldFilter, InMemoryIndex, LibraryError, Result, ScoredChunk, StoredChunk,
    VectorIndex, metadata,
};

/// Deterministic hash-based embeddings, so tests need no API keys and
/// identical text always lands at identical vectors.
pub struct MockEmbedder {
    dimensions: usize,
}

impl MockEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut emb = vec![0.0f32; self.dimensions];
        for (i, v) in emb.iter_mut().enumerate() {
            *v = ((hash.wrapping_add(i as u64)) as f32).sin();
        }
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            emb.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(emb)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Metadata map for one chunk of a document.
pub fn meta(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// A chunk belonging to `key`, with the usual bibliographic fields filled.
pub fn chunk(key: &str, item_type: &str, creators: &str, title: &str, content: &str) -> StoredChunk {
    StoredChunk {
        content: content.to_string(),
        metadata: meta(&[
            (metadata::ITEM_KEY, key),
            (metadata::ITEM_TYPE, item_type),
            (metadata::CREATORS, creators),
            (metadata::TITLE, title),
            (metadata::DATE, "2020-06-01"),
        ]),
    }
}

/// An index seeded with a small mixed corpus: three journal articles (one
/// split over two chunks) and one book.
pub async fn seeded_index() -> InMemoryIndex {
    let index = InMemoryIndex::new(Arc::new(MockEmbedder::new(32)));
    index
        .insert_batch(vec![
            chunk(
                "D1",
                "journalArticle",
                "Smith, A. & Jones, B.",
                "Prosocial Behavior Online",
                "Online communities sustain prosocial behavior through reputation systems.",
            ),
            chunk(
                "D1",
                "journalArticle",
                "Smith, A. & Jones, B.",
                "Prosocial Behavior Online",
                "Reciprocity norms emerge even between anonymous participants.",
            ),
            chunk(
                "D2",
                "journalArticle",
                "Zhang, W.",
                "Media Framing of Cooperation",
                "Framing effects shift cooperative behavior in public goods games.",
            ),
            chunk(
                "D3",
                "book",
                "Okafor, C.",
                "The Cooperative Species",
                "A book-length treatment of the evolution of human cooperation.",
            ),
            chunk(
                "D4",
                "journalArticle",
                "Nguyen, T. & Zhang, W.",
                "Digital Altruism",
                "Volunteer moderation is a form of digital altruism with measurable costs.",
            ),
        ])
        .await
        .expect("mock embedder cannot fail");
    index
}

/// An index whose every method fails, for exercising degrade paths.
pub struct FailingIndex;

#[async_trait]
impl VectorIndex for FailingIndex {
    async fn get(
        &self,
        _filter: Option<&FieldFilter>,
        _limit: Option<usize>,
    ) -> Result<Vec<StoredChunk>> {
        Err(LibraryError::IndexError {
            backend: "stub".to_string(),
            message: "index unreachable".to_string(),
        })
    }

    async fn query(
        &self,
        _query_text: &str,
        _n_results: usize,
        _filter: Option<&FieldFilter>,
    ) -> Result<Vec<ScoredChunk>> {
        Err(LibraryError::IndexError {
            backend: "stub".to_string(),
            message: "index unreachable".to_string(),
        })
    }

    async fn count(&self) -> Result<usize> {
        Err(LibraryError::IndexError {
            backend: "stub".to_string(),
            message: "index unreachable".to_string(),
        })
    }
}

/// An index returning canned rows while recording the `n_results` each
/// query was issued with.
pub struct CannedIndex {
    pub hits: Vec<ScoredChunk>,
    pub rows: Vec<StoredChunk>,
    pub requested: Mutex<Vec<usize>>,
}

impl CannedIndex {
    pub fn new(hits: Vec<ScoredChunk>, rows: Vec<StoredChunk>) -> Self {
        Self { hits, rows, requested: Mutex::new(Vec::new()) }
    }

    /// The `n_results` values passed to `query`, in call order.
    pub fn requested(&self) -> Vec<usize> {
        self.requested.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl VectorIndex for CannedIndex {
    async fn get(
        &self,
        filter: Option<&FieldFilter>,
        limit: Option<usize>,
    ) -> Result<Vec<StoredChunk>> {
        let rows = self
            .rows
            .iter()
            .filter(|r| filter.is_none_or(|f| f.matches(&r.metadata)))
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(rows)
    }

    async fn query(
        &self,
        _query_text: &str,
        n_results: usize,
        _filter: Option<&FieldFilter>,
    ) -> Result<Vec<ScoredChunk>> {
        self.requested.lock().expect("lock poisoned").push(n_results);
        Ok(self.hits.iter().take(n_results).cloned().collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.rows.len())
    }
}
