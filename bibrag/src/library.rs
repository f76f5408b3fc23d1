//! The reference library: retrieval operations over a shared vector index.
//!
//! [`ReferenceLibrary`] owns a handle to the (externally built, read-only)
//! [`VectorIndex`] plus the [`LibraryConfig`] tunables, and exposes the
//! retrieval operations as stateless async calls. Construct one at startup
//! and share it by `Arc`; nothing here mutates the index, so concurrent
//! callers need no coordination.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use bibrag::{LibraryConfig, ReferenceLibrary};
//!
//! let library = ReferenceLibrary::new(Arc::new(index), LibraryConfig::default());
//! let response = library.search("prosocial media effects", 10, None).await;
//! for record in &response.results {
//!     println!("{} ({:?})", record.citation, record.similarity);
//! }
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::citation::CitationRecord;
use crate::config::LibraryConfig;
use crate::dedupe::{Deduper, dedupe_first_seen};
use crate::error::{LibraryError, Result};
use crate::index::{FieldFilter, VectorIndex};
use crate::metadata;
use crate::report::{Reference, ResearchReport};

/// Response payload of [`ReferenceLibrary::search`].
///
/// On an index failure the payload carries the error message with empty
/// results instead of failing the call, so one unavailable backend does not
/// abort an otherwise useful multi-call session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    /// The query as searched.
    pub query: String,
    /// Number of records in `results`.
    pub total_results: usize,
    /// Ranked, deduplicated citation records.
    pub results: Vec<CitationRecord>,
    /// Error message when the underlying index call failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response payload of [`ReferenceLibrary::similar_items`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarItemsResponse {
    /// The document key similarity was computed against.
    pub source_item: String,
    /// Ranked neighbors, the source document excluded.
    pub similar_items: Vec<CitationRecord>,
}

/// Response payload of [`ReferenceLibrary::search_by_author`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthorSearchResponse {
    /// The author name as searched.
    pub author: String,
    /// Number of records in `items`.
    pub total_results: usize,
    /// Matching documents in corpus scan order.
    pub items: Vec<CitationRecord>,
}

/// Aggregate statistics reported by [`ReferenceLibrary::collection_info`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionInfo {
    /// Name of the indexed collection.
    pub collection_name: String,
    /// Exact number of chunks in the index.
    pub total_chunks: usize,
    /// Extrapolated document count; see
    /// [`collection_info`](ReferenceLibrary::collection_info) for its
    /// accuracy bounds.
    pub estimated_unique_items: usize,
    /// Item-type histogram over the sampled chunks, not the full corpus.
    pub sample_item_types: BTreeMap<String, usize>,
    /// Embedding model the collection was built with.
    pub embedding_model: String,
    /// Dimensionality of the collection's embedding vectors.
    pub dimensions: usize,
}

/// Full content and metadata of one library item.
///
/// This is the success payload of [`ReferenceLibrary::item`], which
/// currently always fails; the type documents the intended shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemContent {
    /// The item's full text, concatenated across its chunks.
    pub content: String,
    /// User-facing bibliographic fields.
    pub metadata: BTreeMap<String, String>,
}

/// Build metadata of this crate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VersionInfo {
    /// Package name.
    pub package: String,
    /// Package version.
    pub version: String,
}

impl VersionInfo {
    /// Version information compiled into this build.
    pub fn current() -> Self {
        Self {
            package: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Retrieval operations over a vector-indexed reference library.
///
/// All operations read the index and return normalized payloads; no
/// operation writes. Two consecutive index calls inside one operation are
/// not transactional: a long-lived process whose index changes between the
/// calls can observe the change.
pub struct ReferenceLibrary {
    config: LibraryConfig,
    index: Arc<dyn VectorIndex>,
}

impl ReferenceLibrary {
    /// Create a library over the given index handle.
    pub fn new(index: Arc<dyn VectorIndex>, config: LibraryConfig) -> Self {
        Self { config, index }
    }

    /// Return a reference to the library configuration.
    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Return a reference to the underlying index handle.
    pub fn index(&self) -> &Arc<dyn VectorIndex> {
        &self.index
    }

    /// Semantic search over the library.
    ///
    /// `n_results` is silently capped at the configured maximum (default
    /// 50), never rejected. `filter_type`, when set, keeps only chunks
    /// whose item type equals the given value; the filter runs over the
    /// already-ranked candidates, so fewer than `n_results` records can
    /// come back even when more matching documents exist deeper in the
    /// index. No top-up pass compensates for that.
    ///
    /// Results keep the index's ranking order, collapsed to one record per
    /// document key (first occurrence wins). This call does not fail: an
    /// index error degrades to an empty response carrying the message in
    /// the `error` field.
    pub async fn search(
        &self,
        query: impl Into<String>,
        n_results: usize,
        filter_type: Option<&str>,
    ) -> SearchResponse {
        let query = query.into();
        let capped = n_results.min(self.config.max_results);
        info!(query = %query, n_results, capped, filter_type, "search requested");

        let hits = match self.index.query(&query, capped, None).await {
            Ok(hits) => hits,
            Err(e) => {
                error!(error = %e, "index query failed, degrading to empty response");
                return SearchResponse {
                    query,
                    total_results: 0,
                    results: Vec::new(),
                    error: Some(e.to_string()),
                };
            }
        };

        let mut records = Vec::new();
        for hit in &hits {
            if let Some(wanted) = filter_type {
                if hit.metadata.get(metadata::ITEM_TYPE).map(String::as_str) != Some(wanted) {
                    continue;
                }
            }
            records.push(CitationRecord::from_chunk(
                &hit.metadata,
                Some(&hit.content),
                hit.distance,
                self.config.excerpt_len,
            ));
        }
        let results = dedupe_first_seen(records, |r| r.document_key.as_deref());

        info!(result_count = results.len(), "search completed");
        SearchResponse { query, total_results: results.len(), results, error: None }
    }

    /// Fetch the full content of one item by document key.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::NotFound`] when no chunk carries the key,
    /// and [`LibraryError::Unimplemented`] otherwise: assembling original
    /// content requires live sync with the upstream reference manager,
    /// which is not built.
    pub async fn item(&self, item_key: &str) -> Result<ItemContent> {
        let filter = FieldFilter::equals(metadata::ITEM_KEY, item_key);
        let rows = self.index.get(Some(&filter), None).await?;
        if rows.is_empty() {
            return Err(LibraryError::NotFound { key: item_key.to_string() });
        }

        // TODO: return the upstream manager's item link once live sync lands.
        Err(LibraryError::Unimplemented(
            "live sync with the upstream reference manager is not yet built".to_string(),
        ))
    }

    /// Find documents similar to an existing item.
    ///
    /// The first stored chunk of the item becomes the query text; the query
    /// requests `n_results` plus a fixed overshoot (default 5) so the
    /// guaranteed self-match and duplicate chunks can be dropped before
    /// truncation. The overshoot is a heuristic: a source document
    /// contributing more than `similar_overshoot` of its own chunks to the
    /// candidate window leaves fewer than `n_results` neighbors to return.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::NotFound`] when no chunk carries the key;
    /// index errors propagate.
    pub async fn similar_items(
        &self,
        item_key: &str,
        n_results: usize,
    ) -> Result<SimilarItemsResponse> {
        let filter = FieldFilter::equals(metadata::ITEM_KEY, item_key);
        let rows = self.index.get(Some(&filter), Some(1)).await?;
        let Some(source) = rows.into_iter().next() else {
            return Err(LibraryError::NotFound { key: item_key.to_string() });
        };

        let candidate_count = n_results.saturating_add(self.config.similar_overshoot);
        let candidates = self.index.query(&source.content, candidate_count, None).await?;

        let mut deduper = Deduper::new();
        let mut similar_items = Vec::new();
        for hit in &candidates {
            let Some(key) = hit.metadata.get(metadata::ITEM_KEY) else {
                continue;
            };
            if key == item_key || !deduper.admit(key) {
                continue;
            }
            similar_items.push(CitationRecord::from_chunk(
                &hit.metadata,
                None,
                hit.distance,
                self.config.excerpt_len,
            ));
            if similar_items.len() >= n_results {
                break;
            }
        }

        info!(source_item = item_key, result_count = similar_items.len(), "similar items found");
        Ok(SimilarItemsResponse { source_item: item_key.to_string(), similar_items })
    }

    /// Find documents by author name, matched case-insensitively as a
    /// substring of each chunk's creators field.
    ///
    /// The index has no text search over metadata, so this is a linear scan
    /// bounded at `author_scan_limit` chunks (default 1000) in stored
    /// order, stopping early once `n_results` distinct documents are
    /// collected. Items come back in corpus scan order, not relevance
    /// order, and a match past the scan bound is missed.
    ///
    /// # Errors
    ///
    /// Index errors propagate.
    pub async fn search_by_author(
        &self,
        author_name: &str,
        n_results: usize,
    ) -> Result<AuthorSearchResponse> {
        let rows = self.index.get(None, Some(self.config.author_scan_limit)).await?;
        let needle = author_name.to_lowercase();

        let mut deduper = Deduper::new();
        let mut items = Vec::new();
        for row in &rows {
            let creators = row.metadata.get(metadata::CREATORS).map(String::as_str).unwrap_or("");
            if !creators.to_lowercase().contains(&needle) {
                continue;
            }
            if let Some(key) = row.metadata.get(metadata::ITEM_KEY) {
                if deduper.admit(key) {
                    items.push(CitationRecord::from_chunk(
                        &row.metadata,
                        Some(&row.content),
                        None,
                        self.config.excerpt_len,
                    ));
                }
            }
            if items.len() >= n_results {
                break;
            }
        }

        info!(author = author_name, result_count = items.len(), "author search completed");
        Ok(AuthorSearchResponse {
            author: author_name.to_string(),
            total_results: items.len(),
            items,
        })
    }

    /// Aggregate statistics about the indexed collection.
    ///
    /// `total_chunks` is exact. `estimated_unique_items` extrapolates from
    /// one sample of `sample_size` chunks (default 100): distinct keys in
    /// the sample scaled by `total_chunks / sample_len`, computed
    /// multiply-before-divide in integer arithmetic. The estimate skews
    /// when chunk-per-document counts are non-uniform across the corpus.
    /// The item-type histogram covers the same sample only, with untyped
    /// chunks counted as `"unknown"`.
    ///
    /// # Errors
    ///
    /// Index errors propagate.
    pub async fn collection_info(&self) -> Result<CollectionInfo> {
        let total_chunks = self.index.count().await?;
        let sample = self.index.get(None, Some(self.config.sample_size)).await?;

        let mut keys = Deduper::new();
        let mut sample_item_types: BTreeMap<String, usize> = BTreeMap::new();
        for row in &sample {
            if let Some(key) = row.metadata.get(metadata::ITEM_KEY) {
                keys.admit(key);
            }
            let item_type =
                row.metadata.get(metadata::ITEM_TYPE).map(String::as_str).unwrap_or("unknown");
            *sample_item_types.entry(item_type.to_string()).or_insert(0) += 1;
        }

        let estimated_unique_items =
            if sample.is_empty() { 0 } else { keys.distinct() * total_chunks / sample.len() };

        info!(total_chunks, estimated_unique_items, "collection info computed");
        Ok(CollectionInfo {
            collection_name: self.config.collection_name.clone(),
            total_chunks,
            estimated_unique_items,
            sample_item_types,
            embedding_model: self.config.embedding_model.clone(),
            dimensions: self.config.embedding_dimensions,
        })
    }

    /// Literature search packaged as a structured research report.
    ///
    /// Requests `max_sources * 2` candidates through [`search`] (so
    /// post-dedup attrition still leaves enough), keeps the top
    /// `max_sources`, and wraps them with template response text. Degrades
    /// with [`search`]: an index failure yields a report with empty
    /// literature.
    ///
    /// [`search`]: ReferenceLibrary::search
    pub async fn research(&self, question: &str, max_sources: usize) -> ResearchReport {
        let search_data = self.search(question, max_sources.saturating_mul(2), None).await;

        let literature: Vec<Reference> =
            search_data.results.iter().take(max_sources).map(Reference::from_record).collect();

        info!(source_count = literature.len(), "research report assembled");
        ResearchReport {
            response: format!("Found {} relevant sources on: {question}", literature.len()),
            summary: format!(
                "Search returned {} academic sources related to the research question.",
                literature.len()
            ),
            literature,
            search_queries: Some(vec![question.to_string()]),
        }
    }
}
