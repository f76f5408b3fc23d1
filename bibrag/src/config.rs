//! Configuration for the reference library.

use serde::{Deserialize, Serialize};

use crate::error::{LibraryError, Result};

/// Hard upper bound on results returned by a single search.
pub const DEFAULT_MAX_RESULTS: usize = 50;
/// Excerpt length in characters before truncation.
pub const DEFAULT_EXCERPT_LEN: usize = 500;
/// Extra candidates fetched by similar-item queries to survive dedup.
pub const DEFAULT_SIMILAR_OVERSHOOT: usize = 5;
/// Maximum chunks scanned by an author search.
pub const DEFAULT_AUTHOR_SCAN_LIMIT: usize = 1000;
/// Chunks sampled when estimating collection statistics.
pub const DEFAULT_SAMPLE_SIZE: usize = 100;

/// Configuration parameters for a [`ReferenceLibrary`](crate::ReferenceLibrary).
///
/// The identity fields (`collection_name`, `embedding_model`,
/// `embedding_dimensions`) describe the index this library sits on top of;
/// they are reported by `collection_info` and never interpreted further.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LibraryConfig {
    /// Name of the indexed collection.
    pub collection_name: String,
    /// Embedding model the collection was built with.
    pub embedding_model: String,
    /// Dimensionality of the collection's embedding vectors.
    pub embedding_dimensions: usize,
    /// Hard cap applied to `n_results` in searches.
    pub max_results: usize,
    /// Number of characters kept in result excerpts before truncation.
    pub excerpt_len: usize,
    /// Extra candidates requested beyond `n_results` in similar-item queries.
    pub similar_overshoot: usize,
    /// Maximum number of chunks an author search will scan.
    pub author_scan_limit: usize,
    /// Number of chunks sampled for collection statistics.
    pub sample_size: usize,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            collection_name: "references".to_string(),
            embedding_model: "gemini-embedding-001".to_string(),
            embedding_dimensions: 3072,
            max_results: DEFAULT_MAX_RESULTS,
            excerpt_len: DEFAULT_EXCERPT_LEN,
            similar_overshoot: DEFAULT_SIMILAR_OVERSHOOT,
            author_scan_limit: DEFAULT_AUTHOR_SCAN_LIMIT,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl LibraryConfig {
    /// Create a new builder for constructing a [`LibraryConfig`].
    pub fn builder() -> LibraryConfigBuilder {
        LibraryConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`LibraryConfig`].
#[derive(Debug, Clone, Default)]
pub struct LibraryConfigBuilder {
    config: LibraryConfig,
}

impl LibraryConfigBuilder {
    /// Set the name of the indexed collection.
    pub fn collection_name(mut self, name: impl Into<String>) -> Self {
        self.config.collection_name = name.into();
        self
    }

    /// Set the embedding model the collection was built with.
    pub fn embedding_model(mut self, model: impl Into<String>) -> Self {
        self.config.embedding_model = model.into();
        self
    }

    /// Set the dimensionality of the collection's embedding vectors.
    pub fn embedding_dimensions(mut self, dimensions: usize) -> Self {
        self.config.embedding_dimensions = dimensions;
        self
    }

    /// Set the hard cap applied to `n_results` in searches.
    pub fn max_results(mut self, max: usize) -> Self {
        self.config.max_results = max;
        self
    }

    /// Set the number of characters kept in excerpts before truncation.
    pub fn excerpt_len(mut self, len: usize) -> Self {
        self.config.excerpt_len = len;
        self
    }

    /// Set the extra candidates requested in similar-item queries.
    pub fn similar_overshoot(mut self, overshoot: usize) -> Self {
        self.config.similar_overshoot = overshoot;
        self
    }

    /// Set the maximum number of chunks an author search will scan.
    pub fn author_scan_limit(mut self, limit: usize) -> Self {
        self.config.author_scan_limit = limit;
        self
    }

    /// Set the number of chunks sampled for collection statistics.
    pub fn sample_size(mut self, size: usize) -> Self {
        self.config.sample_size = size;
        self
    }

    /// Build the [`LibraryConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::ConfigError`] if:
    /// - `collection_name` is empty
    /// - `max_results == 0`
    /// - `excerpt_len == 0`
    /// - `author_scan_limit == 0`
    /// - `sample_size == 0`
    pub fn build(self) -> Result<LibraryConfig> {
        if self.config.collection_name.is_empty() {
            return Err(LibraryError::ConfigError("collection_name must not be empty".to_string()));
        }
        if self.config.max_results == 0 {
            return Err(LibraryError::ConfigError(
                "max_results must be greater than zero".to_string(),
            ));
        }
        if self.config.excerpt_len == 0 {
            return Err(LibraryError::ConfigError(
                "excerpt_len must be greater than zero".to_string(),
            ));
        }
        if self.config.author_scan_limit == 0 {
            return Err(LibraryError::ConfigError(
                "author_scan_limit must be greater than zero".to_string(),
            ));
        }
        if self.config.sample_size == 0 {
            return Err(LibraryError::ConfigError(
                "sample_size must be greater than zero".to_string(),
            ));
        }
        Ok(self.config)
    }
}
