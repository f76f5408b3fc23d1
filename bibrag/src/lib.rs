//! Retrieval and citation layer over a vector-indexed reference library.
//!
//! This crate provides:
//! - Semantic search returning ranked, deduplicated citation records
//! - Similar-item lookup, author scan, and collection statistics
//! - Metadata normalization with stable external identifiers
//! - A JSON tool surface for agentic callers
//!
//! The vector index itself is an external collaborator behind the
//! [`VectorIndex`] trait; [`InMemoryIndex`] is the bundled implementation
//! for development and tests. Nothing in this crate writes to the index.

pub mod citation;
pub mod config;
pub mod dedupe;
pub mod embedding;
pub mod error;
pub mod index;
pub mod inmemory;
pub mod library;
pub mod metadata;
pub mod report;
pub mod tool;

pub use citation::CitationRecord;
pub use config::{LibraryConfig, LibraryConfigBuilder};
pub use dedupe::{Deduper, dedupe_first_seen};
pub use embedding::EmbeddingProvider;
pub use error::{LibraryError, Result};
pub use index::{FieldFilter, ScoredChunk, StoredChunk, VectorIndex};
pub use inmemory::InMemoryIndex;
pub use library::{
    AuthorSearchResponse, CollectionInfo, ItemContent, ReferenceLibrary, SearchResponse,
    SimilarItemsResponse, VersionInfo,
};
pub use report::{Reference, ResearchReport};
pub use tool::{Tool, toolset};
