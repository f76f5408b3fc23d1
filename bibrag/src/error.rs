//! Error types for the `bibrag` crate.

use thiserror::Error;

/// Errors that can occur in library retrieval operations.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// No document with the requested key exists in the index.
    #[error("Item {key} not found")]
    NotFound {
        /// The document key that was looked up.
        key: String,
    },

    /// An error occurred in the vector index backend.
    #[error("Index error ({backend}): {message}")]
    IndexError {
        /// The index backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The operation reached a capability that is not built yet.
    #[error("Not implemented: {0}")]
    Unimplemented(String),

    /// A tool invocation error, typically malformed arguments.
    #[error("Tool error: {0}")]
    ToolError(String),

    /// Tool arguments or payloads failed to serialize or deserialize.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// A convenience result type for library operations.
pub type Result<T> = std::result::Result<T, LibraryError>;
