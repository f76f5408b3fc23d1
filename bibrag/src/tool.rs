//! Tool surface: each retrieval operation wrapped for agentic use.
//!
//! Every [`ReferenceLibrary`] operation is exposed as a [`Tool`]: a named,
//! self-describing callable taking a JSON argument map and returning a JSON
//! payload. A transport layer (out of scope here) routes tool calls by
//! name; [`toolset`] builds the full set over one shared library handle.
//!
//! Error shape follows each operation's contract: lookups that miss return
//! an `{"error": ...}` payload rather than failing the call, search never
//! fails at all, and only genuinely exceptional conditions (an unreachable
//! index outside the search path, a capability that is not built) surface
//! as `Err`.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use bibrag::{ReferenceLibrary, toolset};
//! use serde_json::json;
//!
//! let library = Arc::new(ReferenceLibrary::new(index, config));
//! for tool in toolset(library) {
//!     println!("{}: {}", tool.name(), tool.description());
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{error, info};

use crate::error::{LibraryError, Result};
use crate::library::{ReferenceLibrary, VersionInfo};

/// A named, self-describing callable with JSON input and output.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name used for call routing.
    fn name(&self) -> &str;

    /// One-line description of what the tool does.
    fn description(&self) -> &str;

    /// JSON schema of the accepted arguments, if the tool takes any.
    fn parameters_schema(&self) -> Option<Value>;

    /// Run the tool with a JSON argument map.
    async fn execute(&self, args: Value) -> Result<Value>;
}

/// Build the complete toolset over one shared library handle.
pub fn toolset(library: Arc<ReferenceLibrary>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(SearchTool::new(library.clone())),
        Arc::new(GetItemTool::new(library.clone())),
        Arc::new(SimilarItemsTool::new(library.clone())),
        Arc::new(AuthorSearchTool::new(library.clone())),
        Arc::new(CollectionInfoTool::new(library.clone())),
        Arc::new(ResearchTool::new(library)),
        Arc::new(VersionInfoTool),
    ]
}

fn required_str<'a>(args: &'a Value, name: &str) -> Result<&'a str> {
    args.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| LibraryError::ToolError(format!("missing required '{name}' parameter")))
}

fn optional_usize(args: &Value, name: &str, default: usize) -> usize {
    // Saturate counts too large for the target so downstream capping sees
    // the requested magnitude instead of a truncated value.
    args.get(name)
        .and_then(Value::as_u64)
        .map(|v| usize::try_from(v).unwrap_or(usize::MAX))
        .unwrap_or(default)
}

fn to_payload<T: serde::Serialize>(response: &T) -> Result<Value> {
    serde_json::to_value(response).map_err(|e| {
        error!(error = %e, "failed to serialize tool response");
        LibraryError::from(e)
    })
}

// ---------------------------------------------------------------------------
// search
// ---------------------------------------------------------------------------

/// Semantic search over the library.
pub struct SearchTool {
    library: Arc<ReferenceLibrary>,
}

impl SearchTool {
    /// Create the tool over the given library handle.
    pub fn new(library: Arc<ReferenceLibrary>) -> Self {
        Self { library }
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Search the reference library using semantic similarity"
    }

    fn parameters_schema(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Natural language search query"
                },
                "n_results": {
                    "type": "integer",
                    "description": "Number of results to return (default: 10, max: 50)"
                },
                "filter_type": {
                    "type": "string",
                    "description": "Optional filter by item type (e.g., 'journalArticle', 'book', 'bookSection')"
                }
            },
            "required": ["query"]
        }))
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let query = required_str(&args, "query")?;
        let n_results = optional_usize(&args, "n_results", 10);
        let filter_type = args.get("filter_type").and_then(Value::as_str);

        info!(query, n_results, filter_type, "search tool called");
        let response = self.library.search(query, n_results, filter_type).await;
        to_payload(&response)
    }
}

// ---------------------------------------------------------------------------
// get_item
// ---------------------------------------------------------------------------

/// Full-content lookup of one item by document key.
pub struct GetItemTool {
    library: Arc<ReferenceLibrary>,
}

impl GetItemTool {
    /// Create the tool over the given library handle.
    pub fn new(library: Arc<ReferenceLibrary>) -> Self {
        Self { library }
    }
}

#[async_trait]
impl Tool for GetItemTool {
    fn name(&self) -> &str {
        "get_item"
    }

    fn description(&self) -> &str {
        "Retrieve full text and metadata for a specific library item"
    }

    fn parameters_schema(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "item_key": {
                    "type": "string",
                    "description": "Document key of the library item"
                }
            },
            "required": ["item_key"]
        }))
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let item_key = required_str(&args, "item_key")?;
        info!(item_key, "get_item tool called");

        match self.library.item(item_key).await {
            Ok(content) => to_payload(&content),
            Err(e @ LibraryError::NotFound { .. }) => {
                info!(item_key, "item not found");
                Ok(json!({ "error": e.to_string() }))
            }
            Err(e) => {
                error!(error = %e, "get_item failed");
                Err(e)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// get_similar_items
// ---------------------------------------------------------------------------

/// Nearest-neighbor lookup for an existing item.
pub struct SimilarItemsTool {
    library: Arc<ReferenceLibrary>,
}

impl SimilarItemsTool {
    /// Create the tool over the given library handle.
    pub fn new(library: Arc<ReferenceLibrary>) -> Self {
        Self { library }
    }
}

#[async_trait]
impl Tool for SimilarItemsTool {
    fn name(&self) -> &str {
        "get_similar_items"
    }

    fn description(&self) -> &str {
        "Find items similar to a given library item"
    }

    fn parameters_schema(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "item_key": {
                    "type": "string",
                    "description": "Document key to find similar items for"
                },
                "n_results": {
                    "type": "integer",
                    "description": "Number of similar items to return (default: 5)"
                }
            },
            "required": ["item_key"]
        }))
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let item_key = required_str(&args, "item_key")?;
        let n_results = optional_usize(&args, "n_results", 5);
        info!(item_key, n_results, "get_similar_items tool called");

        match self.library.similar_items(item_key, n_results).await {
            Ok(response) => to_payload(&response),
            Err(e @ LibraryError::NotFound { .. }) => {
                info!(item_key, "item not found");
                Ok(json!({ "error": e.to_string() }))
            }
            Err(e) => {
                error!(error = %e, "get_similar_items failed");
                Err(e)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// search_by_author
// ---------------------------------------------------------------------------

/// Author-name scan over the corpus.
pub struct AuthorSearchTool {
    library: Arc<ReferenceLibrary>,
}

impl AuthorSearchTool {
    /// Create the tool over the given library handle.
    pub fn new(library: Arc<ReferenceLibrary>) -> Self {
        Self { library }
    }
}

#[async_trait]
impl Tool for AuthorSearchTool {
    fn name(&self) -> &str {
        "search_by_author"
    }

    fn description(&self) -> &str {
        "Search for items by a specific author"
    }

    fn parameters_schema(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "author_name": {
                    "type": "string",
                    "description": "Author name to search for (can be partial)"
                },
                "n_results": {
                    "type": "integer",
                    "description": "Number of results to return (default: 20)"
                }
            },
            "required": ["author_name"]
        }))
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let author_name = required_str(&args, "author_name")?;
        let n_results = optional_usize(&args, "n_results", 20);
        info!(author_name, n_results, "search_by_author tool called");

        let response = self.library.search_by_author(author_name, n_results).await.map_err(|e| {
            error!(error = %e, "search_by_author failed");
            e
        })?;
        to_payload(&response)
    }
}

// ---------------------------------------------------------------------------
// get_collection_info
// ---------------------------------------------------------------------------

/// Aggregate statistics about the indexed collection.
pub struct CollectionInfoTool {
    library: Arc<ReferenceLibrary>,
}

impl CollectionInfoTool {
    /// Create the tool over the given library handle.
    pub fn new(library: Arc<ReferenceLibrary>) -> Self {
        Self { library }
    }
}

#[async_trait]
impl Tool for CollectionInfoTool {
    fn name(&self) -> &str {
        "get_collection_info"
    }

    fn description(&self) -> &str {
        "Get statistics about the reference library collection"
    }

    fn parameters_schema(&self) -> Option<Value> {
        None
    }

    async fn execute(&self, _args: Value) -> Result<Value> {
        info!("get_collection_info tool called");
        let response = self.library.collection_info().await.map_err(|e| {
            error!(error = %e, "get_collection_info failed");
            e
        })?;
        to_payload(&response)
    }
}

// ---------------------------------------------------------------------------
// research
// ---------------------------------------------------------------------------

/// Literature search packaged as a structured research report.
pub struct ResearchTool {
    library: Arc<ReferenceLibrary>,
}

impl ResearchTool {
    /// Create the tool over the given library handle.
    pub fn new(library: Arc<ReferenceLibrary>) -> Self {
        Self { library }
    }
}

#[async_trait]
impl Tool for ResearchTool {
    fn name(&self) -> &str {
        "research"
    }

    fn description(&self) -> &str {
        "Search the library and assemble the sources into a research report"
    }

    fn parameters_schema(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "research_question": {
                    "type": "string",
                    "description": "The research question or topic to investigate"
                },
                "max_sources": {
                    "type": "integer",
                    "description": "Maximum number of sources to include (default: 10)"
                }
            },
            "required": ["research_question"]
        }))
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let research_question = required_str(&args, "research_question")?;
        let max_sources = optional_usize(&args, "max_sources", 10);
        info!(research_question, max_sources, "research tool called");

        let report = self.library.research(research_question, max_sources).await;
        to_payload(&report)
    }
}

// ---------------------------------------------------------------------------
// get_version_info
// ---------------------------------------------------------------------------

/// Build metadata of this crate.
pub struct VersionInfoTool;

#[async_trait]
impl Tool for VersionInfoTool {
    fn name(&self) -> &str {
        "get_version_info"
    }

    fn description(&self) -> &str {
        "Get version information for this crate"
    }

    fn parameters_schema(&self) -> Option<Value> {
        None
    }

    async fn execute(&self, _args: Value) -> Result<Value> {
        to_payload(&VersionInfo::current())
    }
}
