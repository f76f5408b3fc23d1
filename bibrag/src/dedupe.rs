//! First-seen deduplication of chunk hits by document key.
//!
//! The index ranks chunks, not documents, so one strong document can occupy
//! several adjacent ranks. Collapsing keeps the first (best-ranked)
//! occurrence per document key and drops the rest; relative order among the
//! keepers is untouched.

use std::collections::HashSet;

/// Tracks document keys across a streaming scan.
///
/// Used by operations that interleave deduplication with other per-hit
/// logic (early stopping, source-key exclusion). For a plain batch, see
/// [`dedupe_first_seen`].
#[derive(Debug, Default)]
pub struct Deduper {
    seen: HashSet<String>,
}

impl Deduper {
    /// Create a tracker with no keys seen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key; returns `true` the first time it is seen.
    pub fn admit(&mut self, key: &str) -> bool {
        self.seen.insert(key.to_string())
    }

    /// Number of distinct keys admitted so far.
    pub fn distinct(&self) -> usize {
        self.seen.len()
    }
}

/// Collapse a batch to at most one item per document key, first-seen wins.
///
/// `key_of` extracts the document key; items with no key cannot be
/// deduplicated and pass through unchanged. Input order is preserved among
/// the survivors.
pub fn dedupe_first_seen<T>(
    items: impl IntoIterator<Item = T>,
    key_of: impl Fn(&T) -> Option<&str>,
) -> Vec<T> {
    let mut deduper = Deduper::new();
    items
        .into_iter()
        .filter(|item| match key_of(item) {
            Some(key) => deduper.admit(key),
            None => true,
        })
        .collect()
}
