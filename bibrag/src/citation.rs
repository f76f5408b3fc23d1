//! Citation records and metadata normalization.
//!
//! The [`CitationRecord`] is the unit every retrieval operation returns: one
//! bibliographic result per source document, built fresh from raw chunk
//! metadata on every call and never persisted. Normalization is lossy by
//! policy: a missing field gets a placeholder (`"Unknown"`, `"Untitled"`,
//! `"n.d."`) rather than failing the whole result.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::metadata;

/// A normalized bibliographic search result.
///
/// `similarity` is `1 - distance` rounded to 3 decimal places, or `None`
/// when the producing operation had no distance for the hit (it serializes
/// as `null` so callers can tell "unranked" from "score zero"). Similarity
/// values are only comparable across calls against the same index and
/// embedding configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CitationRecord {
    /// Human-readable citation string.
    pub citation: String,
    /// Truncated chunk content, present when the operation fetched content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Relevance in [0, 1], or `None` when no distance was available.
    pub similarity: Option<f64>,
    /// DOI as stored, either bare (`10.1000/xyz`) or a full URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi_or_url: Option<String>,
    /// Web address of the item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Stable key of the source document, when the chunk carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_key: Option<String>,
    /// Best resolvable link for the item, derived from DOI and URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_link: Option<String>,
    /// User-facing bibliographic fields (see [`metadata::cleaned`]).
    pub metadata: BTreeMap<String, String>,
}

impl CitationRecord {
    /// Build a record from one chunk's metadata.
    ///
    /// `content` fills the excerpt (truncated to `excerpt_len` characters);
    /// pass `None` for operations that do not fetch chunk content.
    /// `distance` is the index's native nearness value for the hit, mapped
    /// here to a similarity score.
    pub fn from_chunk(
        meta: &HashMap<String, String>,
        content: Option<&str>,
        distance: Option<f64>,
        excerpt_len: usize,
    ) -> Self {
        let doi_or_url = meta.get(metadata::DOI).cloned();
        let uri = meta.get(metadata::URL).or_else(|| meta.get(metadata::URI)).cloned();
        let external_link = external_link(doi_or_url.as_deref(), uri.as_deref());

        Self {
            citation: assemble_citation(meta),
            excerpt: content.map(|c| truncate_excerpt(c, excerpt_len)),
            similarity: distance.map(similarity_from_distance),
            doi_or_url,
            uri,
            document_key: meta.get(metadata::ITEM_KEY).cloned(),
            external_link,
            metadata: metadata::cleaned(meta),
        }
    }
}

/// Assemble a citation string from raw chunk metadata.
///
/// A non-empty precomputed `citation` field is returned verbatim. Otherwise
/// the citation is built as `"{authors} ({year}). {title}"`, with the
/// publication venue appended when one is recorded. The year is the first
/// four characters of the date field, or `"n.d."` when no date is stored.
pub fn assemble_citation(meta: &HashMap<String, String>) -> String {
    if let Some(precomputed) = meta.get(metadata::CITATION).filter(|c| !c.is_empty()) {
        return precomputed.clone();
    }

    let authors = meta.get(metadata::CREATORS).map(String::as_str).unwrap_or("Unknown");
    let title = meta
        .get(metadata::DOCUMENT_TITLE)
        .or_else(|| meta.get(metadata::TITLE))
        .map(String::as_str)
        .unwrap_or("Untitled");
    let year: String = match meta.get(metadata::DATE) {
        Some(date) if !date.is_empty() => date.chars().take(4).collect(),
        _ => "n.d.".to_string(),
    };

    let mut citation = format!("{authors} ({year}). {title}");

    let publication =
        meta.get(metadata::PUBLICATION_TITLE).or_else(|| meta.get(metadata::PUBLISHER));
    if let Some(publication) = publication.filter(|p| !p.is_empty()) {
        citation.push_str(&format!(". {publication}"));
    }

    citation
}

/// Truncate content to `limit` characters, appending `"..."` when cut.
///
/// The cut lands on a character boundary, so multibyte text is never split
/// mid-codepoint. Content of `limit` characters or fewer passes through
/// verbatim, without the marker.
pub fn truncate_excerpt(content: &str, limit: usize) -> String {
    match content.char_indices().nth(limit) {
        Some((boundary, _)) => format!("{}...", &content[..boundary]),
        None => content.to_string(),
    }
}

/// Map an index distance (smaller = closer) to a similarity in [0, 1].
///
/// Rounded to 3 decimal places so repeated queries against an unchanged
/// index serialize identically.
pub fn similarity_from_distance(distance: f64) -> f64 {
    round3(1.0 - distance)
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Derive the best resolvable link for an item.
///
/// A DOI already in URL form is used as-is; a bare DOI is resolved through
/// `doi.org`; otherwise the stored URI is used. Empty strings count as
/// absent.
fn external_link(doi_or_url: Option<&str>, uri: Option<&str>) -> Option<String> {
    if let Some(doi) = doi_or_url.filter(|d| !d.is_empty()) {
        if doi.starts_with("http://") || doi.starts_with("https://") {
            return Some(doi.to_string());
        }
        return Some(format!("https://doi.org/{doi}"));
    }
    uri.filter(|u| !u.is_empty()).map(str::to_string)
}
