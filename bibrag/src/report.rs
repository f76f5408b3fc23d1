//! Research report types and markdown rendering.
//!
//! A [`ResearchReport`] packages the results of a literature search as
//! structured data plus a markdown rendering. No text synthesis happens
//! here: the response and summary strings are fixed templates over result
//! counts, and each reference's summary is a trimmed excerpt.

use serde::{Deserialize, Serialize};

use crate::citation::CitationRecord;

/// Characters of excerpt carried into a reference summary.
const SUMMARY_EXCERPT_LEN: usize = 200;

/// A single literature reference backing a research report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reference {
    /// Complete academic citation (author, year, title, venue).
    pub citation: String,
    /// Brief summary of the relevant finding from this source.
    pub summary: String,
    /// DOI of the reference, if available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    /// URI or URL of the reference, if available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Stable key of the source document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_key: Option<String>,
}

impl Reference {
    /// Build a reference from a search result.
    ///
    /// The summary is the leading 200 characters of the result's excerpt.
    pub fn from_record(record: &CitationRecord) -> Self {
        let excerpt: String =
            record.excerpt.as_deref().unwrap_or("").chars().take(SUMMARY_EXCERPT_LEN).collect();
        Self {
            citation: record.citation.clone(),
            summary: format!("Relevant excerpt: {excerpt}..."),
            doi: record.doi_or_url.clone(),
            uri: record.uri.clone(),
            document_key: record.document_key.clone(),
        }
    }

    /// Render this reference as markdown.
    pub fn as_markdown(&self) -> String {
        let mut parts = vec![format!("**{}**", self.citation)];

        if let Some(doi) = self.doi.as_deref().filter(|d| !d.is_empty()) {
            parts.push(format!("DOI: [{doi}](https://doi.org/{doi})"));
        } else if let Some(uri) = self.uri.as_deref().filter(|u| !u.is_empty()) {
            parts.push(format!("URL: {uri}"));
        }

        parts.push(format!("\n{}", self.summary));

        parts.join("\n")
    }
}

/// The structured result of a literature search over the library.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResearchReport {
    /// Response to the research question, grounded in the literature.
    pub response: String,
    /// Short summary of what the search found.
    pub summary: String,
    /// Academic references supporting the response.
    pub literature: Vec<Reference>,
    /// Search queries used to find the literature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_queries: Option<Vec<String>>,
}

impl ResearchReport {
    /// Render the full report as markdown.
    pub fn as_markdown(&self) -> String {
        let mut parts = vec![
            "## Summary".to_string(),
            self.summary.clone(),
            String::new(),
            "## Response".to_string(),
            self.response.clone(),
            String::new(),
            "## References".to_string(),
        ];

        if self.literature.is_empty() {
            parts.push("*No references found for this query.*".to_string());
        } else {
            for (i, reference) in self.literature.iter().enumerate() {
                parts.push(format!("\n### {}. {}", i + 1, reference.citation));
                parts.push(reference.summary.clone());
                if let Some(doi) = reference.doi.as_deref().filter(|d| !d.is_empty()) {
                    parts.push(format!("DOI: [{doi}](https://doi.org/{doi})"));
                } else if let Some(uri) = reference.uri.as_deref().filter(|u| !u.is_empty()) {
                    parts.push(format!("URL: {uri}"));
                }
            }
        }

        parts.join("\n")
    }
}
