//! Well-known metadata field names and the user-facing metadata projection.
//!
//! Chunk metadata is written by the ingestion pipeline and read here; the
//! constants below are the shared vocabulary that keeps the two sides from
//! drifting apart. Raw field names follow the reference manager's export
//! schema, which is why their casing is inconsistent (`DOI`,
//! `publicationTitle`).

use std::collections::{BTreeMap, HashMap};

/// Stable key shared by every chunk of one source document.
pub const ITEM_KEY: &str = "item_key";
/// Precomputed citation string, used verbatim when present.
pub const CITATION: &str = "citation";
/// Free-text author list.
pub const CREATORS: &str = "creators";
/// Title of the source document (preferred over [`TITLE`]).
pub const DOCUMENT_TITLE: &str = "document_title";
/// Title of the indexed item.
pub const TITLE: &str = "title";
/// Publication date string; the first four characters are taken as the year.
pub const DATE: &str = "date";
/// Journal or periodical name.
pub const PUBLICATION_TITLE: &str = "publicationTitle";
/// Publisher name, used as the venue when no periodical is recorded.
pub const PUBLISHER: &str = "publisher";
/// Digital object identifier, either bare or as a full URL.
pub const DOI: &str = "DOI";
/// Web address of the item.
pub const URL: &str = "url";
/// Fallback address when [`URL`] is absent.
pub const URI: &str = "uri";
/// Item type tag (`journalArticle`, `book`, `bookSection`, ...).
pub const ITEM_TYPE: &str = "itemType";
/// Abstract text.
pub const ABSTRACT_NOTE: &str = "abstractNote";

/// Raw-to-user-facing field renames applied by [`cleaned`], in application
/// order. Later entries overwrite earlier ones on name collision, so a
/// plain `title` takes precedence over `document_title` in the projection.
const CLEAN_FIELDS: &[(&str, &str)] = &[
    (DOCUMENT_TITLE, "title"),
    (TITLE, "title"),
    (CREATORS, "authors"),
    (DATE, "date"),
    (PUBLICATION_TITLE, "journal"),
    (PUBLISHER, "publisher"),
    (DOI, "doi"),
    (URL, "url"),
    (ITEM_TYPE, "type"),
    (ABSTRACT_NOTE, "abstract"),
    (ITEM_KEY, "document_key"),
];

/// Project raw chunk metadata onto the user-facing bibliographic fields.
///
/// Only the fields named in the projection table survive; chunk-internal
/// bookkeeping (offsets, ingestion timestamps, ...) is dropped. Returns a
/// `BTreeMap` so serialized output has a stable field order.
pub fn cleaned(metadata: &HashMap<String, String>) -> BTreeMap<String, String> {
    let mut clean = BTreeMap::new();
    for (raw, friendly) in CLEAN_FIELDS {
        if let Some(value) = metadata.get(*raw) {
            clean.insert((*friendly).to_string(), value.clone());
        }
    }
    clean
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn field_names_are_stable() {
        assert_eq!(ITEM_KEY, "item_key");
        assert_eq!(CREATORS, "creators");
        assert_eq!(DOCUMENT_TITLE, "document_title");
        assert_eq!(PUBLICATION_TITLE, "publicationTitle");
        assert_eq!(DOI, "DOI");
        assert_eq!(ITEM_TYPE, "itemType");
        assert_eq!(ABSTRACT_NOTE, "abstractNote");
    }

    #[test]
    fn cleaned_renames_and_drops_unknown_fields() {
        let raw = meta(&[
            (CREATORS, "Smith, A."),
            (DATE, "2020-05-01"),
            (DOI, "10.1000/xyz"),
            (ITEM_KEY, "ABC123"),
            ("chunk_offset", "512"),
        ]);
        let clean = cleaned(&raw);
        assert_eq!(clean.get("authors").map(String::as_str), Some("Smith, A."));
        assert_eq!(clean.get("date").map(String::as_str), Some("2020-05-01"));
        assert_eq!(clean.get("doi").map(String::as_str), Some("10.1000/xyz"));
        assert_eq!(clean.get("document_key").map(String::as_str), Some("ABC123"));
        assert!(!clean.contains_key("chunk_offset"));
        assert!(!clean.contains_key("item_key"));
    }

    #[test]
    fn plain_title_wins_over_document_title() {
        let raw = meta(&[(DOCUMENT_TITLE, "Full Document"), (TITLE, "Chapter Three")]);
        assert_eq!(cleaned(&raw).get("title").map(String::as_str), Some("Chapter Three"));
    }

    #[test]
    fn cleaned_of_empty_metadata_is_empty() {
        assert!(cleaned(&HashMap::new()).is_empty());
    }
}
