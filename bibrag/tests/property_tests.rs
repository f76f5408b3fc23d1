//! Property tests for deduplication, excerpt truncation, similarity
//! mapping, and the search result cap.

mod common;

use std::sync::Arc;

use bibrag::citation::{similarity_from_distance, truncate_excerpt};
use bibrag::{LibraryConfig, ReferenceLibrary, dedupe_first_seen};
use common::CannedIndex;
use proptest::prelude::*;

/// Generate a hit stream as (document key, payload) pairs with plenty of
/// key collisions, the shape deduplication exists for.
fn arb_hits() -> impl Strategy<Value = Vec<(String, u32)>> {
    proptest::collection::vec(("D[0-9]", any::<u32>()), 0..40)
}

/// For any hit stream, deduplication keeps exactly one entry per distinct
/// document key, that entry is the first occurrence of its key, and the
/// survivors keep their relative input order.
mod prop_dedupe_first_seen {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn one_entry_per_key_first_occurrence_in_order(hits in arb_hits()) {
            let deduped = dedupe_first_seen(hits.clone(), |(key, _)| Some(key.as_str()));

            let mut keys: Vec<&str> = deduped.iter().map(|(k, _)| k.as_str()).collect();
            keys.sort_unstable();
            let distinct_before = keys.len();
            keys.dedup();
            prop_assert_eq!(keys.len(), distinct_before, "duplicate key survived");

            // Each survivor is the first input occurrence of its key.
            for entry in &deduped {
                let first = hits.iter().find(|(k, _)| k == &entry.0).unwrap();
                prop_assert_eq!(entry, first);
            }

            // Survivor order matches input order.
            let mut positions = deduped
                .iter()
                .map(|e| hits.iter().position(|h| h == e).unwrap());
            let mut last = None;
            for pos in &mut positions {
                prop_assert!(last.is_none_or(|l| pos > l));
                last = Some(pos);
            }
        }
    }
}

/// For any content and limit, the excerpt never exceeds `limit` characters
/// plus the three-character ellipsis marker, short content passes through
/// verbatim, and truncated output is always a prefix of the input.
mod prop_truncate_excerpt {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn bounded_and_prefix_preserving(content in ".{0,700}", limit in 1usize..600) {
            let excerpt = truncate_excerpt(&content, limit);
            let content_chars = content.chars().count();

            if content_chars <= limit {
                prop_assert_eq!(excerpt, content);
            } else {
                prop_assert_eq!(excerpt.chars().count(), limit + 3);
                prop_assert!(excerpt.ends_with("..."));
                prop_assert!(content.starts_with(excerpt.trim_end_matches("...")));
            }
        }
    }
}

/// For any distance in [0, 1], the similarity score lands in [0, 1] and
/// carries at most three decimal places.
mod prop_similarity_mapping {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn in_unit_range_with_three_decimals(distance in 0.0f64..=1.0) {
            let similarity = similarity_from_distance(distance);
            prop_assert!((0.0..=1.0).contains(&similarity));
            prop_assert_eq!(similarity, (similarity * 1000.0).round() / 1000.0);
        }
    }
}

/// For any requested result count, the count actually sent to the index is
/// the request capped at the configured maximum, never more.
mod prop_search_clamp {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn requested_count_is_capped(n_results in 0usize..10_000) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let issued = rt.block_on(async {
                let index = Arc::new(CannedIndex::new(Vec::new(), Vec::new()));
                let library =
                    ReferenceLibrary::new(index.clone(), LibraryConfig::default());
                library.search("anything", n_results, None).await;
                index.requested()
            });

            prop_assert_eq!(issued, vec![n_results.min(50)]);
        }
    }
}
