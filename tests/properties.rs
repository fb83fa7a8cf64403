//! Property tests for the scanner, merger, and citation rewriter

use ahash::AHashMap;
use proptest::prelude::*;

use bibsort::parser::scanner::locate_match;
use bibsort::{merge_citation_order, rewrite_citations};

/// Brace-balanced text: leaves of brace-free noise, recursively wrapped
fn balanced_body() -> impl Strategy<Value = String> {
    let leaf = proptest::string::string_regex("[a-zA-Z0-9 ,=.\"']{0,8}").unwrap();
    leaf.prop_recursive(4, 32, 4, |inner| {
        proptest::collection::vec(
            prop_oneof![
                proptest::string::string_regex("[a-zA-Z0-9 ,=.\"']{0,8}").unwrap(),
                inner.prop_map(|s| format!("{{{s}}}")),
            ],
            0..4,
        )
        .prop_map(|parts| parts.concat())
    })
}

/// Lower-case old keys, capitalized new keys: domain and range disjoint, so
/// a rewritten document rewrites to itself.
fn key_mapping() -> impl Strategy<Value = AHashMap<String, String>> {
    proptest::collection::hash_map(
        proptest::string::string_regex("[a-z][a-z0-9]{0,5}").unwrap(),
        proptest::string::string_regex("[A-Z][a-z0-9:]{0,6}").unwrap(),
        0..6,
    )
    .prop_map(|m| m.into_iter().collect())
}

proptest! {
    #[test]
    fn balanced_input_always_matches(body in balanced_body()) {
        let text = format!("{{{body}}}");
        prop_assert_eq!(locate_match(&text, 0, b'}'), Some(text.len() - 1));
    }

    #[test]
    fn missing_closer_is_not_found(body in balanced_body()) {
        let text = format!("{{{body}");
        prop_assert_eq!(locate_match(&text, 0, b'}'), None);
    }

    #[test]
    fn merged_order_has_no_duplicates(
        old_order in proptest::collection::vec(
            proptest::string::string_regex("[a-z][a-z0-9]{0,3}").unwrap(), 0..12),
        mapping in key_mapping(),
    ) {
        let merged = merge_citation_order(&old_order, &mapping);

        let mut seen = std::collections::HashSet::new();
        prop_assert!(merged.iter().all(|k| seen.insert(k.clone())));

        let distinct: std::collections::HashSet<_> = old_order
            .iter()
            .map(|old| mapping.get(old).unwrap_or(old))
            .collect();
        prop_assert!(merged.len() <= distinct.len());
    }

    #[test]
    fn citation_rewrite_is_idempotent(
        fragments in proptest::collection::vec(
            proptest::string::string_regex("[a-z A-Z.]{0,10}").unwrap(), 1..5),
        cited in proptest::collection::vec(
            proptest::string::string_regex("[a-z][a-z0-9]{0,5}").unwrap(), 0..4),
        mapping in key_mapping(),
    ) {
        let mut doc = String::new();
        for (i, fragment) in fragments.iter().enumerate() {
            doc.push_str(fragment);
            if i < cited.len() {
                doc.push_str(&format!("\\cite{{{}}}", cited[i]));
            }
        }
        let once = rewrite_citations(&doc, &mapping);
        let twice = rewrite_citations(&once, &mapping);
        prop_assert_eq!(once, twice);
    }
}
