//! End-to-end pipeline tests: aux order + bib text + registry table in,
//! reordered bibliography and rewritten document out.

use ahash::AHashMap;
use pretty_assertions::assert_eq;

use bibsort::{
    get_ordered_citations, merge_and_serialize, parse_bibliography, resolve_and_remap,
    rewrite_citations, Error, KeyLookup, LookupOutcome, LookupQuery, NullLookup,
};

/// In-memory registry keyed by DOI and title
#[derive(Default)]
struct TableLookup {
    dois: AHashMap<String, String>,
    titles: AHashMap<String, String>,
}

impl KeyLookup for TableLookup {
    fn lookup(&self, query: &LookupQuery) -> bibsort::Result<LookupOutcome> {
        let found = match query {
            LookupQuery::Doi(doi) => self.dois.get(doi),
            LookupQuery::Title(title) => self.titles.get(title),
            _ => None,
        };
        Ok(found.map_or(LookupOutcome::NotFound, |k| {
            LookupOutcome::Unique(k.clone())
        }))
    }
}

const BIB: &str = r#"
@Article{smith_one,
    author = {Smith, Jane and Doe, John},
    title  = {A Study of {Things, Stuff} and More},
    doi    = {10.1000/thing},
    month  = aug,
    year   = 2019
}

@article{doe_two,
    author = "Doe, John",
    title  = "Another, Deeper Study",
    year   = {2021}
}

@Article{smith_dup,
    author = {Smith, Jane},
    title  = {A Study of {Things, Stuff} and More},
    doi    = {10.1000/thing},
    year   = 2019
}
"#;

const AUX: &str = "\\abx@aux@cite{doe_two}\n\\abx@aux@cite{smith_one}\n\\abx@aux@cite{doe_two}\n\\abx@aux@cite{smith_dup}\n";

fn registry() -> TableLookup {
    let mut table = TableLookup::default();
    table
        .dois
        .insert("10.1000/thing".to_string(), "Smith:2019abc".to_string());
    table
}

#[test]
fn full_pipeline_reorders_and_rekeys() {
    let order = get_ordered_citations(AUX).unwrap();
    assert_eq!(order, vec!["doe_two", "smith_one", "smith_dup"]);

    let records = parse_bibliography(BIB).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(
        records[0].get("title"),
        Some("A Study of {Things, Stuff} and More")
    );

    let (new_records, mapping) = resolve_and_remap(&records, &registry()).unwrap();
    // Both doi-bearing records collapse to the registry key; the record
    // without identifiers falls back to a synthetic key.
    assert_eq!(mapping["smith_one"], "Smith:2019abc");
    assert_eq!(mapping["smith_dup"], "Smith:2019abc");
    assert_eq!(mapping["doe_two"], "Doe:2021_unfound0");
    assert_eq!(new_records.len(), 2);

    let (bib_out, new_order) = merge_and_serialize(&order, &mapping, &new_records).unwrap();
    assert_eq!(new_order, vec!["Doe:2021_unfound0", "Smith:2019abc"]);

    // Cited-first record leads the output; duplicates serialized once.
    let doe_pos = bib_out.find("@Article{ Doe:2021_unfound0,").unwrap();
    let smith_pos = bib_out.find("@Article{ Smith:2019abc,").unwrap();
    assert!(doe_pos < smith_pos);
    assert_eq!(bib_out.matches("Smith:2019abc").count(), 1);

    // Month normalized, nested braces preserved.
    assert!(bib_out.contains("month  = 8,"));
    assert!(bib_out.contains("title  = {A Study of {Things, Stuff} and More},"));

    let tex = "Intro \\cite{smith_one, doe_two}. Later \\cite{smith_dup} again.";
    let rewritten = rewrite_citations(tex, &mapping);
    assert_eq!(
        rewritten,
        "Intro \\cite{Smith:2019abc,Doe:2021_unfound0}. Later \\cite{Smith:2019abc} again."
    );
    assert_eq!(rewrite_citations(&rewritten, &mapping), rewritten);
}

#[test]
fn offline_run_uses_synthetic_keys_for_everything() {
    let records = parse_bibliography(BIB).unwrap();
    let (new_records, mapping) = resolve_and_remap(&records, &NullLookup).unwrap();
    assert_eq!(new_records.len(), 3);
    assert_eq!(mapping["smith_one"], "Smith:2019_unfound0");
    assert_eq!(mapping["doe_two"], "Doe:2021_unfound1");
    assert_eq!(mapping["smith_dup"], "Smith:2019_unfound2");
}

#[test]
fn unterminated_entry_aborts_before_resolution() {
    let bad = "@Article{foo, title = {Unterminated";
    match parse_bibliography(bad) {
        Err(Error::MalformedEntry { offset, .. }) => assert_eq!(offset, 0),
        other => panic!("expected MalformedEntry, got {other:?}"),
    }
}

#[test]
fn reserialized_bibliography_reparses() {
    let records = parse_bibliography(BIB).unwrap();
    let (new_records, mapping) = resolve_and_remap(&records, &registry()).unwrap();
    let order = get_ordered_citations(AUX).unwrap();
    let (bib_out, _) = merge_and_serialize(&order, &mapping, &new_records).unwrap();

    let reparsed = parse_bibliography(&bib_out).unwrap();
    assert_eq!(reparsed.len(), 2);
    assert_eq!(
        reparsed[1].get("title"),
        Some("A Study of {Things, Stuff} and More")
    );
    assert_eq!(reparsed[1].get("month"), Some("8"));
}
