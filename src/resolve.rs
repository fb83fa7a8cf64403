//! Canonical key resolution and record re-keying
//!
//! Each record is resolved to a stable registry key by trying a ladder of
//! query strategies (identifier fields first, then title, then authors).
//! Records the registry cannot place fall back to a deterministic synthetic
//! key so the run always completes; every fallback is surfaced with a
//! warning naming the unresolved title.

use ahash::AHashMap;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::ParsedRecord;
use crate::month;

/// One typed registry query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupQuery {
    /// A DOI, stripped of wrapping and whitespace
    Doi(String),
    /// An eprint / arXiv identifier
    Eprint(String),
    /// A normalized title
    Title(String),
    /// A normalized author list
    Author(String),
}

/// Result of one registry query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Exactly one record matched
    Unique(String),
    /// No record matched
    NotFound,
    /// More than one record matched; never silently resolved to one of them
    Ambiguous,
}

/// An external canonical-key registry
///
/// Injected so tests can substitute an in-memory table; the production
/// implementation is [`HttpRegistry`](crate::registry::HttpRegistry).
/// Transport errors are reported via `Err` and treated by the resolver as a
/// failed strategy, not a fatal condition.
pub trait KeyLookup {
    /// Resolve one query to at most one canonical key
    fn lookup(&self, query: &LookupQuery) -> Result<LookupOutcome>;
}

/// A lookup that never matches; used for offline runs, where every record
/// receives a synthetic key.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLookup;

impl KeyLookup for NullLookup {
    fn lookup(&self, _query: &LookupQuery) -> Result<LookupOutcome> {
        Ok(LookupOutcome::NotFound)
    }
}

/// Resolves records against a [`KeyLookup`] and builds the old-key to
/// canonical-key mapping.
///
/// Synthetic fallback keys carry a monotonically incrementing suffix owned
/// by the resolver, so key generation is deterministic within a run.
#[derive(Debug)]
pub struct Resolver<'a, L: KeyLookup> {
    lookup: &'a L,
    unfound: u32,
}

impl<'a, L: KeyLookup> Resolver<'a, L> {
    /// Create a resolver over the given registry
    pub const fn new(lookup: &'a L) -> Self {
        Self { lookup, unfound: 0 }
    }

    /// Resolve every record to a canonical key.
    ///
    /// Returns the re-keyed records in discovery order (one per canonical
    /// key, first source record wins) and the old-key to new-key mapping.
    /// Month fields are normalized before re-keying; an unparseable month is
    /// a [`Error::MalformedField`] and aborts the run.
    pub fn resolve_all(
        &mut self,
        records: &[ParsedRecord],
    ) -> Result<(Vec<ParsedRecord>, AHashMap<String, String>)> {
        let mut new_records: Vec<ParsedRecord> = Vec::with_capacity(records.len());
        let mut old_to_new = AHashMap::with_capacity(records.len());

        for record in records {
            let mut record = record.clone();
            normalize_month(&mut record)?;

            let new_key = match self.canonical_key(&record) {
                Some(key) => key,
                None => {
                    let title = record.get("title").unwrap_or("<no title>");
                    warn!(key = %record.key, title, "no registry match, using synthetic key");
                    self.synthetic_key(&record, &new_records)
                }
            };

            // Two source records resolving to the same canonical key are
            // duplicates of one work; the first one seen is kept.
            if !new_records.iter().any(|r| r.key == new_key) {
                let mut kept = record.clone();
                kept.key.clone_from(&new_key);
                new_records.push(kept);
            }
            old_to_new.insert(record.key.clone(), new_key);
        }

        Ok((new_records, old_to_new))
    }

    /// Try each query strategy in order, stopping at the first unique match.
    fn canonical_key(&self, record: &ParsedRecord) -> Option<String> {
        for query in strategies(record) {
            match self.lookup.lookup(&query) {
                Ok(LookupOutcome::Unique(key)) => {
                    debug!(?query, %key, "resolved");
                    return Some(key);
                }
                Ok(outcome) => debug!(?query, ?outcome, "strategy failed"),
                Err(e) => debug!(?query, error = %e, "strategy errored"),
            }
        }
        None
    }

    /// `<surname>:<year>_unfoundN`, guaranteed not to collide with any key
    /// already chosen this run.
    fn synthetic_key(&mut self, record: &ParsedRecord, taken: &[ParsedRecord]) -> String {
        let surname = record
            .get("author")
            .map(|authors| {
                let first = authors.replace(" and ", ",");
                first
                    .split(',')
                    .next()
                    .unwrap_or("")
                    .chars()
                    .filter(char::is_ascii_alphabetic)
                    .collect::<String>()
            })
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "unknown".to_string());
        let year = record
            .get("year")
            .map(|y| y.chars().filter(char::is_ascii_digit).collect::<String>())
            .filter(|y| !y.is_empty())
            .unwrap_or_else(|| "0000".to_string());

        loop {
            let key = format!("{surname}:{year}_unfound{}", self.unfound);
            self.unfound += 1;
            if !taken.iter().any(|r| r.key == key) {
                return key;
            }
        }
    }
}

/// Convenience wrapper over [`Resolver`] for one-shot use.
pub fn resolve_and_remap<L: KeyLookup>(
    records: &[ParsedRecord],
    lookup: &L,
) -> Result<(Vec<ParsedRecord>, AHashMap<String, String>)> {
    Resolver::new(lookup).resolve_all(records)
}

/// Build the strategy ladder for one record: doi (retried as an eprint,
/// since doi fields occasionally hold a miscategorized arXiv number), then
/// eprint, then title, then author.
fn strategies(record: &ParsedRecord) -> Vec<LookupQuery> {
    let mut queries = Vec::new();
    if let Some(doi) = record.get("doi") {
        // An identifier field can hold several comma-separated values; only
        // the first is queried.
        let first = bare(doi.split(',').next().unwrap_or(doi));
        if !first.is_empty() {
            queries.push(LookupQuery::Doi(first.clone()));
            queries.push(LookupQuery::Eprint(first));
        }
    }
    if let Some(eprint) = record.get("eprint") {
        let first = bare(eprint.split(',').next().unwrap_or(eprint));
        if !first.is_empty() {
            queries.push(LookupQuery::Eprint(first));
        }
    }
    if let Some(title) = record.get("title") {
        let spaced = spaced(title);
        if !spaced.is_empty() {
            queries.push(LookupQuery::Title(spaced));
        }
    }
    if let Some(author) = record.get("author") {
        let names = author_words(author);
        if !names.is_empty() {
            queries.push(LookupQuery::Author(names));
        }
    }
    queries
}

/// Normalize a month field in place, per the fixed table in [`month`].
fn normalize_month(record: &mut ParsedRecord) -> Result<()> {
    let Some(value) = record.get("month") else {
        return Ok(());
    };
    let numeric = month::to_numeric(value).ok_or_else(|| Error::MalformedField {
        field: "month".to_string(),
        offset: 0,
        message: format!("cannot parse '{value}' as a month"),
    })?;
    record.set("month".to_string(), numeric);
    Ok(())
}

/// Remove braces/quotes and all whitespace (identifier shaping)
fn bare(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '{' | '}' | '"') && !c.is_whitespace())
        .collect()
}

/// Remove braces/quotes, collapse whitespace to single spaces (title shaping)
fn spaced(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '{' | '}' | '"'))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Author-list shaping: drop punctuation and the connective "and"
fn author_words(s: &str) -> String {
    spaced(s)
        .replace([',', '.'], " ")
        .split_whitespace()
        .filter(|word| !word.eq_ignore_ascii_case("and"))
        .collect::<Vec<_>>()
        .join(" ")
}
