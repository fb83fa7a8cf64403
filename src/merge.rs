//! Citation order merging and citation rewriting
//!
//! Maps the document's old-key citation order through the old-to-new key
//! mapping, dedupes by canonical key, and drives serialization of the
//! reordered bibliography plus rewriting of `\cite{...}` argument lists.

use ahash::AHashMap;
use tracing::warn;

use crate::model::ParsedRecord;
use crate::parser::scanner::find_byte;
use crate::writer;
use crate::Result;

/// Citation commands whose argument lists are rewritten. A command only
/// matches when its opening brace follows immediately, so `\citep{...}` is
/// never half-matched as `\cite`.
const CITE_COMMANDS: [&str; 6] = [
    "\\parencite",
    "\\autocite",
    "\\textcite",
    "\\citep",
    "\\citet",
    "\\cite",
];

/// Map an old citation order to the canonical order: each key is translated
/// through `old_to_new` (unmapped keys pass through verbatim) and appended
/// only on its first occurrence as a canonical key.
#[must_use]
pub fn merge_citation_order(
    old_order: &[String],
    old_to_new: &AHashMap<String, String>,
) -> Vec<String> {
    let mut new_order: Vec<String> = Vec::with_capacity(old_order.len());
    for old in old_order {
        let new = old_to_new.get(old).unwrap_or(old);
        if !new_order.iter().any(|seen| seen == new) {
            new_order.push(new.clone());
        }
    }
    new_order
}

/// Merge the citation order and serialize the bibliography in that order.
///
/// Returns the serialized text and the deduplicated canonical order. Cited
/// keys with no record pass through the order but are skipped when
/// serializing; records never cited are dropped. Both are surfaced with a
/// warning since either usually means a stale aux file.
pub fn merge_and_serialize(
    old_order: &[String],
    old_to_new: &AHashMap<String, String>,
    new_records: &[ParsedRecord],
) -> Result<(String, Vec<String>)> {
    let new_order = merge_citation_order(old_order, old_to_new);

    let mut ordered: Vec<ParsedRecord> = Vec::with_capacity(new_order.len());
    for key in &new_order {
        match new_records.iter().find(|r| &r.key == key) {
            Some(record) => ordered.push(record.clone()),
            None => warn!(%key, "cited key has no bibliography record, skipping"),
        }
    }
    for record in new_records {
        if !new_order.iter().any(|key| key == &record.key) {
            warn!(key = %record.key, "record is never cited, dropping");
        }
    }

    Ok((writer::to_string(&ordered)?, new_order))
}

/// Rewrite every citation command's argument list, substituting each
/// comma-separated old key with its canonical key.
///
/// Keys absent from the mapping are passed through verbatim, which makes the
/// rewrite idempotent and tolerant of keys the document used that never
/// appeared in the bibliography. All surrounding text is preserved.
#[must_use]
pub fn rewrite_citations(document: &str, old_to_new: &AHashMap<String, String>) -> String {
    let bytes = document.as_bytes();
    let mut out = String::with_capacity(document.len());
    let mut pos = 0;

    while let Some(slash) = find_byte(bytes, b'\\', pos) {
        out.push_str(&document[pos..=slash]);
        pos = slash + 1;

        let Some(command) = CITE_COMMANDS
            .iter()
            .find(|cmd| document[slash..].starts_with(&format!("{cmd}{{")))
        else {
            continue;
        };
        let args_start = slash + command.len() + 1;
        let Some(args_end) = find_byte(bytes, b'}', args_start) else {
            // Unterminated argument list: leave the rest untouched.
            break;
        };

        let keys: Vec<&str> = document[args_start..args_end]
            .split(',')
            .map(str::trim)
            .map(|key| old_to_new.get(key).map_or(key, String::as_str))
            .collect();

        out.push_str(&command[1..]);
        out.push('{');
        out.push_str(&keys.join(","));
        out.push('}');
        pos = args_end + 1;
    }

    out.push_str(&document[pos..]);
    out
}
