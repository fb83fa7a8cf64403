//! Top-level entry extraction
//!
//! Scans a bibliography blob for `@`-introduced entries and delimits each to
//! its matching close brace, including braces nested inside field values.

use super::scanner::{find_byte, locate_match};
use crate::error::{snippet, Error, Result};

/// One raw bibliography entry, spanning from its `@` marker to its matching
/// top-level closing brace (inclusive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry<'a> {
    /// Byte offset of the `@` marker in the source text
    pub start: usize,
    /// Byte offset one past the closing brace
    pub end: usize,
    /// Temporary key: the token between the opening brace and the first
    /// comma, trimmed
    pub key: String,
    /// The full entry text, `@` through `}` inclusive
    pub text: &'a str,
}

/// Extract all entries from a bibliography text, in first-seen order.
///
/// Fails with [`Error::MalformedEntry`] when an entry has no matching closing
/// brace, and with [`Error::DuplicateKey`] when two entries share a key.
pub fn extract_records(text: &str) -> Result<Vec<RawEntry<'_>>> {
    let bytes = text.as_bytes();
    let mut entries: Vec<RawEntry> = Vec::new();
    let mut search_from = 0;

    while let Some(at) = find_byte(bytes, b'@', search_from) {
        let open = find_byte(bytes, b'{', at).ok_or_else(|| Error::MalformedEntry {
            offset: at,
            message: format!("entry has no opening brace\n{}", snippet(text, at, 30)),
        })?;
        let close = locate_match(text, open, b'}').ok_or_else(|| Error::MalformedEntry {
            offset: at,
            message: format!(
                "entry has no matching closing brace\n{}",
                snippet(text, open, 30)
            ),
        })?;

        let key = entry_key(text, at, open, close)?;
        if entries.iter().any(|e| e.key == key) {
            return Err(Error::DuplicateKey(key));
        }
        entries.push(RawEntry {
            start: at,
            end: close + 1,
            key,
            text: &text[at..=close],
        });

        // Entries cannot overlap: resume after the closing brace.
        search_from = close + 1;
    }

    Ok(entries)
}

/// Read the key token between the opening brace and the first comma (or the
/// closing brace for a field-less entry).
fn entry_key(text: &str, at: usize, open: usize, close: usize) -> Result<String> {
    let key_end = find_byte(text.as_bytes(), b',', open + 1)
        .filter(|&comma| comma < close)
        .unwrap_or(close);
    let key = text[open + 1..key_end].trim();
    if key.is_empty() {
        return Err(Error::MalformedKey { offset: at });
    }
    Ok(key.to_string())
}
