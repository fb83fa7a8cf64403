//! Field-level parsing of a single raw entry
//!
//! Splits one entry's text into its type, key, and `name = value` fields.
//! Commas and equals signs inside `{...}`, `"..."`, or `'...'` groups are
//! inert: the scanner jumps over each delimited group when locating field
//! boundaries.

use super::scanner::{find_byte, locate_match};
use crate::error::{snippet, Error, Result};
use crate::model::{EntryType, ParsedRecord};

/// Closing byte for a recognized value delimiter, `None` for ordinary bytes.
const fn closer(byte: u8) -> Option<u8> {
    match byte {
        b'{' => Some(b'}'),
        b'"' => Some(b'"'),
        b'\'' => Some(b'\''),
        _ => None,
    }
}

/// Parse one raw entry into a structured record.
///
/// `base` is the entry's byte offset in the original bibliography text, used
/// so that error positions refer to the source file rather than the entry.
pub fn parse_record(text: &str, base: usize) -> Result<ParsedRecord> {
    let text = text.trim();
    let bytes = text.as_bytes();

    let at = find_byte(bytes, b'@', 0).ok_or_else(|| Error::MalformedEntry {
        offset: base,
        message: "entry does not start with '@'".to_string(),
    })?;
    let open = find_byte(bytes, b'{', at).ok_or_else(|| Error::MalformedEntry {
        offset: base,
        message: "entry has no opening brace".to_string(),
    })?;
    let fields_end = locate_match(text, open, b'}').ok_or_else(|| Error::MalformedEntry {
        offset: base,
        message: format!(
            "entry has no matching closing brace\n{}",
            snippet(text, open, 30)
        ),
    })?;

    let ty = EntryType::parse(text[at + 1..open].trim());
    let key_end = find_byte(bytes, b',', open + 1)
        .filter(|&comma| comma < fields_end)
        .unwrap_or(fields_end);
    let key = text[open + 1..key_end].trim();
    if key.is_empty() {
        return Err(Error::MalformedKey { offset: base });
    }

    let mut record = ParsedRecord::new(ty, key.to_string());

    // The first field has no leading comma of its own: its name starts right
    // after the comma that terminated the entry key.
    let mut field_end = key_end;
    while let Some(eq) = find_byte(bytes, b'=', field_end).filter(|&eq| eq < fields_end) {
        let name = text[field_end + 1..eq].trim().to_lowercase();
        let value_end = scan_value(text, eq + 1, fields_end, &name, base)?;
        let value = normalize_value(&text[eq + 1..value_end]);
        record.set(name, value);
        field_end = value_end;
    }

    Ok(record)
}

/// Walk a field value starting just after its `=`, jumping over delimited
/// groups, until a top-level comma or the record's closing brace. Returns the
/// index of the value's end.
fn scan_value(text: &str, start: usize, fields_end: usize, name: &str, base: usize) -> Result<usize> {
    let bytes = text.as_bytes();
    let mut pos = start;
    while pos < fields_end {
        let byte = bytes[pos];
        if let Some(close) = closer(byte) {
            pos = locate_match(text, pos, close)
                .filter(|&end| end < fields_end)
                .ok_or_else(|| Error::MalformedField {
                    field: name.to_string(),
                    offset: base + pos,
                    message: format!(
                        "unterminated '{}' delimiter\n{}",
                        byte as char,
                        snippet(text, pos, 30)
                    ),
                })?;
        } else if byte == b',' {
            break;
        }
        pos += 1;
    }
    Ok(pos.min(fields_end))
}

/// Collapse whitespace runs to single spaces and strip the value's outer
/// delimiter pair when the whole value is one delimited group. Inner
/// structure is preserved for reserialization.
fn normalize_value(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let bytes = collapsed.as_bytes();
    if let Some(close) = bytes.first().copied().and_then(closer) {
        if locate_match(&collapsed, 0, close) == Some(collapsed.len() - 1) {
            return collapsed[1..collapsed.len() - 1].trim().to_string();
        }
    }
    collapsed
}
