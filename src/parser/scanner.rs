//! Balanced-delimiter scanning using memchr
//!
//! The whole parser is built on one primitive: given the position of an
//! opening delimiter, find the index of its matching closer. Nesting is only
//! tracked for distinct opener/closer pairs; a quote cannot nest inside
//! itself, so for same-character pairs the first later occurrence closes.

/// Find the index of the delimiter matching the opener at `open_index`.
///
/// The opener character is read from `text[open_index]`. Returns `None` if
/// the text ends before the matching `close` byte is found; callers translate
/// that into a `MalformedEntry` or `MalformedField` error with the offending
/// offset.
#[must_use]
pub fn locate_match(text: &str, open_index: usize, close: u8) -> Option<usize> {
    let bytes = text.as_bytes();
    let open = *bytes.get(open_index)?;

    // Matched-pair delimiters (quotes) cannot nest with themselves.
    if open == close {
        return memchr::memchr(close, &bytes[open_index + 1..]).map(|pos| open_index + 1 + pos);
    }

    let mut depth: isize = 1;
    let mut pos = open_index + 1;
    while let Some((found, byte)) = find_bytes2(bytes, open, close, pos) {
        if byte == open {
            depth += 1;
        } else {
            depth -= 1;
            if depth == 0 {
                return Some(found);
            }
        }
        pos = found + 1;
    }
    None
}

/// Find a single specific delimiter
#[must_use]
pub fn find_byte(haystack: &[u8], needle: u8, start: usize) -> Option<usize> {
    if start >= haystack.len() {
        return None;
    }

    memchr::memchr(needle, &haystack[start..]).map(|pos| start + pos)
}

/// Find any of 2 delimiters
#[must_use]
pub fn find_bytes2(haystack: &[u8], needle1: u8, needle2: u8, start: usize) -> Option<(usize, u8)> {
    if start >= haystack.len() {
        return None;
    }

    memchr::memchr2(needle1, needle2, &haystack[start..])
        .map(|pos| (start + pos, haystack[start + pos]))
}
