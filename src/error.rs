//! Error types for the bibsort crate

use thiserror::Error;

/// Result type for bibsort operations
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for bibsort
#[derive(Error, Debug)]
pub enum Error {
    /// A bibliography entry whose opening brace is never closed
    #[error("Malformed entry at byte {offset}: {message}")]
    MalformedEntry {
        /// Byte offset of the entry's `@` marker
        offset: usize,
        /// Error message
        message: String,
    },

    /// An entry with no key token between the opening brace and first comma
    #[error("No citation key found in entry at byte {offset}")]
    MalformedKey {
        /// Byte offset of the entry's `@` marker
        offset: usize,
    },

    /// A field whose value delimiter is unterminated, or whose value
    /// cannot be interpreted (e.g. an unrecognizable month name)
    #[error("Malformed field '{field}' at byte {offset}: {message}")]
    MalformedField {
        /// The field name as read from the source
        field: String,
        /// Byte offset of the field value
        offset: usize,
        /// Error message
        message: String,
    },

    /// Two source entries share the same citation key
    #[error("Duplicate entry key '{0}'")]
    DuplicateKey(String),

    /// Transport-level failure talking to the key registry
    #[error("Registry error: {0}")]
    Registry(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Build a one-line source snippet around `pos` with a caret marker,
/// used when reporting structural parse errors.
#[must_use]
pub fn snippet(input: &str, pos: usize, context_size: usize) -> String {
    let start = floor_char_boundary(input, pos.saturating_sub(context_size));
    let end = ceil_char_boundary(input, (pos + context_size).min(input.len()));
    let fragment: String = input[start..end]
        .chars()
        .map(|c| if c == '\n' || c == '\r' || c == '\t' { ' ' } else { c })
        .collect();
    let caret_pos = input[start..pos.min(end)].chars().count();
    format!("{}\n{}^", fragment, " ".repeat(caret_pos))
}

fn floor_char_boundary(s: &str, mut i: usize) -> usize {
    i = i.min(s.len());
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_char_boundary(s: &str, mut i: usize) -> usize {
    i = i.min(s.len());
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_marks_position() {
        let s = snippet("abcdefgh", 4, 2);
        assert_eq!(s, "cdef\n  ^");
    }

    #[test]
    fn test_snippet_clamps_to_input() {
        let s = snippet("ab", 1, 10);
        assert_eq!(s, "ab\n ^");
    }
}
