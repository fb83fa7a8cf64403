//! Brace-balanced bibliography parsing
//!
//! Three layers, leaves first: [`scanner`] finds matching delimiters,
//! [`record`] splits a bibliography blob into raw entries, and [`field`]
//! turns one raw entry into a [`ParsedRecord`](crate::ParsedRecord).

pub mod field;
pub mod record;
pub mod scanner;

use crate::error::Result;
use crate::model::ParsedRecord;

pub use field::parse_record;
pub use record::{extract_records, RawEntry};
pub use scanner::locate_match;

/// Parse a complete bibliography text into structured records, in
/// first-seen order. Keys are unique; a duplicate key is an error.
pub fn parse_bibliography(text: &str) -> Result<Vec<ParsedRecord>> {
    extract_records(text)?
        .iter()
        .map(|raw| parse_record(raw.text, raw.start))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_bibliography_round() {
        let text = r#"
            @Article{einstein1905,
                author  = "Albert Einstein",
                title   = {Zur Elektrodynamik bewegter {K}örper},
                journal = {Annalen der Physik},
                year    = 1905
            }

            @book{knuth1984, title = {The {TeX}book}, year = 1984}
        "#;

        let records = parse_bibliography(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key, "einstein1905");
        assert_eq!(records[0].get("author"), Some("Albert Einstein"));
        assert_eq!(
            records[0].get("title"),
            Some("Zur Elektrodynamik bewegter {K}örper")
        );
        assert_eq!(records[1].key, "knuth1984");
        assert_eq!(records[1].ty.to_string(), "Book");
    }

    #[test]
    fn test_structural_error_aborts() {
        let text = "@Article{good, year = 1}\n@Article{bad, title = {Unterminated";
        assert!(matches!(
            parse_bibliography(text).unwrap_err(),
            Error::MalformedEntry { .. }
        ));
    }
}
