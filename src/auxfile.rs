//! Citation order extraction from biblatex `.aux` files
//!
//! A flat token scan over `\abx@aux@cite{...}` markers. Keys are collected
//! in first-use order, deduplicated.

use crate::error::{snippet, Error, Result};
use crate::parser::scanner::locate_match;

const CITE_MARKER: &str = "\\abx@aux@cite";

/// Extract the deduplicated, first-use-ordered citation keys from an aux
/// file's text. Fails with [`Error::MalformedEntry`] if a citation group is
/// unterminated.
pub fn get_ordered_citations(text: &str) -> Result<Vec<String>> {
    let mut cites: Vec<String> = Vec::new();
    let mut pos = 0;

    while let Some(found) = text[pos..].find(CITE_MARKER) {
        let group = pos + found + CITE_MARKER.len();
        if !text[group..].starts_with('{') {
            pos = group;
            continue;
        }
        let (start, end) = cite_group(text, group)?;
        let cite = text[start..end].trim();
        if !cite.is_empty() && !cites.iter().any(|seen| seen == cite) {
            cites.push(cite.to_string());
        }
        pos = end + 1;
    }

    Ok(cites)
}

/// Locate the braced group holding the citation key at `group`. Newer
/// biblatex writes `\abx@aux@cite{<segment>}{<key>}`; when the first group
/// is purely numeric and another group follows, the key is in the second.
fn cite_group(text: &str, group: usize) -> Result<(usize, usize)> {
    let close = |open: usize| {
        locate_match(text, open, b'}').ok_or_else(|| Error::MalformedEntry {
            offset: open,
            message: format!(
                "unterminated citation group\n{}",
                snippet(text, open, 30)
            ),
        })
    };

    let end = close(group)?;
    let first = &text[group + 1..end];
    if first.chars().all(|c| c.is_ascii_digit()) && text[end + 1..].starts_with('{') {
        let second_end = close(end + 1)?;
        return Ok((end + 2, second_end));
    }
    Ok((group + 1, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_use_order_deduplicated() {
        let aux = "\\abx@aux@cite{alpha}\nnoise\n\\abx@aux@cite{beta}\n\\abx@aux@cite{alpha}\n";
        assert_eq!(get_ordered_citations(aux).unwrap(), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_segmented_marker_form() {
        let aux = "\\abx@aux@cite{0}{alpha}\n\\abx@aux@cite{0}{beta}\n";
        assert_eq!(get_ordered_citations(aux).unwrap(), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_no_citations() {
        assert_eq!(
            get_ordered_citations("\\relax\n\\@writefile{toc}{x}\n").unwrap(),
            Vec::<String>::new()
        );
    }

    #[test]
    fn test_unterminated_group_is_error() {
        let err = get_ordered_citations("\\abx@aux@cite{alpha").unwrap_err();
        assert!(matches!(err, Error::MalformedEntry { .. }));
    }
}
