//! Month-name normalization
//!
//! A fixed table of the twelve English month names and their three-letter
//! abbreviations, mapped to "1".."12". Anything else is rejected rather than
//! passed through, since a silently unparsed month corrupts the rewritten
//! bibliography.

const MONTHS: [(&str, &str); 12] = [
    ("january", "1"),
    ("february", "2"),
    ("march", "3"),
    ("april", "4"),
    ("may", "5"),
    ("june", "6"),
    ("july", "7"),
    ("august", "8"),
    ("september", "9"),
    ("october", "10"),
    ("november", "11"),
    ("december", "12"),
];

/// Convert a month field value to its numeric string form.
///
/// Accepts full names and three-letter abbreviations case-insensitively,
/// with any brace/quote wrapping already handled by the caller. An already
/// numeric value passes through unchanged. Returns `None` for anything else.
#[must_use]
pub fn to_numeric(value: &str) -> Option<String> {
    let bare: String = value
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | '"') && !c.is_whitespace())
        .collect();

    if !bare.is_empty() && bare.chars().all(|c| c.is_ascii_digit()) {
        return Some(bare);
    }

    let lower = bare.to_lowercase();
    MONTHS
        .iter()
        .find(|(name, _)| *name == lower || name[..3] == lower)
        .map(|(_, numeric)| (*numeric).to_string())
}
