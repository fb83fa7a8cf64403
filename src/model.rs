//! Data models for parsed bibliography records

use std::fmt;

/// A structured bibliography record
///
/// Field names are stored lower-cased and values whitespace-normalized;
/// insertion order is preserved only so that serialization is stable, lookup
/// is by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord {
    /// Entry type (Article, Book, ...), case-normalized
    pub ty: EntryType,
    /// Citation key as read from the source
    pub key: String,
    /// Fields (author, title, year, ...)
    pub fields: Vec<Field>,
}

impl ParsedRecord {
    /// Create a new record with no fields
    #[must_use]
    pub const fn new(ty: EntryType, key: String) -> Self {
        Self {
            ty,
            key,
            fields: Vec::new(),
        }
    }

    /// Get a field value by name (case-insensitive)
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
            .map(|f| f.value.as_str())
    }

    /// Set a field value, replacing any existing field of the same name
    /// (last-write-wins, matching permissive real-world bib files)
    pub fn set(&mut self, name: String, value: String) {
        match self
            .fields
            .iter_mut()
            .find(|f| f.name.eq_ignore_ascii_case(&name))
        {
            Some(field) => field.value = value,
            None => self.fields.push(Field { name, value }),
        }
    }
}

/// BibTeX entry type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryType {
    /// Article from a journal
    Article,
    /// Book with publisher
    Book,
    /// Part of a book
    InBook,
    /// Article in conference proceedings
    InProceedings,
    /// Conference proceedings
    Proceedings,
    /// Master's thesis
    MastersThesis,
    /// `PhD` thesis
    PhdThesis,
    /// Technical report
    TechReport,
    /// Unpublished work
    Unpublished,
    /// Miscellaneous
    Misc,
    /// Custom entry type
    Custom(String),
}

impl EntryType {
    /// Parse from string (case-insensitive)
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "article" => Self::Article,
            "book" => Self::Book,
            "inbook" => Self::InBook,
            "inproceedings" | "conference" => Self::InProceedings,
            "proceedings" => Self::Proceedings,
            "mastersthesis" => Self::MastersThesis,
            "phdthesis" => Self::PhdThesis,
            "techreport" => Self::TechReport,
            "unpublished" => Self::Unpublished,
            "misc" => Self::Misc,
            _ => Self::Custom(capitalize(s)),
        }
    }
}

/// Serialized form is capitalized for neatness: `@Article{...`
impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Article => write!(f, "Article"),
            Self::Book => write!(f, "Book"),
            Self::InBook => write!(f, "Inbook"),
            Self::InProceedings => write!(f, "Inproceedings"),
            Self::Proceedings => write!(f, "Proceedings"),
            Self::MastersThesis => write!(f, "Mastersthesis"),
            Self::PhdThesis => write!(f, "Phdthesis"),
            Self::TechReport => write!(f, "Techreport"),
            Self::Unpublished => write!(f, "Unpublished"),
            Self::Misc => write!(f, "Misc"),
            Self::Custom(s) => write!(f, "{s}"),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
    })
}

/// A field in a bibliography record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name, lower-cased
    pub name: String,
    /// Field value, whitespace-normalized, inner braces/quotes preserved
    pub value: String,
}

impl Field {
    /// Create a new field
    #[must_use]
    pub const fn new(name: String, value: String) -> Self {
        Self { name, value }
    }
}
