//! # bibsort
//!
//! Normalizes and reorders a BibTeX bibliography to match the citation order
//! of a document, resolving each record to a canonical registry key and
//! rewriting every `\cite{...}` reference consistently.
//!
//! The core is a brace-balanced record parser: raw BibTeX nests `{}` and
//! quote delimiters that may themselves contain commas and equals signs, so
//! field splitting tracks nesting depth instead of splitting naively.
//!
//! ## Example
//!
//! ```
//! use bibsort::{parse_bibliography, resolve_and_remap, merge_and_serialize, NullLookup};
//!
//! let records = parse_bibliography(
//!     "@Article{foo, title = {A, B and C}, year = 2020}",
//! )?;
//! assert_eq!(records[0].get("title"), Some("A, B and C"));
//!
//! let (new_records, mapping) = resolve_and_remap(&records, &NullLookup)?;
//! let order = vec!["foo".to_string()];
//! let (bib, new_order) = merge_and_serialize(&order, &mapping, &new_records)?;
//! assert_eq!(new_order.len(), 1);
//! assert!(bib.contains("title = {A, B and C}"));
//! # Ok::<(), bibsort::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    missing_docs,
    missing_debug_implementations
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod auxfile;
pub mod error;
pub mod merge;
pub mod model;
pub mod month;
pub mod parser;
pub mod registry;
pub mod resolve;

mod writer;

pub use auxfile::get_ordered_citations;
pub use error::{Error, Result};
pub use merge::{merge_and_serialize, merge_citation_order, rewrite_citations};
pub use model::{EntryType, Field, ParsedRecord};
pub use parser::{parse_bibliography, parse_record};
pub use registry::HttpRegistry;
pub use resolve::{resolve_and_remap, KeyLookup, LookupOutcome, LookupQuery, NullLookup, Resolver};
pub use writer::{to_string, Writer, WriterConfig};

/// Parse a bibliography from a file
pub fn parse_file(path: impl AsRef<std::path::Path>) -> Result<Vec<ParsedRecord>> {
    let content = std::fs::read_to_string(path)?;
    parse_bibliography(&content)
}
