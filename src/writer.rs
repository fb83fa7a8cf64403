//! Bibliography serialization

use crate::model::ParsedRecord;
use crate::Result;
use std::io::{self, Write};

/// Configuration for writing bibliographies
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Indentation string (default: four spaces)
    pub indent: String,
    /// Pad field names to the longest name in the record (default: true)
    pub align_names: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
            align_names: true,
        }
    }
}

/// Bibliography writer
#[derive(Debug)]
pub struct Writer<W: Write> {
    writer: W,
    config: WriterConfig,
}

impl<W: Write> Writer<W> {
    /// Create a new writer with default configuration
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            config: WriterConfig::default(),
        }
    }

    /// Create a new writer with custom configuration
    pub const fn with_config(writer: W, config: WriterConfig) -> Self {
        Self { writer, config }
    }

    /// Write records in the given order, separated by blank lines
    pub fn write_bibliography(&mut self, records: &[ParsedRecord]) -> io::Result<()> {
        for (i, record) in records.iter().enumerate() {
            if i > 0 {
                writeln!(self.writer)?;
            }
            self.write_record(record)?;
        }
        Ok(())
    }

    /// Write a single record
    pub fn write_record(&mut self, record: &ParsedRecord) -> io::Result<()> {
        writeln!(self.writer, "@{}{{ {},", record.ty, record.key)?;

        let max_name_len = if self.config.align_names {
            record.fields.iter().map(|f| f.name.len()).max().unwrap_or(0)
        } else {
            0
        };

        for field in &record.fields {
            write!(self.writer, "{}{}", self.config.indent, field.name)?;
            if self.config.align_names {
                write!(self.writer, "{}", " ".repeat(max_name_len - field.name.len()))?;
            }
            write!(self.writer, " = ")?;
            self.write_value(&field.value)?;
            writeln!(self.writer, ",")?;
        }

        writeln!(self.writer, "}}")?;
        Ok(())
    }

    /// Numbers are written bare, everything else re-wrapped in braces. Inner
    /// braces survive unchanged, so nested structure round-trips.
    fn write_value(&mut self, value: &str) -> io::Result<()> {
        if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
            write!(self.writer, "{value}")
        } else {
            write!(self.writer, "{{{value}}}")
        }
    }
}

/// Serialize records to a string, in the given order
pub fn to_string(records: &[ParsedRecord]) -> Result<String> {
    let mut buf = Vec::new();
    let mut writer = Writer::new(&mut buf);
    writer.write_bibliography(records)?;
    Ok(String::from_utf8(buf).expect("valid UTF-8"))
}
