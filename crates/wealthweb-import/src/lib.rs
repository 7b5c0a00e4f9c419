//! Import row parsing for transaction sheets
//!
//! Turns CSV text or JSON payloads into [`ImportRow`]s with unresolved
//! account and category names, and generates the CSV template users fill in.

pub mod error;
pub mod types;
pub mod parser;
pub mod template;

use std::sync::Arc;

pub use error::ImportError;
pub use parser::{parse_amount, parse_import_date, CsvRowParser, JsonRowParser};
pub use template::{generate_template, ImportTemplate, TEMPLATE_HEADERS};
pub use types::{ImportFormat, ImportRow};

// ==================== Parser Trait ====================

/// Parser reference type
pub type RowParserRef = Arc<dyn RowParser>;

/// Trait for import row parsers
pub trait RowParser: Send + Sync {
    /// Parse a payload into rows; incomplete rows are dropped, not reported
    fn parse(&self, content: &str) -> Result<Vec<ImportRow>, ImportError>;

    /// Format handled by this parser
    fn format(&self) -> ImportFormat;
}

/// Default parser dispatching on the payload format
#[derive(Debug, Clone, Copy)]
pub struct DefaultRowParser {
    format: ImportFormat,
}

impl DefaultRowParser {
    pub fn new(format: ImportFormat) -> Self {
        Self { format }
    }
}

impl Default for DefaultRowParser {
    fn default() -> Self {
        Self::new(ImportFormat::Csv)
    }
}

impl RowParser for DefaultRowParser {
    fn parse(&self, content: &str) -> Result<Vec<ImportRow>, ImportError> {
        let rows = match self.format {
            ImportFormat::Csv => CsvRowParser::parse(content)?,
            ImportFormat::Json => JsonRowParser::parse(content)?,
        };
        log::debug!(target: "wealthweb::import", "parsed {} {} rows", rows.len(), self.format);
        Ok(rows)
    }

    fn format(&self) -> ImportFormat {
        self.format
    }
}

/// Parser for a format name such as `csv` or `json`
pub fn parser_for(format: &str) -> Result<RowParserRef, ImportError> {
    let format = format
        .parse::<ImportFormat>()
        .map_err(|_| ImportError::UnsupportedFormat { format: format.to_string() })?;
    Ok(Arc::new(DefaultRowParser::new(format)))
}
