//! Error types for wealthweb-import

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("CSV error at line {line}: {message}")]
    Csv {
        line: u64,
        message: String,
    },

    #[error("Invalid JSON rows: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing column: {column}")]
    MissingColumn { column: String },

    #[error("Unsupported import format: {format}")]
    UnsupportedFormat { format: String },
}

impl ImportError {
    /// Stable code for API error payloads
    pub fn code(&self) -> &'static str {
        match self {
            ImportError::Csv { .. } => "CSV",
            ImportError::Json(_) => "JSON",
            ImportError::MissingColumn { .. } => "MISSING_COLUMN",
            ImportError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
        }
    }
}

impl From<csv::Error> for ImportError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|p| p.line()).unwrap_or(0);
        ImportError::Csv {
            line,
            message: error.to_string(),
        }
    }
}
