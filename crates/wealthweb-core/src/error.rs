//! Error types for wealthweb-core
//!
//! Error codes, severities and detailed messages with suggestions for the
//! ledger, import reconciliation and persistence layers.

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;
use wealthweb_import::ImportError;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Account not found
    AccountNotFound,
    /// Transaction not found
    TransactionNotFound,
    /// Goal not found
    GoalNotFound,
    /// Category not found
    CategoryNotFound,
    /// Validation error
    ValidationError,
    /// Invalid data format
    InvalidFormat,
    /// Import payload could not be read
    ImportError,
    /// Persisted state could not be read or written
    StorageError,
    /// JSON (de)serialization failed
    SerializationError,
    /// IO error
    IoError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::AccountNotFound => write!(f, "ACCOUNT_NOT_FOUND"),
            ErrorCode::TransactionNotFound => write!(f, "TRANSACTION_NOT_FOUND"),
            ErrorCode::GoalNotFound => write!(f, "GOAL_NOT_FOUND"),
            ErrorCode::CategoryNotFound => write!(f, "CATEGORY_NOT_FOUND"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::InvalidFormat => write!(f, "INVALID_FORMAT"),
            ErrorCode::ImportError => write!(f, "IMPORT_ERROR"),
            ErrorCode::StorageError => write!(f, "STORAGE_ERROR"),
            ErrorCode::SerializationError => write!(f, "SERIALIZATION_ERROR"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Info,
    /// Operation rejected, state unchanged
    Warning,
    /// Operation failed
    Error,
    /// Persisted data may be at risk
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for wealthweb-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Account not found: {id}")]
    AccountNotFound { id: String },

    #[error("Transaction not found: {id}")]
    TransactionNotFound { id: String },

    #[error("Goal not found: {id}")]
    GoalNotFound { id: String },

    #[error("Category not found: {id}")]
    CategoryNotFound { id: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Import error: {0}")]
    ImportError(#[from] ImportError),

    #[error("Storage error at {path}: {message}")]
    StorageError { path: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::ValidationError { message: message.into() }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::AccountNotFound { .. } => ErrorCode::AccountNotFound,
            CoreError::TransactionNotFound { .. } => ErrorCode::TransactionNotFound,
            CoreError::GoalNotFound { .. } => ErrorCode::GoalNotFound,
            CoreError::CategoryNotFound { .. } => ErrorCode::CategoryNotFound,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            CoreError::ImportError(_) => ErrorCode::ImportError,
            CoreError::StorageError { .. } => ErrorCode::StorageError,
            CoreError::Serialization(_) => ErrorCode::SerializationError,
            CoreError::IoError(_) => ErrorCode::IoError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::AccountNotFound { .. }
            | CoreError::TransactionNotFound { .. }
            | CoreError::GoalNotFound { .. }
            | CoreError::CategoryNotFound { .. } => ErrorSeverity::Info,
            CoreError::ValidationError { .. }
            | CoreError::InvalidFormat { .. }
            | CoreError::ImportError(_) => ErrorSeverity::Warning,
            CoreError::Serialization(_) | CoreError::IoError(_) => ErrorSeverity::Error,
            CoreError::StorageError { .. } => ErrorSeverity::Critical,
        }
    }

    /// True for errors caused by the caller's input rather than the host
    pub fn is_client_error(&self) -> bool {
        matches!(self.severity(), ErrorSeverity::Info | ErrorSeverity::Warning)
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::AccountNotFound { .. } => {
                details = details.with_suggestion(
                    "Use the /api/accounts endpoint to list all accounts.".to_string(),
                );
            }
            CoreError::TransactionNotFound { .. } => {
                details = details
                    .with_suggestion("Check if the transaction ID is correct.".to_string())
                    .with_suggestion(
                        "Use the /api/transactions endpoint to list all transactions.".to_string(),
                    );
            }
            CoreError::GoalNotFound { .. } => {
                details = details.with_suggestion(
                    "Use the /api/goals endpoint to list all goals.".to_string(),
                );
            }
            CoreError::CategoryNotFound { .. } => {
                details = details.with_suggestion(
                    "Use the /api/categories endpoint to list all categories.".to_string(),
                );
            }
            CoreError::ValidationError { message } => {
                details = details
                    .with_detail(serde_json::json!({ "validation_message": message }))
                    .with_suggestion(
                        "Amounts must be positive and transfers need a distinct destination account."
                            .to_string(),
                    );
            }
            CoreError::InvalidFormat { .. } => {
                details = details.with_suggestion(
                    "A backup must be a JSON object with at least `user` and `accounts`.".to_string(),
                );
            }
            CoreError::ImportError(error) => {
                details = details.with_detail(serde_json::json!({ "import_code": error.code() }));
                details = details.with_suggestion(
                    "Download the template from /api/template and match its columns.".to_string(),
                );
            }
            CoreError::StorageError { path, .. } => {
                details = details
                    .with_detail(serde_json::json!({ "path": path }))
                    .with_suggestion("Ensure the storage directory exists and is writable.".to_string());
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

// ==================== Tests ====================
