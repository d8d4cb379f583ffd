//! Error types for bejerman-core
//!
//! Per-line problems never surface here; they degrade inside the parser.
//! What remains are whole-run conditions the caller must stop on.

use thiserror::Error;
use serde::{Deserialize, Serialize};
use std::io;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No documents were supplied
    NoDocuments,
    /// No document produced a single record
    NoValidRecords,
    /// Spreadsheet generation failed
    ExportError,
    /// IO error
    IoError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::NoDocuments => write!(f, "NO_DOCUMENTS"),
            ErrorCode::NoValidRecords => write!(f, "NO_VALID_RECORDS"),
            ErrorCode::ExportError => write!(f, "EXPORT_ERROR"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Warning - nothing to do, the run stops cleanly
    Warning,
    /// Error - operation failed
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Detailed error information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
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

/// Main error type for bejerman-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("No documents to process")]
    NoDocuments,

    #[error("No valid records found in {documents} document(s)")]
    NoValidRecords { documents: usize },

    #[error("Export error: {message}")]
    ExportError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::NoDocuments => ErrorCode::NoDocuments,
            CoreError::NoValidRecords { .. } => ErrorCode::NoValidRecords,
            CoreError::ExportError { .. } => ErrorCode::ExportError,
            CoreError::IoError(_) => ErrorCode::IoError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::NoDocuments => ErrorSeverity::Warning,
            CoreError::NoValidRecords { .. } => ErrorSeverity::Warning,
            CoreError::ExportError { .. } => ErrorSeverity::Error,
            CoreError::IoError(_) => ErrorSeverity::Error,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::NoDocuments => {
                details = details.with_suggestion(
                    "Pass between 1 and 3 .rec files.".to_string()
                );
            }
            CoreError::NoValidRecords { documents } => {
                details = details.with_detail(serde_json::json!({ "documents": documents }));
                details = details.with_suggestion(
                    "Check the selected encoding; a wrong one makes every line unreadable.".to_string()
                );
                details = details.with_suggestion(
                    "Only lines containing a dd/mm/yy date are read as records.".to_string()
                );
            }
            CoreError::ExportError { message } => {
                details = details.with_detail(serde_json::json!({ "export_message": message }));
            }
            CoreError::IoError(_) => {}
        }

        details
    }
}

impl From<rust_xlsxwriter::XlsxError> for CoreError {
    fn from(error: rust_xlsxwriter::XlsxError) -> Self {
        CoreError::ExportError {
            message: error.to_string(),
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

// ==================== Tests ====================
