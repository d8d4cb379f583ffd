//! Error types for bejerman-parser
//!
//! Malformed line content never reaches this type: rejected lines are
//! dropped and bad amounts or dates degrade to defaults. These errors only
//! cover setup problems such as an unknown encoding name or a broken layout.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unsupported encoding: {name}")]
    UnsupportedEncoding { name: String },

    #[error("Invalid layout for field {field}: {reason}")]
    InvalidLayout { field: String, reason: String },
}

/// Result type with ParseError
pub type ParseResult<T> = Result<T, ParseError>;
