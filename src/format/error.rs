//! Error types for marker file operations.

use thiserror::Error;

/// Errors that can occur while writing or reading a marker file.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be parsed
    #[error("Invalid record on line {line}: {message}")]
    InvalidRecord {
        /// 1-based line number
        line: usize,
        /// Description of the problem
        message: String,
    },
}

impl FormatError {
    /// Create an invalid record error.
    pub fn invalid_record(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            line,
            message: message.into(),
        }
    }
}
