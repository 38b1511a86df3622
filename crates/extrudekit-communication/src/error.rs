//! Communication error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while delivering a script
#[derive(Error, Debug)]
pub enum CommunicationError {
    /// Script could not be written
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Destination file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Upload name would escape the gcode directory
    #[error("Invalid script name '{0}'")]
    InvalidName(String),

    /// The transport rejected a line
    #[error("Line {line_number} rejected: {message}")]
    Rejected {
        /// 1-based line number in the script.
        line_number: usize,
        /// Transport message.
        message: String,
    },
}

/// Result type for communication operations
pub type CommunicationResult<T> = Result<T, CommunicationError>;
