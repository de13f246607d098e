//! Error types for the record model
//!
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for record validation and export
#[derive(Debug, Error)]
pub enum Error {
    /// A field violates its validation rule
    #[error("{field} {reason}")]
    Invalid {
        /// Name of the offending field
        field: &'static str,
        /// What the rule requires
        reason: String,
    },

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Target directory of an export does not exist
    #[error("the directory {} does not exist", .0.display())]
    MissingDirectory(PathBuf),

    /// Export target does not carry the `.bib` extension
    #[error("the file extension of {} must be '.bib'", .0.display())]
    NotBibFile(PathBuf),

    /// Export target exists and overwriting was not requested
    #[error("the file {} already exists", .0.display())]
    FileExists(PathBuf),
}

impl Error {
    /// Shorthand for a validation failure.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Error::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
