//! Error types for the collection store

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for storage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the store and its transactions
#[derive(Debug, Error)]
pub enum Error {
    /// Another process holds the collection lock
    #[error("the collection at '{}' is already in use by another process", .0.display())]
    Locked(PathBuf),

    /// The catalog file could not be parsed
    #[error("the catalog {} is corrupt: {reason}", .path.display())]
    CorruptCatalog {
        /// Catalog file
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// The catalog changed since the transaction began
    #[error("the collection was modified by another transaction")]
    Conflict,

    /// Insert of a key that is already taken
    #[error("a record with key '{0}' already exists")]
    DuplicateKey(String),

    /// Lookup of a key that does not exist
    #[error("there is no record with key '{0}'")]
    RecordNotFound(String),

    /// Creating a tag that is already registered
    #[error("the tag '{0}' already exists")]
    DuplicateTag(String),

    /// Referring to a tag that is not registered
    #[error("the tag '{0}' does not exist")]
    TagNotFound(String),

    /// Record folder exists and overwriting was not requested
    #[error("the record folder {} already exists", .0.display())]
    FolderExists(PathBuf),

    /// Record JSON file not found
    #[error("the record file {} was not found", .0.display())]
    RecordFileNotFound(PathBuf),

    /// Invalid record data
    #[error(transparent)]
    Core(#[from] bibliophant_core::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Core(e.into())
    }
}
