//! Error types for query execution.
//!
//! | Category | Variants | Raised |
//! |----------|----------|--------|
//! | Parse | `UnknownCommand`, `IllegalPosition` | before anything runs |
//! | Dispatch | `UnknownSubCommand`, `MissingSubCommand` | by a group while executing |
//! | Abort | `Aborted` | by a command that cannot complete |
//! | Wrapped | `Storage`, `Core`, `Import`, `Io` | by the layers below |
//! | Structure | `Build` | when a session is opened |
//!
//! Every variant aborts the whole query: the transaction is rolled back and
//! the message is shown to the user. `BuildError` is different: it reports a
//! malformed command table once, at startup.

use crate::role::Role;

/// Errors that abort a query.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // ==================== Parse ====================
    /// The leading token of a segment names no command
    #[error("'{token}' is not a command.")]
    UnknownCommand {
        /// The offending token (empty for an empty segment)
        token: String,
    },

    /// A command appears where its role does not allow it
    #[error("'{token}' {}.", .role.constraint())]
    IllegalPosition {
        /// The command name
        token: String,
        /// The command's role
        role: Role,
    },

    // ==================== Dispatch ====================
    /// A group was given a name it does not contain
    #[error("'{name}' is not a sub-command of '{group}'")]
    UnknownSubCommand {
        /// The group
        group: String,
        /// The unknown name
        name: String,
    },

    /// A group was invoked without a sub-command
    #[error("'{group}' requires a sub-command")]
    MissingSubCommand {
        /// The group
        group: String,
    },

    // ==================== Abort ====================
    /// A command gave up with a message for the user
    #[error("{reason}")]
    Aborted {
        /// What went wrong
        reason: String,
    },

    // ==================== Wrapped ====================
    /// Storage failure
    #[error(transparent)]
    Storage(#[from] bibliophant_storage::Error),

    /// Invalid record data or failed export
    #[error(transparent)]
    Core(#[from] bibliophant_core::Error),

    /// Metadata import failure
    #[error(transparent)]
    Import(#[from] bibliophant_importers::Error),

    /// File system or process failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The command table is malformed
    #[error(transparent)]
    Build(#[from] BuildError),
}

impl Error {
    /// Shorthand for `Error::Aborted`.
    pub fn aborted(reason: impl Into<String>) -> Self {
        Error::Aborted {
            reason: reason.into(),
        }
    }

    /// Whether the error was raised while parsing, i.e. before any command ran.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Error::UnknownCommand { .. } | Error::IllegalPosition { .. }
        )
    }
}

/// Errors in the structure of the command table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// Two commands share a name in the same scope
    #[error("'{name}' is registered more than once in {scope}")]
    DuplicateCommand {
        /// `the engine` or `group '<name>'`
        scope: String,
        /// The duplicated name
        name: String,
    },

    /// A name that the parser could never produce
    #[error("'{name}' is not a valid command name")]
    InvalidName {
        /// The rejected name
        name: String,
    },
}
