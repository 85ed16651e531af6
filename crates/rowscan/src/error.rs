//! Errors

use thiserror::Error;

use crate::config::Dialect;

/// Result type used across the crate.
pub type Result<T> = anyhow::Result<T, Error>;

/// Errors raised while materializing rows or opening connections.
///
/// Per-column mismatches (unknown column, null value, kind mismatch) are not
/// errors: the offending column is skipped.
#[derive(Error, Debug)]
pub enum Error {
    /// The destination argument cannot receive rows the way requested.
    #[error("invalid destination: {0}")]
    InvalidDestination(String),

    /// The destination element type is not a record, pointer, map, or dynamic
    /// value.
    #[error("unsupported destination kind `{kind}` ({type_name})")]
    UnsupportedDestinationKind {
        /// Shape of the rejected type.
        kind: String,
        /// Rust type name of the rejected type.
        type_name: &'static str,
    },

    /// Error reported by the underlying data source.
    #[error(transparent)]
    Cursor(#[from] anyhow::Error),

    /// The driver failed to open a connection.
    #[error("failed to connect: {0}")]
    Connect(anyhow::Error),

    /// Connection configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// No driver has been registered for the requested dialect.
    #[error("no driver registered for dialect `{0}`")]
    UnknownDriver(Dialect),
}

impl Error {
    /// Returns `true` when the error was raised while running a query or
    /// reading its rows, rather than by the engine or while connecting.
    #[must_use]
    pub const fn is_cursor(&self) -> bool {
        matches!(self, Self::Cursor(_))
    }
}
