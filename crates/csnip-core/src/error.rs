//! Error handling for csnip core

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types surfaced by the snippet store
#[derive(Error, Debug)]
pub enum Error {
    /// The identity has no rows (or no current row)
    #[error("No snippet found with id {0}")]
    NotFound(Uuid),

    /// A listing query matched zero rows
    #[error("No snippets found for the given parameters")]
    NoResults,

    /// Database operation errors
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    /// A multi-step update failed and was rolled back
    #[error("Update rolled back during {stage}: {source}")]
    Transaction {
        /// Step of the update sequence that failed
        stage: &'static str,
        /// Underlying database error
        #[source]
        source: diesel::result::Error,
    },

    /// A stored row could not be mapped back into a snippet
    #[error("Corrupt snippet row {row_id}: {reason}")]
    CorruptRow {
        /// Physical row id of the bad record
        row_id: i64,
        /// What was wrong with it
        reason: String,
    },

    /// Connection pool errors
    #[error("Connection pool error: {0}")]
    ConnectionPool(#[from] r2d2::Error),

    /// Schema migration errors
    #[error("Migration error: {0}")]
    Migration(String),

    /// Configuration file errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Wrap a database error raised inside the update transaction
    pub fn transaction(stage: &'static str, source: diesel::result::Error) -> Self {
        Self::Transaction { stage, source }
    }

    /// True for both an unknown identity and an empty listing.
    ///
    /// Callers use this to render "no results" instead of aborting.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::NoResults)
    }
}
