//! Error types for the search indexer.

use search_indexer_repository::{SearchIndexError, SourceError};
use search_indexer_shared::IndexDefinitionError;
use thiserror::Error;

/// Errors that can occur while configuring or running an indexer command.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Search engine error.
    #[error("Search error: {0}")]
    Search(#[from] SearchIndexError),

    /// Relational source error.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// An entity could not be encoded for a bulk request.
    #[error("could not construct index request for id={id}: {source}")]
    Encode {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    /// The run was cancelled before it completed.
    #[error("indexing run cancelled")]
    Cancelled,

    /// A background task panicked or was aborted.
    #[error("Task error: {0}")]
    TaskError(String),

    /// An alias does not point at the index it was expected to.
    #[error("alias {alias} points at {actual}, expected {expected}")]
    AliasMismatch {
        alias: String,
        expected: String,
        actual: String,
    },

    /// A secret could not be read.
    #[error("Secrets error: {0}")]
    Secrets(String),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a secrets error.
    pub fn secrets(msg: impl Into<String>) -> Self {
        Self::Secrets(msg.into())
    }
}

impl From<sqlx::Error> for IndexingError {
    fn from(err: sqlx::Error) -> Self {
        Self::Source(SourceError::from(err))
    }
}

impl From<IndexDefinitionError> for IndexingError {
    fn from(err: IndexDefinitionError) -> Self {
        Self::ConfigError(err.to_string())
    }
}
