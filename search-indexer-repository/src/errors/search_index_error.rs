//! Search index error types.
//!
//! This module defines the unified error type for all search engine
//! operations. Several variants are signals callers branch on rather than
//! plain failures: `TooManyRequests` is the exhausted-retry form of engine
//! throttling and `AliasMissing` marks an alias that was never provisioned.

use thiserror::Error;

/// Unified errors from search engine operations.
///
/// Used by the `SearchIndexProvider` trait for all engine I/O.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Failed to reach the engine or to build the transport.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The engine answered with a non-success status other than 429.
    #[error("Engine error: status {status}: {body}")]
    EngineError { status: u16, body: String },

    /// The engine kept answering 429 after every retry was spent.
    #[error("Too many requests: the search engine is still throttling after retries")]
    TooManyRequests,

    /// The alias does not resolve to any index.
    #[error("Alias missing: {0}")]
    AliasMissing(String),

    /// Failed to parse a response body from the engine.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize a request body.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Failed to create an index.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// An alias change was answered without `acknowledged: true`.
    #[error("Acknowledgement error: {0}")]
    AcknowledgementError(String),

    /// Unknown error.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl SearchIndexError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an engine error from a status code and raw body.
    pub fn engine(status: u16, body: impl Into<String>) -> Self {
        Self::EngineError {
            status,
            body: body.into(),
        }
    }

    /// Create an alias missing error.
    pub fn alias_missing(alias: impl Into<String>) -> Self {
        Self::AliasMissing(alias.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create an index creation error.
    pub fn index_creation(msg: impl Into<String>) -> Self {
        Self::IndexCreationError(msg.into())
    }

    /// Create an acknowledgement error.
    pub fn acknowledgement(msg: impl Into<String>) -> Self {
        Self::AcknowledgementError(msg.into())
    }

    /// Create an unknown error.
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }

    /// Whether this error means the alias was never created.
    pub fn is_alias_missing(&self) -> bool {
        matches!(self, Self::AliasMissing(_))
    }
}

impl From<opensearch::Error> for SearchIndexError {
    fn from(err: opensearch::Error) -> Self {
        Self::ConnectionError(err.to_string())
    }
}
