use thiserror::Error;

#[derive(Debug, Error)]
/// Represents errors that can occur while reading entities from the
/// relational store.
pub enum SourceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// The source cannot serve this kind of query, e.g. firms by date.
    #[error("{0}")]
    Unsupported(String),

    /// The receiving side of the entity channel went away.
    #[error("entity sink closed before the source was exhausted")]
    SinkClosed,
}

impl SourceError {
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }
}
