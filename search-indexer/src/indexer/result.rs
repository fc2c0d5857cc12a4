//! Run outcomes.

use search_indexer_repository::BulkResult;
use thiserror::Error;

use crate::errors::IndexingError;

/// Totals accumulated over every flush of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexResult {
    pub successful: usize,
    pub failed: usize,
    /// One message per failed flush or skipped document, in order.
    pub errors: Vec<String>,
}

impl IndexResult {
    /// Fold one bulk response into the totals.
    pub fn add(&mut self, bulk: &BulkResult) {
        self.successful += bulk.successful;
        self.failed += bulk.failed;
        if let Some(error) = &bulk.error {
            self.errors.push(error.clone());
        }
    }

    /// Record documents that were never accepted by the engine.
    pub fn add_failure(&mut self, documents: usize, error: impl Into<String>) {
        self.failed += documents;
        self.errors.push(error.into());
    }
}

/// A run that stopped on an error.
///
/// `partial` holds the totals of the flushes completed before the failure,
/// when the consumer got far enough to have any.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct RunError {
    #[source]
    pub error: IndexingError,
    pub partial: Option<IndexResult>,
}

impl RunError {
    pub fn new(error: IndexingError, partial: Option<IndexResult>) -> Self {
        Self { error, partial }
    }
}

impl From<IndexingError> for RunError {
    fn from(error: IndexingError) -> Self {
        Self::new(error, None)
    }
}
