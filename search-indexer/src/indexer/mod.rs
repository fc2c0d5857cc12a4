//! Indexer module for the search indexer.
//!
//! A run is a bounded pipeline: one producer task reads entities from an
//! [`EntitySource`] into a channel of `batch_size` entities, and the calling
//! task drains the channel into bulk requests. The channel is the only
//! backpressure between the two; a slow search engine stalls the producer
//! once the channel is full.

mod result;

pub use result::{IndexResult, RunError};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use search_indexer_repository::{
    BulkOpError, BulkOperation, EntitySource, SearchIndexProvider, MAX_PAYLOAD_SIZE,
};
use search_indexer_shared::Entity;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::batch_iter::BatchIterator;
use crate::errors::IndexingError;

/// Configuration for the indexer.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Ceiling on the body of a single bulk request.
    pub max_payload_size: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            max_payload_size: MAX_PAYLOAD_SIZE,
        }
    }
}

/// Indexes the entities of one source into one concrete index.
pub struct Indexer {
    provider: Arc<dyn SearchIndexProvider>,
    source: Arc<dyn EntitySource>,
    index_name: String,
    config: IndexerConfig,
}

impl Indexer {
    /// Create a new indexer writing to `index_name`.
    pub fn new(
        provider: Arc<dyn SearchIndexProvider>,
        source: Arc<dyn EntitySource>,
        index_name: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            source,
            index_name: index_name.into(),
            config: IndexerConfig::default(),
        }
    }

    /// Replace the default configuration.
    pub fn with_config(mut self, config: IndexerConfig) -> Self {
        self.config = config;
        self
    }

    /// Index every entity between the smallest and largest id in the source.
    #[instrument(skip(self, cancel), fields(index = %self.index_name))]
    pub async fn all(
        &self,
        batch_size: usize,
        cancel: &CancellationToken,
    ) -> Result<IndexResult, RunError> {
        let (from, to) = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(IndexingError::Cancelled.into()),
            range = self.source.query_id_range() => range.map_err(IndexingError::from)?,
        };

        info!(from = from, to = to, "Resolved id range");
        self.by_id(from, to, batch_size, cancel).await
    }

    /// Index every entity with `from <= id <= to`, reading `batch_size` ids
    /// per query.
    #[instrument(skip(self, cancel), fields(index = %self.index_name))]
    pub async fn by_id(
        &self,
        from: i64,
        to: i64,
        batch_size: usize,
        cancel: &CancellationToken,
    ) -> Result<IndexResult, RunError> {
        let (sink, entities) = mpsc::channel(batch_size.max(1));
        let source = Arc::clone(&self.source);
        let token = cancel.clone();
        let step = i64::try_from(batch_size).unwrap_or(i64::MAX);

        let producer = tokio::spawn(async move {
            for range in BatchIterator::new(from, to, step) {
                debug!(from = range.from, to = range.to, "Reading range from source");
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return Err(IndexingError::Cancelled),
                    read = source.query_by_id(&sink, range.from, range.to) => read?,
                }
            }
            Ok::<(), IndexingError>(())
        });

        self.run(producer, entities, cancel).await
    }

    /// Index every entity updated at or after `from`.
    #[instrument(skip(self, cancel), fields(index = %self.index_name))]
    pub async fn from_date(
        &self,
        from: DateTime<Utc>,
        batch_size: usize,
        cancel: &CancellationToken,
    ) -> Result<IndexResult, RunError> {
        let (sink, entities) = mpsc::channel(batch_size.max(1));
        let source = Arc::clone(&self.source);
        let token = cancel.clone();

        let producer = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(IndexingError::Cancelled),
                read = source.query_from_date(&sink, from) => read.map_err(IndexingError::from),
            }
        });

        self.run(producer, entities, cancel).await
    }

    /// Drain the channel, then join the producer.
    ///
    /// The receiver is dropped when the consumer stops, so a producer still
    /// blocked on a full channel fails fast instead of hanging the join.
    async fn run(
        &self,
        producer: JoinHandle<Result<(), IndexingError>>,
        entities: mpsc::Receiver<Entity>,
        cancel: &CancellationToken,
    ) -> Result<IndexResult, RunError> {
        let consumed = self.consume(entities, cancel).await;

        let produced = match producer.await {
            Ok(produced) => produced,
            Err(e) => Err(IndexingError::TaskError(e.to_string())),
        };

        match (consumed, produced) {
            (Ok(result), Ok(())) => {
                info!(
                    successful = result.successful,
                    failed = result.failed,
                    errors = result.errors.len(),
                    "Indexing run completed"
                );
                Ok(result)
            }
            (Ok(result), Err(e)) => {
                error!(
                    error = %e,
                    successful = result.successful,
                    failed = result.failed,
                    "Source failed during indexing run"
                );
                Err(RunError::new(e, Some(result)))
            }
            (Err(run_error), produced) => {
                if let Err(e) = produced {
                    debug!(error = %e, "Producer stopped after consumer failure");
                }
                error!(error = %run_error, "Indexing run failed");
                Err(run_error)
            }
        }
    }

    async fn consume(
        &self,
        mut entities: mpsc::Receiver<Entity>,
        cancel: &CancellationToken,
    ) -> Result<IndexResult, RunError> {
        let mut result = IndexResult::default();
        let mut op =
            BulkOperation::with_max_payload_size(self.index_name.clone(), self.config.max_payload_size);

        loop {
            let entity = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(RunError::new(IndexingError::Cancelled, Some(result)));
                }
                entity = entities.recv() => entity,
            };
            let Some(entity) = entity else {
                break;
            };
            let id = entity.id().to_string();

            loop {
                match op.index(&id, &entity) {
                    Ok(()) => break,
                    Err(BulkOpError::TooLarge) => {
                        self.flush(&mut op, &mut result, cancel).await?;
                    }
                    Err(e @ BulkOpError::DocumentTooLarge { .. }) => {
                        warn!(
                            id = %id,
                            kind = entity.kind(),
                            error = %e,
                            "Skipping document over the bulk limit"
                        );
                        result.add_failure(1, e.to_string());
                        break;
                    }
                    Err(BulkOpError::Encode(source)) => {
                        return Err(RunError::new(
                            IndexingError::Encode { id, source },
                            Some(result),
                        ));
                    }
                }
            }
        }

        if !op.is_empty() {
            self.flush(&mut op, &mut result, cancel).await?;
        }

        Ok(result)
    }

    /// Send the pending bulk request and reset `op`.
    ///
    /// A failed request is recorded against every document it carried and
    /// the run goes on; only cancellation stops it.
    async fn flush(
        &self,
        op: &mut BulkOperation,
        result: &mut IndexResult,
        cancel: &CancellationToken,
    ) -> Result<(), RunError> {
        let documents = op.document_count();

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(RunError::new(IndexingError::Cancelled, Some(result.clone())));
            }
            response = self.provider.do_bulk(op) => response,
        };

        match response {
            Ok(bulk) => {
                info!(
                    documents = documents,
                    successful = bulk.successful,
                    failed = bulk.failed,
                    error = bulk.error.as_deref().unwrap_or(""),
                    "Batch indexed"
                );
                result.add(&bulk);
            }
            Err(e) => {
                error!(documents = documents, error = %e, "Bulk request failed");
                result.add_failure(documents, e.to_string());
            }
        }

        op.reset();
        Ok(())
    }
}
