use async_trait::async_trait;
use chrono::{DateTime, Utc};
use search_indexer_shared::Entity;
use tokio::sync::mpsc::Sender;

use crate::errors::SourceError;

#[async_trait]
/// Defines the contract for reading entities out of the system of record.
///
/// Implementations stream fully reconstructed entities into `sink` in
/// ascending id order and return once the query is exhausted or on the first
/// error. Sending blocks while the sink is full, which is what throttles a
/// source against a slow consumer.
pub trait EntitySource: Send + Sync {
    /// Returns the smallest and largest entity id, `(0, 0)` for an empty table.
    async fn query_id_range(&self) -> Result<(i64, i64), SourceError>;

    /// Streams every entity with `from <= id <= to`.
    async fn query_by_id(
        &self,
        sink: &Sender<Entity>,
        from: i64,
        to: i64,
    ) -> Result<(), SourceError>;

    /// Streams every entity updated at or after `from`.
    ///
    /// Sources that keep no update timestamp return
    /// [`SourceError::Unsupported`].
    async fn query_from_date(
        &self,
        sink: &Sender<Entity>,
        from: DateTime<Utc>,
    ) -> Result<(), SourceError>;
}
