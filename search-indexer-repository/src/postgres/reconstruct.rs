//! Folding of joined rows into aggregate entities.

use futures::{Stream, StreamExt};
use search_indexer_shared::Entity;
use tokio::sync::mpsc::Sender;
use tracing::debug;

use crate::errors::SourceError;

/// An entity under construction from one or more rows sharing a parent id.
pub(crate) trait Aggregate: Sized {
    type Row;

    fn parent_id(row: &Self::Row) -> i64;

    /// Build the aggregate from the first row of its parent.
    fn start(row: &Self::Row) -> Self;

    /// Fold a row into the aggregate. Called for every row of the parent,
    /// the first one included.
    fn absorb(&mut self, _row: &Self::Row) {}

    fn finish(self) -> Entity;
}

/// Stream rows ordered by parent id into `sink`, one entity per parent.
///
/// The pending aggregate is sent when the parent id changes and once more
/// after the last row. A row error stops the scan and the pending aggregate
/// is discarded, since it may be missing children.
pub(crate) async fn reconstruct<A, S>(rows: S, sink: &Sender<Entity>) -> Result<usize, SourceError>
where
    A: Aggregate,
    S: Stream<Item = Result<A::Row, sqlx::Error>>,
{
    let mut rows = std::pin::pin!(rows);
    let mut current: Option<(i64, A)> = None;
    let mut sent = 0;

    while let Some(row) = rows.next().await {
        let row = row?;
        let id = A::parent_id(&row);

        if let Some((current_id, aggregate)) = current.as_mut() {
            if *current_id == id {
                aggregate.absorb(&row);
                continue;
            }
        }

        let mut next = A::start(&row);
        next.absorb(&row);
        if let Some((_, done)) = current.replace((id, next)) {
            send(sink, done.finish()).await?;
            sent += 1;
        }
    }

    if let Some((_, done)) = current {
        send(sink, done.finish()).await?;
        sent += 1;
    }

    debug!(entities = sent, "Row stream exhausted");
    Ok(sent)
}

async fn send(sink: &Sender<Entity>, entity: Entity) -> Result<(), SourceError> {
    sink.send(entity).await.map_err(|_| SourceError::SinkClosed)
}
