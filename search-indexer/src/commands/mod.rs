//! Index lifecycle commands.
//!
//! Each alias moves through the same states: its content-hashed index is
//! created and the alias is pointed at it the first time
//! ([`create_indices`]); a new index is backfilled ([`index`]); the alias is
//! swapped to it atomically ([`update_alias`]); the indices it left behind
//! are deleted ([`cleanup_indices`]).

mod cleanup_indices;
mod create_indices;
mod index;
mod update_alias;

pub use cleanup_indices::cleanup_indices;
pub use create_indices::create_indices;
pub use index::{index, EntityKind, IndexMode, IndexTarget};
pub use update_alias::update_alias;

use std::future::Future;

use search_indexer_repository::SearchIndexError;
use tokio_util::sync::CancellationToken;

use crate::errors::IndexingError;

/// Await one engine call unless `cancel` fires first.
///
/// Dropping the call also drops any backoff or recreate sleep inside it.
pub(crate) async fn cancellable<T, F>(
    cancel: &CancellationToken,
    call: F,
) -> Result<T, IndexingError>
where
    F: Future<Output = Result<T, SearchIndexError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(IndexingError::Cancelled),
        result = call => Ok(result?),
    }
}
