use search_indexer_repository::SearchIndexProvider;
use search_indexer_shared::IndexDefinition;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use super::cancellable;
use crate::errors::IndexingError;

/// Create every index and point a missing alias at it.
///
/// An alias that already exists is left alone, even when it points at an
/// older index; moving it is [`super::update_alias`]'s job.
#[instrument(skip(provider, definitions, cancel))]
pub async fn create_indices(
    provider: &dyn SearchIndexProvider,
    definitions: &[IndexDefinition],
    force: bool,
    cancel: &CancellationToken,
) -> Result<(), IndexingError> {
    for definition in definitions {
        cancellable(
            cancel,
            provider.create_index(&definition.name, &definition.config, force),
        )
        .await?;

        let current = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(IndexingError::Cancelled),
            current = provider.resolve_alias(&definition.alias) => current,
        };

        match current {
            Ok(current) => {
                info!(alias = %definition.alias, index = %current, "Alias already exists");
            }
            Err(e) if e.is_alias_missing() => {
                cancellable(
                    cancel,
                    provider.create_alias(&definition.alias, &definition.name),
                )
                .await?;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
