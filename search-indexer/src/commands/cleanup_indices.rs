use search_indexer_repository::SearchIndexProvider;
use search_indexer_shared::IndexDefinition;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use super::cancellable;
use crate::errors::IndexingError;

/// Delete every index left behind under each alias.
///
/// Every alias is checked against its current index before anything is
/// deleted. If any alias points elsewhere, for example because another
/// deployment has not promoted yet, the command fails without deleting.
#[instrument(skip(provider, definitions, cancel))]
pub async fn cleanup_indices(
    provider: &dyn SearchIndexProvider,
    definitions: &[IndexDefinition],
    explain: bool,
    cancel: &CancellationToken,
) -> Result<(), IndexingError> {
    for definition in definitions {
        let actual = cancellable(cancel, provider.resolve_alias(&definition.alias)).await?;
        if actual != definition.name {
            return Err(IndexingError::AliasMismatch {
                alias: definition.alias.clone(),
                expected: definition.name.clone(),
                actual,
            });
        }
    }

    for definition in definitions {
        let pattern = format!("{}_*", definition.alias);

        for index in cancellable(cancel, provider.indices(&pattern)).await? {
            if index == definition.name {
                info!(index = %index, alias = %definition.alias, "Keeping aliased index");
                continue;
            }

            if explain {
                info!(index = %index, "Will delete index");
            } else {
                cancellable(cancel, provider.delete_index(&index)).await?;
            }
        }
    }

    Ok(())
}
