use search_indexer_repository::SearchIndexProvider;
use search_indexer_shared::IndexDefinition;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use super::cancellable;
use crate::errors::IndexingError;

/// Point each alias at its current index.
///
/// The alias is derived from the index name by dropping its hash suffix.
/// With `set`, only that index is promoted. An alias already on its target
/// is left untouched, so running the command twice is harmless.
#[instrument(skip(provider, definitions, cancel))]
pub async fn update_alias(
    provider: &dyn SearchIndexProvider,
    definitions: &[IndexDefinition],
    set: Option<&str>,
    explain: bool,
    cancel: &CancellationToken,
) -> Result<(), IndexingError> {
    let targets: Vec<&str> = match set {
        Some(index) => vec![index],
        None => definitions.iter().map(|d| d.name.as_str()).collect(),
    };

    for index in targets {
        let alias = IndexDefinition::alias_of(index)?;
        let current = cancellable(cancel, provider.resolve_alias(alias)).await?;

        if current == index {
            info!(alias = %alias, index = %index, "Alias is already set");
            continue;
        }

        if explain {
            info!(alias = %alias, from = %current, to = %index, "Will update alias");
        } else {
            cancellable(cancel, provider.update_alias(alias, &current, index)).await?;
        }
    }

    Ok(())
}
