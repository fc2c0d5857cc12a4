use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use search_indexer_repository::{
    DeputySource, DraftApplicationSource, EntitySource, FirmSource, PersonSource,
    SearchIndexProvider,
};
use search_indexer_shared::types::{
    deputy::DEPUTY_ALIAS, draft_application::DRAFT_APPLICATION_ALIAS, firm::FIRM_ALIAS,
    person::PERSON_ALIAS,
};
use search_indexer_shared::IndexDefinition;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::errors::IndexingError;
use crate::indexer::{IndexResult, Indexer};

/// Entities that can be read from the relational store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Person,
    Firm,
    Deputy,
    DraftApplication,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Person,
        EntityKind::Firm,
        EntityKind::Deputy,
        EntityKind::DraftApplication,
    ];

    /// Alias the entity's index is published under.
    pub fn alias(self) -> &'static str {
        match self {
            EntityKind::Person => PERSON_ALIAS,
            EntityKind::Firm => FIRM_ALIAS,
            EntityKind::Deputy => DEPUTY_ALIAS,
            EntityKind::DraftApplication => DRAFT_APPLICATION_ALIAS,
        }
    }

    /// The relational source for this entity.
    pub fn source(self, pool: PgPool) -> Arc<dyn EntitySource> {
        match self {
            EntityKind::Person => Arc::new(PersonSource::new(pool)),
            EntityKind::Firm => Arc::new(FirmSource::new(pool)),
            EntityKind::Deputy => Arc::new(DeputySource::new(pool)),
            EntityKind::DraftApplication => Arc::new(DraftApplicationSource::new(pool)),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alias())
    }
}

/// Which rows a run reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMode {
    /// Rows updated at or after the instant.
    FromDate(DateTime<Utc>),
    /// Every row between the smallest and largest id.
    All,
    /// Rows with `from <= id <= to`.
    ById { from: i64, to: i64 },
}

/// A source and the current index it is written to.
pub struct IndexTarget {
    pub kind: EntityKind,
    pub index_name: String,
    pub source: Arc<dyn EntitySource>,
}

impl IndexTarget {
    /// Pair `source` with the current index of `kind`'s alias.
    pub fn new(
        kind: EntityKind,
        definitions: &[IndexDefinition],
        source: Arc<dyn EntitySource>,
    ) -> Result<Self, IndexingError> {
        let definition = definitions
            .iter()
            .find(|d| d.alias == kind.alias())
            .ok_or_else(|| IndexingError::config(format!("no index defined for {}", kind)))?;

        Ok(Self {
            kind,
            index_name: definition.name.clone(),
            source,
        })
    }
}

/// Index each target in turn.
///
/// Returns the totals of every run. The first run that fails stops the
/// command; its partial totals are logged before the error is returned.
#[instrument(skip(provider, targets, cancel))]
pub async fn index(
    provider: Arc<dyn SearchIndexProvider>,
    targets: Vec<IndexTarget>,
    mode: IndexMode,
    batch_size: usize,
    cancel: &CancellationToken,
) -> Result<Vec<IndexResult>, IndexingError> {
    let mut results = Vec::with_capacity(targets.len());

    for target in targets {
        let indexer = Indexer::new(Arc::clone(&provider), target.source, &target.index_name);

        let run = match mode {
            IndexMode::FromDate(from) => {
                info!(entity = %target.kind, from = %from, batch_size = batch_size, "Indexing by date");
                indexer.from_date(from, batch_size, cancel).await
            }
            IndexMode::All => {
                info!(entity = %target.kind, batch_size = batch_size, "Indexing all records");
                indexer.all(batch_size, cancel).await
            }
            IndexMode::ById { from, to } => {
                info!(entity = %target.kind, from = from, to = to, batch_size = batch_size, "Indexing by id");
                indexer.by_id(from, to, batch_size, cancel).await
            }
        };

        match run {
            Ok(result) => {
                info!(
                    entity = %target.kind,
                    index = %target.index_name,
                    successful = result.successful,
                    failed = result.failed,
                    "Indexing done"
                );
                for e in &result.errors {
                    warn!(entity = %target.kind, error = %e, "Indexing error");
                }
                results.push(result);
            }
            Err(run_error) => {
                if let Some(partial) = &run_error.partial {
                    error!(
                        entity = %target.kind,
                        successful = partial.successful,
                        failed = partial.failed,
                        "Indexing stopped after partial progress"
                    );
                }
                return Err(run_error.error);
            }
        }
    }

    Ok(results)
}
