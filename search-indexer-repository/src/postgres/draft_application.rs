//! Draft power of attorney application source.
//!
//! Only the donor name is read from `poa.draft_applications`; the other
//! document fields stay empty until the store exposes them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use search_indexer_shared::{DraftApplication, Entity};
use sqlx::PgPool;
use tokio::sync::mpsc::Sender;
use tracing::{info, instrument};

use super::reconstruct::{reconstruct, Aggregate};
use crate::errors::SourceError;
use crate::interfaces::EntitySource;

const DRAFT_APPLICATION_BY_ID: &str = r#"SELECT id::bigint AS id, COALESCE(donorname, '') AS donor_name
FROM poa.draft_applications
WHERE id >= $1 AND id <= $2
ORDER BY id"#;

#[derive(Debug, Default, sqlx::FromRow)]
pub(crate) struct DraftApplicationRow {
    pub id: i64,
    pub donor_name: String,
}

impl Aggregate for DraftApplication {
    type Row = DraftApplicationRow;

    fn parent_id(row: &DraftApplicationRow) -> i64 {
        row.id
    }

    fn start(row: &DraftApplicationRow) -> Self {
        DraftApplication {
            id: Some(row.id),
            donor_name: row.donor_name.clone(),
            ..Default::default()
        }
    }

    fn finish(self) -> Entity {
        Entity::DraftApplication(self)
    }
}

pub struct DraftApplicationSource {
    pool: PgPool,
}

impl DraftApplicationSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntitySource for DraftApplicationSource {
    async fn query_id_range(&self) -> Result<(i64, i64), SourceError> {
        super::query_id_range(&self.pool, "poa.draft_applications").await
    }

    #[instrument(skip(self, sink))]
    async fn query_by_id(
        &self,
        sink: &Sender<Entity>,
        from: i64,
        to: i64,
    ) -> Result<(), SourceError> {
        let rows = sqlx::query_as::<_, DraftApplicationRow>(DRAFT_APPLICATION_BY_ID)
            .bind(from)
            .bind(to)
            .fetch(&self.pool);

        let sent = reconstruct::<DraftApplication, _>(rows, sink).await?;
        info!(entities = sent, "Queried draft applications by id");
        Ok(())
    }

    async fn query_from_date(
        &self,
        _sink: &Sender<Entity>,
        _from: DateTime<Utc>,
    ) -> Result<(), SourceError> {
        Err(SourceError::unsupported(
            "draft applications cannot be queried by date",
        ))
    }
}
