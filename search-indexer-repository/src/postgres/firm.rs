//! Firm source.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use search_indexer_shared::types::firm::FIRM_PERSON_TYPE;
use search_indexer_shared::{Entity, Firm};
use sqlx::PgPool;
use tokio::sync::mpsc::Sender;
use tracing::{info, instrument};

use super::reconstruct::{reconstruct, Aggregate};
use crate::errors::SourceError;
use crate::interfaces::EntitySource;

const FIRM_BY_ID: &str = r#"SELECT f.id::bigint AS id, coalesce(f.email, '') AS email,
    coalesce(f.firmname, '') AS firm_name, f.firmNumber::bigint AS firm_number,
    coalesce(f.addressline1, '') AS address_line_1, coalesce(f.addressline2, '') AS address_line_2,
    coalesce(f.addressline3, '') AS address_line_3, coalesce(f.town, '') AS town,
    coalesce(f.county, '') AS county, coalesce(f.postcode, '') AS postcode,
    coalesce(f.phonenumber, '') AS phone_number
FROM firm f
WHERE f.id >= $1 AND f.id <= $2
ORDER BY f.id"#;

#[derive(Debug, Default, sqlx::FromRow)]
pub(crate) struct FirmRow {
    pub id: i64,
    pub email: String,
    pub firm_name: String,
    pub firm_number: i64,
    pub address_line_1: String,
    pub address_line_2: String,
    pub address_line_3: String,
    pub town: String,
    pub county: String,
    pub postcode: String,
    pub phone_number: String,
}

impl Aggregate for Firm {
    type Row = FirmRow;

    fn parent_id(row: &FirmRow) -> i64 {
        row.id
    }

    fn start(row: &FirmRow) -> Self {
        Firm {
            id: Some(row.id),
            person_type: FIRM_PERSON_TYPE.to_string(),
            email: row.email.clone(),
            firm_name: row.firm_name.clone(),
            firm_number: row.firm_number.to_string(),
            address_line_1: row.address_line_1.clone(),
            address_line_2: row.address_line_2.clone(),
            address_line_3: row.address_line_3.clone(),
            town: row.town.clone(),
            county: row.county.clone(),
            postcode: row.postcode.clone(),
            phone_number: row.phone_number.clone(),
        }
    }

    fn finish(self) -> Entity {
        Entity::Firm(self)
    }
}

/// Reads firms from the `firm` table. Firms keep no update timestamp.
pub struct FirmSource {
    pool: PgPool,
}

impl FirmSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntitySource for FirmSource {
    async fn query_id_range(&self) -> Result<(i64, i64), SourceError> {
        super::query_id_range(&self.pool, "firm").await
    }

    #[instrument(skip(self, sink))]
    async fn query_by_id(
        &self,
        sink: &Sender<Entity>,
        from: i64,
        to: i64,
    ) -> Result<(), SourceError> {
        let rows = sqlx::query_as::<_, FirmRow>(FIRM_BY_ID)
            .bind(from)
            .bind(to)
            .fetch(&self.pool);

        let sent = reconstruct::<Firm, _>(rows, sink).await?;
        info!(entities = sent, "Queried firms by id");
        Ok(())
    }

    async fn query_from_date(
        &self,
        _sink: &Sender<Entity>,
        _from: DateTime<Utc>,
    ) -> Result<(), SourceError> {
        Err(SourceError::unsupported("firms cannot be queried by date"))
    }
}
