//! Deputy source: one document per person row, no joins.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use search_indexer_shared::utils::{format_uid, resolve_person_type};
use search_indexer_shared::{Deputy, Entity};
use sqlx::PgPool;
use tokio::sync::mpsc::Sender;
use tracing::{info, instrument};

use super::reconstruct::{reconstruct, Aggregate};
use crate::errors::SourceError;
use crate::interfaces::EntitySource;

fn deputy_query(filter: &str) -> String {
    format!(
        r#"SELECT p.id::bigint AS id, p.uid::bigint AS uid, p.deputynumber::bigint AS deputy_number,
    coalesce(to_char(p.dob, 'DD/MM/YYYY'), '') AS dob,
    coalesce(p.firstname, '') AS firstname, coalesce(p.middlenames, '') AS middlenames,
    coalesce(p.surname, '') AS surname, coalesce(p.othernames, '') AS othernames,
    coalesce(p.companyname, '') AS company_name, coalesce(p.type, '') AS person_type,
    coalesce(p.organisationname, '') AS organisation_name
FROM persons p
WHERE {}
ORDER BY p.id"#,
        filter
    )
}

#[derive(Debug, Default, sqlx::FromRow)]
pub(crate) struct DeputyRow {
    pub id: i64,
    pub uid: i64,
    pub deputy_number: Option<i64>,
    pub dob: String,
    pub firstname: String,
    pub middlenames: String,
    pub surname: String,
    pub othernames: String,
    pub company_name: String,
    pub person_type: String,
    pub organisation_name: String,
}

impl Aggregate for Deputy {
    type Row = DeputyRow;

    fn parent_id(row: &DeputyRow) -> i64 {
        row.id
    }

    fn start(row: &DeputyRow) -> Self {
        Deputy {
            id: Some(row.id),
            uid: format_uid(row.uid),
            normalized_uid: row.uid,
            deputy_number: row.deputy_number,
            person_type: resolve_person_type(&row.person_type),
            dob: row.dob.clone(),
            firstname: row.firstname.clone(),
            middlenames: row.middlenames.clone(),
            surname: row.surname.clone(),
            othernames: row.othernames.clone(),
            company_name: row.company_name.clone(),
            organisation_name: row.organisation_name.clone(),
            ..Default::default()
        }
    }

    fn finish(self) -> Entity {
        Entity::Deputy(self)
    }
}

/// Reads deputies from the `persons` table.
pub struct DeputySource {
    pool: PgPool,
}

impl DeputySource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntitySource for DeputySource {
    async fn query_id_range(&self) -> Result<(i64, i64), SourceError> {
        super::query_id_range(&self.pool, "persons").await
    }

    #[instrument(skip(self, sink))]
    async fn query_by_id(
        &self,
        sink: &Sender<Entity>,
        from: i64,
        to: i64,
    ) -> Result<(), SourceError> {
        let sql = deputy_query("p.id >= $1 AND p.id <= $2");
        let rows = sqlx::query_as::<_, DeputyRow>(&sql)
            .bind(from)
            .bind(to)
            .fetch(&self.pool);

        let sent = reconstruct::<Deputy, _>(rows, sink).await?;
        info!(entities = sent, "Queried deputies by id");
        Ok(())
    }

    #[instrument(skip(self, sink))]
    async fn query_from_date(
        &self,
        sink: &Sender<Entity>,
        from: DateTime<Utc>,
    ) -> Result<(), SourceError> {
        let sql = deputy_query("p.updatedDate >= $1");
        let rows = sqlx::query_as::<_, DeputyRow>(&sql)
            .bind(from)
            .fetch(&self.pool);

        let sent = reconstruct::<Deputy, _>(rows, sink).await?;
        info!(entities = sent, "Queried deputies by update date");
        Ok(())
    }
}
