//! PostgreSQL implementations of the entity sources.
//!
//! Each source owns the SQL for one entity variant and streams rows through
//! the shared reconstructor, which folds consecutive rows sharing a parent
//! id into a single entity.

mod deputy;
mod draft_application;
mod firm;
mod person;
mod reconstruct;

pub use deputy::DeputySource;
pub use draft_application::DraftApplicationSource;
pub use firm::FirmSource;
pub use person::PersonSource;

use sqlx::PgPool;

use crate::errors::SourceError;

/// Smallest and largest id in `table`, `(0, 0)` when it is empty.
pub(crate) async fn query_id_range(pool: &PgPool, table: &str) -> Result<(i64, i64), SourceError> {
    let sql = format!(
        "SELECT COALESCE(MIN(id), 0)::bigint, COALESCE(MAX(id), 0)::bigint FROM {}",
        table
    );
    let range = sqlx::query_as::<_, (i64, i64)>(&sql)
        .fetch_one(pool)
        .await?;

    Ok(range)
}
