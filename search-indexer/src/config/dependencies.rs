//! Dependency initialization and wiring for the search indexer.

use std::sync::Arc;

use search_indexer_repository::{OpenSearchProvider, ProviderConfig, RequestSigning};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use tracing::info;

use super::{DatabaseSettings, Settings};
use crate::secrets::{SecretsCache, SecretsManagerStore};
use crate::IndexingError;

/// Container for the long-lived clients shared by every command.
pub struct Dependencies {
    pub settings: Settings,
    pub provider: Arc<OpenSearchProvider>,
    pub secrets: SecretsCache,
}

impl Dependencies {
    /// Build the search provider and the secrets cache.
    ///
    /// The relational store is not touched here; only the `index` command
    /// needs it, through [`Dependencies::connect_database`].
    pub async fn new(settings: Settings) -> Result<Self, IndexingError> {
        info!(
            search_endpoint = %settings.search_endpoint,
            region = %settings.region,
            search_service = %settings.search_service,
            request_signing = settings.request_signing,
            "Initializing dependencies"
        );

        let signing = settings
            .request_signing
            .then(|| RequestSigning::new(&settings.region, &settings.search_service));

        let provider = OpenSearchProvider::new(
            &settings.search_endpoint,
            signing.as_ref(),
            ProviderConfig::default(),
        )
        .await
        .map_err(|e| IndexingError::config(format!("Failed to create OpenSearch provider: {}", e)))?;

        let secrets = SecretsCache::new(
            settings.environment.clone(),
            SecretsManagerStore::new(&settings.region).await,
        );

        Ok(Self {
            settings,
            provider: Arc::new(provider),
            secrets,
        })
    }

    /// Open a single-connection pool to the relational store.
    ///
    /// A run reads through one connection for its whole duration.
    pub async fn connect_database(&self) -> Result<PgPool, IndexingError> {
        let db = DatabaseSettings::from_env(&self.secrets).await?;

        let options = PgConnectOptions::new()
            .host(&db.host)
            .port(db.port)
            .username(&db.user)
            .password(&db.password)
            .database(&db.database);

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        info!(host = %db.host, database = %db.database, "Connected to database");
        Ok(pool)
    }
}
