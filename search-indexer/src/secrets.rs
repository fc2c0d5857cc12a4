//! Secrets lookup backed by AWS Secrets Manager.
//!
//! Values are cached for the life of the process; [`SecretsCache::clear`]
//! forces the next lookup of every key back to the secret store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use aws_types::region::Region;
use tracing::{debug, info};

use crate::errors::IndexingError;

/// Reads secret strings by key.
#[async_trait]
pub trait SecretsProvider: Send + Sync {
    /// Read a secret scoped to the current environment (`{ENVIRONMENT}/{key}`).
    async fn get_secret_string(&self, key: &str) -> Result<String, IndexingError>;

    /// Read a secret by its full name.
    async fn get_global_secret_string(&self, key: &str) -> Result<String, IndexingError>;
}

/// Fetches a secret value from the backing store, uncached.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn fetch(&self, secret_id: &str) -> Result<String, IndexingError>;
}

/// [`SecretStore`] over the Secrets Manager API.
pub struct SecretsManagerStore {
    client: aws_sdk_secretsmanager::Client,
}

impl SecretsManagerStore {
    /// Build a client from the default AWS provider chain.
    pub async fn new(region: &str) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        Self {
            client: aws_sdk_secretsmanager::Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl SecretStore for SecretsManagerStore {
    async fn fetch(&self, secret_id: &str) -> Result<String, IndexingError> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|e| {
                IndexingError::secrets(format!("{}: {}", secret_id, DisplayErrorContext(&e)))
            })?;

        output
            .secret_string()
            .map(str::to_string)
            .ok_or_else(|| IndexingError::secrets(format!("{}: secret has no string value", secret_id)))
    }
}

/// Caching [`SecretsProvider`].
pub struct SecretsCache<S = SecretsManagerStore> {
    environment: String,
    store: S,
    values: Mutex<HashMap<String, String>>,
}

impl<S: SecretStore> SecretsCache<S> {
    pub fn new(environment: impl Into<String>, store: S) -> Self {
        Self {
            environment: environment.into(),
            store,
            values: Mutex::new(HashMap::new()),
        }
    }

    /// Forget every cached value.
    ///
    /// Secrets rotated while the process runs are only picked up after a
    /// clear.
    pub fn clear(&self) {
        if let Ok(mut values) = self.values.lock() {
            values.clear();
        }
        info!("Secrets cache cleared");
    }

    async fn get(&self, secret_id: String) -> Result<String, IndexingError> {
        let cached = self
            .values
            .lock()
            .ok()
            .and_then(|values| values.get(&secret_id).cloned());
        if let Some(value) = cached {
            debug!(secret_id = %secret_id, "Secret served from cache");
            return Ok(value);
        }

        let value = self.store.fetch(&secret_id).await?;
        if let Ok(mut values) = self.values.lock() {
            values.insert(secret_id, value.clone());
        }
        Ok(value)
    }
}

#[async_trait]
impl<S: SecretStore> SecretsProvider for SecretsCache<S> {
    async fn get_secret_string(&self, key: &str) -> Result<String, IndexingError> {
        self.get(format!("{}/{}", self.environment, key)).await
    }

    async fn get_global_secret_string(&self, key: &str) -> Result<String, IndexingError> {
        self.get(key.to_string()).await
    }
}
