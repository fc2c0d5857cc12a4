//! Settings read from the environment.

use std::env;

use tracing::info;

use crate::errors::IndexingError;
use crate::secrets::SecretsProvider;

/// Default search engine URL.
const DEFAULT_SEARCH_ENDPOINT: &str = "http://localhost:9200";

/// Default AWS region for request signing and secrets.
const DEFAULT_REGION: &str = "eu-west-1";

/// Default signing service name for managed search domains.
const DEFAULT_SEARCH_SERVICE: &str = "es";

/// Engine, signing and secrets settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub search_endpoint: String,
    pub region: String,
    pub search_service: String,
    pub request_signing: bool,
    /// Prefix for environment-scoped secrets.
    pub environment: String,
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `AWS_ELASTICSEARCH_ENDPOINT`: engine URL (default: http://localhost:9200)
    /// - `AWS_REGION`: signing region (default: eu-west-1)
    /// - `AWS_SEARCH_PROVIDER`: signing service name (default: es)
    /// - `SEARCH_REQUEST_SIGNING`: "false" or "0" sends unsigned requests (default: true)
    /// - `ENVIRONMENT`: secrets prefix (default: empty)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`; unset and empty values fall back to
    /// the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let request_signing = !matches!(
            get("SEARCH_REQUEST_SIGNING", "true").to_lowercase().as_str(),
            "false" | "0" | "no"
        );

        Self {
            search_endpoint: get("AWS_ELASTICSEARCH_ENDPOINT", DEFAULT_SEARCH_ENDPOINT),
            region: get("AWS_REGION", DEFAULT_REGION),
            search_service: get("AWS_SEARCH_PROVIDER", DEFAULT_SEARCH_SERVICE),
            request_signing,
            environment: lookup("ENVIRONMENT").unwrap_or_default(),
        }
    }
}

/// Connection settings for the relational store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database: String,
}

impl DatabaseSettings {
    /// Read the database settings from the process environment.
    pub async fn from_env(secrets: &dyn SecretsProvider) -> Result<Self, IndexingError> {
        Self::from_lookup(|key| env::var(key).ok(), secrets).await
    }

    /// Read the database settings through `lookup`.
    ///
    /// The password comes from the secret named by
    /// `SEARCH_SERVICE_DB_PASS_SECRET` when that is set, otherwise from
    /// `SEARCH_SERVICE_DB_PASS`. Every other value is required.
    pub async fn from_lookup<F>(
        lookup: F,
        secrets: &dyn SecretsProvider,
    ) -> Result<Self, IndexingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| IndexingError::config(format!("{} must be specified", key)))
        };

        let password = match get("SEARCH_SERVICE_DB_PASS_SECRET") {
            Some(secret) => {
                info!(secret = %secret, "Reading database password from secret");
                secrets.get_global_secret_string(&secret).await?
            }
            None => get("SEARCH_SERVICE_DB_PASS").unwrap_or_default(),
        };
        if password.is_empty() {
            return Err(IndexingError::config(
                "SEARCH_SERVICE_DB_PASS or SEARCH_SERVICE_DB_PASS_SECRET must be specified",
            ));
        }

        let user = required("SEARCH_SERVICE_DB_USER")?;
        let host = required("SEARCH_SERVICE_DB_HOST")?;
        let port = required("SEARCH_SERVICE_DB_PORT")?
            .parse::<u16>()
            .map_err(|e| IndexingError::config(format!("SEARCH_SERVICE_DB_PORT: {}", e)))?;
        let database = required("SEARCH_SERVICE_DB_DATABASE")?;

        Ok(Self {
            user,
            password,
            host,
            port,
            database,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct FixedSecrets;

    #[async_trait]
    impl SecretsProvider for FixedSecrets {
        async fn get_secret_string(&self, key: &str) -> Result<String, IndexingError> {
            Ok(format!("env/{}", key))
        }

        async fn get_global_secret_string(&self, key: &str) -> Result<String, IndexingError> {
            Ok(format!("secret-{}", key))
        }
    }

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const DB_VARS: [(&str, &str); 4] = [
        ("SEARCH_SERVICE_DB_USER", "searchservice"),
        ("SEARCH_SERVICE_DB_HOST", "localhost"),
        ("SEARCH_SERVICE_DB_PORT", "5432"),
        ("SEARCH_SERVICE_DB_DATABASE", "api"),
    ];

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::from_lookup(lookup(&[]));

        assert_eq!(settings.search_endpoint, "http://localhost:9200");
        assert_eq!(settings.region, "eu-west-1");
        assert_eq!(settings.search_service, "es");
        assert!(settings.request_signing);
        assert_eq!(settings.environment, "");
    }

    #[test]
    fn test_settings_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            ("AWS_ELASTICSEARCH_ENDPOINT", "https://search.example"),
            ("AWS_SEARCH_PROVIDER", "aoss"),
            ("SEARCH_REQUEST_SIGNING", "False"),
            ("ENVIRONMENT", "dev"),
        ]));

        assert_eq!(settings.search_endpoint, "https://search.example");
        assert_eq!(settings.search_service, "aoss");
        assert!(!settings.request_signing);
        assert_eq!(settings.environment, "dev");
    }

    #[tokio::test]
    async fn test_database_settings_from_password() {
        let mut vars = DB_VARS.to_vec();
        vars.push(("SEARCH_SERVICE_DB_PASS", "searchpass"));

        let db = DatabaseSettings::from_lookup(lookup(&vars), &FixedSecrets)
            .await
            .unwrap();

        assert_eq!(
            db,
            DatabaseSettings {
                user: "searchservice".to_string(),
                password: "searchpass".to_string(),
                host: "localhost".to_string(),
                port: 5432,
                database: "api".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_password_secret_takes_precedence() {
        let mut vars = DB_VARS.to_vec();
        vars.push(("SEARCH_SERVICE_DB_PASS", "ignored"));
        vars.push(("SEARCH_SERVICE_DB_PASS_SECRET", "rds-password"));

        let db = DatabaseSettings::from_lookup(lookup(&vars), &FixedSecrets)
            .await
            .unwrap();

        assert_eq!(db.password, "secret-rds-password");
    }

    #[tokio::test]
    async fn test_missing_settings_are_named() {
        let missing_pass = DatabaseSettings::from_lookup(lookup(&DB_VARS), &FixedSecrets).await;
        let missing_host = DatabaseSettings::from_lookup(
            lookup(&[
                ("SEARCH_SERVICE_DB_PASS", "pass"),
                ("SEARCH_SERVICE_DB_USER", "user"),
            ]),
            &FixedSecrets,
        )
        .await;

        assert!(missing_pass
            .unwrap_err()
            .to_string()
            .contains("SEARCH_SERVICE_DB_PASS or SEARCH_SERVICE_DB_PASS_SECRET"));
        assert!(missing_host
            .unwrap_err()
            .to_string()
            .contains("SEARCH_SERVICE_DB_HOST must be specified"));
    }
}
