//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust crate. Requests go through the raw transport so
//! bulk bodies are sent byte-for-byte as built and index patterns reach the
//! engine unescaped.

use async_trait::async_trait;
use opensearch::{
    http::{
        headers::{HeaderMap, HeaderValue, CONTENT_TYPE},
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
        Method,
    },
    OpenSearch,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::bulk::{BulkOperation, BulkResult};
use crate::config::ProviderConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::signing::RequestSigning;
use crate::types::{
    Acknowledged, BulkResponse, DeleteResult, SearchResponse, SearchResult,
};
use crate::utils;

const NDJSON: &str = "application/x-ndjson";

/// OpenSearch provider implementation.
///
/// The underlying transport is safe to share across concurrent runs and
/// commands.
///
/// # Example
///
/// ```ignore
/// use search_indexer_repository::{OpenSearchProvider, ProviderConfig, RequestSigning};
///
/// let signing = RequestSigning::new("eu-west-1", "es");
/// let provider = OpenSearchProvider::new(
///     "https://search.example.eu-west-1.es.amazonaws.com",
///     Some(&signing),
///     ProviderConfig::default(),
/// )
/// .await?;
///
/// let index = provider.resolve_alias("person").await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
    config: ProviderConfig,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The engine URL (e.g., "http://localhost:9200")
    /// * `signing` - Region and service to sign requests for, or `None` to
    ///   send unsigned requests
    /// * `config` - Retry and index recreation settings
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If the URL is invalid, credentials cannot
    ///   be resolved or the transport cannot be built
    pub async fn new(
        url: &str,
        signing: Option<&RequestSigning>,
        config: ProviderConfig,
    ) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();
        if let Some(signing) = signing {
            builder = builder
                .auth(signing.credentials().await?)
                .service_name(&signing.service);
        }
        let transport = builder
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            signed = signing.is_some(),
            max_retries = config.retry.max_retries,
            "Created OpenSearch provider"
        );

        Ok(Self { client, config })
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, &str)]>,
        headers: HeaderMap,
        body: Option<Vec<u8>>,
    ) -> Result<Response, SearchIndexError> {
        self.client
            .transport()
            .send(method, path, headers, query, body, None)
            .await
            .map_err(|e| {
                error!(path = %path, error = %e, "Request to search engine failed");
                SearchIndexError::connection(e.to_string())
            })
    }

    /// Send a JSON body (or none) and return the status and raw body.
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, &str)]>,
        body: Option<&Value>,
    ) -> Result<(u16, String), SearchIndexError> {
        let body = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| SearchIndexError::serialization(e.to_string()))?;

        let response = self.send(method, path, query, HeaderMap::new(), body).await?;
        Self::read(response).await
    }

    async fn read(response: Response) -> Result<(u16, String), SearchIndexError> {
        let status = response.status_code().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;
        Ok((status, body))
    }

    fn ensure_success(status: u16, body: String, action: &str) -> Result<String, SearchIndexError> {
        if (200..300).contains(&status) {
            return Ok(body);
        }
        error!(status = status, body = %body, "{} request failed", action);
        Err(SearchIndexError::engine(status, body))
    }

    fn parse<T: DeserializeOwned>(body: &str) -> Result<T, SearchIndexError> {
        serde_json::from_str(body).map_err(|e| SearchIndexError::parse(e.to_string()))
    }

    fn ensure_acknowledged(body: &str, action: &str) -> Result<(), SearchIndexError> {
        let ack: Acknowledged = Self::parse(body)?;
        if !ack.acknowledged {
            return Err(SearchIndexError::acknowledgement(format!(
                "{} was not acknowledged: {}",
                action, body
            )));
        }
        Ok(())
    }

    /// A single bulk attempt; 429 is reported as `TooManyRequests`.
    async fn bulk_once(&self, op: &BulkOperation) -> Result<BulkResult, SearchIndexError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(NDJSON));

        let path = format!("/{}/_bulk", op.index_name());
        let response = self
            .send(Method::Post, &path, None, headers, Some(op.body().to_vec()))
            .await?;
        let (status, body) = Self::read(response).await?;

        if status == 429 {
            return Err(SearchIndexError::TooManyRequests);
        }
        let body = Self::ensure_success(status, body, "Bulk")?;
        let parsed: BulkResponse = Self::parse(&body)?;

        let mut result = BulkResult::default();
        for item in parsed.items.iter().flat_map(|item| item.values()) {
            if item.status == 200 || item.status == 201 {
                result.successful += 1;
                continue;
            }

            result.failed += 1;
            if let Some(err) = &item.error {
                let message = format!("{}: {}", err.kind, err.reason);
                debug!(status = item.status, error = %message, "Bulk item failed");
                if result.error.is_none() {
                    result.error = Some(message);
                }
            }
        }

        Ok(result)
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    #[instrument(skip(self, op), fields(index = %op.index_name(), documents = op.document_count(), bytes = op.len()))]
    async fn do_bulk(&self, op: &BulkOperation) -> Result<BulkResult, SearchIndexError> {
        let mut attempt = 0;

        loop {
            match self.bulk_once(op).await {
                Err(SearchIndexError::TooManyRequests) if attempt < self.config.retry.max_retries => {
                    attempt += 1;
                    let delay = self.config.retry.delay_for(attempt);
                    warn!(
                        attempt = attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Search engine throttled bulk request, backing off"
                    );
                    sleep(delay).await;
                }
                Err(e) => {
                    error!(error = %e, attempts = attempt + 1, "Bulk request failed");
                    return Err(e);
                }
                Ok(result) => {
                    debug!(
                        successful = result.successful,
                        failed = result.failed,
                        "Bulk request completed"
                    );
                    return Ok(result);
                }
            }
        }
    }

    async fn search(
        &self,
        indices: &[String],
        body: &Value,
    ) -> Result<SearchResult, SearchIndexError> {
        let path = format!("/{}/_search", utils::join_indices(indices));
        let (status, response) = self.request(Method::Post, &path, None, Some(body)).await?;
        let response = Self::ensure_success(status, response, "Search")?;
        let parsed: SearchResponse = Self::parse(&response)?;

        let hits = parsed
            .hits
            .hits
            .into_iter()
            .map(|hit| {
                let mut source = hit.source;
                if let Value::Object(fields) = &mut source {
                    fields.insert(
                        "_index".to_string(),
                        Value::String(utils::index_alias(&hit.index).to_string()),
                    );
                }
                source
            })
            .collect();

        let aggregations = parsed
            .aggregations
            .into_iter()
            .map(|(name, aggregation)| {
                let buckets = aggregation
                    .buckets
                    .into_iter()
                    .map(|bucket| (utils::bucket_key(&bucket.key), bucket.doc_count))
                    .collect();
                (name, buckets)
            })
            .collect();

        Ok(SearchResult {
            hits,
            aggregations,
            total: parsed.hits.total.value,
            total_exact: parsed.hits.total.relation == "eq",
        })
    }

    #[instrument(skip(self, config))]
    async fn create_index(
        &self,
        name: &str,
        config: &[u8],
        force: bool,
    ) -> Result<(), SearchIndexError> {
        if self.index_exists(name).await? {
            if !force {
                debug!("Index already exists");
                return Ok(());
            }

            info!("Index exists, deleting before recreating");
            self.delete_index(name).await?;
            sleep(self.config.recreate_delay).await;
        }

        let response = self
            .send(
                Method::Put,
                &format!("/{}", name),
                None,
                HeaderMap::new(),
                Some(config.to_vec()),
            )
            .await?;
        let (status, body) = Self::read(response).await?;

        if status != 200 {
            error!(status = status, body = %body, "Create index request failed");
            return Err(SearchIndexError::index_creation(format!(
                "index {} could not be created: status {}: {}",
                name, status, body
            )));
        }

        info!("Created index");
        Ok(())
    }

    async fn index_exists(&self, name: &str) -> Result<bool, SearchIndexError> {
        let (status, body) = self
            .request(Method::Head, &format!("/{}", name), None, None)
            .await?;

        match status {
            200 => Ok(true),
            404 => Ok(false),
            _ => Err(SearchIndexError::engine(status, body)),
        }
    }

    async fn delete_index(&self, name: &str) -> Result<(), SearchIndexError> {
        let (status, body) = self
            .request(Method::Delete, &format!("/{}", name), None, None)
            .await?;
        Self::ensure_success(status, body, "Delete index")?;

        info!(index = %name, "Deleted index");
        Ok(())
    }

    async fn resolve_alias(&self, alias: &str) -> Result<String, SearchIndexError> {
        let (status, body) = self
            .request(Method::Get, &format!("/_alias/{}", alias), None, None)
            .await?;

        if status == 404 {
            return Err(SearchIndexError::alias_missing(alias));
        }
        let body = Self::ensure_success(status, body, "Resolve alias")?;
        let indices: Map<String, Value> = Self::parse(&body)?;

        indices
            .into_iter()
            .next()
            .map(|(index, _)| index)
            .ok_or_else(|| SearchIndexError::alias_missing(alias))
    }

    async fn create_alias(&self, alias: &str, index: &str) -> Result<(), SearchIndexError> {
        let (status, body) = self
            .request(
                Method::Put,
                &format!("/{}/_alias/{}", index, alias),
                None,
                None,
            )
            .await?;
        let body = Self::ensure_success(status, body, "Create alias")?;
        Self::ensure_acknowledged(&body, "create alias")?;

        info!(alias = %alias, index = %index, "Created alias");
        Ok(())
    }

    async fn update_alias(
        &self,
        alias: &str,
        old_index: &str,
        new_index: &str,
    ) -> Result<(), SearchIndexError> {
        let actions = json!({
            "actions": [
                { "remove": { "index": old_index, "alias": alias } },
                { "add": { "index": new_index, "alias": alias } }
            ]
        });

        let (status, body) = self
            .request(Method::Post, "/_aliases", None, Some(&actions))
            .await?;
        let body = Self::ensure_success(status, body, "Update alias")?;
        Self::ensure_acknowledged(&body, "update alias")?;

        info!(alias = %alias, from = %old_index, to = %new_index, "Updated alias");
        Ok(())
    }

    async fn indices(&self, pattern: &str) -> Result<Vec<String>, SearchIndexError> {
        let (status, body) = self
            .request(Method::Get, &format!("/{}", pattern), None, None)
            .await?;
        let body = Self::ensure_success(status, body, "List indices")?;
        let indices: Map<String, Value> = Self::parse(&body)?;

        Ok(indices.into_iter().map(|(name, _)| name).collect())
    }

    async fn delete_by_query(
        &self,
        indices: &[String],
        body: &Value,
    ) -> Result<DeleteResult, SearchIndexError> {
        let path = format!("/{}/_delete_by_query", utils::join_indices(indices));
        let (status, response) = self
            .request(
                Method::Post,
                &path,
                Some(&[("conflicts", "proceed")]),
                Some(body),
            )
            .await?;
        let response = Self::ensure_success(status, response, "Delete by query")?;

        Self::parse(&response)
    }
}
