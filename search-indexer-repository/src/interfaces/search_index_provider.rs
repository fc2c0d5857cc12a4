//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search engine operations,
//! allowing for different backend implementations and in-memory test doubles.

use async_trait::async_trait;
use serde_json::Value;

use crate::bulk::{BulkOperation, BulkResult};
use crate::errors::SearchIndexError;
use crate::types::{DeleteResult, SearchResult};

/// Abstracts the underlying search engine (OpenSearch, Elasticsearch, etc.).
///
/// All methods return `Result<T, SearchIndexError>` for consistent error
/// handling across backends. Cancellation is expressed by dropping the
/// returned future.
///
/// # Index lifecycle
///
/// Concrete indices are versioned by content hash and published through
/// aliases. `create_index`, `create_alias`, `update_alias`, `indices` and
/// `delete_index` are the primitives the lifecycle commands are built from;
/// `resolve_alias` reports [`SearchIndexError::AliasMissing`] for an alias
/// that was never created so callers can tell it apart from a failure.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Send a bulk request, retrying while the engine answers 429.
    ///
    /// # Arguments
    ///
    /// * `op` - The accumulated bulk body and its target index
    ///
    /// # Returns
    ///
    /// * `Ok(BulkResult)` - Per-item success and failure counts, with the
    ///   first item error
    /// * `Err(SearchIndexError)` - Transport failure, non-2xx status or
    ///   throttling that outlived every retry
    async fn do_bulk(&self, op: &BulkOperation) -> Result<BulkResult, SearchIndexError>;

    /// Run a search body against one or more indices or aliases.
    ///
    /// # Returns
    ///
    /// * `Ok(SearchResult)` - Hits, aggregations and totals
    /// * `Err(SearchIndexError)` - `EngineError` for non-2xx responses,
    ///   `ParseError` for a body that is not a search response
    async fn search(&self, indices: &[String], body: &Value)
        -> Result<SearchResult, SearchIndexError>;

    /// Create an index from its settings/mappings.
    ///
    /// A no-op when the index exists and `force` is false. With `force`, an
    /// existing index is deleted and created again.
    async fn create_index(
        &self,
        name: &str,
        config: &[u8],
        force: bool,
    ) -> Result<(), SearchIndexError>;

    /// Whether an index exists.
    async fn index_exists(&self, name: &str) -> Result<bool, SearchIndexError>;

    /// Delete an index.
    async fn delete_index(&self, name: &str) -> Result<(), SearchIndexError>;

    /// Resolve the index an alias currently points at.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The concrete index name
    /// * `Err(SearchIndexError::AliasMissing)` - The alias does not exist
    /// * `Err(SearchIndexError)` - Any other failure
    async fn resolve_alias(&self, alias: &str) -> Result<String, SearchIndexError>;

    /// Point a new alias at an index.
    async fn create_alias(&self, alias: &str, index: &str) -> Result<(), SearchIndexError>;

    /// Move an alias from `old_index` to `new_index` in one atomic request.
    async fn update_alias(
        &self,
        alias: &str,
        old_index: &str,
        new_index: &str,
    ) -> Result<(), SearchIndexError>;

    /// List index names matching a pattern such as `person_*`.
    async fn indices(&self, pattern: &str) -> Result<Vec<String>, SearchIndexError>;

    /// Delete every document matching a query, proceeding past conflicts.
    async fn delete_by_query(
        &self,
        indices: &[String],
        body: &Value,
    ) -> Result<DeleteResult, SearchIndexError>;
}
