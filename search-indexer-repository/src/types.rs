//! Request and response types for search engine operations.
//!
//! The public types are the flattened shapes handed to callers; the private
//! envelopes mirror the engine's JSON responses and are only used while
//! parsing.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

/// Flattened search response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
    /// Raw `_source` documents, each with `_index` set to the alias that
    /// produced it.
    pub hits: Vec<Value>,
    /// Aggregation name → bucket key → document count.
    pub aggregations: HashMap<String, HashMap<String, i64>>,
    /// Number of matching documents reported by the engine.
    pub total: i64,
    /// Whether `total` is exact rather than a lower bound.
    pub total_exact: bool,
}

/// Result of a delete-by-query request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DeleteResult {
    /// Number of documents the query matched.
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkResponse {
    #[serde(default)]
    pub items: Vec<HashMap<String, BulkResponseItem>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkResponseItem {
    pub status: u16,
    pub error: Option<BulkItemError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkItemError {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub hits: SearchHits,
    #[serde(default)]
    pub aggregations: HashMap<String, AggregationBuckets>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchHits {
    pub total: SearchTotal,
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchTotal {
    pub value: i64,
    pub relation: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchHit {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_source", default)]
    pub source: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AggregationBuckets {
    #[serde(default)]
    pub buckets: Vec<AggregationBucket>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AggregationBucket {
    pub key: Value,
    pub doc_count: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Acknowledged {
    #[serde(default)]
    pub acknowledged: bool,
}
