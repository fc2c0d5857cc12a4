//! # Search Indexer Repository
//!
//! This crate provides traits and implementations for the two stores the
//! indexer talks to: the search engine (bulk writes, search, index and alias
//! management) and the relational system of record the documents are
//! rebuilt from. It includes definitions for errors, interfaces, the bulk
//! request builder, and concrete implementations for OpenSearch and
//! PostgreSQL.

pub mod bulk;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod postgres;
pub mod types;
pub mod utils;

pub use bulk::{BulkOperation, BulkResult, MAX_PAYLOAD_SIZE};
pub use config::{ProviderConfig, RetryPolicy};
pub use errors::{BulkOpError, SearchIndexError, SourceError};
pub use interfaces::{EntitySource, SearchIndexProvider};
pub use opensearch::{OpenSearchProvider, RequestSigning};
pub use postgres::{DeputySource, DraftApplicationSource, FirmSource, PersonSource};
pub use types::{DeleteResult, SearchResult};
