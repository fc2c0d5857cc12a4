//! OpenSearch implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! using OpenSearch (or a managed Elasticsearch-compatible domain) as the
//! backend, with optional SigV4 request signing.

mod provider;
mod signing;

pub use provider::OpenSearchProvider;
pub use signing::RequestSigning;
