//! Error types for the search indexer repository.
//!
//! `SearchIndexError` covers every search engine operation, `BulkOpError`
//! the construction of bulk request bodies, and `SourceError` the relational
//! row sources.

mod bulk_op_error;
mod search_index_error;
mod source_error;

pub use bulk_op_error::BulkOpError;
pub use search_index_error::SearchIndexError;
pub use source_error::SourceError;
