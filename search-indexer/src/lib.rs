//! # Search Indexer
//!
//! Keeps the search engine's indices in step with the relational system of
//! record, and manages versioned indices behind aliases.
//!
//! ## Architecture
//!
//! Indexing is a bounded producer/consumer pipeline:
//!
//! 1. **Source**: streams entities rebuilt from joined rows, one id batch at a time
//! 2. **Indexer**: packs entities into size-bounded bulk requests
//! 3. **Provider**: sends bulk requests, backing off while the engine throttles
//!
//! Index names carry a hash of their mapping, so a mapping change produces a
//! new index that is backfilled and then promoted by swapping its alias.
//!
//! ## Modules
//!
//! - [`batch_iter`]: Splitting id ranges into batches
//! - [`cli`]: Command line definition
//! - [`commands`]: Index lifecycle commands
//! - [`config`]: Configuration and dependency initialization
//! - [`indexer`]: The indexing pipeline
//! - [`secrets`]: Cached secrets lookup
//! - [`errors`]: Error types for the indexer

pub mod batch_iter;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod indexer;
pub mod secrets;

pub use config::{Dependencies, Settings};
pub use errors::IndexingError;
pub use indexer::{IndexResult, Indexer, IndexerConfig, RunError};
