//! Interface definitions for the repository.
//!
//! This module defines the abstract `SearchIndexProvider` and `EntitySource`
//! traits that allow for dependency injection and swappable backends.

mod entity_source;
mod search_index_provider;

pub use entity_source::EntitySource;
pub use search_index_provider::SearchIndexProvider;
