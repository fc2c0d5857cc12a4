//! # Search Indexer Shared
//!
//! This crate defines the entity documents written to the search engine and
//! the versioned index definitions they are written to. It has no I/O of its
//! own and is shared by the repository and indexer crates.

pub mod index;
pub mod types;
pub mod utils;

pub use index::{all_definitions, IndexDefinition, IndexDefinitionError};
pub use types::{
    DigitalLpa, DraftApplication, Deputy, Entity, EntityId, FieldError, Firm, Person,
};
