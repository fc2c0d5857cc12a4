//! Versioned index definitions.
//!
//! Each entity alias owns one settings/mappings document. The concrete index
//! name is derived from a hash of that document, so a mapping change always
//! produces a new index to backfill and promote.

mod definition;
pub mod mappings;

pub use definition::{all_definitions, IndexDefinition, IndexDefinitionError};
