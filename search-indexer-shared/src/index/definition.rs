use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::mappings;
use crate::types::deputy::DEPUTY_ALIAS;
use crate::types::digital_lpa::DIGITAL_LPA_ALIAS;
use crate::types::draft_application::DRAFT_APPLICATION_ALIAS;
use crate::types::firm::FIRM_ALIAS;
use crate::types::person::PERSON_ALIAS;

/// Number of leading digest bytes used in an index name.
const NAME_HASH_BYTES: usize = 8;

/// Errors raised while building or interpreting index definitions.
#[derive(Debug, Error)]
pub enum IndexDefinitionError {
    /// The mapping config could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The index name does not carry an `_<hash>` suffix.
    #[error("invalid index name '{0}': expected <alias>_<hash>")]
    InvalidName(String),
}

/// A concrete, content-addressed index and the alias it is published under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDefinition {
    /// Stable client-facing alias, e.g. `person`.
    pub alias: String,
    /// `{alias}_{hex(sha256(config)[..8])}`.
    pub name: String,
    /// Serialized settings and mappings sent when creating the index.
    pub config: Vec<u8>,
}

impl IndexDefinition {
    /// Build a definition from an alias and its settings/mappings document.
    ///
    /// The document is serialized once; the name is derived from exactly
    /// those bytes, so the same config always yields the same name.
    ///
    /// # Example
    ///
    /// ```
    /// use search_indexer_shared::IndexDefinition;
    /// use serde_json::json;
    ///
    /// let a = IndexDefinition::new("person", &json!({"settings": {}})).unwrap();
    /// let b = IndexDefinition::new("person", &json!({"settings": {}})).unwrap();
    /// assert_eq!(a.name, b.name);
    /// assert!(a.name.starts_with("person_"));
    /// ```
    pub fn new(alias: impl Into<String>, config: &Value) -> Result<Self, IndexDefinitionError> {
        let alias = alias.into();
        let config = serde_json::to_vec(config)?;
        let name = Self::hashed_name(&alias, &config);

        Ok(Self {
            alias,
            name,
            config,
        })
    }

    /// Compute `{alias}_{hex(sha256(config)[..8])}`.
    pub fn hashed_name(alias: &str, config: &[u8]) -> String {
        let digest = Sha256::digest(config);
        format!("{}_{}", alias, hex::encode(&digest[..NAME_HASH_BYTES]))
    }

    /// Derive the alias of an index name by dropping its last `_` segment.
    ///
    /// The alias itself may contain underscores; only the trailing hash is
    /// discarded.
    pub fn alias_of(index_name: &str) -> Result<&str, IndexDefinitionError> {
        match index_name.rsplit_once('_') {
            Some((alias, _)) => Ok(alias),
            None => Err(IndexDefinitionError::InvalidName(index_name.to_string())),
        }
    }
}

/// Definitions for every entity alias served by the search service.
pub fn all_definitions() -> Result<Vec<IndexDefinition>, IndexDefinitionError> {
    Ok(vec![
        IndexDefinition::new(PERSON_ALIAS, &mappings::person())?,
        IndexDefinition::new(FIRM_ALIAS, &mappings::firm())?,
        IndexDefinition::new(DEPUTY_ALIAS, &mappings::deputy())?,
        IndexDefinition::new(DIGITAL_LPA_ALIAS, &mappings::digital_lpa())?,
        IndexDefinition::new(DRAFT_APPLICATION_ALIAS, &mappings::draft_application())?,
    ])
}
