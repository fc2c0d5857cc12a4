//! The closed set of indexable entities.
//!
//! Every variant is a flat data record. `Entity` gives the pipeline one type
//! to move through channels and bulk requests while still serializing each
//! variant as its own document.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Deputy, DigitalLpa, DraftApplication, Firm, Person};

/// Identifier of an entity document in the search index.
///
/// Relational entities are keyed by their 64-bit row id; digital LPAs are
/// keyed by their string uid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityId {
    Int(i64),
    Str(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Int(id) => write!(f, "{}", id),
            EntityId::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        EntityId::Int(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        EntityId::Str(id)
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub name: String,
    pub description: String,
}

impl FieldError {
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: "field is empty".to_string(),
        }
    }
}

/// An entity produced by a row source and consumed once by a bulk operation.
///
/// Serialization is untagged: an `Entity::Person` is written exactly as the
/// `Person` document would be.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entity {
    Person(Person),
    Firm(Firm),
    Deputy(Deputy),
    DigitalLpa(DigitalLpa),
    DraftApplication(DraftApplication),
}

impl Entity {
    /// The document id used in the bulk action line.
    ///
    /// Entities that failed validation report `0` (or an empty uid); callers
    /// are expected to run [`Entity::validate`] before indexing anything that
    /// did not come from the relational store.
    pub fn id(&self) -> EntityId {
        match self {
            Entity::Person(p) => EntityId::Int(p.id.unwrap_or_default()),
            Entity::Firm(f) => EntityId::Int(f.id.unwrap_or_default()),
            Entity::Deputy(d) => EntityId::Int(d.id.unwrap_or_default()),
            Entity::DigitalLpa(l) => EntityId::Str(l.uid.clone()),
            Entity::DraftApplication(d) => EntityId::Int(d.id.unwrap_or_default()),
        }
    }

    /// Validate the entity, returning every field-level error found.
    pub fn validate(&self) -> Vec<FieldError> {
        match self {
            Entity::Person(p) => p.validate(),
            Entity::Firm(f) => f.validate(),
            Entity::Deputy(d) => d.validate(),
            Entity::DigitalLpa(l) => l.validate(),
            Entity::DraftApplication(d) => d.validate(),
        }
    }

    /// Short name of the variant, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Entity::Person(_) => "person",
            Entity::Firm(_) => "firm",
            Entity::Deputy(_) => "deputy",
            Entity::DigitalLpa(_) => "digital_lpa",
            Entity::DraftApplication(_) => "draft_application",
        }
    }
}

impl From<Person> for Entity {
    fn from(p: Person) -> Self {
        Entity::Person(p)
    }
}

impl From<Firm> for Entity {
    fn from(f: Firm) -> Self {
        Entity::Firm(f)
    }
}

impl From<Deputy> for Entity {
    fn from(d: Deputy) -> Self {
        Entity::Deputy(d)
    }
}

impl From<DigitalLpa> for Entity {
    fn from(l: DigitalLpa) -> Self {
        Entity::DigitalLpa(l)
    }
}

impl From<DraftApplication> for Entity {
    fn from(d: DraftApplication) -> Self {
        Entity::DraftApplication(d)
    }
}
