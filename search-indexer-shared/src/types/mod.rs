//! This module defines the entity variants indexed by the search service and
//! the closed `Entity` sum type the pipeline moves around.

pub mod deputy;
pub mod digital_lpa;
pub mod draft_application;
pub mod entity;
pub mod firm;
pub mod person;

pub use deputy::Deputy;
pub use digital_lpa::{DigitalLpa, DigitalLpaAddress, DigitalLpaAttorney, DigitalLpaDonor, DigitalLpaPerson};
pub use draft_application::DraftApplication;
pub use entity::{Entity, EntityId, FieldError};
pub use firm::Firm;
pub use person::{Person, PersonAddress, PersonCase, PersonPhoneNumber};
