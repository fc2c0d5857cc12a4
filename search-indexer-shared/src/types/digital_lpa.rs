//! Digital LPA documents.
//!
//! Digital LPAs are keyed by their uid rather than a row id and have no
//! relational source; they arrive fully formed from upstream services.

use serde::{Deserialize, Serialize};

use super::FieldError;

/// Alias under which digital LPA indices are published.
pub const DIGITAL_LPA_ALIAS: &str = "digitalLpa";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DigitalLpaAddress {
    pub line1: String,
    pub line2: String,
    pub line3: String,
    pub postcode: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DigitalLpaPerson {
    #[serde(rename = "firstNames")]
    pub first_names: String,
    pub surname: String,
    pub address: DigitalLpaAddress,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DigitalLpaDonor {
    #[serde(flatten)]
    pub person: DigitalLpaPerson,
    pub dob: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DigitalLpaAttorney {
    #[serde(flatten)]
    pub person: DigitalLpaPerson,
    pub dob: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DigitalLpa {
    #[serde(rename = "uId")]
    pub uid: String,
    #[serde(rename = "lpaType")]
    pub lpa_type: String,
    pub donor: DigitalLpaDonor,
    #[serde(rename = "certificateProvider")]
    pub certificate_provider: DigitalLpaPerson,
    pub attorneys: Vec<DigitalLpaAttorney>,
}

impl DigitalLpa {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.uid.is_empty() {
            errors.push(FieldError::empty("uId"));
        }
        errors
    }
}
