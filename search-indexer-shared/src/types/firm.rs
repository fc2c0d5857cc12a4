//! Firm documents.

use serde::{Deserialize, Serialize};

use super::FieldError;

/// Alias under which firm indices are published.
pub const FIRM_ALIAS: &str = "firm";

/// Person type recorded on every firm read from the store.
pub const FIRM_PERSON_TYPE: &str = "Firm";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Firm {
    pub id: Option<i64>,
    #[serde(rename = "personType")]
    pub person_type: String,
    pub email: String,
    #[serde(rename = "firmName")]
    pub firm_name: String,
    #[serde(rename = "firmNumber")]
    pub firm_number: String,
    #[serde(rename = "addressLine1")]
    pub address_line_1: String,
    #[serde(rename = "addressLine2")]
    pub address_line_2: String,
    #[serde(rename = "addressLine3")]
    pub address_line_3: String,
    pub town: String,
    pub county: String,
    pub postcode: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
}

impl Firm {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.id.is_none() {
            errors.push(FieldError::empty("id"));
        }
        errors
    }
}
