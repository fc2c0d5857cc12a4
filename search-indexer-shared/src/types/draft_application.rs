//! Power of attorney draft application documents.

use serde::{Deserialize, Serialize};

use super::FieldError;

/// Alias under which draft application indices are published.
pub const DRAFT_APPLICATION_ALIAS: &str = "poadraftapplication";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftApplication {
    pub id: Option<i64>,
    #[serde(rename = "donorName")]
    pub donor_name: String,
    #[serde(rename = "donorEmail")]
    pub donor_email: String,
    #[serde(rename = "donorPhone")]
    pub donor_phone: String,
    #[serde(rename = "donorAddressLine1")]
    pub donor_address_line_1: String,
    #[serde(rename = "donorPostcode")]
    pub donor_postcode: String,
    #[serde(rename = "correspondentName")]
    pub correspondent_name: String,
    #[serde(rename = "correspondentAddressLine1")]
    pub correspondent_address_line_1: String,
    #[serde(rename = "correspondentPostcode")]
    pub correspondent_postcode: String,
}

impl DraftApplication {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.id.is_none() {
            errors.push(FieldError::empty("id"));
        }
        errors
    }
}
