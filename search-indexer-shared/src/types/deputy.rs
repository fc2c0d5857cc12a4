//! Deputy documents.
//!
//! Deputies are read from the same persons table as [`super::Person`] but
//! without any child collections.

use serde::{Deserialize, Serialize};

use super::FieldError;

/// Alias under which deputy indices are published.
pub const DEPUTY_ALIAS: &str = "deputy";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deputy {
    pub id: Option<i64>,
    #[serde(rename = "uId")]
    pub uid: String,
    #[serde(rename = "normalizedUid")]
    pub normalized_uid: i64,
    #[serde(rename = "deputyNumber")]
    pub deputy_number: Option<i64>,
    #[serde(rename = "personType")]
    pub person_type: String,
    pub dob: String,
    pub firstname: String,
    pub middlenames: String,
    pub surname: String,
    pub othernames: String,
    #[serde(rename = "companyName")]
    pub company_name: String,
    #[serde(rename = "className")]
    pub class_name: String,
    #[serde(rename = "organisationName")]
    pub organisation_name: String,
}

impl Deputy {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.id.is_none() {
            errors.push(FieldError::empty("id"));
        }
        errors
    }
}
