//! Person documents.
//!
//! A person aggregates rows from the persons table with their addresses,
//! phone numbers and the cases they are attached to.

use serde::{Deserialize, Serialize};

use super::FieldError;

/// Alias under which person indices are published.
pub const PERSON_ALIAS: &str = "person";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: Option<i64>,
    #[serde(rename = "uId")]
    pub uid: String,
    #[serde(rename = "normalizedUid")]
    pub normalized_uid: i64,
    #[serde(rename = "caseRecNumber")]
    pub case_rec_number: String,
    #[serde(rename = "deputyNumber")]
    pub deputy_number: Option<i64>,
    #[serde(rename = "personType")]
    pub person_type: String,
    pub dob: String,
    pub email: String,
    pub firstname: String,
    pub middlenames: String,
    pub surname: String,
    pub previousnames: String,
    pub othernames: String,
    #[serde(rename = "companyName")]
    pub company_name: String,
    #[serde(rename = "className")]
    pub class_name: String,
    #[serde(rename = "organisationName")]
    pub organisation_name: String,
    pub addresses: Vec<PersonAddress>,
    #[serde(rename = "phoneNumbers")]
    pub phone_numbers: Vec<PersonPhoneNumber>,
    pub cases: Vec<PersonCase>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonAddress {
    #[serde(rename = "addressLines")]
    pub address_lines: Vec<String>,
    pub postcode: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonPhoneNumber {
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonCase {
    #[serde(rename = "uId")]
    pub uid: String,
    #[serde(rename = "normalizedUid")]
    pub normalized_uid: i64,
    #[serde(rename = "caseRecNumber")]
    pub case_rec_number: String,
    #[serde(rename = "onlineLpaId")]
    pub online_lpa_id: String,
    #[serde(rename = "batchId")]
    pub batch_id: String,
    #[serde(rename = "caseType")]
    pub case_type: String,
    #[serde(rename = "caseSubtype")]
    pub case_subtype: String,
}

impl Person {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.id.is_none() {
            errors.push(FieldError::empty("id"));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_person_field_names() {
        let person = Person {
            id: Some(1),
            uid: "7000-0000-0001".to_string(),
            normalized_uid: 700000000001,
            phone_numbers: vec![PersonPhoneNumber {
                phone_number: "01234".to_string(),
            }],
            ..Default::default()
        };

        let value = serde_json::to_value(&person).unwrap();

        assert_eq!(value["uId"], json!("7000-0000-0001"));
        assert_eq!(value["normalizedUid"], json!(700000000001i64));
        assert_eq!(value["deputyNumber"], json!(null));
        assert_eq!(value["phoneNumbers"][0]["phoneNumber"], json!("01234"));
        assert!(value["addresses"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_person_with_id_is_valid() {
        let person = Person {
            id: Some(9),
            ..Default::default()
        };

        assert!(person.validate().is_empty());
    }
}
