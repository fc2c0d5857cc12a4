//! Person source: one document per person, with addresses, phone numbers
//! and cases folded in from the joined rows.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use search_indexer_shared::types::{PersonAddress, PersonCase, PersonPhoneNumber};
use search_indexer_shared::utils::{address_lines, format_uid, resolve_person_type};
use search_indexer_shared::{Entity, Person};
use serde_json::Value;
use sqlx::PgPool;
use tokio::sync::mpsc::Sender;
use tracing::{info, instrument};

use super::reconstruct::{reconstruct, Aggregate};
use crate::errors::SourceError;
use crate::interfaces::EntitySource;

fn person_query(filter: &str) -> String {
    format!(
        r#"SELECT p.id::bigint AS id, p.uid::bigint AS uid,
    coalesce(p.caseRecNumber, '') AS case_rec_number, p.deputynumber::bigint AS deputy_number,
    coalesce(p.email, '') AS email, coalesce(to_char(p.dob, 'DD/MM/YYYY'), '') AS dob,
    coalesce(p.firstname, '') AS firstname, coalesce(p.middlenames, '') AS middlenames,
    coalesce(p.surname, '') AS surname, coalesce(p.previousnames, '') AS previousnames,
    coalesce(p.othernames, '') AS othernames, coalesce(p.companyname, '') AS company_name,
    coalesce(p.type, '') AS person_type, coalesce(p.organisationname, '') AS organisation_name,
    phonenumbers.id::bigint AS phone_number_id, coalesce(phonenumbers.phone_number, '') AS phone_number,
    addresses.id::bigint AS address_id, addresses.address_lines::json AS address_lines,
    coalesce(addresses.postcode, '') AS postcode,
    cases.id::bigint AS case_id, cases.uid::bigint AS case_uid,
    coalesce(cases.caserecnumber, '') AS case_case_rec_number,
    coalesce(cases.onlinelpaid, '') AS case_online_lpa_id, coalesce(cases.batchid, '') AS case_batch_id,
    coalesce(cases.casetype, '') AS case_type, coalesce(cases.casesubtype, '') AS case_subtype
FROM persons p
LEFT JOIN phonenumbers ON p.id = phonenumbers.person_id
LEFT JOIN addresses ON p.id = addresses.person_id
LEFT JOIN person_caseitem ON p.id = person_caseitem.person_id
LEFT JOIN cases ON person_caseitem.caseitem_id = cases.id
WHERE {}
ORDER BY p.id"#,
        filter
    )
}

/// One row of the person join: the person's own columns repeated, plus at
/// most one phone number, address and case.
#[derive(Debug, Default, sqlx::FromRow)]
pub(crate) struct PersonRow {
    pub id: i64,
    pub uid: i64,
    pub case_rec_number: String,
    pub deputy_number: Option<i64>,
    pub email: String,
    pub dob: String,
    pub firstname: String,
    pub middlenames: String,
    pub surname: String,
    pub previousnames: String,
    pub othernames: String,
    pub company_name: String,
    pub person_type: String,
    pub organisation_name: String,
    pub phone_number_id: Option<i64>,
    pub phone_number: String,
    pub address_id: Option<i64>,
    pub address_lines: Option<Value>,
    pub postcode: String,
    pub case_id: Option<i64>,
    pub case_uid: Option<i64>,
    pub case_case_rec_number: String,
    pub case_online_lpa_id: String,
    pub case_batch_id: String,
    pub case_type: String,
    pub case_subtype: String,
}

/// A person being rebuilt. The seen-id sets live only as long as the
/// aggregate, so duplicates are dropped per person.
pub(crate) struct PersonAggregate {
    person: Person,
    addresses: HashSet<i64>,
    phone_numbers: HashSet<i64>,
    cases: HashSet<i64>,
}

impl Aggregate for PersonAggregate {
    type Row = PersonRow;

    fn parent_id(row: &PersonRow) -> i64 {
        row.id
    }

    fn start(row: &PersonRow) -> Self {
        let person = Person {
            id: Some(row.id),
            uid: format_uid(row.uid),
            normalized_uid: row.uid,
            case_rec_number: row.case_rec_number.clone(),
            deputy_number: row.deputy_number,
            person_type: resolve_person_type(&row.person_type),
            dob: row.dob.clone(),
            email: row.email.clone(),
            firstname: row.firstname.clone(),
            middlenames: row.middlenames.clone(),
            surname: row.surname.clone(),
            previousnames: row.previousnames.clone(),
            othernames: row.othernames.clone(),
            company_name: row.company_name.clone(),
            organisation_name: row.organisation_name.clone(),
            ..Default::default()
        };

        Self {
            person,
            addresses: HashSet::new(),
            phone_numbers: HashSet::new(),
            cases: HashSet::new(),
        }
    }

    fn absorb(&mut self, row: &PersonRow) {
        if let Some(id) = row.address_id {
            if self.addresses.insert(id) {
                self.person.addresses.push(PersonAddress {
                    address_lines: row.address_lines.as_ref().map(address_lines).unwrap_or_default(),
                    postcode: row.postcode.clone(),
                });
            }
        }

        if let Some(id) = row.phone_number_id {
            if self.phone_numbers.insert(id) {
                self.person.phone_numbers.push(PersonPhoneNumber {
                    phone_number: row.phone_number.clone(),
                });
            }
        }

        if let (Some(id), Some(uid)) = (row.case_id, row.case_uid) {
            if self.cases.insert(id) {
                self.person.cases.push(PersonCase {
                    uid: format_uid(uid),
                    normalized_uid: uid,
                    case_rec_number: row.case_case_rec_number.clone(),
                    online_lpa_id: row.case_online_lpa_id.clone(),
                    batch_id: row.case_batch_id.clone(),
                    case_type: row.case_type.clone(),
                    case_subtype: row.case_subtype.clone(),
                });
            }
        }
    }

    fn finish(self) -> Entity {
        Entity::Person(self.person)
    }
}

/// Reads persons from the `persons` table and its child tables.
pub struct PersonSource {
    pool: PgPool,
}

impl PersonSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntitySource for PersonSource {
    async fn query_id_range(&self) -> Result<(i64, i64), SourceError> {
        super::query_id_range(&self.pool, "persons").await
    }

    #[instrument(skip(self, sink))]
    async fn query_by_id(
        &self,
        sink: &Sender<Entity>,
        from: i64,
        to: i64,
    ) -> Result<(), SourceError> {
        let sql = person_query("p.id >= $1 AND p.id <= $2");
        let rows = sqlx::query_as::<_, PersonRow>(&sql)
            .bind(from)
            .bind(to)
            .fetch(&self.pool);

        let sent = reconstruct::<PersonAggregate, _>(rows, sink).await?;
        info!(entities = sent, "Queried persons by id");
        Ok(())
    }

    #[instrument(skip(self, sink))]
    async fn query_from_date(
        &self,
        sink: &Sender<Entity>,
        from: DateTime<Utc>,
    ) -> Result<(), SourceError> {
        let sql = person_query("p.updatedDate >= $1");
        let rows = sqlx::query_as::<_, PersonRow>(&sql)
            .bind(from)
            .fetch(&self.pool);

        let sent = reconstruct::<PersonAggregate, _>(rows, sink).await?;
        info!(entities = sent, "Queried persons by update date");
        Ok(())
    }
}
