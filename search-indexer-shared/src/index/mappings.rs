//! Settings and mappings for each entity index.
//!
//! These documents are hashed into the index name, so any edit here produces
//! a new index on the next `create-indices` run.

use serde_json::{json, Value};

/// Shared analysis settings: whitespace-insensitive postcode matching and an
/// ascii-folding, lowercasing default analyzer.
fn analysis() -> Value {
    json!({
        "filter": {
            "whitespace_remove": {
                "type": "pattern_replace",
                "pattern": " ",
                "replacement": ""
            }
        },
        "analyzer": {
            "default": {
                "tokenizer": "whitespace",
                "filter": ["asciifolding", "lowercase"]
            },
            "no_space_analyzer": {
                "tokenizer": "keyword",
                "filter": ["lowercase", "whitespace_remove"]
            }
        }
    })
}

fn settings() -> Value {
    json!({
        "number_of_shards": 1,
        "number_of_replicas": 1,
        "refresh_interval": "1s",
        "analysis": analysis()
    })
}

fn text() -> Value {
    json!({ "type": "text" })
}

fn keyword() -> Value {
    json!({ "type": "keyword" })
}

fn text_copied_to(field: &str) -> Value {
    json!({ "type": "text", "copy_to": field })
}

fn keyword_copied_to(field: &str) -> Value {
    json!({ "type": "keyword", "copy_to": field })
}

fn postcode_copied_to(field: &str) -> Value {
    json!({
        "type": "text",
        "analyzer": "no_space_analyzer",
        "copy_to": field
    })
}

pub fn person() -> Value {
    json!({
        "settings": settings(),
        "mappings": {
            "properties": {
                "uId": keyword(),
                "normalizedUid": text(),
                "caseRecNumber": keyword(),
                "deputyNumber": keyword(),
                "personType": keyword(),
                "dob": { "type": "text", "analyzer": "whitespace" },
                "email": text(),
                "firstname": text(),
                "middlenames": text(),
                "surname": text(),
                "previousnames": text(),
                "othernames": text(),
                "companyName": text(),
                "className": text(),
                "organisationName": text(),
                "phoneNumbers": {
                    "properties": {
                        "phoneNumber": keyword()
                    }
                },
                "addresses": {
                    "properties": {
                        "addressLines": text(),
                        "postcode": {
                            "type": "text",
                            "analyzer": "no_space_analyzer",
                            "fields": { "keyword": keyword() }
                        }
                    }
                },
                "cases": {
                    "properties": {
                        "uId": keyword(),
                        "normalizedUid": text(),
                        "caseRecNumber": keyword(),
                        "onlineLpaId": keyword(),
                        "batchId": keyword(),
                        "caseType": keyword(),
                        "caseSubtype": keyword()
                    }
                }
            }
        }
    })
}

pub fn firm() -> Value {
    json!({
        "settings": settings(),
        "mappings": {
            "properties": {
                "personType": keyword(),
                "email": text(),
                "firmName": keyword(),
                "firmNumber": keyword(),
                "addressLine1": text(),
                "addressLine2": text(),
                "addressLine3": text(),
                "town": text(),
                "county": text(),
                "postcode": {
                    "type": "text",
                    "analyzer": "no_space_analyzer",
                    "fields": { "keyword": keyword() }
                },
                "phoneNumber": keyword()
            }
        }
    })
}

pub fn deputy() -> Value {
    const ALL: &str = "searchable";

    json!({
        "settings": settings(),
        "mappings": {
            "properties": {
                "searchable": text(),
                "uId": keyword_copied_to(ALL),
                "normalizedUid": keyword_copied_to(ALL),
                "deputyNumber": keyword_copied_to(ALL),
                "personType": keyword(),
                "dob": text_copied_to(ALL),
                "firstname": text_copied_to(ALL),
                "middlenames": text_copied_to(ALL),
                "surname": text_copied_to(ALL),
                "othernames": text_copied_to(ALL),
                "companyName": text_copied_to(ALL),
                "className": text_copied_to(ALL),
                "organisationName": text_copied_to(ALL)
            }
        }
    })
}

pub fn digital_lpa() -> Value {
    const ALL: &str = "searchable";

    let address = json!({
        "properties": {
            "line1": text_copied_to(ALL),
            "line2": text_copied_to(ALL),
            "line3": text_copied_to(ALL),
            "postcode": {
                "type": "text",
                "analyzer": "no_space_analyzer",
                "copy_to": ALL,
                "fields": { "keyword": keyword() }
            }
        }
    });
    let actor = |with_dob: bool| {
        let mut properties = json!({
            "firstNames": text_copied_to(ALL),
            "surname": text_copied_to(ALL),
            "address": address.clone()
        });
        if with_dob {
            properties["dob"] = text_copied_to(ALL);
        }
        json!({ "properties": properties })
    };

    json!({
        "settings": settings(),
        "mappings": {
            "properties": {
                "searchable": text(),
                "uId": text_copied_to(ALL),
                "lpaType": text(),
                "donor": actor(true),
                "certificateProvider": actor(false),
                "attorneys": actor(true)
            }
        }
    })
}

pub fn draft_application() -> Value {
    const ALL: &str = "draftApplicationSearchable";

    json!({
        "settings": settings(),
        "mappings": {
            "properties": {
                "draftApplicationSearchable": text(),
                "donorName": text_copied_to(ALL),
                "donorEmail": text_copied_to(ALL),
                "donorPhone": text_copied_to(ALL),
                "donorAddressLine1": text_copied_to(ALL),
                "donorPostcode": postcode_copied_to(ALL),
                "correspondentName": text_copied_to(ALL),
                "correspondentAddressLine1": text_copied_to(ALL),
                "correspondentPostcode": postcode_copied_to(ALL)
            }
        }
    })
}
