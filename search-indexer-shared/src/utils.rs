//! Field normalisation helpers used when rebuilding documents from stored rows.

use serde_json::Value;

/// Render a 12 digit uid as `XXXX-XXXX-XXXX`.
///
/// Uids of any other length are rendered as plain digits.
///
/// # Example
///
/// ```
/// use search_indexer_shared::utils::format_uid;
///
/// assert_eq!(format_uid(700000000001), "7000-0000-0001");
/// assert_eq!(format_uid(42), "42");
/// ```
pub fn format_uid(uid: i64) -> String {
    let digits = uid.to_string();
    if digits.len() != 12 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return digits;
    }

    format!("{}-{}-{}", &digits[0..4], &digits[4..8], &digits[8..12])
}

/// Map a stored person type tag to its display name.
///
/// Unknown tags are returned unchanged.
pub fn resolve_person_type(tag: &str) -> String {
    let resolved = match tag {
        "lpa_attorney" => "Attorney",
        "lpa_replacement_attorney" => "Replacement Attorney",
        "lpa_trust_corporation" => "Trust Corporation",
        "lpa_correspondent" => "Correspondent",
        "lpa_donor" => "Donor",
        "lpa_notified_person" => "Notified Person",
        "lpa_certificate_provider" => "Certificate Provider",
        "actor_non_case_contact" => "Non-Case Contact",
        "actor_notified_relative" => "Notified Relative",
        "actor_notified_attorney" => "Notified Attorney",
        "actor_notified_donor" => "Person Notify Donor",
        "actor_client" => "Client",
        "actor_contact" => "Contact",
        "actor_deputy" => "Deputy",
        "actor_fee_payer" => "Fee Payer",
        other => other,
    };
    resolved.to_string()
}

/// Normalise the stored `address_lines` JSON column into an ordered list.
///
/// The column holds either an array of lines or an object keyed `"0"`,
/// `"1"`, ... Null values and empty strings are dropped, as are non-numeric
/// object keys. Object keys are ordered as strings. Any other shape yields an
/// empty list.
pub fn address_lines(value: &Value) -> Vec<String> {
    match value {
        Value::Array(lines) => lines
            .iter()
            .filter_map(Value::as_str)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Object(lines) => {
            let mut keys: Vec<&String> = lines
                .keys()
                .filter(|key| key.parse::<i64>().is_ok())
                .collect();
            keys.sort();

            keys.into_iter()
                .filter_map(|key| lines.get(key).and_then(Value::as_str))
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_uid() {
        assert_eq!(format_uid(700000000047), "7000-0000-0047");
        assert_eq!(format_uid(12345), "12345");
        assert_eq!(format_uid(-70000000004), "-70000000004");
    }

    #[test]
    fn test_resolve_person_type() {
        assert_eq!(resolve_person_type("actor_deputy"), "Deputy");
        assert_eq!(resolve_person_type("lpa_donor"), "Donor");
        assert_eq!(resolve_person_type("something_new"), "something_new");
    }

    #[test]
    fn test_address_lines_from_array() {
        let lines = address_lines(&json!(["1 Road", null, "", "Town"]));

        assert_eq!(lines, vec!["1 Road", "Town"]);
    }

    #[test]
    fn test_address_lines_from_object() {
        let lines = address_lines(&json!({
            "2": "Town",
            "0": "1 Road",
            "1": "",
            "x": "ignored",
            "3": null
        }));

        assert_eq!(lines, vec!["1 Road", "Town"]);
    }

    #[test]
    fn test_address_lines_other_shapes() {
        assert!(address_lines(&Value::Null).is_empty());
        assert!(address_lines(&json!("1 Road")).is_empty());
    }
}
