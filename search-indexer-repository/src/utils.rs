//! Utility functions for the search indexer repository.

use serde_json::Value;

/// Strip the content hash from a concrete index name.
///
/// Everything from the first underscore onward is dropped, so hits from
/// `person_0a1b2c3d4e5f6a7b` are reported as coming from `person`.
///
/// # Example
///
/// ```
/// use search_indexer_repository::utils::index_alias;
///
/// assert_eq!(index_alias("person_0a1b2c3d4e5f6a7b"), "person");
/// assert_eq!(index_alias("firm"), "firm");
/// ```
pub fn index_alias(index: &str) -> &str {
    match index.find('_') {
        Some(pos) => &index[..pos],
        None => index,
    }
}

/// Join index names into the comma separated form used in request paths.
pub fn join_indices<S: AsRef<str>>(indices: &[S]) -> String {
    indices
        .iter()
        .map(|index| index.as_ref())
        .collect::<Vec<_>>()
        .join(",")
}

/// Render an aggregation bucket key as a string.
///
/// Terms aggregations over keyword fields return string keys; numeric keys
/// are rendered with their JSON representation.
pub fn bucket_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
