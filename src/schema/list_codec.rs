//! Encoding of multi-valued categorical fields
//!
//! Version 1 stores a selection as `v1:` followed by a JSON array of strings,
//! for example `v1:["cT1a","cN0"]`. Values without a version prefix are read
//! with the legacy parser, which understands the bracket-quote-comma layout
//! written by older exports (`"['cT1a', 'cN0']"`).
//!
//! Decoding never fails. Anything that cannot be read yields an empty list.

use log::debug;

/// Prefix marking a version 1 encoded list
pub const V1_PREFIX: &str = "v1:";

/// Encode a selection for storage
#[must_use]
pub fn encode_list<S: AsRef<str>>(items: &[S]) -> String {
    let items: Vec<&str> = items.iter().map(AsRef::as_ref).collect();
    // Serializing a slice of &str cannot fail
    let json = serde_json::to_string(&items).unwrap_or_else(|_| "[]".to_string());
    format!("{V1_PREFIX}{json}")
}

/// Decode a stored selection, accepting both the current and the legacy layout
#[must_use]
pub fn decode_list(value: &str) -> Vec<String> {
    let value = value.trim();
    match value.strip_prefix(V1_PREFIX) {
        Some(json) => decode_v1(json),
        None => parse_legacy_list(value),
    }
}

fn decode_v1(json: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(json) {
        Ok(items) => items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        Err(e) => {
            debug!("Discarding malformed list value {json:?}: {e}");
            Vec::new()
        }
    }
}

/// Parse the legacy bracket-quote-comma layout
///
/// Bracket and quote characters are stripped, the remainder is split on
/// commas and every item is trimmed. Empty items are dropped.
#[must_use]
pub fn parse_legacy_list(value: &str) -> Vec<String> {
    value
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | '\'' | '"'))
        .collect::<String>()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
