//! Scalar-or-sequence coercion.
//!
//! The API sends a field as a bare object when it has one element and as an
//! array when it has several. Every such field goes through [`one_or_many`].

use serde_json::{Map, Value};

/// Coerce a field that may be absent, a single value, or an array into a
/// sequence.
///
/// - absent or `null` → empty
/// - array → its elements, in order
/// - anything else → a one-element sequence
pub fn one_or_many(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(other) => vec![other],
    }
}

/// Like [`one_or_many`], keeping only the elements that are JSON objects.
pub fn objects(value: Option<&Value>) -> Vec<&Map<String, Value>> {
    one_or_many(value)
        .into_iter()
        .filter_map(Value::as_object)
        .collect()
}

/// The departures of a `departureBoard` payload.
///
/// A payload without a `Departure` field (or one that is not an object at
/// all) has no departures.
pub fn departures(payload: &Value) -> Vec<&Map<String, Value>> {
    objects(payload.get("Departure"))
}
