//! Normalization of `location.name` results.
//!
//! Newer API versions return `stopLocationOrCoordLocation`: a list of
//! single-key objects such as `{"StopLocation": {...}}`. Older ones return
//! `LocationList` with one list per kind. Both are flattened into
//! [`Location`] rows, in response order.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::board::objects;

/// Kinds listed under the legacy `LocationList` shape.
const LEGACY_KINDS: [&str; 4] = ["StopLocation", "CoordLocation", "POI", "Address"];

/// One candidate location.
///
/// Ids and coordinates are passed through untouched, since the API sends
/// them as strings or numbers depending on version.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// The object key the location appeared under, e.g. "StopLocation"
    pub kind: String,
    pub id: Option<Value>,
    pub ext_id: Option<Value>,
    pub name: Option<Value>,
    /// The API's `type`, or a value derived from the kind
    #[serde(rename = "type")]
    pub location_type: Value,
    pub weight: Option<Value>,
    pub lat: Option<Value>,
    pub lon: Option<Value>,
}

impl Location {
    fn from_object(kind: &str, fields: &Map<String, Value>) -> Self {
        let field = |key: &str| fields.get(key).filter(|value| !value.is_null()).cloned();

        let location_type = field("type")
            .filter(|value| value.as_str() != Some(""))
            .unwrap_or_else(|| {
                let derived = if kind == "StopLocation" { "S" } else { kind };
                Value::String(derived.to_string())
            });

        Self {
            kind: kind.to_string(),
            id: field("id"),
            ext_id: field("extId"),
            name: field("name"),
            location_type,
            weight: field("weight"),
            lat: field("lat"),
            lon: field("lon"),
        }
    }
}

/// The result printed by `find-location`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationMatches {
    pub query: String,
    pub matches: Vec<Location>,
}

/// Flatten a `location.name` payload into location rows.
pub fn normalize_locations(payload: &Value) -> Vec<Location> {
    let mut locations = Vec::new();

    for item in objects(payload.get("stopLocationOrCoordLocation")) {
        for (kind, location) in item {
            if let Some(fields) = location.as_object() {
                locations.push(Location::from_object(kind, fields));
            }
        }
    }

    if let Some(list) = payload.get("LocationList").and_then(Value::as_object) {
        for kind in LEGACY_KINDS {
            for fields in objects(list.get(kind)) {
                locations.push(Location::from_object(kind, fields));
            }
        }
    }

    locations
}
