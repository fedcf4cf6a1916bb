//! Typed read-only views over raw API objects.
//!
//! These never fail: a missing or wrong-typed field reads as `None` (or
//! `false` for boolean-ish fields).

use serde_json::{Map, Value};

use super::coerce::objects;

/// Fields tried, in order, for the text of a note.
const NOTE_TEXT_FIELDS: [&str; 3] = ["txtN", "value", "text"];

/// Whether a boolean-ish API value counts as set.
///
/// Accepts JSON booleans, non-zero numbers, and the strings
/// `1`/`true`/`yes`/`y`/`on` in any case.
pub fn truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "y" | "on"
        ),
        _ => false,
    }
}

/// One departure as sent by the `departureBoard` endpoint.
#[derive(Debug, Clone, Copy)]
pub struct RawDeparture<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> RawDeparture<'a> {
    pub fn new(fields: &'a Map<String, Value>) -> Self {
        Self { fields }
    }

    fn str_field(&self, key: &str) -> Option<&'a str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Service identifier, e.g. "Re 4527".
    pub fn name(&self) -> Option<&'a str> {
        self.str_field("name")
    }

    /// Scheduled destination text.
    pub fn direction(&self) -> Option<&'a str> {
        self.str_field("direction")
    }

    /// Name of the stop the service departs from.
    pub fn stop(&self) -> Option<&'a str> {
        self.str_field("stop")
    }

    pub fn planned_date(&self) -> Option<&'a str> {
        self.str_field("date")
    }

    pub fn planned_time(&self) -> Option<&'a str> {
        self.str_field("time")
    }

    /// Real-time date, only present when live data exists.
    pub fn actual_date(&self) -> Option<&'a str> {
        self.str_field("rtDate")
    }

    /// Real-time time, only present when live data exists.
    pub fn actual_time(&self) -> Option<&'a str> {
        self.str_field("rtTime")
    }

    pub fn is_cancelled(&self) -> bool {
        truthy(self.fields.get("cancelled"))
    }

    pub fn is_part_cancelled(&self) -> bool {
        truthy(self.fields.get("partCancelled"))
    }

    /// The `ProductAtStop.catOut` category code, e.g. "Re" or "IC".
    pub fn category(&self) -> Option<&'a str> {
        self.fields
            .get("ProductAtStop")
            .and_then(Value::as_object)
            .and_then(|product| product.get("catOut"))
            .and_then(Value::as_str)
    }

    /// The service notes, in the order the API sent them.
    pub fn notes(&self) -> Vec<RawNote<'a>> {
        let Some(notes) = self.fields.get("Notes").and_then(Value::as_object) else {
            return Vec::new();
        };
        objects(notes.get("Note"))
            .into_iter()
            .map(RawNote::new)
            .collect()
    }
}

/// One entry of a departure's `Notes.Note`.
#[derive(Debug, Clone, Copy)]
pub struct RawNote<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> RawNote<'a> {
    pub fn new(fields: &'a Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn key(&self) -> Option<&'a str> {
        self.fields.get("key").and_then(Value::as_str)
    }

    pub fn note_type(&self) -> Option<&'a str> {
        self.fields.get("type").and_then(Value::as_str)
    }

    /// The note text: the first non-blank string among `txtN`, `value` and
    /// `text`, trimmed.
    pub fn text(&self) -> Option<&'a str> {
        NOTE_TEXT_FIELDS.iter().find_map(|key| {
            self.fields
                .get(*key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|text| !text.is_empty())
        })
    }
}
