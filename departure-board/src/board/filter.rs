//! Filtering departures by product category.

use std::collections::BTreeSet;

use serde_json::Value;

use super::coerce::departures;
use super::raw::RawDeparture;

/// A case-insensitive set of `ProductAtStop.catOut` codes to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFilter {
    codes: BTreeSet<String>,
}

impl CategoryFilter {
    /// Parse a comma-separated list of category codes, e.g. `"IC, Re"`.
    ///
    /// Returns `None` when the list contains no non-blank code.
    pub fn parse(list: &str) -> Option<Self> {
        let codes: BTreeSet<String> = list
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_lowercase)
            .collect();

        if codes.is_empty() {
            None
        } else {
            Some(Self { codes })
        }
    }

    /// The normalized (lowercase) codes.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    /// Whether a departure belongs to one of the requested categories.
    ///
    /// Departures without a usable category never match.
    pub fn matches(&self, departure: &RawDeparture<'_>) -> bool {
        departure
            .category()
            .is_some_and(|category| self.codes.contains(&category.to_lowercase()))
    }

    /// Rewrite the payload's `Departure` field to the matching departures.
    ///
    /// The field always becomes an array afterwards. Returns the number of
    /// departures before and after filtering.
    pub fn retain(&self, payload: &mut Value) -> (usize, usize) {
        let all = departures(payload);
        let before = all.len();
        let kept: Vec<Value> = all
            .into_iter()
            .filter(|fields| self.matches(&RawDeparture::new(fields)))
            .map(|fields| Value::Object(fields.clone()))
            .collect();
        let after = kept.len();

        if let Some(object) = payload.as_object_mut() {
            object.insert("Departure".to_string(), Value::Array(kept));
        }

        (before, after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dep(name: &str, cat: &str) -> Value {
        json!({"name": name, "ProductAtStop": {"catOut": cat}})
    }

    fn names(payload: &Value) -> Vec<&str> {
        departures(payload)
            .into_iter()
            .filter_map(|d| d.get("name").and_then(Value::as_str))
            .collect()
    }

    #[test]
    fn parse_codes() {
        let filter = CategoryFilter::parse(" IC, re ,,Re").unwrap();
        assert_eq!(filter.codes().collect::<Vec<_>>(), vec!["ic", "re"]);
    }

    #[test]
    fn parse_blank_is_none() {
        assert_eq!(CategoryFilter::parse(""), None);
        assert_eq!(CategoryFilter::parse(" , ,"), None);
    }

    #[test]
    fn keeps_matching_in_order() {
        let mut payload = json!({
            "Departure": [dep("first", "Re"), dep("second", "re"), dep("third", "IC")]
        });
        let filter = CategoryFilter::parse("Re").unwrap();

        let (before, after) = filter.retain(&mut payload);

        assert_eq!((before, after), (3, 2));
        assert_eq!(names(&payload), vec!["first", "second"]);
    }

    #[test]
    fn drops_departures_without_category() {
        let mut payload = json!({
            "Departure": [
                {"name": "no product"},
                {"name": "number", "ProductAtStop": {"catOut": 3}},
                dep("kept", "IC"),
                "not a departure",
            ]
        });
        let filter = CategoryFilter::parse("ic").unwrap();

        let (before, after) = filter.retain(&mut payload);

        assert_eq!((before, after), (3, 1));
        assert_eq!(names(&payload), vec!["kept"]);
    }

    #[test]
    fn single_departure_becomes_list() {
        let mut payload = json!({"Departure": dep("only", "IC")});
        let filter = CategoryFilter::parse("IC").unwrap();

        filter.retain(&mut payload);

        assert!(payload["Departure"].is_array());
        assert_eq!(names(&payload), vec!["only"]);
    }

    #[test]
    fn multiple_codes() {
        let mut payload = json!({
            "Departure": [dep("a", "Bus"), dep("b", "IC"), dep("c", "Re"), dep("d", "S")]
        });
        let filter = CategoryFilter::parse("ic,RE").unwrap();

        filter.retain(&mut payload);

        assert_eq!(names(&payload), vec!["b", "c"]);
    }
}
