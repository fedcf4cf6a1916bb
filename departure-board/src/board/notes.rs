//! Service notes: service messages and partial cancellations.
//!
//! A partially cancelled journey carries a note keyed
//! [`PART_CANCELLED_NOTE_KEY`] whose text names the two stations between
//! which the journey no longer runs, e.g.
//! "Toget er annulleret mellem København H og Østerport St.. Vi beklager."
//! The train now terminates at the first of those stations.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::raw::RawDeparture;

/// Note key for "journey partially cancelled between X and Y".
pub const PART_CANCELLED_NOTE_KEY: &str = "text.realtime.journey.partially.cancelled.between";

/// Note type carrying a free-text service message.
const SERVICE_MESSAGE_NOTE_TYPE: &str = "R";

/// The two stations named by a partial-cancellation note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialCancellation {
    /// Where the service now ends.
    pub from: String,
    /// Where the service would have continued to.
    pub to: String,
}

/// Extracts the stations from the text of a partial-cancellation note.
///
/// The wording depends on the language the board was requested in, so the
/// classifier takes the matcher as a parameter.
pub trait PartialCancellationMatcher {
    fn parse(&self, text: &str) -> Option<PartialCancellation>;
}

/// Matches "<between> X <and> Y" phrasing, case-insensitively.
///
/// `X` is the shortest text after `<between>` that is followed by
/// whitespace, `<and>` and whitespace. `Y` runs to the first period
/// sequence followed by whitespace, or to the end of the text (a single
/// trailing newline is allowed). Neither name may span a line break. Both
/// names are trimmed, and a match with a blank name is rejected.
///
/// # Examples
///
/// ```
/// use departure_board::board::{BetweenPhrase, PartialCancellationMatcher};
///
/// let found = BetweenPhrase::danish()
///     .parse("Toget er annulleret mellem Roskilde St. og Holbæk St.. Vi beklager.")
///     .unwrap();
/// assert_eq!(found.from, "Roskilde St.");
/// assert_eq!(found.to, "Holbæk St");
/// ```
#[derive(Debug, Clone)]
pub struct BetweenPhrase {
    between: String,
    and: String,
    pattern: Regex,
}

impl BetweenPhrase {
    pub fn new(between: &str, and: &str) -> Self {
        let pattern = format!(
            r"(?i){}\s+(.+?)\s+{}\s+(.+?)(?:\.+\s|\n?\z)",
            regex::escape(between),
            regex::escape(and)
        );
        Self {
            between: between.to_string(),
            and: and.to_string(),
            pattern: Regex::new(&pattern).expect("escaped words form a valid pattern"),
        }
    }

    /// "mellem ... og ..."
    pub fn danish() -> Self {
        Self::new("mellem", "og")
    }

    /// "between ... and ..."
    pub fn english() -> Self {
        Self::new("between", "and")
    }

    /// The phrasing used for a board requested in `lang`.
    ///
    /// Unknown languages fall back to Danish, the API's default.
    pub fn for_language(lang: &str) -> Self {
        if lang.trim().eq_ignore_ascii_case("en") {
            Self::english()
        } else {
            Self::danish()
        }
    }

    /// The words for "between" and "and".
    pub fn words(&self) -> (&str, &str) {
        (&self.between, &self.and)
    }
}

impl PartialCancellationMatcher for BetweenPhrase {
    fn parse(&self, text: &str) -> Option<PartialCancellation> {
        let captures = self.pattern.captures(text)?;
        let from = captures.get(1)?.as_str().trim();
        let to = captures.get(2)?.as_str().trim();
        if from.is_empty() || to.is_empty() {
            return None;
        }
        Some(PartialCancellation {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

/// Destination and service-message details derived from a departure's
/// notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationUpdate {
    pub scheduled_direction: Option<String>,
    /// Where the service actually terminates. Equals the scheduled
    /// direction unless a partial cancellation cut the journey short.
    pub actual_direction: Option<String>,
    pub destination_changed: bool,
    pub cancelled_between_from: Option<String>,
    pub cancelled_between_to: Option<String>,
    pub part_cancelled: bool,
    /// Text of the first "R" note.
    pub service_message: Option<String>,
}

/// Scan a departure's notes for a service message and partial
/// cancellations.
///
/// The first "R" note provides the service message. Every matching
/// partial-cancellation note is applied in order, so the last one wins.
pub fn extract_destination_update(
    departure: &RawDeparture<'_>,
    matcher: &dyn PartialCancellationMatcher,
) -> DestinationUpdate {
    let scheduled_direction = departure.direction().map(str::to_string);
    let mut update = DestinationUpdate {
        actual_direction: scheduled_direction.clone(),
        scheduled_direction,
        destination_changed: false,
        cancelled_between_from: None,
        cancelled_between_to: None,
        part_cancelled: departure.is_part_cancelled(),
        service_message: None,
    };

    for note in departure.notes() {
        let Some(text) = note.text() else {
            continue;
        };

        if update.service_message.is_none()
            && note.note_type() == Some(SERVICE_MESSAGE_NOTE_TYPE)
        {
            update.service_message = Some(text.to_string());
        }

        if note.key() != Some(PART_CANCELLED_NOTE_KEY) {
            continue;
        }
        if let Some(cancellation) = matcher.parse(text) {
            update.actual_direction = Some(cancellation.from.clone());
            update.cancelled_between_from = Some(cancellation.from);
            update.cancelled_between_to = Some(cancellation.to);
            update.destination_changed = true;
        }
    }

    update
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn danish(text: &str) -> Option<(String, String)> {
        BetweenPhrase::danish().parse(text).map(|c| (c.from, c.to))
    }

    fn pair(from: &str, to: &str) -> Option<(String, String)> {
        Some((from.to_string(), to.to_string()))
    }

    fn update_for(departure: &Value) -> DestinationUpdate {
        let raw = RawDeparture::new(departure.as_object().unwrap());
        extract_destination_update(&raw, &BetweenPhrase::danish())
    }

    fn cancellation_note(text: &str) -> Value {
        json!({"key": PART_CANCELLED_NOTE_KEY, "type": "A", "txtN": text})
    }

    #[test]
    fn parses_danish_phrase_with_double_period() {
        assert_eq!(
            danish("Toget er annulleret mellem København H og Østerport St.. Vi beklager."),
            pair("København H", "Østerport St")
        );
    }

    #[test]
    fn parses_phrase_at_end_of_text() {
        assert_eq!(
            danish("Annulleret mellem Roskilde og Holbæk"),
            pair("Roskilde", "Holbæk")
        );
        assert_eq!(
            danish("Annulleret mellem Roskilde og Holbæk St."),
            pair("Roskilde", "Holbæk St.")
        );
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(
            danish("ANNULLERET MELLEM Køge OG Hundige. Ny tekst"),
            pair("Køge", "Hundige")
        );
    }

    #[test]
    fn first_name_is_shortest_match() {
        assert_eq!(
            danish("mellem Lyngby og Holte og Birkerød. slut"),
            pair("Lyngby", "Holte og Birkerød")
        );
    }

    #[test]
    fn single_period_without_whitespace_does_not_terminate() {
        assert_eq!(
            danish("mellem A og St.Heddinge. Mere"),
            pair("A", "St.Heddinge")
        );
    }

    #[test]
    fn names_do_not_span_lines() {
        assert_eq!(danish("mellem Kø\nge og Hundige"), None);
        assert_eq!(danish("mellem Køge og Hun\ndige"), None);
        assert_eq!(danish("mellem Køge\nog Hundige"), pair("Køge", "Hundige"));
        assert_eq!(danish("mellem Køge og Hundige\n"), pair("Køge", "Hundige"));
    }

    #[test]
    fn no_match() {
        assert_eq!(danish("Toget er forsinket"), None);
        assert_eq!(danish("mellem"), None);
        assert_eq!(danish("mellemKøge og Hundige"), None);
        assert_eq!(danish("mellem Køge og "), None);
        assert_eq!(danish(""), None);
    }

    #[test]
    fn blank_names_are_rejected() {
        assert_eq!(danish("mellem   og Hundige"), None);
    }

    #[test]
    fn custom_words_are_escaped() {
        let phrase = BetweenPhrase::new("zw.", "u.");
        assert_eq!(phrase.words(), ("zw.", "u."));
        assert!(phrase.parse("zwX Köln uX Bonn").is_none());
        let found = phrase.parse("zw. Köln u. Bonn").unwrap();
        assert_eq!((found.from.as_str(), found.to.as_str()), ("Köln", "Bonn"));
    }

    #[test]
    fn retries_later_between_word() {
        assert_eq!(
            danish("Sporarbejde mellem. Annulleret mellem Køge og Hundige"),
            pair("Køge", "Hundige")
        );
    }

    #[test]
    fn english_phrase() {
        let found = BetweenPhrase::english()
            .parse("Train cancelled between Copenhagen Central and Østerport St.. Sorry.")
            .unwrap();
        assert_eq!(found.from, "Copenhagen Central");
        assert_eq!(found.to, "Østerport St");
    }

    #[test]
    fn language_selection() {
        assert_eq!(BetweenPhrase::for_language("en").words(), ("between", "and"));
        assert_eq!(BetweenPhrase::for_language("EN").words(), ("between", "and"));
        assert_eq!(BetweenPhrase::for_language("da").words(), ("mellem", "og"));
        assert_eq!(BetweenPhrase::for_language("de").words(), ("mellem", "og"));
    }

    #[test]
    fn update_without_notes() {
        let update = update_for(&json!({"direction": "Helsingør St."}));

        assert_eq!(update.scheduled_direction.as_deref(), Some("Helsingør St."));
        assert_eq!(update.actual_direction.as_deref(), Some("Helsingør St."));
        assert!(!update.destination_changed);
        assert!(update.cancelled_between_from.is_none());
        assert!(update.cancelled_between_to.is_none());
        assert!(update.service_message.is_none());
        assert!(!update.part_cancelled);
    }

    #[test]
    fn update_from_partial_cancellation() {
        let dep = json!({
            "direction": "Helsingør St.",
            "partCancelled": true,
            "Notes": {"Note": cancellation_note(
                "Toget er annulleret mellem København H og Østerport St.. Vi beklager."
            )},
        });

        let update = update_for(&dep);

        assert_eq!(update.scheduled_direction.as_deref(), Some("Helsingør St."));
        assert_eq!(update.actual_direction.as_deref(), Some("København H"));
        assert_eq!(update.cancelled_between_from.as_deref(), Some("København H"));
        assert_eq!(update.cancelled_between_to.as_deref(), Some("Østerport St"));
        assert!(update.destination_changed);
        assert!(update.part_cancelled);
    }

    #[test]
    fn cancellation_text_under_other_key_is_ignored() {
        let dep = json!({
            "direction": "Helsingør St.",
            "Notes": {"Note": {"key": "other", "txtN": "annulleret mellem A og B"}},
        });

        let update = update_for(&dep);

        assert!(!update.destination_changed);
        assert_eq!(update.actual_direction.as_deref(), Some("Helsingør St."));
    }

    #[test]
    fn unmatched_cancellation_text_keeps_direction() {
        let dep = json!({
            "direction": "Helsingør St.",
            "Notes": {"Note": cancellation_note("Delvist aflyst")},
        });

        let update = update_for(&dep);

        assert!(!update.destination_changed);
        assert!(update.cancelled_between_from.is_none());
        assert_eq!(update.actual_direction.as_deref(), Some("Helsingør St."));
    }

    #[test]
    fn first_service_message_wins() {
        let dep = json!({
            "Notes": {"Note": [
                {"type": "A", "txtN": "Not a message"},
                {"type": "R", "txtN": "  "},
                {"type": "R", "value": "First message"},
                {"type": "R", "text": "Second message"},
            ]},
        });

        let update = update_for(&dep);

        assert_eq!(update.service_message.as_deref(), Some("First message"));
    }

    #[test]
    fn last_partial_cancellation_wins() {
        let dep = json!({
            "direction": "Helsingør St.",
            "Notes": {"Note": [
                cancellation_note("annulleret mellem Nivå og Helsingør St.. x"),
                cancellation_note("annulleret mellem Hellerup og Helsingør St.. x"),
                cancellation_note("uden stationer"),
            ]},
        });

        let update = update_for(&dep);

        assert_eq!(update.actual_direction.as_deref(), Some("Hellerup"));
        assert_eq!(update.cancelled_between_from.as_deref(), Some("Hellerup"));
        assert_eq!(update.cancelled_between_to.as_deref(), Some("Helsingør St"));
    }

    #[test]
    fn cancellation_note_can_also_be_service_message() {
        let dep = json!({
            "Notes": {"Note": {
                "key": PART_CANCELLED_NOTE_KEY,
                "type": "R",
                "txtN": "annulleret mellem Køge og Hundige. Vi beklager",
            }},
        });

        let update = update_for(&dep);

        assert_eq!(
            update.service_message.as_deref(),
            Some("annulleret mellem Køge og Hundige. Vi beklager")
        );
        assert_eq!(update.actual_direction.as_deref(), Some("Køge"));
    }
}
