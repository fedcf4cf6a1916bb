//! Departure normalization and classification.
//!
//! Rejseplanen payloads are loosely shaped: fields come and go, a list with
//! one element is sent as a bare object, and values are sometimes the wrong
//! type. Everything in this module reads them defensively and degrades to
//! absent values instead of failing.

mod classify;
mod coerce;
mod envelope;
mod filter;
mod notes;
mod raw;
mod time;

pub use classify::{Classifier, CompactDeparture, Status};
pub use coerce::{departures, objects, one_or_many};
pub use envelope::{ERROR_SENTINEL, EnvelopeError, EnvelopeItems, ResultEnvelope};
pub use filter::CategoryFilter;
pub use notes::{
    BetweenPhrase, DestinationUpdate, PART_CANCELLED_NOTE_KEY, PartialCancellation,
    PartialCancellationMatcher, extract_destination_update,
};
pub use raw::{RawDeparture, RawNote, truthy};
pub use time::parse_departure_datetime;
