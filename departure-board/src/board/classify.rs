//! Departure status classification and compaction.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce::departures;
use super::notes::{DestinationUpdate, PartialCancellationMatcher, extract_destination_update};
use super::raw::RawDeparture;
use super::time::parse_departure_datetime;

/// Departure status shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    OnTime,
    Delayed,
    Cancelled,
}

impl Status {
    /// Derive the status of a departure.
    ///
    /// A cancelled departure is always `Cancelled`. Otherwise it is
    /// `Delayed` only when both the planned and the real-time moments parse
    /// and the real-time one is strictly later.
    pub fn of(departure: &RawDeparture<'_>) -> Self {
        if departure.is_cancelled() {
            return Status::Cancelled;
        }

        let planned = parse_departure_datetime(departure.planned_date(), departure.planned_time());
        let actual = parse_departure_datetime(departure.actual_date(), departure.actual_time());

        match (planned, actual) {
            (Some(planned), Some(actual)) if actual > planned => Status::Delayed,
            _ => Status::OnTime,
        }
    }
}

/// A departure in the compact dashboard shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactDeparture {
    pub train_id: Option<String>,
    pub direction: Option<String>,
    /// Name of the stop the service departs from.
    pub departs: Option<String>,
    pub planned_date: Option<String>,
    pub planned_time: Option<String>,
    pub actual_date: Option<String>,
    pub actual_time: Option<String>,
    pub status: Status,

    /// Only filled in by an extended classifier.
    #[serde(flatten)]
    pub destination: Option<DestinationUpdate>,
}

/// Turns raw departures into [`CompactDeparture`]s.
///
/// A basic classifier produces the core fields only. An extended one also
/// scans service notes for destination changes, using the given matcher for
/// partial-cancellation texts.
pub struct Classifier {
    matcher: Option<Box<dyn PartialCancellationMatcher>>,
}

impl Classifier {
    pub fn basic() -> Self {
        Self { matcher: None }
    }

    pub fn extended(matcher: impl PartialCancellationMatcher + 'static) -> Self {
        Self {
            matcher: Some(Box::new(matcher)),
        }
    }

    pub fn is_extended(&self) -> bool {
        self.matcher.is_some()
    }

    /// Classify one departure.
    pub fn classify(&self, departure: &RawDeparture<'_>) -> CompactDeparture {
        let owned = |value: Option<&str>| value.map(str::to_string);

        CompactDeparture {
            train_id: owned(departure.name()),
            direction: owned(departure.direction()),
            departs: owned(departure.stop()),
            planned_date: owned(departure.planned_date()),
            planned_time: owned(departure.planned_time()),
            actual_date: owned(departure.actual_date()),
            actual_time: owned(departure.actual_time()),
            status: Status::of(departure),
            destination: self
                .matcher
                .as_deref()
                .map(|matcher| extract_destination_update(departure, matcher)),
        }
    }

    /// Classify every departure of a `departureBoard` payload, in order.
    pub fn compact(&self, payload: &Value) -> Vec<CompactDeparture> {
        departures(payload)
            .into_iter()
            .map(|fields| self.classify(&RawDeparture::new(fields)))
            .collect()
    }
}
