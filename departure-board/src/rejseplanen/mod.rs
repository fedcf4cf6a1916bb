//! Rejseplanen REST API client.
//!
//! Rejseplanen is the Danish journey planner. Two endpoints are used:
//! - `departureBoard`: upcoming departures at a stop
//! - `location.name`: stop lookup by free-text name
//!
//! Responses are returned as loosely-typed JSON; see [`crate::board`] for
//! the defensive reading of departure boards.
//!
//! Failures come in two kinds: transport failures (network, timeout,
//! non-2xx status, undecodable body) and in-body errors, where the API
//! answers 200 with an `errorCode`. The client reports the first kind;
//! [`check_upstream`] detects the second so callers can still inspect the
//! raw body first.

mod client;
mod error;
#[cfg(test)]
pub(crate) mod mock;
mod query;

pub use client::{RejseplanenClient, RejseplanenConfig};
pub use error::{RejseplanenError, check_upstream};
pub use query::{BoardQuery, BoardType, LocationQuery, LocationType};
