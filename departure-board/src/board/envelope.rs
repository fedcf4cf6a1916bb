//! The result envelope published to dashboards.

use chrono::{Local, SecondsFormat};
use serde::{Deserialize, Serialize};

use super::classify::CompactDeparture;

/// Value of `count` and `items` when the run failed, so that "no data
/// because of an error" is distinguishable from "no departures".
pub const ERROR_SENTINEL: i64 = -1;

/// The `items` of an envelope: the departures, or the error sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvelopeItems {
    Departures(Vec<CompactDeparture>),
    Unavailable(i64),
}

/// Wrapper around a run's result.
///
/// Exactly one of these holds: `ok` is true, `error` is `None` and `count`
/// is the number of items; or `ok` is false, `error` is set and `count` and
/// `items` are [`ERROR_SENTINEL`]. The constructors are the only way to
/// build one, and decoding rejects input that breaks the invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireEnvelope")]
pub struct ResultEnvelope {
    count: i64,
    items: EnvelopeItems,
    updated: String,
    ok: bool,
    error: Option<String>,
}

impl ResultEnvelope {
    /// A successful result. `items` may be empty.
    pub fn success(items: Vec<CompactDeparture>) -> Self {
        Self {
            count: items.len() as i64,
            items: EnvelopeItems::Departures(items),
            updated: timestamp(),
            ok: true,
            error: None,
        }
    }

    /// A failed result carrying `message`.
    pub fn failure(message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = "unknown error".to_string();
        }
        Self {
            count: ERROR_SENTINEL,
            items: EnvelopeItems::Unavailable(ERROR_SENTINEL),
            updated: timestamp(),
            ok: false,
            error: Some(message),
        }
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    /// The departures, or `None` for a failed result.
    pub fn items(&self) -> Option<&[CompactDeparture]> {
        match &self.items {
            EnvelopeItems::Departures(items) => Some(items),
            EnvelopeItems::Unavailable(_) => None,
        }
    }

    /// When the envelope was built: RFC 3339 local time with offset, to the
    /// second.
    pub fn updated(&self) -> &str {
        &self.updated
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Why a decoded envelope was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvelopeError {
    #[error("envelope is ok but carries an error")]
    OkWithError,

    #[error("envelope is not ok but carries no error")]
    FailedWithoutError,

    #[error("envelope count {count} disagrees with ok = {ok}")]
    CountDisagreesWithOk { count: i64, ok: bool },

    #[error("envelope count {count} does not match its {items} items")]
    CountMismatch { count: i64, items: usize },

    #[error("envelope items disagree with ok = {ok}")]
    ItemsDisagreeWithOk { ok: bool },
}

/// The envelope as decoded, before its invariant is checked.
#[derive(Deserialize)]
struct WireEnvelope {
    count: i64,
    items: EnvelopeItems,
    updated: String,
    ok: bool,
    error: Option<String>,
}

impl TryFrom<WireEnvelope> for ResultEnvelope {
    type Error = EnvelopeError;

    fn try_from(wire: WireEnvelope) -> Result<Self, Self::Error> {
        match (wire.ok, &wire.error) {
            (true, Some(_)) => return Err(EnvelopeError::OkWithError),
            (false, None) => return Err(EnvelopeError::FailedWithoutError),
            _ => {}
        }
        if wire.ok != (wire.count >= 0) {
            return Err(EnvelopeError::CountDisagreesWithOk {
                count: wire.count,
                ok: wire.ok,
            });
        }
        match (&wire.items, wire.ok) {
            (EnvelopeItems::Departures(items), true) if items.len() as i64 != wire.count => {
                return Err(EnvelopeError::CountMismatch {
                    count: wire.count,
                    items: items.len(),
                });
            }
            (EnvelopeItems::Departures(_), true) => {}
            (EnvelopeItems::Unavailable(sentinel), false) if *sentinel < 0 => {}
            (_, ok) => return Err(EnvelopeError::ItemsDisagreeWithOk { ok }),
        }

        Ok(Self {
            count: wire.count,
            items: wire.items,
            updated: wire.updated,
            ok: wire.ok,
            error: wire.error,
        })
    }
}

fn timestamp() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}
