//! Command-line arguments and process setup for the binaries.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::board::{BetweenPhrase, CategoryFilter, Classifier};
use crate::rejseplanen::{BoardQuery, BoardType, LocationQuery, LocationType};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success,
    /// Fetch, upstream or publish failure
    Failure,
    /// Configuration error, nothing was fetched
    Usage,
}

impl Exit {
    pub fn code(self) -> u8 {
        match self {
            Exit::Success => 0,
            Exit::Failure => 1,
            Exit::Usage => 2,
        }
    }
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit.code())
    }
}

/// Configuration errors detected before any network access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CliError {
    #[error("Missing accessId. Pass --access-id, set REJSEPLANEN_ACCESS_ID, or add it in $env/.env.")]
    MissingAccessId,

    #[error("--mqtt-on requires --compact-data.")]
    MqttRequiresCompact,
}

/// Fetch a Rejseplanen departure board.
#[derive(Parser, Debug, Clone)]
#[command(name = "departure-board", version, about, long_about = None)]
pub struct BoardArgs {
    /// Stop id, e.g. 8600626 for København H
    pub stop_id: String,

    /// Rejseplanen access id (falls back to REJSEPLANEN_ACCESS_ID)
    #[arg(long)]
    pub access_id: Option<String>,

    #[arg(long, default_value_t = 20)]
    pub max_journeys: u32,

    /// Time window in minutes
    #[arg(long, default_value_t = 60)]
    pub duration: u32,

    #[arg(long = "type", value_enum, default_value_t = BoardType::Dep)]
    pub board_type: BoardType,

    /// Response language; also picks the phrasing of cancellation notes
    #[arg(long, default_value = "da")]
    pub lang: String,

    /// Keep only these product categories, e.g. "IC,RE"
    #[arg(long)]
    pub cat_out: Option<String>,

    /// Log requests and decisions to stderr
    #[arg(long)]
    pub debug: bool,

    /// Print the compact envelope instead of the raw payload
    #[arg(long)]
    pub compact_data: bool,

    /// Add destination-change fields to compact departures
    #[arg(long)]
    pub extended: bool,

    /// Also publish the envelope to MQTT
    #[arg(long)]
    pub mqtt_on: bool,
}

impl BoardArgs {
    /// Check flag combinations.
    pub fn validate(&self) -> Result<(), CliError> {
        if self.mqtt_on && !self.compact_data {
            return Err(CliError::MqttRequiresCompact);
        }
        Ok(())
    }

    pub fn query(&self) -> BoardQuery {
        BoardQuery {
            board_type: self.board_type,
            duration_mins: self.duration,
            max_journeys: Some(self.max_journeys),
            lang: self.lang.clone(),
            ..BoardQuery::new(&self.stop_id)
        }
    }

    pub fn category_filter(&self) -> Option<CategoryFilter> {
        self.cat_out.as_deref().and_then(CategoryFilter::parse)
    }

    pub fn classifier(&self) -> Classifier {
        if self.extended {
            Classifier::extended(BetweenPhrase::for_language(&self.lang))
        } else {
            Classifier::basic()
        }
    }
}

/// Look up Rejseplanen stop ids by name.
#[derive(Parser, Debug, Clone)]
#[command(name = "find-location", version, about, long_about = None)]
pub struct LocateArgs {
    /// Station or place name, e.g. "København H"
    pub name: String,

    /// Rejseplanen access id (falls back to REJSEPLANEN_ACCESS_ID)
    #[arg(long)]
    pub access_id: Option<String>,

    #[arg(long, default_value_t = 10)]
    pub max_results: u32,

    #[arg(long, default_value = "da")]
    pub lang: String,

    #[arg(long = "type", value_enum, default_value_t = LocationType::Stop)]
    pub location_type: LocationType,

    #[arg(long)]
    pub debug: bool,

    /// Print the API response unchanged
    #[arg(long)]
    pub raw: bool,
}

impl LocateArgs {
    pub fn query(&self) -> LocationQuery {
        LocationQuery {
            max_results: self.max_results,
            lang: self.lang.clone(),
            location_type: self.location_type,
            ..LocationQuery::new(&self.name)
        }
    }
}

/// Install the stderr log subscriber.
///
/// `debug` turns on debug output for this crate regardless of `RUST_LOG`;
/// otherwise `RUST_LOG` applies, defaulting to warnings only.
pub fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("warn,departure_board=debug,find_location=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
