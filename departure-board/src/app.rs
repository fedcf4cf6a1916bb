//! The fetch, transform and publish cycle behind each binary.

use serde_json::Value;
use tracing::{debug, error};

use crate::board::{CategoryFilter, Classifier, ResultEnvelope};
use crate::cli::{BoardArgs, CliError, Exit, LocateArgs};
use crate::config::Settings;
use crate::locations::{LocationMatches, normalize_locations};
use crate::mqtt::{MqttConfig, publish_envelope};
use crate::rejseplanen::{RejseplanenClient, RejseplanenConfig, RejseplanenError, check_upstream};

/// What a departure-board run prints.
#[derive(Debug)]
pub enum BoardOutput {
    /// The upstream payload, after category filtering
    Raw(Value),
    /// The compact envelope, successful or not
    Envelope(ResultEnvelope),
    /// A raw-mode failure
    Failed(String),
}

impl BoardOutput {
    pub fn exit(&self) -> Exit {
        match self {
            BoardOutput::Raw(_) => Exit::Success,
            BoardOutput::Envelope(envelope) if envelope.is_ok() => Exit::Success,
            BoardOutput::Envelope(_) | BoardOutput::Failed(_) => Exit::Failure,
        }
    }

    /// Write the output: payloads and envelopes to stdout, failures to stderr.
    pub fn print(&self) {
        match self {
            BoardOutput::Raw(payload) => println!("{}", pretty(payload)),
            BoardOutput::Envelope(envelope) => println!("{}", pretty(envelope)),
            BoardOutput::Failed(message) => eprintln!("{message}"),
        }
    }
}

/// How fetched data is turned into output.
pub struct Transform {
    pub filter: Option<CategoryFilter>,
    /// `None` keeps the raw payload
    pub classifier: Option<Classifier>,
}

impl Transform {
    pub fn from_args(args: &BoardArgs) -> Self {
        Self {
            filter: args.category_filter(),
            classifier: args.compact_data.then(|| args.classifier()),
        }
    }

    /// Build the output for a fetch result.
    ///
    /// Never fails: errors become a failure envelope in compact mode and a
    /// message in raw mode.
    pub fn apply(&self, fetched: Result<Value, RejseplanenError>) -> BoardOutput {
        let checked = fetched.and_then(|payload| check_upstream(&payload).map(|()| payload));
        let mut payload = match checked {
            Ok(payload) => payload,
            Err(e) => {
                debug!(error = %e, "fetch failed");
                return match self.classifier {
                    Some(_) => BoardOutput::Envelope(ResultEnvelope::failure(e.to_string())),
                    None => BoardOutput::Failed(e.to_string()),
                };
            }
        };

        if let Some(filter) = &self.filter {
            let codes: Vec<&str> = filter.codes().collect();
            let (before, after) = filter.retain(&mut payload);
            debug!(?codes, before, after, "filtered departures by category");
        }

        match &self.classifier {
            Some(classifier) => {
                let items = classifier.compact(&payload);
                debug!(
                    rows = items.len(),
                    extended = classifier.is_extended(),
                    "classified departures"
                );
                BoardOutput::Envelope(ResultEnvelope::success(items))
            }
            None => BoardOutput::Raw(payload),
        }
    }
}

/// Run `departure-board`: fetch, print, and optionally publish.
pub async fn run_board(args: BoardArgs, settings: Settings) -> Exit {
    if let Err(e) = args.validate() {
        eprintln!("{e}");
        return Exit::Usage;
    }
    let Some(access_id) = settings.access_id(args.access_id.as_deref()) else {
        eprintln!("{}", CliError::MissingAccessId);
        return Exit::Usage;
    };

    run_board_with(&args, &settings, RejseplanenConfig::new(access_id)).await
}

/// The part of [`run_board`] after the arguments are checked, against the
/// API described by `client_config`.
pub async fn run_board_with(
    args: &BoardArgs,
    settings: &Settings,
    client_config: RejseplanenConfig,
) -> Exit {
    let fetched = match RejseplanenClient::new(client_config) {
        Ok(client) => client.departure_board(&args.query()).await,
        Err(e) => Err(e),
    };

    let output = Transform::from_args(args).apply(fetched);
    output.print();
    let mut exit = output.exit();

    if args.mqtt_on
        && let BoardOutput::Envelope(envelope) = &output
    {
        let published = match MqttConfig::from_settings(settings) {
            Ok(config) => publish_envelope(&config, envelope).await,
            Err(e) => Err(e),
        };
        if let Err(e) = published {
            error!(error = %e, "MQTT publish failed");
            exit = Exit::Failure;
        }
    }

    exit
}

/// Run `find-location`: look up a name and print the candidates.
pub async fn run_locate(args: LocateArgs, settings: Settings) -> Exit {
    let Some(access_id) = settings.access_id(args.access_id.as_deref()) else {
        eprintln!("{}", CliError::MissingAccessId);
        return Exit::Usage;
    };

    run_locate_with(&args, RejseplanenConfig::new(access_id)).await
}

/// The part of [`run_locate`] after the access id is resolved.
pub async fn run_locate_with(args: &LocateArgs, client_config: RejseplanenConfig) -> Exit {
    let fetched = match RejseplanenClient::new(client_config) {
        Ok(client) => client.location_name(&args.query()).await,
        Err(e) => Err(e),
    };

    match locate_output(&args.name, args.raw, fetched) {
        Ok(output) => {
            println!("{}", pretty(&output));
            Exit::Success
        }
        Err(message) => {
            eprintln!("{message}");
            Exit::Failure
        }
    }
}

/// The document `find-location` prints, or the error message.
///
/// Raw mode prints whatever the API sent, including in-body errors.
fn locate_output(
    name: &str,
    raw: bool,
    fetched: Result<Value, RejseplanenError>,
) -> Result<Value, String> {
    let payload = fetched.map_err(|e| e.to_string())?;
    if raw {
        return Ok(payload);
    }
    check_upstream(&payload).map_err(|e| e.to_string())?;

    let matches = LocationMatches {
        query: name.to_string(),
        matches: normalize_locations(&payload),
    };
    debug!(count = matches.matches.len(), "normalized locations");
    serde_json::to_value(&matches).map_err(|e| e.to_string())
}

fn pretty<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}
