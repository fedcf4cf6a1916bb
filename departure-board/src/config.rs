//! Configuration lookup.
//!
//! Settings are resolved from, in order: explicit CLI flags, the process
//! environment, then `KEY=value` env files in the working directory.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

/// Env files read from the working directory. Later files override
/// earlier ones.
pub const ENV_FILES: [&str; 2] = ["$env", ".env"];

/// Environment key holding the Rejseplanen access id.
pub const ACCESS_ID_KEY: &str = "REJSEPLANEN_ACCESS_ID";

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Flag,
    Environment,
    EnvFile,
}

/// Process environment plus env-file values.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    process: HashMap<String, String>,
    file: HashMap<String, String>,
}

impl Settings {
    pub fn new(process: HashMap<String, String>, file: HashMap<String, String>) -> Self {
        Self { process, file }
    }

    /// Snapshot the process environment and read [`ENV_FILES`].
    pub fn load() -> Self {
        let process = std::env::vars().collect();
        let file = load_env_files(ENV_FILES.into_iter().map(Path::new));
        Self { process, file }
    }

    /// The first non-empty value for any of `keys`.
    ///
    /// Every key is tried against the process environment before any key
    /// is tried against the env files, so an alias set in the environment
    /// beats the primary key set in a file.
    pub fn lookup(&self, keys: &[&str]) -> Option<(&str, Source)> {
        first_value(&self.process, keys)
            .map(|value| (value, Source::Environment))
            .or_else(|| first_value(&self.file, keys).map(|value| (value, Source::EnvFile)))
    }

    /// Like [`lookup`](Self::lookup), without the source.
    pub fn get(&self, keys: &[&str]) -> Option<&str> {
        self.lookup(keys).map(|(value, _)| value)
    }

    /// Resolve the access id from a flag, the environment, or env files.
    pub fn access_id(&self, flag: Option<&str>) -> Option<String> {
        let (value, source) = match flag.filter(|value| !value.is_empty()) {
            Some(value) => (value, Source::Flag),
            None => self.lookup(&[ACCESS_ID_KEY])?,
        };
        debug!(?source, access_id = %mask_secret(value), "resolved access id");
        Some(value.to_string())
    }
}

fn first_value<'m>(map: &'m HashMap<String, String>, keys: &[&str]) -> Option<&'m str> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .map(String::as_str)
        .find(|value| !value.is_empty())
}

/// Read `KEY=value` pairs from the given files, skipping missing files,
/// unparseable lines and empty values.
pub fn load_env_files<'a>(paths: impl IntoIterator<Item = &'a Path>) -> HashMap<String, String> {
    let mut values = HashMap::new();

    for path in paths {
        if !path.exists() {
            continue;
        }
        let entries = match dotenvy::from_path_iter(path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read env file");
                continue;
            }
        };

        let mut loaded = 0;
        for entry in entries {
            match entry {
                Ok((key, value)) if !value.is_empty() => {
                    values.insert(key, value);
                    loaded += 1;
                }
                Ok(_) => {}
                Err(e) => debug!(path = %path.display(), error = %e, "skipping env file line"),
            }
        }
        debug!(path = %path.display(), loaded, "loaded env file");
    }

    values
}

/// Parse a boolean-ish setting such as `MQTT_TLS=yes`.
pub fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value {
        Some(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "y" | "on"
        ),
        None => default,
    }
}

/// Mask a secret for logging: short values are fully starred, longer ones
/// keep their first and last four characters.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
