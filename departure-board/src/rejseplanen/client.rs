//! Rejseplanen HTTP client.

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::debug;

use crate::config::mask_secret;

use super::error::RejseplanenError;
use super::query::{BoardQuery, LocationQuery};

/// Default base URL for the Rejseplanen API.
const DEFAULT_BASE_URL: &str = "https://www.rejseplanen.dk/api";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the Rejseplanen client.
#[derive(Debug, Clone)]
pub struct RejseplanenConfig {
    /// API access id, sent as the `accessId` query parameter
    pub access_id: String,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl RejseplanenConfig {
    /// Create a new config with the given access id.
    pub fn new(access_id: impl Into<String>) -> Self {
        Self {
            access_id: access_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Rejseplanen API client.
#[derive(Debug, Clone)]
pub struct RejseplanenClient {
    http: reqwest::Client,
    base_url: String,
    access_id: String,
}

impl RejseplanenClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RejseplanenConfig) -> Result<Self, RejseplanenError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_id: config.access_id,
        })
    }

    /// Fetch the departure board for a stop.
    ///
    /// Returns the decoded body as-is. An in-body `errorCode` is not treated
    /// as an error here; use [`check_upstream`](super::check_upstream).
    pub async fn departure_board(&self, query: &BoardQuery) -> Result<Value, RejseplanenError> {
        self.get("departureBoard", query.params()).await
    }

    /// Look up stops by name.
    pub async fn location_name(&self, query: &LocationQuery) -> Result<Value, RejseplanenError> {
        self.get("location.name", query.params()).await
    }

    async fn get(
        &self,
        endpoint: &str,
        params: Vec<(&'static str, String)>,
    ) -> Result<Value, RejseplanenError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        debug!(
            "GET {}",
            describe_request(&url, &mask_secret(&self.access_id), &params)
        );

        let mut query = Vec::with_capacity(params.len() + 1);
        query.push(("accessId", self.access_id.clone()));
        query.extend(params);

        let response = self.http.get(&url).query(&query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RejseplanenError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                body: Some(body).filter(|body| !body.trim().is_empty()),
            });
        }

        let body = response.text().await?;

        let payload: Value = serde_json::from_str(&body).map_err(|e| RejseplanenError::Json {
            message: e.to_string(),
        })?;

        if let Some(object) = payload.as_object() {
            let keys: Vec<&str> = object.keys().map(String::as_str).collect();
            debug!(?keys, "response top-level keys");
        }

        Ok(payload)
    }
}

/// The full request URL with the access id replaced, for logging.
fn describe_request(
    url: &str,
    masked_access_id: &str,
    params: &[(&'static str, String)],
) -> String {
    let mut query = vec![("accessId", masked_access_id)];
    query.extend(params.iter().map(|(key, value)| (*key, value.as_str())));

    reqwest::Url::parse_with_params(url, &query)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| url.to_string())
}
