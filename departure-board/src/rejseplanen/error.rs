//! Rejseplanen client error types.

use serde_json::Value;

/// Errors from fetching Rejseplanen data.
#[derive(Debug, thiserror::Error)]
pub enum RejseplanenError {
    /// The request hit the client timeout
    #[error("Request timed out.")]
    Timeout,

    /// Connection-level failure
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Non-2xx response. `body` is pretty-printed when it is JSON.
    #[error("HTTP error: {status} {reason}{}", body_suffix(.body))]
    Status {
        status: u16,
        reason: String,
        body: Option<String>,
    },

    /// The response body was not JSON
    #[error("Failed to decode API response as JSON: {message}")]
    Json { message: String },

    /// The API answered with an `errorCode` in the body
    #[error("API error {code}: {text}")]
    Upstream { code: String, text: String },
}

impl From<reqwest::Error> for RejseplanenError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RejseplanenError::Timeout
        } else {
            RejseplanenError::Network(err)
        }
    }
}

fn body_suffix(body: &Option<String>) -> String {
    let Some(body) = body.as_deref().map(str::trim).filter(|body| !body.is_empty()) else {
        return String::new();
    };
    let pretty = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok());
    format!("\n{}", pretty.as_deref().unwrap_or(body))
}

/// Detect an in-body API error.
///
/// The API reports request errors (bad access id, unknown stop, ...) as a
/// 200 response with `errorCode` and `errorText` fields. An `errorCode`
/// that is null, false, zero, or an empty string, array or object does not
/// count.
pub fn check_upstream(payload: &Value) -> Result<(), RejseplanenError> {
    let code = match payload.get("errorCode") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => return Ok(()),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => return Ok(()),
        Some(Value::String(code)) if code.is_empty() => return Ok(()),
        Some(Value::Array(items)) if items.is_empty() => return Ok(()),
        Some(Value::Object(fields)) if fields.is_empty() => return Ok(()),
        Some(Value::String(code)) => code.clone(),
        Some(other) => other.to_string(),
    };
    let text = payload
        .get("errorText")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Err(RejseplanenError::Upstream { code, text })
}
