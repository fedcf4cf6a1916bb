//! MQTT publish error types.

/// Errors from configuring or performing an MQTT publish.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// No broker host configured
    #[error("Missing MQTT host. Set MQTT_HOST in $env.")]
    MissingHost,

    /// No topic configured
    #[error("Missing MQTT topic. Set MQTT_TOPIC in $env.")]
    MissingTopic,

    #[error("Invalid MQTT_PORT value: {0}")]
    InvalidPort(String),

    #[error("Invalid MQTT_QOS value: {0}")]
    InvalidQos(String),

    /// The payload could not be serialized
    #[error("failed to encode MQTT payload: {0}")]
    Encode(#[from] serde_json::Error),

    /// The request could not be queued
    #[error("MQTT client error: {0}")]
    Client(#[from] rumqttc::ClientError),

    /// Connecting to or talking to the broker failed
    #[error("MQTT connection error: {0}")]
    Connection(#[from] rumqttc::ConnectionError),

    /// The broker did not acknowledge in time
    #[error("MQTT publish timed out after {0}s")]
    Timeout(u64),
}
