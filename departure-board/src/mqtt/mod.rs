//! MQTT publishing of result envelopes.
//!
//! Each run publishes at most one message: the JSON envelope, retained by
//! default so dashboards subscribing later still see the latest board.

mod config;
mod error;
mod publisher;

pub use config::MqttConfig;
pub use error::PublishError;
pub use publisher::{publish, publish_envelope};
