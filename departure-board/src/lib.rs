//! Rejseplanen departure board for dashboards.
//!
//! Fetches a stop's departure board, normalizes it into compact records
//! with an on-time / delayed / cancelled status, and optionally publishes
//! the result to MQTT.

pub mod app;
pub mod board;
pub mod cli;
pub mod config;
pub mod locations;
pub mod mqtt;
pub mod rejseplanen;
