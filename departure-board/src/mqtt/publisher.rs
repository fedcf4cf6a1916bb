//! One-shot MQTT publish.

use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS, Transport};
use tracing::{debug, info};

use crate::board::ResultEnvelope;
use crate::config::mask_secret;

use super::config::MqttConfig;
use super::error::PublishError;

/// Capacity of the client's request channel. A run only sends a publish and
/// a disconnect.
const REQUEST_CAPACITY: usize = 10;

const KEEP_ALIVE: Duration = Duration::from_secs(30);

/// Serialize the envelope as compact JSON and publish it.
pub async fn publish_envelope(
    config: &MqttConfig,
    envelope: &ResultEnvelope,
) -> Result<(), PublishError> {
    let payload = serde_json::to_vec(envelope)?;
    publish(config, payload).await
}

/// Connect, publish `payload` once, wait for delivery and disconnect.
///
/// Delivery means the packet was written for QoS 0, `PUBACK` for QoS 1 and
/// `PUBCOMP` for QoS 2. The whole exchange is bounded by
/// [`MqttConfig::timeout_secs`].
pub async fn publish(config: &MqttConfig, payload: Vec<u8>) -> Result<(), PublishError> {
    debug!(
        host = %config.host,
        port = config.port,
        topic = %config.topic,
        qos = ?config.qos,
        retain = config.retain,
        tls = config.tls,
        bytes = payload.len(),
        "publishing to MQTT"
    );

    let mut options = MqttOptions::new(&config.client_id, &config.host, config.port);
    options.set_keep_alive(KEEP_ALIVE);
    options.set_clean_session(true);
    if let Some((username, password)) = &config.credentials {
        debug!(%username, password = %mask_secret(password), "using MQTT credentials");
        options.set_credentials(username, password);
    }
    if config.tls {
        options.set_transport(Transport::tls_with_default_config());
    }

    let (client, mut eventloop) = AsyncClient::new(options, REQUEST_CAPACITY);
    client
        .publish(&config.topic, config.qos, config.retain, payload)
        .await?;

    let deadline = Duration::from_secs(config.timeout_secs);
    tokio::time::timeout(deadline, deliver(&client, &mut eventloop, config.qos))
        .await
        .map_err(|_| PublishError::Timeout(config.timeout_secs))??;

    info!(topic = %config.topic, "published to MQTT");
    Ok(())
}

/// Drive the event loop until the publish is delivered, then disconnect.
async fn deliver(
    client: &AsyncClient,
    eventloop: &mut EventLoop,
    qos: QoS,
) -> Result<(), PublishError> {
    loop {
        let event = eventloop.poll().await?;
        debug!(?event, "MQTT event");
        if is_delivered(&event, qos) {
            break;
        }
    }

    client.disconnect().await?;

    // Flush the disconnect. The broker may close the socket first.
    loop {
        match eventloop.poll().await {
            Ok(Event::Outgoing(Outgoing::Disconnect)) => return Ok(()),
            Ok(_) => {}
            Err(e) => {
                debug!(error = %e, "connection closed after disconnect");
                return Ok(());
            }
        }
    }
}

fn is_delivered(event: &Event, qos: QoS) -> bool {
    match (event, qos) {
        (Event::Outgoing(Outgoing::Publish(_)), QoS::AtMostOnce) => true,
        (Event::Incoming(Packet::PubAck(_)), QoS::AtLeastOnce) => true,
        (Event::Incoming(Packet::PubComp(_)), QoS::ExactlyOnce) => true,
        _ => false,
    }
}
