//! MQTT connection settings.

use rumqttc::QoS;

use crate::config::{Settings, parse_bool};

use super::error::PublishError;

const HOST_KEYS: &[&str] = &["MQTT_HOST", "MQTT_BROKER", "MQTT_SERVER"];
const TOPIC_KEYS: &[&str] = &["MQTT_TOPIC", "MQTT_PUB_TOPIC"];
const PORT_KEYS: &[&str] = &["MQTT_PORT"];
const CLIENT_ID_KEYS: &[&str] = &["MQTT_CLIENT_ID"];
const USERNAME_KEYS: &[&str] = &["MQTT_USERNAME", "MQTT_USER"];
const PASSWORD_KEYS: &[&str] = &["MQTT_PASSWORD", "MQTT_PASS"];
const QOS_KEYS: &[&str] = &["MQTT_QOS"];
const RETAIN_KEYS: &[&str] = &["MQTT_RETAIN"];
const TLS_KEYS: &[&str] = &["MQTT_TLS"];

/// Default broker port.
const DEFAULT_PORT: u16 = 1883;

/// Default deadline for connecting and getting the publish acknowledged.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for a single MQTT publish.
#[derive(Debug, Clone, PartialEq)]
pub struct MqttConfig {
    pub host: String,
    pub port: u16,
    pub topic: String,
    pub client_id: String,
    /// Username and password
    pub credentials: Option<(String, String)>,
    pub qos: QoS,
    pub retain: bool,
    /// Connect over TLS using the platform's root certificates
    pub tls: bool,
    /// Deadline for the whole publish, in seconds
    pub timeout_secs: u64,
}

impl MqttConfig {
    /// Create a config with defaults: port 1883, QoS 0, retained, no TLS.
    pub fn new(host: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            topic: topic.into(),
            client_id: default_client_id(),
            credentials: None,
            qos: QoS::AtMostOnce,
            retain: true,
            tls: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Resolve the config from the environment and env files.
    pub fn from_settings(settings: &Settings) -> Result<Self, PublishError> {
        let host = settings.get(HOST_KEYS).ok_or(PublishError::MissingHost)?;
        let topic = settings.get(TOPIC_KEYS).ok_or(PublishError::MissingTopic)?;
        let mut config = Self::new(host, topic);

        if let Some(port) = settings.get(PORT_KEYS) {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| PublishError::InvalidPort(port.to_string()))?;
        }
        if let Some(qos) = settings.get(QOS_KEYS) {
            config.qos = parse_qos(qos)?;
        }
        if let Some(client_id) = settings.get(CLIENT_ID_KEYS) {
            config.client_id = client_id.to_string();
        }
        if let Some(username) = settings.get(USERNAME_KEYS) {
            let password = settings.get(PASSWORD_KEYS).unwrap_or_default();
            config.credentials = Some((username.to_string(), password.to_string()));
        }
        config.retain = parse_bool(settings.get(RETAIN_KEYS), true);
        config.tls = parse_bool(settings.get(TLS_KEYS), false);

        Ok(config)
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_qos(mut self, qos: QoS) -> Self {
        self.qos = qos;
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client ids must be non-empty, so generate one per process.
fn default_client_id() -> String {
    format!("departure-board-{}", std::process::id())
}

fn parse_qos(value: &str) -> Result<QoS, PublishError> {
    match value.trim() {
        "0" => Ok(QoS::AtMostOnce),
        "1" => Ok(QoS::AtLeastOnce),
        "2" => Ok(QoS::ExactlyOnce),
        _ => Err(PublishError::InvalidQos(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let file = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::new(HashMap::new(), file)
    }

    #[test]
    fn defaults() {
        let config = MqttConfig::from_settings(&settings(&[
            ("MQTT_HOST", "broker.local"),
            ("MQTT_TOPIC", "home/trains"),
        ]))
        .unwrap();

        assert_eq!(config.host, "broker.local");
        assert_eq!(config.topic, "home/trains");
        assert_eq!(config.port, 1883);
        assert_eq!(config.qos, QoS::AtMostOnce);
        assert!(config.retain);
        assert!(!config.tls);
        assert!(config.credentials.is_none());
        assert!(config.client_id.starts_with("departure-board-"));
    }

    #[test]
    fn all_settings() {
        let config = MqttConfig::from_settings(&settings(&[
            ("MQTT_BROKER", "broker.local"),
            ("MQTT_PUB_TOPIC", "home/trains"),
            ("MQTT_PORT", "8883"),
            ("MQTT_QOS", "1"),
            ("MQTT_CLIENT_ID", "dashboard"),
            ("MQTT_USER", "ha"),
            ("MQTT_PASS", "secret"),
            ("MQTT_RETAIN", "false"),
            ("MQTT_TLS", "yes"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8883);
        assert_eq!(config.qos, QoS::AtLeastOnce);
        assert_eq!(config.client_id, "dashboard");
        assert_eq!(
            config.credentials,
            Some(("ha".to_string(), "secret".to_string()))
        );
        assert!(!config.retain);
        assert!(config.tls);
    }

    #[test]
    fn username_without_password() {
        let config = MqttConfig::from_settings(&settings(&[
            ("MQTT_HOST", "h"),
            ("MQTT_TOPIC", "t"),
            ("MQTT_USERNAME", "ha"),
        ]))
        .unwrap();
        assert_eq!(config.credentials, Some(("ha".to_string(), String::new())));
    }

    #[test]
    fn missing_host_or_topic() {
        let err = MqttConfig::from_settings(&settings(&[("MQTT_TOPIC", "t")])).unwrap_err();
        assert!(matches!(err, PublishError::MissingHost));

        let err = MqttConfig::from_settings(&settings(&[("MQTT_HOST", "h")])).unwrap_err();
        assert!(matches!(err, PublishError::MissingTopic));
    }

    #[test]
    fn invalid_numbers() {
        let err = MqttConfig::from_settings(&settings(&[
            ("MQTT_HOST", "h"),
            ("MQTT_TOPIC", "t"),
            ("MQTT_PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(matches!(err, PublishError::InvalidPort(ref v) if v == "not-a-port"));

        let err = MqttConfig::from_settings(&settings(&[
            ("MQTT_HOST", "h"),
            ("MQTT_TOPIC", "t"),
            ("MQTT_QOS", "3"),
        ]))
        .unwrap_err();
        assert!(matches!(err, PublishError::InvalidQos(ref v) if v == "3"));
    }

    #[test]
    fn builder() {
        let config = MqttConfig::new("h", "t")
            .with_port(1884)
            .with_qos(QoS::ExactlyOnce)
            .with_credentials("u", "p")
            .with_timeout(3);

        assert_eq!(config.port, 1884);
        assert_eq!(config.qos, QoS::ExactlyOnce);
        assert_eq!(config.credentials, Some(("u".to_string(), "p".to_string())));
        assert_eq!(config.timeout_secs, 3);
    }
}
