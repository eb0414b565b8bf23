//! Station configuration.
//!
//! Uses `heapless::String` for bounded, copy-friendly credential and host
//! fields while remaining ergonomic on desktop. All values are fixed at
//! session setup; nothing here is runtime-negotiated.
//!
//! # Example
//!
//! ```rust
//! use sensor_bridge::config::{Config, MqttConfig, TelemetryConfig};
//!
//! // Use defaults
//! let config = Config::default();
//!
//! // Or customize
//! let config = Config::default()
//!     .with_mqtt(MqttConfig::default().with_host("broker.local").with_user("alice"))
//!     .with_telemetry(TelemetryConfig::default().with_buffer_capacity(256));
//! ```

use heapless::String as HString;

use crate::encode::DEFAULT_CAPACITY;
use crate::traits::Qos;

/// Maximum length for short config strings (hostnames, credentials).
pub const MAX_SHORT_STRING: usize = 64;

/// Maximum length for longer config strings (topic paths).
pub const MAX_LONG_STRING: usize = 128;

/// Type alias for short config strings.
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Type alias for longer config strings.
pub type LongString = HString<MAX_LONG_STRING>;

// ============================================================================
// Helper for creating heapless strings
// ============================================================================

/// Create a ShortString from a &str, truncating if too long.
pub fn short_string(s: &str) -> ShortString {
    let mut hs = ShortString::new();
    let take = s.len().min(MAX_SHORT_STRING);
    // Find valid UTF-8 boundary
    let valid_end = s
        .char_indices()
        .take_while(|(i, _)| *i < take)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let _ = hs.push_str(&s[..valid_end]);
    hs
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete station configuration.
#[derive(Clone, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Config {
    /// MQTT session configuration.
    pub mqtt: MqttConfig,
    /// Telemetry encoding configuration.
    pub telemetry: TelemetryConfig,
}

impl Config {
    /// Set MQTT configuration.
    pub fn with_mqtt(mut self, mqtt: MqttConfig) -> Self {
        self.mqtt = mqtt;
        self
    }

    /// Set telemetry configuration.
    pub fn with_telemetry(mut self, telemetry: TelemetryConfig) -> Self {
        self.telemetry = telemetry;
        self
    }
}

// ============================================================================
// MQTT Config
// ============================================================================

/// MQTT session configuration.
///
/// The `user` doubles as the topic namespace: all topics for a session live
/// under `/v1/{user}/`.
#[derive(Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct MqttConfig {
    /// Broker hostname or IP.
    pub host: ShortString,
    /// Broker port.
    pub port: u16,
    /// Client ID (unique per device).
    pub client_id: ShortString,
    /// Session user; also the topic namespace segment.
    pub user: ShortString,
    /// Session password.
    pub password: ShortString,
    /// QoS level used for publishes and subscriptions.
    pub qos: Qos,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            host: short_string("mqtt.relayr.io"),
            port: 1883,
            client_id: short_string("sensor-bridge"),
            user: ShortString::new(),
            password: ShortString::new(),
            qos: Qos::AtLeastOnce,
            keep_alive_secs: 30,
        }
    }
}

impl MqttConfig {
    /// Set the broker host.
    pub fn with_host(mut self, host: &str) -> Self {
        self.host = short_string(host);
        self
    }

    /// Set the broker port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the client ID.
    pub fn with_client_id(mut self, id: &str) -> Self {
        self.client_id = short_string(id);
        self
    }

    /// Set the session user (topic namespace).
    pub fn with_user(mut self, user: &str) -> Self {
        self.user = short_string(user);
        self
    }

    /// Set the session password.
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = short_string(password);
        self
    }

    /// Set the QoS level.
    pub fn with_qos(mut self, qos: Qos) -> Self {
        self.qos = qos;
        self
    }

    /// Set the keep-alive interval.
    pub fn with_keep_alive_secs(mut self, secs: u16) -> Self {
        self.keep_alive_secs = secs;
        self
    }

    /// Check if session credentials are configured.
    pub fn has_credentials(&self) -> bool {
        !self.user.is_empty()
    }

    /// Build the outbound data topic: `/v1/{user}/data`.
    pub fn data_topic(&self) -> LongString {
        self.topic("data")
    }

    /// Build the inbound config topic: `/v1/{user}/config`.
    pub fn config_topic(&self) -> LongString {
        self.topic("config")
    }

    /// Build the inbound command topic: `/v1/{user}/cmd`.
    pub fn cmd_topic(&self) -> LongString {
        self.topic("cmd")
    }

    /// Build a topic under the session namespace.
    ///
    /// Topics are constructed fresh per call from session credentials and
    /// never cached.
    fn topic(&self, suffix: &str) -> LongString {
        let mut topic = LongString::new();
        let _ = topic.push_str("/v1/");
        let _ = topic.push_str(self.user.as_str());
        let _ = topic.push('/');
        let _ = topic.push_str(suffix);
        topic
    }
}

// ============================================================================
// Telemetry Config
// ============================================================================

/// Telemetry encoding configuration.
#[derive(Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct TelemetryConfig {
    /// Publish buffer capacity in bytes.
    pub buffer_capacity: usize,
    /// Whether diagnostic fields (counter, RSSI) are appended to the
    /// envelope.
    pub diagnostics: bool,
    /// Publish interval in milliseconds (used by the service loop).
    pub publish_interval_ms: u32,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_CAPACITY,
            diagnostics: true,
            publish_interval_ms: 5000,
        }
    }
}

impl TelemetryConfig {
    /// Set the publish buffer capacity.
    pub fn with_buffer_capacity(mut self, bytes: usize) -> Self {
        self.buffer_capacity = bytes;
        self
    }

    /// Enable or disable diagnostic fields.
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    /// Set the publish interval.
    pub fn with_publish_interval_ms(mut self, ms: u32) -> Self {
        self.publish_interval_ms = ms;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.mqtt.host.as_str(), "mqtt.relayr.io");
        assert_eq!(config.mqtt.port, 1883);
        assert_eq!(config.mqtt.qos, Qos::AtLeastOnce);
        assert_eq!(config.telemetry.buffer_capacity, 512);
        assert!(config.telemetry.diagnostics);
    }

    #[test]
    fn topic_building() {
        let mqtt = MqttConfig::default().with_user("alice");
        assert_eq!(mqtt.data_topic().as_str(), "/v1/alice/data");
        assert_eq!(mqtt.config_topic().as_str(), "/v1/alice/config");
        assert_eq!(mqtt.cmd_topic().as_str(), "/v1/alice/cmd");
    }

    #[test]
    fn credential_detection() {
        let no_creds = MqttConfig::default();
        assert!(!no_creds.has_credentials());

        let with_creds = MqttConfig::default().with_user("alice").with_password("s3cret");
        assert!(with_creds.has_credentials());
    }

    #[test]
    fn builder_pattern() {
        let config = Config::default()
            .with_mqtt(
                MqttConfig::default()
                    .with_host("broker.local")
                    .with_port(8883)
                    .with_client_id("node-7")
                    .with_user("alice")
                    .with_qos(Qos::ExactlyOnce)
                    .with_keep_alive_secs(60),
            )
            .with_telemetry(
                TelemetryConfig::default()
                    .with_buffer_capacity(256)
                    .with_diagnostics(false)
                    .with_publish_interval_ms(1000),
            );

        assert_eq!(config.mqtt.host.as_str(), "broker.local");
        assert_eq!(config.mqtt.port, 8883);
        assert_eq!(config.mqtt.client_id.as_str(), "node-7");
        assert_eq!(config.mqtt.qos, Qos::ExactlyOnce);
        assert_eq!(config.mqtt.keep_alive_secs, 60);
        assert_eq!(config.telemetry.buffer_capacity, 256);
        assert!(!config.telemetry.diagnostics);
        assert_eq!(config.telemetry.publish_interval_ms, 1000);
    }

    #[test]
    fn short_string_truncation() {
        let long_input = "a".repeat(100);
        let s = short_string(&long_input);
        assert!(s.len() <= MAX_SHORT_STRING);
    }

    #[test]
    fn short_string_utf8_boundary() {
        let input = "°C".repeat(40);
        let s = short_string(&input);
        assert!(s.len() <= MAX_SHORT_STRING);
        assert!(core::str::from_utf8(s.as_bytes()).is_ok());
    }
}
