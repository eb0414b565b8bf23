//! MQTT station runtime for the telemetry bridge.
//!
//! Connects to the broker, subscribes to the inbound topics, and drives both
//! halves of the protocol layer:
//!
//! **Subscribe Topics:**
//! - `/v1/{user}/config` - Configuration updates `{"name":"interval","value":30}`
//! - `/v1/{user}/cmd` - Commands `{"name":"relay","value":true}`
//!
//! **Publish Topics:**
//! - `/v1/{user}/data` - Telemetry envelope (on the configured interval)
//!
//! The caller supplies a sampling closure that produces one
//! [`BoundedReading`] per schema slot each cycle; it also receives the
//! diagnostic state so device code can feed in the latest RSSI.
//!
//! ```ignore
//! let mut station = MqttStation::new(MqttRuntimeConfig::from_config(&config));
//! station.on_command(|name, value| apply_command(name, value));
//! station.on_config(|name, value| apply_config(name, value));
//! station.run(|diag| {
//!     diag.set_rssi(wifi_rssi());
//!     sample_sensors()
//! }).await?;
//! ```

use std::time::Duration;

use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use tracing::{debug, info, warn};

use crate::bounds::{validate, BoundedReading};
use crate::config::Config;
use crate::decode::decode;
use crate::diagnostics::Diagnostics;
use crate::encode::encode;
use crate::route::TopicRouter;
use crate::schema::ChannelSchema;
use crate::traits::Qos;
use crate::value::Value;

// ============================================================================
// Configuration
// ============================================================================

/// Runtime station configuration for `rumqttc`.
///
/// This struct uses `String` for runtime compatibility with the `rumqttc`
/// library. Session setup typically starts from the bounded-string
/// [`crate::config::Config`] and converts with
/// [`MqttRuntimeConfig::from_config`].
#[derive(Debug, Clone)]
pub struct MqttRuntimeConfig {
    /// MQTT broker hostname.
    pub host: String,
    /// MQTT broker port.
    pub port: u16,
    /// Client ID.
    pub client_id: String,
    /// Session user; also the topic namespace segment.
    pub user: String,
    /// Session password.
    pub password: String,
    /// QoS for publishes and subscriptions.
    pub qos: Qos,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// Publish buffer capacity in bytes.
    pub buffer_capacity: usize,
    /// Whether diagnostic fields are appended to the envelope.
    pub diagnostics: bool,
    /// Telemetry publish interval in milliseconds.
    pub publish_interval_ms: u64,
}

impl Default for MqttRuntimeConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl MqttRuntimeConfig {
    /// Create a new config with the given broker address.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Create from the shared station [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self {
            host: config.mqtt.host.as_str().to_string(),
            port: config.mqtt.port,
            client_id: config.mqtt.client_id.as_str().to_string(),
            user: config.mqtt.user.as_str().to_string(),
            password: config.mqtt.password.as_str().to_string(),
            qos: config.mqtt.qos,
            keep_alive_secs: config.mqtt.keep_alive_secs,
            buffer_capacity: config.telemetry.buffer_capacity,
            diagnostics: config.telemetry.diagnostics,
            publish_interval_ms: u64::from(config.telemetry.publish_interval_ms),
        }
    }

    /// Set the client ID.
    pub fn client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = id.into();
        self
    }

    /// Set the session credentials.
    pub fn credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = user.into();
        self.password = password.into();
        self
    }

    /// Set the publish interval.
    pub fn publish_interval_ms(mut self, ms: u64) -> Self {
        self.publish_interval_ms = ms;
        self
    }

    fn topic(&self, suffix: &str) -> String {
        format!("/v1/{}/{}", self.user, suffix)
    }

    /// The outbound data topic.
    pub fn data_topic(&self) -> String {
        self.topic("data")
    }

    /// The inbound config topic.
    pub fn config_topic(&self) -> String {
        self.topic("config")
    }

    /// The inbound command topic.
    pub fn cmd_topic(&self) -> String {
        self.topic("cmd")
    }
}

fn to_rumqttc(qos: Qos) -> QoS {
    match qos {
        Qos::AtMostOnce => QoS::AtMostOnce,
        Qos::AtLeastOnce => QoS::AtLeastOnce,
        Qos::ExactlyOnce => QoS::ExactlyOnce,
    }
}

// ============================================================================
// MQTT Station
// ============================================================================

/// Broker-backed telemetry station.
///
/// Owns the channel schema, the topic router, and the diagnostic state; the
/// publish cycle and the inbound routing run on separate tasks with no
/// shared mutable state between them.
pub struct MqttStation {
    config: MqttRuntimeConfig,
    schema: ChannelSchema,
    router: TopicRouter,
    diagnostics: Diagnostics,
}

impl MqttStation {
    /// Create a station with the standard channel schema and no handlers.
    pub fn new(config: MqttRuntimeConfig) -> Self {
        Self {
            config,
            schema: ChannelSchema::standard(),
            router: TopicRouter::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Replace the channel schema.
    pub fn with_schema(mut self, schema: ChannelSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Register the command handler.
    pub fn on_command(&mut self, handler: impl FnMut(&str, &Value) + Send + 'static) {
        self.router.on_command(handler);
    }

    /// Register the config handler.
    pub fn on_config(&mut self, handler: impl FnMut(&str, &Value) + Send + 'static) {
        self.router.on_config(handler);
    }

    /// Run the station.
    ///
    /// Connects, subscribes to the two inbound topics, then loops until the
    /// process exits: `sample` is called once per publish interval and must
    /// return one reading per schema slot. Per-cycle and per-message
    /// failures are logged and skipped; only a failed initial subscription
    /// aborts the run.
    pub async fn run<F>(mut self, mut sample: F) -> Result<(), StationError>
    where
        F: FnMut(&mut Diagnostics) -> Vec<BoundedReading> + Send + 'static,
    {
        let mut options =
            MqttOptions::new(&self.config.client_id, &self.config.host, self.config.port);
        options.set_keep_alive(Duration::from_secs(u64::from(self.config.keep_alive_secs)));
        if !self.config.user.is_empty() {
            options.set_credentials(&self.config.user, &self.config.password);
        }

        let (client, mut eventloop) = AsyncClient::new(options, 10);
        let qos = to_rumqttc(self.config.qos);

        for topic in [self.config.config_topic(), self.config.cmd_topic()] {
            client
                .subscribe(&topic, qos)
                .await
                .map_err(|e| StationError::Subscribe(e.to_string()))?;
            info!(%topic, "subscribed");
        }

        // Publish cycle task: schema, diagnostics, and the sample closure
        // move here; the event loop below keeps the router.
        let publish_config = self.config.clone();
        let schema = self.schema.clone();
        let mut diagnostics = std::mem::take(&mut self.diagnostics);
        let publisher = client.clone();
        tokio::spawn(async move {
            let data_topic = publish_config.data_topic();
            let mut interval =
                tokio::time::interval(Duration::from_millis(publish_config.publish_interval_ms));
            loop {
                interval.tick().await;

                let mut readings = sample(&mut diagnostics);
                validate(&mut readings);
                let primary = match schema.typed_values(&readings) {
                    Ok(values) => values,
                    Err(e) => {
                        warn!(%e, "sample does not match schema, skipping cycle");
                        continue;
                    }
                };
                let snapshot = publish_config.diagnostics.then(|| diagnostics.snapshot());

                let envelope = match encode(
                    &primary,
                    snapshot.as_ref().map(|d| d.as_slice()),
                    publish_config.buffer_capacity,
                ) {
                    Ok(envelope) => envelope,
                    Err(e) => {
                        warn!(%e, "encode failed, skipping cycle");
                        continue;
                    }
                };

                debug!(payload = envelope.as_str(), "publishing telemetry");
                if let Err(e) = publisher
                    .publish(&data_topic, qos, false, envelope.as_bytes())
                    .await
                {
                    warn!(%e, "publish refused");
                }
            }
        });

        // Inbound loop: decode and route every delivery; a bad message is
        // logged and dropped, never fatal to the station.
        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!(host = %self.config.host, port = self.config.port, "connected to broker");
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    match decode(&publish.payload) {
                        Ok(message) => {
                            match self
                                .router
                                .dispatch(&publish.topic, &message.name, &message.value)
                            {
                                Ok(target) => {
                                    debug!(topic = %publish.topic, %target, name = %message.name, "dispatched")
                                }
                                Err(e) => warn!(topic = %publish.topic, %e, "dropped message"),
                            }
                        }
                        Err(e) => warn!(topic = %publish.topic, %e, "undecodable payload"),
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(%e, "connection error, retrying");
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
            }
        }
    }
}

/// MQTT station errors.
#[derive(Debug)]
pub enum StationError {
    /// Failed to connect to broker.
    Connect(String),
    /// Failed to subscribe to topic.
    Subscribe(String),
    /// Failed to publish message.
    Publish(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MqttConfig, TelemetryConfig};

    // ========================================================================
    // MqttRuntimeConfig tests
    // ========================================================================

    #[test]
    fn test_runtime_config_default() {
        let config = MqttRuntimeConfig::default();
        assert_eq!(config.host, "mqtt.relayr.io");
        assert_eq!(config.port, 1883);
        assert_eq!(config.client_id, "sensor-bridge");
        assert_eq!(config.qos, Qos::AtLeastOnce);
        assert_eq!(config.buffer_capacity, 512);
        assert!(config.diagnostics);
        assert_eq!(config.publish_interval_ms, 5000);
    }

    #[test]
    fn test_runtime_config_new() {
        let config = MqttRuntimeConfig::new("broker.local", 8883);
        assert_eq!(config.host, "broker.local");
        assert_eq!(config.port, 8883);
        // Other fields should be defaults
        assert_eq!(config.client_id, "sensor-bridge");
    }

    #[test]
    fn test_runtime_config_from_config() {
        let shared = Config::default()
            .with_mqtt(
                MqttConfig::default()
                    .with_host("broker.local")
                    .with_port(8883)
                    .with_client_id("node-7")
                    .with_user("alice")
                    .with_password("s3cret")
                    .with_qos(Qos::ExactlyOnce)
                    .with_keep_alive_secs(60),
            )
            .with_telemetry(
                TelemetryConfig::default()
                    .with_buffer_capacity(256)
                    .with_diagnostics(false)
                    .with_publish_interval_ms(1000),
            );

        let config = MqttRuntimeConfig::from_config(&shared);
        assert_eq!(config.host, "broker.local");
        assert_eq!(config.port, 8883);
        assert_eq!(config.client_id, "node-7");
        assert_eq!(config.user, "alice");
        assert_eq!(config.password, "s3cret");
        assert_eq!(config.qos, Qos::ExactlyOnce);
        assert_eq!(config.keep_alive_secs, 60);
        assert_eq!(config.buffer_capacity, 256);
        assert!(!config.diagnostics);
        assert_eq!(config.publish_interval_ms, 1000);
    }

    #[test]
    fn test_runtime_config_builder_chaining() {
        let config = MqttRuntimeConfig::new("broker.local", 1883)
            .client_id("custom-id")
            .credentials("alice", "s3cret")
            .publish_interval_ms(2000);

        assert_eq!(config.client_id, "custom-id");
        assert_eq!(config.user, "alice");
        assert_eq!(config.password, "s3cret");
        assert_eq!(config.publish_interval_ms, 2000);
    }

    #[test]
    fn test_runtime_config_topics() {
        let config = MqttRuntimeConfig::default().credentials("alice", "");
        assert_eq!(config.data_topic(), "/v1/alice/data");
        assert_eq!(config.config_topic(), "/v1/alice/config");
        assert_eq!(config.cmd_topic(), "/v1/alice/cmd");
    }

    // ========================================================================
    // QoS mapping tests
    // ========================================================================

    #[test]
    fn test_qos_mapping() {
        assert_eq!(to_rumqttc(Qos::AtMostOnce), QoS::AtMostOnce);
        assert_eq!(to_rumqttc(Qos::AtLeastOnce), QoS::AtLeastOnce);
        assert_eq!(to_rumqttc(Qos::ExactlyOnce), QoS::ExactlyOnce);
    }

    // ========================================================================
    // MqttStation tests
    // ========================================================================

    #[test]
    fn test_station_handler_registration() {
        let mut station = MqttStation::new(MqttRuntimeConfig::default());
        assert!(!station.router.has_handler(crate::RouteTarget::Command));

        station.on_command(|_, _| {});
        station.on_config(|_, _| {});
        assert!(station.router.has_handler(crate::RouteTarget::Command));
        assert!(station.router.has_handler(crate::RouteTarget::Config));
    }

    #[test]
    fn test_station_custom_schema() {
        use crate::schema::{ChannelSchema, ChannelSlot};
        use crate::ValueKind;

        let schema = ChannelSchema::new(vec![ChannelSlot::new(
            "pressure",
            ValueKind::Float,
            300.0,
            1100.0,
            1013.0,
        )]);
        let station = MqttStation::new(MqttRuntimeConfig::default()).with_schema(schema);
        assert_eq!(station.schema.len(), 1);
    }

    // ========================================================================
    // StationError tests
    // ========================================================================

    #[test]
    fn test_station_error_display() {
        let error = StationError::Subscribe("topic rejected".to_string());
        let display = format!("{}", error);
        assert!(display.contains("subscribe error"));
        assert!(display.contains("topic rejected"));
    }

    #[test]
    fn test_station_error_is_error() {
        let error = StationError::Connect("test".to_string());
        let _: &dyn std::error::Error = &error;
    }
}

impl std::fmt::Display for StationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connect(e) => write!(f, "MQTT connect error: {}", e),
            Self::Subscribe(e) => write!(f, "MQTT subscribe error: {}", e),
            Self::Publish(e) => write!(f, "MQTT publish error: {}", e),
        }
    }
}

impl std::error::Error for StationError {}
