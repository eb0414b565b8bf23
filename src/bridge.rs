//! Main telemetry bridge that ties everything together.
//!
//! This module provides [`TelemetryBridge`], the central component that
//! coordinates validation, encoding, publishing, and inbound routing over a
//! [`Transport`].
//!
//! # Overview
//!
//! The bridge:
//! - Connects the transport with session credentials and subscribes to the
//!   inbound config and command topics
//! - Runs the publish cycle: validate readings, pair them with the channel
//!   schema, append diagnostics, encode, publish
//! - Drains inbound deliveries through decode and topic routing
//!
//! # Example
//!
//! ```rust
//! use sensor_bridge::{
//!     config::{Config, MqttConfig},
//!     hal::MockTransport,
//!     ChannelSchema, TelemetryBridge,
//! };
//!
//! let config = Config::default().with_mqtt(MqttConfig::default().with_user("alice"));
//! let mut bridge = TelemetryBridge::new(MockTransport::new(), config);
//! bridge.on_command(|name, value| println!("command {name}: {value:?}"));
//! bridge.on_config(|name, value| println!("config {name}: {value:?}"));
//!
//! bridge.connect().unwrap();
//!
//! // One telemetry cycle: raw channel values in schema order
//! let mut readings = bridge.schema().readings(&[21.5, 40.0, 87.0]).unwrap();
//! bridge.publish_readings(&mut readings).unwrap();
//! assert_eq!(bridge.transport().published.len(), 1);
//! ```
//!
//! # Failure Model
//!
//! Nothing here is fatal to the process. A malformed inbound message is a
//! per-message failure reported in the [`PollOutcome`]; a refused publish
//! surfaces as [`BridgeError::TransportFailure`] and the caller decides
//! whether to retry, drop, or alert.

use core::fmt;

use crate::bounds::{validate, BoundedReading};
use crate::config::Config;
use crate::decode::{decode, DecodeError};
use crate::diagnostics::Diagnostics;
use crate::encode::{encode, EncodeError};
use crate::route::{RouteError, RouteTarget, TopicRouter};
use crate::schema::{ChannelSchema, SlotCountMismatch};
use crate::traits::Transport;
use crate::value::Value;

// ============================================================================
// Bridge
// ============================================================================

/// Device-side telemetry bridge.
///
/// Generic over the [`Transport`] implementation, which keeps the protocol
/// layer testable with [`crate::hal::MockTransport`] on desktop.
///
/// # Thread Safety
///
/// The bridge is single-threaded and non-reentrant by design. For use from
/// an async service, wrap the shared pieces in a mutex (see
/// `services::mqtt`).
pub struct TelemetryBridge<T: Transport> {
    transport: T,
    config: Config,
    schema: ChannelSchema,
    router: TopicRouter,
    diagnostics: Diagnostics,
}

impl<T: Transport> TelemetryBridge<T> {
    /// Create a bridge with the standard channel schema and no handlers.
    pub fn new(transport: T, config: Config) -> Self {
        Self {
            transport,
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

    /// Connect the transport and subscribe to the inbound topics.
    ///
    /// Subscribes to `/v1/{user}/config` and `/v1/{user}/cmd` at the
    /// configured QoS. A refused connection or subscription is propagated
    /// uninterpreted.
    pub fn connect(&mut self) -> Result<(), BridgeError> {
        let mqtt = &self.config.mqtt;
        self.transport
            .connect(
                mqtt.client_id.as_str(),
                mqtt.user.as_str(),
                mqtt.password.as_str(),
            )
            .map_err(|e| BridgeError::TransportFailure(e.to_string()))?;

        let config_topic = mqtt.config_topic();
        let cmd_topic = mqtt.cmd_topic();
        for topic in [config_topic.as_str(), cmd_topic.as_str()] {
            self.transport
                .subscribe(topic, mqtt.qos)
                .map_err(|e| BridgeError::TransportFailure(e.to_string()))?;
        }
        Ok(())
    }

    /// Run one publish cycle.
    ///
    /// Validates the readings in place (out-of-range values clamp to their
    /// channel defaults), pairs them with the schema, appends diagnostics
    /// when enabled (incrementing the publish counter exactly once), encodes
    /// the envelope, and publishes it to `/v1/{user}/data`.
    pub fn publish_readings(
        &mut self,
        readings: &mut [BoundedReading],
    ) -> Result<(), BridgeError> {
        validate(readings);
        let primary = self.schema.typed_values(readings)?;

        let diagnostics = if self.config.telemetry.diagnostics {
            Some(self.diagnostics.snapshot())
        } else {
            None
        };

        let envelope = encode(
            &primary,
            diagnostics.as_ref().map(|d| d.as_slice()),
            self.config.telemetry.buffer_capacity,
        )?;

        let topic = self.config.mqtt.data_topic();
        self.transport
            .publish(topic.as_str(), envelope.as_bytes(), self.config.mqtt.qos)
            .map_err(|e| BridgeError::TransportFailure(e.to_string()))
    }

    /// Decode one inbound payload and dispatch it by topic class.
    ///
    /// Returns the route target taken. Decode and route failures are local
    /// and leave the bridge fully usable.
    pub fn handle_inbound(
        &mut self,
        topic: &str,
        payload: &[u8],
    ) -> Result<RouteTarget, BridgeError> {
        let message = decode(payload)?;
        let target = self
            .router
            .dispatch(topic, &message.name, &message.value)?;
        Ok(target)
    }

    /// Drain pending inbound messages through decode and routing.
    ///
    /// Per-message failures are collected, not fatal: one malformed payload
    /// never blocks the rest of the queue or degrades the station.
    pub fn poll(&mut self) -> PollOutcome {
        let mut outcome = PollOutcome {
            connected: self.transport.is_connected(),
            handled: 0,
            failures: Vec::new(),
        };
        if !outcome.connected {
            return outcome;
        }
        while let Some(message) = self.transport.try_recv() {
            match self.handle_inbound(&message.topic, &message.payload) {
                Ok(_) => outcome.handled += 1,
                Err(e) => outcome.failures.push(e),
            }
        }
        outcome
    }

    /// Whether the transport reports a live connection.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// The active channel schema.
    pub fn schema(&self) -> &ChannelSchema {
        &self.schema
    }

    /// The diagnostic state owned by this bridge.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Mutable diagnostic state, e.g. to feed the latest RSSI reading.
    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the underlying transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

// ============================================================================
// Poll Outcome
// ============================================================================

/// Result of draining the inbound queue once.
#[derive(Debug, Default)]
pub struct PollOutcome {
    /// Whether the transport was connected when polled.
    pub connected: bool,
    /// Messages decoded and dispatched successfully.
    pub handled: usize,
    /// Per-message failures, in arrival order.
    pub failures: Vec<BridgeError>,
}

// ============================================================================
// Errors
// ============================================================================

/// Errors surfaced at the bridge API boundary.
#[derive(Clone, Debug, PartialEq)]
pub enum BridgeError {
    /// Encoding the envelope failed.
    Encode(EncodeError),
    /// Decoding an inbound payload failed.
    Decode(DecodeError),
    /// Routing found no registered handler.
    Route(RouteError),
    /// The transport refused a connect, subscribe, or publish. Propagated,
    /// not interpreted.
    TransportFailure(String),
    /// The readings handed to the publish cycle do not match the schema.
    SlotCount(SlotCountMismatch),
}

impl From<EncodeError> for BridgeError {
    fn from(e: EncodeError) -> Self {
        Self::Encode(e)
    }
}

impl From<DecodeError> for BridgeError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

impl From<RouteError> for BridgeError {
    fn from(e: RouteError) -> Self {
        Self::Route(e)
    }
}

impl From<SlotCountMismatch> for BridgeError {
    fn from(e: SlotCountMismatch) -> Self {
        Self::SlotCount(e)
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode(e) => write!(f, "encode error: {}", e),
            Self::Decode(e) => write!(f, "decode error: {}", e),
            Self::Route(e) => write!(f, "route error: {}", e),
            Self::TransportFailure(e) => write!(f, "transport failure: {}", e),
            Self::SlotCount(e) => write!(f, "reading count mismatch: {}", e),
        }
    }
}

impl std::error::Error for BridgeError {}
