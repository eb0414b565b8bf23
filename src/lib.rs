//! # sensor-bridge
//!
//! Device-side MQTT telemetry bridge: validates sensor readings, encodes
//! them into a fixed wire-format JSON envelope, publishes them to a cloud
//! endpoint, and routes inbound command/config messages to application
//! handlers by topic suffix.
//!
//! ## Features
//!
//! - **Typed wire values**: a closed tagged union over
//!   `{Int, Uint, Float, Str, Bool}` with compile-time exhaustiveness
//! - **Clamp-to-default validation**: out-of-range readings are silently
//!   replaced, never an error (sensor noise tolerance)
//! - **Loud encode failures**: a payload that would overflow the publish
//!   buffer is reported, never truncated
//! - **Explicit channel schema**: the positional coupling between envelope
//!   slot and meaning is a configurable structure, not an index convention
//! - **Suffix-based routing**: `/cmd` topics go to the command handler,
//!   everything else fails open to config
//!
//! ## Architecture
//!
//! The crate is structured so the protocol layer is testable on desktop
//! without a broker:
//!
//! - `value` - Typed values and the closed kind set
//! - `bounds` - Range validation for raw readings
//! - `schema` - Ordered channel schema for the envelope
//! - `encode` / `decode` - Wire-format envelope and inbound payloads
//! - `route` - Topic classification and handler dispatch
//! - `bridge` - Main bridge that ties everything together
//! - `traits` / `hal` - Transport seam and mock implementation
//! - `services` - `rumqttc`-backed async station (`mqtt` feature)
//!
//! ## Example
//!
//! ```rust
//! use sensor_bridge::{
//!     config::{Config, MqttConfig},
//!     hal::MockTransport,
//!     TelemetryBridge,
//! };
//!
//! let config = Config::default().with_mqtt(MqttConfig::default().with_user("alice"));
//! let mut bridge = TelemetryBridge::new(MockTransport::new(), config);
//! bridge.on_command(|name, value| println!("command {name}: {value:?}"));
//! bridge.on_config(|name, value| println!("config {name}: {value:?}"));
//!
//! // Connect and subscribe to /v1/alice/config and /v1/alice/cmd
//! bridge.connect().unwrap();
//!
//! // One publish cycle: temperature, humidity, battery
//! let mut readings = bridge.schema().readings(&[21.5, 40.0, 87.0]).unwrap();
//! bridge.publish_readings(&mut readings).unwrap();
//!
//! // Inbound messages are drained through decode and routing
//! bridge.transport_mut().queue_message(
//!     "/v1/alice/cmd",
//!     br#"{"name":"relay","value":true}"#.to_vec(),
//! );
//! let outcome = bridge.poll();
//! assert_eq!(outcome.handled, 1);
//! ```

#![warn(missing_docs)]

/// Range validation for raw sensor readings.
pub mod bounds;
/// Main telemetry bridge coordinating validation, encoding, and routing.
pub mod bridge;
/// Station configuration with bounded strings and builders.
pub mod config;
/// Inbound payload decoding.
pub mod decode;
/// Diagnostic counter and signal-strength state.
pub mod diagnostics;
/// Wire-format envelope encoding.
pub mod encode;
/// Transport implementations (mock for testing).
pub mod hal;
/// Topic classification and handler dispatch.
pub mod route;
/// Ordered channel schema for the envelope.
pub mod schema;
/// Transport seam traits.
pub mod traits;
/// Typed values and the closed kind set.
pub mod value;

/// Broker-backed station runtime (feature-gated).
#[cfg(feature = "mqtt")]
pub mod services;

// Re-exports for convenience
pub use bounds::{validate, BoundedReading};
pub use bridge::{BridgeError, PollOutcome, TelemetryBridge};
pub use config::{Config, MqttConfig, TelemetryConfig};
pub use decode::{decode, DecodeError, InboundMessage};
pub use diagnostics::Diagnostics;
pub use encode::{encode, EncodeError, Envelope, DEFAULT_CAPACITY};
pub use route::{classify, Handler, RouteError, RouteTarget, TopicRouter};
pub use schema::{ChannelSchema, ChannelSlot, SlotCountMismatch};
pub use traits::{Qos, Transport, TransportMessage};
pub use value::{TypedValue, Value, ValueKind};
