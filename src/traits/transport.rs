//! Transport abstraction for the MQTT boundary.
//!
//! The core requires exactly the capabilities listed on [`Transport`]:
//! connect with session credentials, subscribe, publish, and a non-blocking
//! receive for inbound deliveries. Keep-alive, TLS, and reconnection belong
//! to the implementation behind the trait, not to the protocol layer.
//!
//! # Implementation Notes
//!
//! - All methods are synchronous; the core runs on the calling thread.
//! - `try_recv` must never block: it drains messages the implementation has
//!   already buffered.
//! - The error type only needs to be displayable; the bridge propagates
//!   transport refusals upward without interpreting them.

use core::fmt;

// ============================================================================
// QoS
// ============================================================================

/// MQTT quality-of-service level.
///
/// Caller-supplied, never negotiated by the core.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Qos {
    /// Fire and forget.
    AtMostOnce,
    /// Acknowledged delivery (the wire default).
    #[default]
    AtLeastOnce,
    /// Assured single delivery.
    ExactlyOnce,
}

// ============================================================================
// Transport Trait
// ============================================================================

/// A message delivered by the transport from a subscribed topic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportMessage {
    /// Topic the message was published to.
    pub topic: String,
    /// Message payload as raw bytes.
    pub payload: Vec<u8>,
}

impl TransportMessage {
    /// Create a new transport message.
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }

    /// Returns the payload as a UTF-8 string, if valid.
    pub fn payload_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.payload).ok()
    }
}

/// Connect/subscribe/publish capability consumed by the bridge.
pub trait Transport {
    /// Error type for transport operations.
    type Error: fmt::Display;

    /// Connect to the broker with session credentials (blocking).
    fn connect(&mut self, client_id: &str, user: &str, password: &str)
        -> Result<(), Self::Error>;

    /// Subscribe to a topic at the given QoS (blocking).
    fn subscribe(&mut self, topic: &str, qos: Qos) -> Result<(), Self::Error>;

    /// Publish a payload to a topic at the given QoS (blocking).
    fn publish(&mut self, topic: &str, payload: &[u8], qos: Qos) -> Result<(), Self::Error>;

    /// Try to receive the next inbound message (non-blocking).
    ///
    /// Returns `None` if no message is pending. This should never block.
    fn try_recv(&mut self) -> Option<TransportMessage>;

    /// Check if connected to the broker.
    fn is_connected(&self) -> bool;
}
