//! Network services for the telemetry station.
//!
//! This module provides the optional broker-backed runtime for the protocol
//! layer:
//! - `mqtt` feature: `rumqttc`-based async station that runs the publish
//!   cycle on an interval and routes inbound command/config messages
//!
//! The core bridge stays synchronous and transport-agnostic; the service is
//! the only place where an async runtime appears.

#[cfg(feature = "mqtt")]
pub mod mqtt;

#[cfg(feature = "mqtt")]
pub use mqtt::*;
