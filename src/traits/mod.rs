//! Trait definitions for the transport seam.
//!
//! The bridge core never talks to a socket: it consumes a
//! connect/subscribe/publish capability through the [`Transport`] trait and
//! is driven by whatever delivers inbound messages. This keeps the protocol
//! layer testable on desktop with the mock in [`crate::hal`] and lets the
//! `mqtt` feature supply a real client.

pub mod transport;

pub use transport::*;
