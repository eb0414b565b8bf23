//! Concrete implementations of the transport seam.
//!
//! # Available Implementations
//!
//! - `mock`: in-memory transport for desktop development and tests
//!
//! A real broker connection is provided by the `mqtt` feature through
//! [`crate::services`], which drives the same protocol layer over
//! `rumqttc` instead of implementing this trait.

pub mod mock;

pub use mock::*;
