//! Mock transport for testing without a broker.
//!
//! Records every publish and subscription, queues inbound messages for
//! [`try_recv`](crate::traits::Transport::try_recv), and can be told to
//! refuse connects or publishes to exercise failure paths.
//!
//! # Example
//!
//! ```rust
//! use sensor_bridge::hal::MockTransport;
//! use sensor_bridge::traits::{Qos, Transport};
//!
//! let mut transport = MockTransport::new();
//! transport.connect("node-7", "alice", "s3cret").unwrap();
//!
//! transport.publish("/v1/alice/data", b"[]", Qos::AtLeastOnce).unwrap();
//! assert_eq!(transport.published_to("/v1/alice/data").len(), 1);
//!
//! // Queue an inbound message for the poll loop
//! transport.queue_message("/v1/alice/cmd", br#"{"name":"relay","value":true}"#.to_vec());
//! assert!(transport.try_recv().is_some());
//! ```

use crate::traits::{Qos, Transport, TransportMessage};

/// Mock transport that captures operations and simulates failures.
///
/// Inspect the public fields after test operations; messages queued with
/// [`queue_message`](Self::queue_message) come back out of `try_recv` in
/// FIFO order.
#[derive(Debug, Default)]
pub struct MockTransport {
    /// Messages that have been published (topic, payload, qos).
    pub published: Vec<(String, Vec<u8>, Qos)>,
    /// Topics that have been subscribed to, with their QoS.
    pub subscriptions: Vec<(String, Qos)>,
    /// Queue of inbound messages returned by `try_recv`.
    pub incoming: Vec<TransportMessage>,
    /// Whether the client is connected.
    pub connected: bool,
    /// Credentials passed to the last `connect` call.
    pub last_credentials: Option<(String, String, String)>,
    /// When true, `connect` is refused.
    pub refuse_connect: bool,
    /// When true, `publish` is refused.
    pub refuse_publish: bool,
}

impl MockTransport {
    /// Creates a disconnected mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock transport that refuses connection attempts.
    pub fn refusing_connect() -> Self {
        Self {
            refuse_connect: true,
            ..Self::default()
        }
    }

    /// Queue an inbound message to be returned by `try_recv`.
    pub fn queue_message(&mut self, topic: impl Into<String>, payload: Vec<u8>) {
        self.incoming.push(TransportMessage::new(topic, payload));
    }

    /// Whether the given topic has been subscribed to.
    pub fn is_subscribed(&self, topic: &str) -> bool {
        self.subscriptions.iter().any(|(t, _)| t == topic)
    }

    /// All payloads published to the given topic.
    pub fn published_to(&self, topic: &str) -> Vec<&[u8]> {
        self.published
            .iter()
            .filter(|(t, _, _)| t == topic)
            .map(|(_, p, _)| p.as_slice())
            .collect()
    }
}

impl Transport for MockTransport {
    type Error = &'static str;

    fn connect(
        &mut self,
        client_id: &str,
        user: &str,
        password: &str,
    ) -> Result<(), Self::Error> {
        if self.refuse_connect {
            return Err("connection refused");
        }
        self.connected = true;
        self.last_credentials = Some((client_id.into(), user.into(), password.into()));
        Ok(())
    }

    fn subscribe(&mut self, topic: &str, qos: Qos) -> Result<(), Self::Error> {
        if !self.connected {
            return Err("not connected");
        }
        self.subscriptions.push((topic.into(), qos));
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &[u8], qos: Qos) -> Result<(), Self::Error> {
        if self.refuse_publish {
            return Err("publish refused");
        }
        if !self.connected {
            return Err("not connected");
        }
        self.published.push((topic.into(), payload.to_vec(), qos));
        Ok(())
    }

    fn try_recv(&mut self) -> Option<TransportMessage> {
        if self.incoming.is_empty() {
            None
        } else {
            Some(self.incoming.remove(0))
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
