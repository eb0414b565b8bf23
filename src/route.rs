//! Topic classification and handler dispatch for inbound messages.
//!
//! Classification is a pure suffix match, exposed separately from dispatch so
//! its fail-open behavior stays auditable: a topic ending in the literal
//! `/cmd` is a command, and *anything else*, malformed or unexpected topics
//! included, is treated as configuration. That default is deliberate and
//! preserved as-is; keep it in mind when adding subscriptions.
//!
//! Dispatch invokes the registered handler for the resolved target
//! synchronously with the decoded name and value. A target with no handler
//! is a reported error, never an uninitialized call.
//!
//! # Example
//!
//! ```rust
//! use sensor_bridge::{classify, RouteTarget, TopicRouter, Value};
//!
//! assert_eq!(classify("/v1/alice/cmd"), RouteTarget::Command);
//! assert_eq!(classify("/v1/alice/config"), RouteTarget::Config);
//!
//! let mut router = TopicRouter::new();
//! router.on_command(|name, value| println!("cmd {name}: {value:?}"));
//! let target = router
//!     .dispatch("/v1/alice/cmd", "relay", &Value::Bool(true))
//!     .unwrap();
//! assert_eq!(target, RouteTarget::Command);
//! ```

use core::fmt;

use crate::value::Value;

// ============================================================================
// Classification
// ============================================================================

/// Where an inbound message is dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteTarget {
    /// Topics ending in the literal `/cmd`.
    Command,
    /// Everything else (fail-open default).
    Config,
}

impl fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteTarget::Command => f.write_str("command"),
            RouteTarget::Config => f.write_str("config"),
        }
    }
}

/// Classify a topic by suffix.
///
/// A literal `/cmd` suffix means [`RouteTarget::Command`]; any other topic,
/// malformed ones included, resolves to [`RouteTarget::Config`]. Suffix
/// match, not substring: `/v1/alice/cmdx` is Config.
pub fn classify(topic: &str) -> RouteTarget {
    if topic.ends_with("/cmd") {
        RouteTarget::Command
    } else {
        RouteTarget::Config
    }
}

// ============================================================================
// Router
// ============================================================================

/// Handler invoked with the decoded `(name, value)` of an inbound message.
pub type Handler = Box<dyn FnMut(&str, &Value) + Send>;

/// Dispatches decoded inbound messages to registered handlers by topic class.
///
/// Handlers are injected at setup; there are no ambient globals and no
/// implicitly null callbacks.
#[derive(Default)]
pub struct TopicRouter {
    command: Option<Handler>,
    config: Option<Handler>,
}

impl TopicRouter {
    /// A router with no handlers registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the command handler, replacing any previous one.
    pub fn on_command(&mut self, handler: impl FnMut(&str, &Value) + Send + 'static) {
        self.command = Some(Box::new(handler));
    }

    /// Register the config handler, replacing any previous one.
    pub fn on_config(&mut self, handler: impl FnMut(&str, &Value) + Send + 'static) {
        self.config = Some(Box::new(handler));
    }

    /// Whether a handler is registered for the given target.
    pub fn has_handler(&self, target: RouteTarget) -> bool {
        match target {
            RouteTarget::Command => self.command.is_some(),
            RouteTarget::Config => self.config.is_some(),
        }
    }

    /// Classify `topic` and invoke the matching handler synchronously.
    ///
    /// Returns the resolved target, or [`RouteError::NoHandlerRegistered`]
    /// if nothing is registered for it.
    pub fn dispatch(
        &mut self,
        topic: &str,
        name: &str,
        value: &Value,
    ) -> Result<RouteTarget, RouteError> {
        let target = classify(topic);
        let handler = match target {
            RouteTarget::Command => self.command.as_mut(),
            RouteTarget::Config => self.config.as_mut(),
        };
        match handler {
            Some(h) => {
                h(name, value);
                Ok(target)
            }
            None => Err(RouteError::NoHandlerRegistered(target)),
        }
    }
}

impl fmt::Debug for TopicRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopicRouter")
            .field("command", &self.command.is_some())
            .field("config", &self.config.is_some())
            .finish()
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors surfaced by [`TopicRouter::dispatch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteError {
    /// The resolved target has no registered handler.
    NoHandlerRegistered(RouteTarget),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoHandlerRegistered(target) => {
                write!(f, "no handler registered for {} messages", target)
            }
        }
    }
}

impl std::error::Error for RouteError {}
