//! Telemetry - NetworkTables Leaf Operations
//!
//! The dashboard only ever subscribes to topics, reads the last value of a
//! topic, and writes a scalar. [`TelemetryClient`] captures exactly that
//! surface; [`nt4::Nt4Client`] implements it over the NT4 WebSocket protocol.
//!
//! Value changes are not delivered through callbacks. Clients push
//! [`AppEvent::TopicValue`](crate::eventing::app_event::AppEvent) into the
//! application event channel and the workspace event pump applies them on the
//! UI thread.

pub mod nt4;
mod topic;
mod value;

#[cfg(test)]
pub mod memory;

pub use topic::{TopicLayout, TopicPath};
pub use value::Value;

use crate::error::Result;

/// Leaf-level access to the telemetry service
pub trait TelemetryClient: Send + Sync {
    /// Start receiving value changes for a topic.
    ///
    /// Subscribing twice to the same topic is a no-op.
    fn subscribe(&self, topic: &TopicPath);

    /// Last value seen for a topic, whether received or written locally
    fn get(&self, topic: &TopicPath) -> Option<Value>;

    /// Publish a value. The first write fixes the topic's type.
    fn set(&self, topic: &TopicPath, value: Value) -> Result<()>;

    /// Whether a server connection is currently established
    fn is_connected(&self) -> bool;

    /// Stop background work. Later calls are no-ops.
    fn shutdown(&self);
}
