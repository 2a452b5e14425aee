//! Dashboard Controller
//!
//! Binds grid rows to topics and performs the stream restart request.

use std::sync::Arc;

use crate::domain::field::{FORCE_RESTART_COUNT, FieldSpec, dashboard_fields};
use crate::error::Result;
use crate::telemetry::{TelemetryClient, TopicLayout, TopicPath, Value};

/// Dashboard page controller
#[derive(Clone)]
pub struct DashboardController {
    client: Arc<dyn TelemetryClient>,
    layout: TopicLayout,
}

impl DashboardController {
    /// Create a new controller over an explicitly owned client handle
    pub fn new(client: Arc<dyn TelemetryClient>, layout: TopicLayout) -> Self {
        Self { client, layout }
    }

    /// Rows of the grid, in display order
    pub fn fields(&self) -> Vec<FieldSpec> {
        dashboard_fields(&self.layout)
    }

    /// Subscribe to every topic a row is bound to
    pub fn bind(&self, fields: &[FieldSpec]) {
        for path in fields.iter().filter_map(FieldSpec::topic_path) {
            self.client.subscribe(path);
        }
        tracing::info!("Bound {} dashboard fields", fields.len());
    }

    fn restart_counter(&self) -> TopicPath {
        self.layout.topic(FORCE_RESTART_COUNT)
    }

    /// Increment the force-restart counter by one.
    ///
    /// Read-modify-write against the last known value; concurrent writers
    /// can lose increments. A counter the robot publishes as a double stays
    /// a double. Returns the value written.
    pub fn request_stream_restart(&self) -> Result<i64> {
        let topic = self.restart_counter();
        let last = self.client.get(&topic);
        let current = last.as_ref().and_then(Value::as_counter).unwrap_or(0);
        let next = current.saturating_add(1);
        let value = match last {
            Some(Value::Double(_)) => Value::Double(next as f64),
            _ => Value::Integer(next),
        };
        self.client.set(&topic, value)?;
        tracing::info!("Requested stream restart, {} = {}", topic, next);
        Ok(next)
    }
}

impl std::fmt::Debug for DashboardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardController")
            .field("layout", &self.layout)
            .field("connected", &self.client.is_connected())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eventing::app_event::AppEvent;
    use crate::state::dashboard_state::DashboardState;
    use crate::telemetry::memory::MemoryTelemetry;

    fn controller() -> (DashboardController, Arc<MemoryTelemetry>, flume::Receiver<AppEvent>) {
        let (tx, rx) = flume::unbounded();
        let client = Arc::new(MemoryTelemetry::new(tx));
        let controller = DashboardController::new(client.clone(), TopicLayout::default());
        (controller, client, rx)
    }

    /// Apply pending topic events the way the workspace event pump does
    fn pump(state: &mut DashboardState, rx: &flume::Receiver<AppEvent>) {
        for event in rx.try_iter() {
            if let AppEvent::TopicValue { topic, value } = event {
                state.apply(&topic, &value);
            }
        }
    }

    #[test]
    fn test_bind_subscribes_every_topic_field() {
        let (controller, client, _rx) = controller();
        let fields = controller.fields();
        controller.bind(&fields);

        for path in fields.iter().filter_map(FieldSpec::topic_path) {
            assert!(client.is_subscribed(path), "{path} not subscribed");
        }
    }

    #[test]
    fn test_updates_flow_into_labels() {
        let (controller, client, rx) = controller();
        let layout = TopicLayout::default();
        let fields = controller.fields();
        let mut state = DashboardState::new(&fields);
        controller.bind(&fields);

        client.inject(&layout.topic("state"), Value::from("STREAMING"));
        client.inject(&layout.topic("streamingError"), Value::from("camera timeout"));
        client.inject(&layout.nested("autonomous", "program"), Value::from("TwoPiece"));
        pump(&mut state, &rx);

        assert_eq!(state.text("Streaming Status"), Some("STREAMING"));
        assert_eq!(state.text("Streaming Error"), Some("camera timeout"));
        assert_eq!(state.text("Auto Program"), Some("TwoPiece"));
    }

    #[test]
    fn test_restart_increments_from_default() {
        let (controller, client, _rx) = controller();
        let topic = TopicLayout::default().topic(FORCE_RESTART_COUNT);

        assert_eq!(controller.request_stream_restart().expect("restart"), 1);
        assert_eq!(client.get(&topic), Some(Value::Integer(1)));
    }

    #[test]
    fn test_each_click_adds_exactly_one() {
        let (controller, client, rx) = controller();
        let fields = controller.fields();
        let mut state = DashboardState::new(&fields);
        controller.bind(&fields);
        let topic = TopicLayout::default().topic(FORCE_RESTART_COUNT);

        client.inject(&topic, Value::Integer(41));
        assert_eq!(controller.request_stream_restart().expect("restart"), 42);
        assert_eq!(controller.request_stream_restart().expect("restart"), 43);
        pump(&mut state, &rx);

        assert_eq!(client.get(&topic), Some(Value::Integer(43)));
        assert_eq!(state.text("Streaming Force Restart Count"), Some("43"));
    }

    #[test]
    fn test_restart_saturates_at_max() {
        let (controller, client, _rx) = controller();
        let topic = TopicLayout::default().topic(FORCE_RESTART_COUNT);

        client.inject(&topic, Value::Integer(i64::MAX));
        assert_eq!(controller.request_stream_restart().expect("restart"), i64::MAX);
        assert_eq!(client.get(&topic), Some(Value::Integer(i64::MAX)));
    }

    #[test]
    fn test_restart_keeps_double_counter() {
        let (controller, client, _rx) = controller();
        let topic = TopicLayout::default().topic(FORCE_RESTART_COUNT);

        client.inject(&topic, Value::Double(4.0));
        assert_eq!(controller.request_stream_restart().expect("restart"), 5);
        assert_eq!(client.get(&topic), Some(Value::Double(5.0)));
    }

    #[test]
    fn test_restart_propagates_write_errors() {
        let (controller, client, _rx) = controller();
        let topic = TopicLayout::default().topic(FORCE_RESTART_COUNT);

        // a writer published the counter as a non-numeric string
        client.inject(&topic, Value::from("n/a"));
        assert!(controller.request_stream_restart().is_err());
    }
}
