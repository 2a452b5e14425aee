//! In-memory loopback client used by tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};

use crate::error::{Error, Result};
use crate::eventing::app_event::AppEvent;
use crate::telemetry::{TelemetryClient, TopicPath, Value};

/// Loopback telemetry: writes are stored and echoed to subscribers
pub struct MemoryTelemetry {
    events: flume::Sender<AppEvent>,
    values: RwLock<HashMap<TopicPath, Value>>,
    subscribed: Mutex<HashSet<TopicPath>>,
    connected: AtomicBool,
}

impl MemoryTelemetry {
    pub fn new(events: flume::Sender<AppEvent>) -> Self {
        Self {
            events,
            values: RwLock::new(HashMap::new()),
            subscribed: Mutex::new(HashSet::new()),
            connected: AtomicBool::new(true),
        }
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Simulate a value arriving from the server
    pub fn inject(&self, topic: &TopicPath, value: Value) {
        self.values.write().insert(topic.clone(), value.clone());
        if self.subscribed.lock().contains(topic) {
            let _ = self.events.send(AppEvent::TopicValue {
                topic: topic.clone(),
                value,
            });
        }
    }

    pub fn is_subscribed(&self, topic: &TopicPath) -> bool {
        self.subscribed.lock().contains(topic)
    }
}

impl TelemetryClient for MemoryTelemetry {
    fn subscribe(&self, topic: &TopicPath) {
        self.subscribed.lock().insert(topic.clone());
    }

    fn get(&self, topic: &TopicPath) -> Option<Value> {
        self.values.read().get(topic).cloned()
    }

    fn set(&self, topic: &TopicPath, value: Value) -> Result<()> {
        if let Some(existing) = self.values.read().get(topic) {
            if existing.type_id() != value.type_id() {
                return Err(Error::TypeMismatch {
                    topic: topic.to_string(),
                    expected: existing.type_name(),
                    actual: value.type_name(),
                });
            }
        }
        self.inject(topic, value);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn shutdown(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }
}
