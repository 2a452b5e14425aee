//! NT4 Client
//!
//! One tokio task owns the WebSocket. The public handle only touches shared
//! state and an outgoing message queue, so it can be called from the UI
//! thread and the host publisher thread alike.
//!
//! ```text
//! Nt4Client::set/subscribe ──► outgoing queue ──► session task ──► server
//!                                                     │
//!              AppEvent::TopicValue ◄── value cache ◄─┘
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use futures::{SinkExt, StreamExt};
use parking_lot::{Mutex, RwLock};
use serde_json::Map;
use tokio::net::TcpStream;
use tokio::sync::{Notify, mpsc};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use super::codec::{
    self, ControlMessage, FramePayload, SubscribeOptions, TIME_SYNC_TOPIC, ValueFrame,
};
use super::server::{candidate_hosts, server_url};
use crate::constants::{NT4_SUBPROTOCOLS, TIME_SYNC_INTERVAL_SECS};
use crate::domain::config::ServerConfig;
use crate::error::{Error, Result};
use crate::eventing::app_event::AppEvent;
use crate::services::runtime::spawn_named_in_tokio;
use crate::services::supervisor::{RetryConfig, Supervisor};
use crate::telemetry::{TelemetryClient, TopicPath, Value};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A topic this client publishes
#[derive(Debug, Clone, Copy)]
struct Publisher {
    pubuid: i64,
    type_name: &'static str,
    type_id: u8,
}

struct Shared {
    config: ServerConfig,
    events: flume::Sender<AppEvent>,
    outgoing: mpsc::UnboundedSender<Message>,
    connected: AtomicBool,
    shutdown: AtomicBool,
    shutdown_notify: Notify,
    /// Last value per topic, received or written locally
    values: RwLock<HashMap<TopicPath, Value>>,
    /// Subscribed topics in subscription order
    subscribed: Mutex<Vec<TopicPath>>,
    publishers: Mutex<HashMap<TopicPath, Publisher>>,
    /// Server topic id -> name, valid for the current session only
    announced: Mutex<HashMap<i64, TopicPath>>,
    /// Type the server last announced for a topic, kept across sessions
    announced_types: Mutex<HashMap<TopicPath, String>>,
    next_uid: AtomicI64,
    time_offset_us: AtomicI64,
    time_synced: AtomicBool,
}

/// NetworkTables 4 client
pub struct Nt4Client {
    shared: Arc<Shared>,
}

impl Nt4Client {
    /// Create the client and start its connection task
    pub fn start(config: ServerConfig, events: flume::Sender<AppEvent>) -> Self {
        let (shared, outgoing_rx) = Shared::new(config, events);
        let task = shared.clone();
        spawn_named_in_tokio("nt4-client", async move {
            task.run(outgoing_rx).await;
        });
        Self { shared }
    }
}

impl TelemetryClient for Nt4Client {
    fn subscribe(&self, topic: &TopicPath) {
        self.shared.subscribe(topic);
    }

    fn get(&self, topic: &TopicPath) -> Option<Value> {
        self.shared.values.read().get(topic).cloned()
    }

    fn set(&self, topic: &TopicPath, value: Value) -> Result<()> {
        self.shared.set(topic, value)
    }

    fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::SeqCst)
    }

    fn shutdown(&self) {
        if !self.shared.shutdown.swap(true, Ordering::SeqCst) {
            tracing::info!("Shutting down NT4 client");
            self.shared.shutdown_notify.notify_one();
        }
    }
}

impl Drop for Nt4Client {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for Nt4Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Nt4Client")
            .field("server", &self.shared.config.describe())
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl Shared {
    fn new(
        config: ServerConfig,
        events: flume::Sender<AppEvent>,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<Message>) {
        let (outgoing, outgoing_rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Self {
            config,
            events,
            outgoing,
            connected: AtomicBool::new(false),
            shutdown: AtomicBool::new(false),
            shutdown_notify: Notify::new(),
            values: RwLock::new(HashMap::new()),
            subscribed: Mutex::new(Vec::new()),
            publishers: Mutex::new(HashMap::new()),
            announced: Mutex::new(HashMap::new()),
            announced_types: Mutex::new(HashMap::new()),
            next_uid: AtomicI64::new(1),
            time_offset_us: AtomicI64::new(0),
            time_synced: AtomicBool::new(false),
        });
        (shared, outgoing_rx)
    }

    fn is_shut_down(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn next_uid(&self) -> i64 {
        self.next_uid.fetch_add(1, Ordering::SeqCst)
    }

    /// Timestamp for outgoing values; 0 until the first time sync completes
    fn server_time_us(&self) -> i64 {
        if self.time_synced.load(Ordering::SeqCst) {
            now_us() + self.time_offset_us.load(Ordering::SeqCst)
        } else {
            0
        }
    }

    fn is_subscribed(&self, topic: &TopicPath) -> bool {
        self.subscribed.lock().contains(topic)
    }

    fn queue(&self, message: Message) {
        if self.outgoing.send(message).is_err() {
            tracing::debug!("NT4 session ended, dropping outgoing message");
        }
    }

    fn subscribe(&self, topic: &TopicPath) {
        {
            // held while queueing so a session opening concurrently either
            // snapshots this topic or sees it queued
            let mut subscribed = self.subscribed.lock();
            if subscribed.contains(topic) {
                return;
            }
            subscribed.push(topic.clone());
            tracing::debug!("Subscribing to {}", topic);

            if self.is_connected() {
                let message = ControlMessage::Subscribe {
                    topics: vec![topic.to_string()],
                    subuid: self.next_uid(),
                    options: SubscribeOptions::default(),
                };
                match codec::encode_control(&[message]) {
                    Ok(text) => self.queue(Message::Text(text)),
                    Err(e) => tracing::warn!("Failed to encode subscribe for {}: {}", topic, e),
                }
            }
        }

        let cached = self.values.read().get(topic).cloned();
        if let Some(value) = cached {
            let _ = self.events.send(AppEvent::TopicValue {
                topic: topic.clone(),
                value,
            });
        }
    }

    fn set(&self, topic: &TopicPath, value: Value) -> Result<()> {
        // held until the write is cached and queued; see `open_session`
        let mut publishers = self.publishers.lock();
        if let Some(announced) = self.announced_types.lock().get(topic) {
            if announced != value.type_name() {
                return Err(Error::TypeMismatch {
                    topic: topic.to_string(),
                    expected: announced_type_name(announced),
                    actual: value.type_name(),
                });
            }
        }
        let (publisher, announce) = match publishers.get(topic) {
            Some(existing) if existing.type_id != value.type_id() => {
                return Err(Error::TypeMismatch {
                    topic: topic.to_string(),
                    expected: existing.type_name,
                    actual: value.type_name(),
                });
            }
            Some(existing) => (*existing, false),
            None => {
                let publisher = Publisher {
                    pubuid: self.next_uid(),
                    type_name: value.type_name(),
                    type_id: value.type_id(),
                };
                publishers.insert(topic.clone(), publisher);
                (publisher, true)
            }
        };

        self.deliver(topic.clone(), value.clone());

        // while disconnected the handshake republishes the cached value
        if self.is_connected() {
            if announce {
                let text = codec::encode_control(&[ControlMessage::Publish {
                    name: topic.to_string(),
                    pubuid: publisher.pubuid,
                    type_name: publisher.type_name.to_string(),
                    properties: Map::new(),
                }])?;
                self.queue(Message::Text(text));
            }
            let frame = codec::encode_value(publisher.pubuid, self.server_time_us(), &value)?;
            self.queue(Message::Binary(frame));
        }
        Ok(())
    }

    /// Store a value and notify the UI if the topic is subscribed
    fn deliver(&self, topic: TopicPath, value: Value) {
        self.values.write().insert(topic.clone(), value.clone());
        if self.is_subscribed(&topic) {
            let _ = self.events.send(AppEvent::TopicValue { topic, value });
        }
    }

    /// Mark the session connected and build the messages sent right after
    /// the WebSocket handshake.
    ///
    /// Runs under the publisher and subscription locks, so every concurrent
    /// `set` or `subscribe` lands either in the returned snapshot or in the
    /// outgoing queue, never in neither. Lock order: publishers, subscribed,
    /// values.
    fn open_session(&self) -> Result<Vec<Message>> {
        let publishers = self.publishers.lock();
        let subscribed = self.subscribed.lock();
        self.connected.store(true, Ordering::SeqCst);

        let mut messages = vec![Message::Binary(codec::encode_time_sync(now_us())?)];
        let mut control = Vec::new();

        if !subscribed.is_empty() {
            control.push(ControlMessage::Subscribe {
                topics: subscribed.iter().map(ToString::to_string).collect(),
                subuid: self.next_uid(),
                options: SubscribeOptions::default(),
            });
        }

        let values = self.values.read();
        let mut frames = Vec::new();
        for (topic, publisher) in publishers.iter() {
            control.push(ControlMessage::Publish {
                name: topic.to_string(),
                pubuid: publisher.pubuid,
                type_name: publisher.type_name.to_string(),
                properties: Map::new(),
            });
            if let Some(value) = values.get(topic) {
                frames.extend(codec::encode_value(
                    publisher.pubuid,
                    self.server_time_us(),
                    value,
                )?);
            }
        }

        if !control.is_empty() {
            messages.push(Message::Text(codec::encode_control(&control)?));
        }
        if !frames.is_empty() {
            messages.push(Message::Binary(frames));
        }
        Ok(messages)
    }

    fn handle_text(&self, text: &str) {
        let messages = match codec::decode_control(text) {
            Ok(messages) => messages,
            Err(e) => {
                tracing::debug!("Dropping malformed NT4 text frame: {}", e);
                return;
            }
        };

        for message in messages {
            match message {
                ControlMessage::Announce {
                    name, id, type_name, ..
                } => {
                    tracing::debug!("NT4 announce {} (id {}, {})", name, id, type_name);
                    let topic = TopicPath::from_name(name);
                    self.announced_types.lock().insert(topic.clone(), type_name);
                    self.announced.lock().insert(id, topic);
                }
                ControlMessage::Unannounce { name, id } => {
                    tracing::debug!("NT4 unannounce {} (id {})", name, id);
                    self.announced.lock().remove(&id);
                    self.announced_types.lock().remove(&TopicPath::from_name(name));
                }
                _ => {}
            }
        }
    }

    fn handle_binary(&self, data: &[u8]) {
        let frames = match codec::decode_values(data) {
            Ok(frames) => frames,
            Err(e) => {
                tracing::debug!("Dropping malformed NT4 binary frame: {}", e);
                return;
            }
        };

        for frame in frames {
            if frame.topic_id == TIME_SYNC_TOPIC {
                self.apply_time_sync(&frame);
                continue;
            }
            let Some(topic) = self.announced.lock().get(&frame.topic_id).cloned() else {
                tracing::debug!("Value for unannounced topic id {}", frame.topic_id);
                continue;
            };
            match frame.payload {
                FramePayload::Scalar(value) => self.deliver(topic, value),
                FramePayload::Unsupported(type_id) => {
                    tracing::debug!("Ignoring {} value of type id {}", topic, type_id);
                }
            }
        }
    }

    fn apply_time_sync(&self, frame: &ValueFrame) {
        if let FramePayload::Scalar(Value::Integer(sent_us)) = frame.payload {
            let now = now_us();
            let rtt = (now - sent_us).max(0);
            let offset = frame.timestamp_us + rtt / 2 - now;
            self.time_offset_us.store(offset, Ordering::SeqCst);
            self.time_synced.store(true, Ordering::SeqCst);
            tracing::trace!("NT4 time sync: rtt {}us, offset {}us", rtt, offset);
        }
    }

    /// Connection loop: try each candidate, run a session, back off, repeat
    async fn run(self: Arc<Self>, mut outgoing: mpsc::UnboundedReceiver<Message>) {
        let supervisor = Supervisor::new("nt4", RetryConfig::default(), self.events.clone());
        let hosts = candidate_hosts(&self.config);
        tracing::info!("NT4 client starting, candidates: {:?}", hosts);

        while !self.is_shut_down() {
            for host in &hosts {
                if self.is_shut_down() {
                    break;
                }
                let url = server_url(host, self.config.port, &self.config.client_name);
                supervisor.on_connecting(host);

                match self.connect(&url).await {
                    Ok(socket) => {
                        supervisor.on_connected(&format!("{host}:{}", self.config.port));
                        let reason = self.session(socket, &mut outgoing).await;
                        if !self.is_shut_down() {
                            supervisor.on_disconnected(&reason);
                        }
                        break;
                    }
                    Err(e) => tracing::debug!("NT4 connect to {} failed: {}", url, e),
                }
            }

            if self.is_shut_down() {
                break;
            }
            let Some(delay) = supervisor.next_retry_delay() else {
                break;
            };
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = self.shutdown_notify.notified() => {}
            }
        }

        self.connected.store(false, Ordering::SeqCst);
        tracing::info!("NT4 client stopped");
    }

    async fn connect(&self, url: &str) -> Result<Socket> {
        let mut request = url.into_client_request()?;
        request.headers_mut().insert(
            "Sec-WebSocket-Protocol",
            HeaderValue::from_static(NT4_SUBPROTOCOLS),
        );

        let (socket, response) = tokio::time::timeout(
            self.config.connect_timeout(),
            tokio_tungstenite::connect_async(request),
        )
        .await
        .map_err(|_| Error::Timeout {
            message: format!("connecting to {url}"),
        })??;

        tracing::debug!(
            "NT4 handshake with {} accepted, protocol {:?}",
            url,
            response.headers().get("Sec-WebSocket-Protocol")
        );
        Ok(socket)
    }

    /// Drive one connected session until it ends, returning the reason
    async fn session(
        &self,
        socket: Socket,
        outgoing: &mut mpsc::UnboundedReceiver<Message>,
    ) -> String {
        let (mut sink, mut stream) = socket.split();

        // leftovers from the previous session are covered by the snapshot;
        // anything queued from here on is sent after it
        while outgoing.try_recv().is_ok() {}
        self.announced.lock().clear();

        let messages = match self.open_session() {
            Ok(messages) => messages,
            Err(e) => {
                self.connected.store(false, Ordering::SeqCst);
                return e.to_string();
            }
        };
        for message in messages {
            if let Err(e) = sink.send(message).await {
                self.connected.store(false, Ordering::SeqCst);
                return e.to_string();
            }
        }

        let mut time_sync = tokio::time::interval(Duration::from_secs(TIME_SYNC_INTERVAL_SECS));
        // first tick fires immediately; the handshake already pinged
        time_sync.tick().await;

        let reason = loop {
            tokio::select! {
                incoming = stream.next() => match incoming {
                    Some(Ok(Message::Text(text))) => self.handle_text(&text),
                    Some(Ok(Message::Binary(data))) => self.handle_binary(&data),
                    Some(Ok(Message::Close(frame))) => {
                        break frame
                            .map(|f| f.reason.to_string())
                            .filter(|r| !r.is_empty())
                            .unwrap_or_else(|| "closed by server".to_string());
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break e.to_string(),
                    None => break "connection closed".to_string(),
                },
                Some(message) = outgoing.recv() => {
                    if let Err(e) = sink.send(message).await {
                        break e.to_string();
                    }
                }
                _ = time_sync.tick() => {
                    match codec::encode_time_sync(now_us()) {
                        Ok(ping) => {
                            if let Err(e) = sink.send(Message::Binary(ping)).await {
                                break e.to_string();
                            }
                        }
                        Err(e) => tracing::warn!("Failed to encode time sync: {}", e),
                    }
                }
                _ = self.shutdown_notify.notified() => {
                    let _ = sink.close().await;
                    break "shutdown".to_string();
                }
            }
        };

        self.connected.store(false, Ordering::SeqCst);
        self.announced.lock().clear();
        reason
    }
}

/// Map a server type name onto the static names this client publishes with
fn announced_type_name(type_name: &str) -> &'static str {
    match type_name {
        "boolean" => "boolean",
        "double" => "double",
        "int" => "int",
        "float" => "float",
        "string" => "string",
        _ => "unsupported",
    }
}

fn now_us() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;
    use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

    fn state_topic() -> TopicPath {
        TopicPath::from("/SmartDashboard/BlackMesa/state")
    }

    fn announce(name: &str, id: i64, type_name: &str) -> String {
        codec::encode_control(&[ControlMessage::Announce {
            name: name.to_string(),
            id,
            type_name: type_name.to_string(),
            pubuid: None,
            properties: Map::new(),
        }])
        .expect("encode")
    }

    #[test]
    fn test_announced_value_reaches_subscriber() {
        let (events, rx) = flume::unbounded();
        let (shared, _outgoing) = Shared::new(ServerConfig::default(), events);
        shared.subscribe(&state_topic());

        shared.handle_text(&announce(state_topic().as_str(), 3, "string"));
        shared.handle_binary(&codec::encode_value(3, 10, &Value::from("streaming")).expect("encode"));

        let delivered: Vec<_> = rx
            .try_iter()
            .filter_map(|event| match event {
                AppEvent::TopicValue { topic, value } => Some((topic, value)),
                _ => None,
            })
            .collect();
        assert_eq!(delivered, vec![(state_topic(), Value::from("streaming"))]);
        assert_eq!(
            shared.values.read().get(&state_topic()),
            Some(&Value::from("streaming"))
        );
    }

    #[test]
    fn test_unannounced_and_unsupported_values_are_dropped() {
        let (events, rx) = flume::unbounded();
        let (shared, _outgoing) = Shared::new(ServerConfig::default(), events);
        shared.subscribe(&state_topic());

        // no announce yet
        shared.handle_binary(&codec::encode_value(3, 10, &Value::from("x")).expect("encode"));
        // announced, but an array payload
        shared.handle_text(&announce(state_topic().as_str(), 3, "double[]"));
        let array = rmp_serde::to_vec(&(3_i64, 0_i64, 17_u8, vec![1.0_f64])).expect("encode");
        shared.handle_binary(&array);
        // garbage
        shared.handle_binary(&[0xc1]);
        shared.handle_text("not json");

        assert_eq!(rx.try_iter().count(), 0);
        assert!(shared.values.read().is_empty());
    }

    #[test]
    fn test_set_while_disconnected_is_cached_and_echoed() {
        let (events, rx) = flume::unbounded();
        let (shared, mut outgoing) = Shared::new(ServerConfig::default(), events);
        let topic = TopicPath::from("/SmartDashboard/BlackMesa/driverStationIP");
        shared.subscribe(&topic);

        shared.set(&topic, Value::from("10.4.88.5")).expect("set");

        assert!(outgoing.try_recv().is_err());
        assert_eq!(
            shared.values.read().get(&topic),
            Some(&Value::from("10.4.88.5"))
        );
        assert!(rx.try_iter().any(|event| matches!(
            event,
            AppEvent::TopicValue { ref value, .. } if *value == Value::from("10.4.88.5")
        )));
    }

    #[test]
    fn test_set_rejects_type_change() {
        let (events, _rx) = flume::unbounded();
        let (shared, _outgoing) = Shared::new(ServerConfig::default(), events);
        let topic = TopicPath::from("/SmartDashboard/BlackMesa/streamingForceRestartCount");

        shared.set(&topic, Value::from(1_i64)).expect("set");
        let err = shared.set(&topic, Value::from("two")).expect_err("mismatch");
        assert!(matches!(err, Error::TypeMismatch { expected: "int", actual: "string", .. }));
    }

    #[test]
    fn test_set_while_connected_publishes_once() {
        let (events, _rx) = flume::unbounded();
        let (shared, mut outgoing) = Shared::new(ServerConfig::default(), events);
        shared.connected.store(true, Ordering::SeqCst);
        let topic = TopicPath::from("/SmartDashboard/BlackMesa/streamingForceRestartCount");

        shared.set(&topic, Value::from(1_i64)).expect("set");
        shared.set(&topic, Value::from(2_i64)).expect("set");

        let sent: Vec<Message> = std::iter::from_fn(|| outgoing.try_recv().ok()).collect();
        assert_eq!(sent.len(), 3);
        let Message::Text(text) = &sent[0] else {
            panic!("expected publish text frame");
        };
        let control = codec::decode_control(text).expect("decode");
        assert!(matches!(
            &control[0],
            ControlMessage::Publish { name, type_name, .. }
                if name == topic.as_str() && type_name == "int"
        ));
        let Message::Binary(frame) = &sent[2] else {
            panic!("expected value frame");
        };
        let values = codec::decode_values(frame).expect("decode");
        assert_eq!(values[0].payload, FramePayload::Scalar(Value::from(2_i64)));
    }

    #[test]
    fn test_handshake_resubscribes_and_republishes() {
        let (events, _rx) = flume::unbounded();
        let (shared, _outgoing) = Shared::new(ServerConfig::default(), events);
        let ip = TopicPath::from("/SmartDashboard/BlackMesa/driverStationIP");
        shared.subscribe(&state_topic());
        shared.set(&ip, Value::from("10.4.88.5")).expect("set");

        let messages = shared.open_session().expect("handshake");
        assert_eq!(messages.len(), 3);
        assert!(shared.is_connected());

        let Message::Text(text) = &messages[1] else {
            panic!("expected control frame");
        };
        let control = codec::decode_control(text).expect("decode");
        assert!(control.iter().any(|m| matches!(
            m,
            ControlMessage::Subscribe { topics, .. } if topics == &vec![state_topic().to_string()]
        )));
        assert!(control.iter().any(|m| matches!(
            m,
            ControlMessage::Publish { name, .. } if name == ip.as_str()
        )));

        let Message::Binary(frame) = &messages[2] else {
            panic!("expected value frame");
        };
        let values = codec::decode_values(frame).expect("decode");
        assert_eq!(values[0].payload, FramePayload::Scalar(Value::from("10.4.88.5")));
    }

    #[test]
    fn test_write_during_handshake_is_queued() {
        let (events, _rx) = flume::unbounded();
        let (shared, mut outgoing) = Shared::new(ServerConfig::default(), events);
        let counter = TopicPath::from("/SmartDashboard/BlackMesa/streamingForceRestartCount");

        let snapshot = shared.open_session().expect("handshake");
        // only the time sync ping: nothing was published yet
        assert_eq!(snapshot.len(), 1);

        // a click landing while the snapshot is being sent
        shared.set(&counter, Value::from(1_i64)).expect("set");

        let queued: Vec<Message> = std::iter::from_fn(|| outgoing.try_recv().ok()).collect();
        assert_eq!(queued.len(), 2);
        let Message::Text(text) = &queued[0] else {
            panic!("expected publish text frame");
        };
        assert!(matches!(
            &codec::decode_control(text).expect("decode")[0],
            ControlMessage::Publish { name, .. } if name == counter.as_str()
        ));
        let Message::Binary(frame) = &queued[1] else {
            panic!("expected value frame");
        };
        let values = codec::decode_values(frame).expect("decode");
        assert_eq!(values[0].payload, FramePayload::Scalar(Value::from(1_i64)));
    }

    #[test]
    fn test_subscribe_during_handshake_is_queued() {
        let (events, _rx) = flume::unbounded();
        let (shared, mut outgoing) = Shared::new(ServerConfig::default(), events);

        shared.open_session().expect("handshake");
        shared.subscribe(&state_topic());

        let Ok(Message::Text(text)) = outgoing.try_recv() else {
            panic!("expected subscribe text frame");
        };
        assert!(matches!(
            &codec::decode_control(&text).expect("decode")[0],
            ControlMessage::Subscribe { topics, .. } if topics == &vec![state_topic().to_string()]
        ));
    }

    #[test]
    fn test_set_respects_announced_type() {
        let (events, _rx) = flume::unbounded();
        let (shared, _outgoing) = Shared::new(ServerConfig::default(), events);
        let counter = TopicPath::from("/SmartDashboard/BlackMesa/streamingForceRestartCount");

        shared.handle_text(&announce(counter.as_str(), 5, "double"));

        let err = shared.set(&counter, Value::from(1_i64)).expect_err("mismatch");
        assert!(matches!(err, Error::TypeMismatch { expected: "double", actual: "int", .. }));
        assert!(shared.values.read().get(&counter).is_none());

        shared.set(&counter, Value::from(1.0)).expect("set");
        assert_eq!(shared.values.read().get(&counter), Some(&Value::from(1.0)));
    }

    #[test]
    fn test_unannounce_forgets_type() {
        let (events, _rx) = flume::unbounded();
        let (shared, _outgoing) = Shared::new(ServerConfig::default(), events);
        let counter = TopicPath::from("/SmartDashboard/BlackMesa/streamingForceRestartCount");

        shared.handle_text(&announce(counter.as_str(), 5, "string"));
        let unannounce = codec::encode_control(&[ControlMessage::Unannounce {
            name: counter.to_string(),
            id: 5,
        }])
        .expect("encode");
        shared.handle_text(&unannounce);

        shared.set(&counter, Value::from(1_i64)).expect("set");
    }

    #[test]
    fn test_time_sync_sets_offset() {
        let (events, _rx) = flume::unbounded();
        let (shared, _outgoing) = Shared::new(ServerConfig::default(), events);
        assert_eq!(shared.server_time_us(), 0);

        let sent = now_us();
        let reply = rmp_serde::to_vec(&(TIME_SYNC_TOPIC, 5_000_000_i64, 2_u8, sent)).expect("encode");
        shared.handle_binary(&reply);

        assert!(shared.time_synced.load(Ordering::SeqCst));
        let server_now = shared.server_time_us();
        assert!((4_000_000..7_000_000).contains(&server_now));
    }

    /// Run a session against a local server that picks `protocol`
    async fn session_with_protocol(protocol: &'static str) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();
        let config = ServerConfig {
            address: Some("127.0.0.1".to_string()),
            port,
            ..Default::default()
        };
        let (events, rx) = flume::unbounded();
        let client = Nt4Client::start(config, events);
        client.subscribe(&state_topic());

        let (stream, _) = listener.accept().await.expect("accept");
        let mut socket = tokio_tungstenite::accept_hdr_async(
            stream,
            move |_request: &Request, mut response: Response| {
                response.headers_mut().insert(
                    "Sec-WebSocket-Protocol",
                    HeaderValue::from_static(protocol),
                );
                Ok::<Response, ErrorResponse>(response)
            },
        )
        .await
        .expect("server handshake");

        let mut subscribed = false;
        while !subscribed {
            let message = socket.next().await.expect("message").expect("frame");
            if let Message::Text(text) = message {
                subscribed = codec::decode_control(&text)
                    .expect("control")
                    .iter()
                    .any(|m| matches!(
                        m,
                        ControlMessage::Subscribe { topics, .. } if topics.contains(&state_topic().to_string())
                    ));
            }
        }

        socket
            .send(Message::Text(announce(state_topic().as_str(), 3, "string")))
            .await
            .expect("send announce");
        socket
            .send(Message::Binary(
                codec::encode_value(3, 10, &Value::from("streaming")).expect("encode"),
            ))
            .await
            .expect("send value");

        let value = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                match rx.recv_async().await {
                    Ok(AppEvent::TopicValue { topic, value }) if topic == state_topic() => {
                        break value;
                    }
                    Ok(_) => continue,
                    Err(_) => panic!("event channel closed"),
                }
            }
        })
        .await
        .expect("value in time");

        assert_eq!(value, Value::from("streaming"));
        assert!(client.is_connected());
        assert_eq!(client.get(&state_topic()), Some(Value::from("streaming")));
        client.shutdown();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_session_against_local_server() {
        session_with_protocol("v4.1.networktables.first.wpi.edu").await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_session_against_v40_server() {
        session_with_protocol("networktables.first.wpi.edu").await;
    }
}
