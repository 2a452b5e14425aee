//! NT4 wire codec
//!
//! Text frames carry JSON arrays of control messages. Binary frames carry
//! concatenated MessagePack arrays `[topic_id, timestamp_us, type_id, value]`.

use std::io::Cursor;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::Result;
use crate::telemetry::Value;

/// Topic id reserved for round-trip time synchronization
pub const TIME_SYNC_TOPIC: i64 = -1;

/// Control message exchanged in text frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "lowercase")]
pub enum ControlMessage {
    Publish {
        name: String,
        pubuid: i64,
        #[serde(rename = "type")]
        type_name: String,
        #[serde(default)]
        properties: Map<String, JsonValue>,
    },
    Unpublish {
        pubuid: i64,
    },
    Subscribe {
        topics: Vec<String>,
        subuid: i64,
        #[serde(default)]
        options: SubscribeOptions,
    },
    Unsubscribe {
        subuid: i64,
    },
    Announce {
        name: String,
        id: i64,
        #[serde(rename = "type")]
        type_name: String,
        #[serde(default)]
        pubuid: Option<i64>,
        #[serde(default)]
        properties: Map<String, JsonValue>,
    },
    Unannounce {
        name: String,
        id: i64,
    },
    Properties {
        name: String,
        #[serde(default)]
        ack: Option<bool>,
        #[serde(default)]
        update: Map<String, JsonValue>,
    },
}

/// Subscription options; unset fields take the server defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscribeOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub periodic: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topicsonly: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<bool>,
}

/// Encode control messages as one text frame
pub fn encode_control(messages: &[ControlMessage]) -> Result<String> {
    Ok(serde_json::to_string(messages)?)
}

/// Decode a text frame. Messages with unknown methods are skipped.
pub fn decode_control(text: &str) -> Result<Vec<ControlMessage>> {
    let raw: Vec<JsonValue> = serde_json::from_str(text)?;
    let mut messages = Vec::with_capacity(raw.len());
    for entry in raw {
        match serde_json::from_value::<ControlMessage>(entry) {
            Ok(message) => messages.push(message),
            Err(e) => tracing::debug!("Skipping NT4 control message: {}", e),
        }
    }
    Ok(messages)
}

/// Payload of one binary frame entry
#[derive(Debug, Clone, PartialEq)]
pub enum FramePayload {
    Scalar(Value),
    /// Array, raw or otherwise unsupported data of the given type id
    Unsupported(u8),
}

/// One `[topic_id, timestamp_us, type_id, value]` entry
#[derive(Debug, Clone, PartialEq)]
pub struct ValueFrame {
    pub topic_id: i64,
    pub timestamp_us: i64,
    pub payload: FramePayload,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireIn {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Other(serde::de::IgnoredAny),
}

#[derive(Serialize)]
#[serde(untagged)]
enum WireOut<'a> {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'a str),
}

impl<'a> From<&'a Value> for WireOut<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Boolean(b) => WireOut::Bool(*b),
            Value::Double(d) => WireOut::Float(*d),
            Value::Integer(n) => WireOut::Int(*n),
            Value::String(s) => WireOut::Str(s),
        }
    }
}

fn to_scalar(type_id: u8, wire: WireIn) -> FramePayload {
    match (type_id, wire) {
        (0, WireIn::Bool(b)) => FramePayload::Scalar(Value::Boolean(b)),
        (1 | 3, WireIn::Float(d)) => FramePayload::Scalar(Value::Double(d)),
        (1 | 3, WireIn::Int(n)) => FramePayload::Scalar(Value::Double(n as f64)),
        (2, WireIn::Int(n)) => FramePayload::Scalar(Value::Integer(n)),
        (2, WireIn::Float(d)) => FramePayload::Scalar(Value::Integer(d as i64)),
        (4, WireIn::Str(s)) => FramePayload::Scalar(Value::String(s)),
        (type_id, _) => FramePayload::Unsupported(type_id),
    }
}

/// Encode one value entry
pub fn encode_value(topic_id: i64, timestamp_us: i64, value: &Value) -> Result<Vec<u8>> {
    Ok(rmp_serde::to_vec(&(
        topic_id,
        timestamp_us,
        value.type_id(),
        WireOut::from(value),
    ))?)
}

/// Encode a time-sync ping carrying the local send time
pub fn encode_time_sync(client_us: i64) -> Result<Vec<u8>> {
    Ok(rmp_serde::to_vec(&(TIME_SYNC_TOPIC, 0_i64, 2_u8, client_us))?)
}

/// Decode every entry of a binary frame
pub fn decode_values(frame: &[u8]) -> Result<Vec<ValueFrame>> {
    let mut cursor = Cursor::new(frame);
    let mut frames = Vec::new();
    while (cursor.position() as usize) < frame.len() {
        let (topic_id, timestamp_us, type_id, wire): (i64, i64, u8, WireIn) =
            rmp_serde::from_read(&mut cursor)?;
        frames.push(ValueFrame {
            topic_id,
            timestamp_us,
            payload: to_scalar(type_id, wire),
        });
    }
    Ok(frames)
}
