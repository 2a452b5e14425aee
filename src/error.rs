//! Error types for XDash
//!
//! Centralized error handling using snafu for ergonomic error definitions.

use snafu::Snafu;

/// Main error type for the application
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// IO error (file operations, socket lookups, etc.)
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// JSON serialization/deserialization error
    #[snafu(display("JSON error: {source}"))]
    Json { source: serde_json::Error },

    /// MessagePack encode error
    #[snafu(display("MessagePack encode error: {source}"))]
    MsgPackEncode { source: rmp_serde::encode::Error },

    /// MessagePack decode error
    #[snafu(display("MessagePack decode error: {source}"))]
    MsgPackDecode { source: rmp_serde::decode::Error },

    /// WebSocket transport error
    #[snafu(display("WebSocket error: {source}"))]
    WebSocket {
        source: Box<tokio_tungstenite::tungstenite::Error>,
    },

    /// Timeout error
    #[snafu(display("Timeout: {message}"))]
    Timeout { message: String },

    /// Local hostname or address lookup failed
    #[snafu(display("Address resolution failed: {message}"))]
    Resolve { message: String },

    /// A topic was written with a type other than the one it is published as
    #[snafu(display("Topic {topic} is published as {expected}, cannot write {actual}"))]
    TypeMismatch {
        topic: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Json { source }
    }
}

impl From<rmp_serde::encode::Error> for Error {
    fn from(source: rmp_serde::encode::Error) -> Self {
        Error::MsgPackEncode { source }
    }
}

impl From<rmp_serde::decode::Error> for Error {
    fn from(source: rmp_serde::decode::Error) -> Self {
        Error::MsgPackDecode { source }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(source: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::WebSocket {
            source: Box::new(source),
        }
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;
