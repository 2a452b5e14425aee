//! Config - Application Configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CONNECT_TIMEOUT_MS, DEFAULT_CLIENT_NAME, DEFAULT_TEAM, HOST_POLL_INTERVAL_MS, NT4_PORT,
};
use crate::telemetry::TopicLayout;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Telemetry server
    pub server: ServerConfig,
    /// Table layout of the dashboard topics
    pub topics: TopicLayout,
    /// Driver station address publisher
    pub host: HostConfig,
    /// Logging options
    pub logging: LoggingConfig,
}

/// Telemetry server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Team number used to derive the robot address
    pub team: Option<u16>,
    /// Explicit server host (e.g. "127.0.0.1" for a simulator); overrides `team`
    pub address: Option<String>,
    /// NT4 port
    pub port: u16,
    /// Client identity announced to the server
    pub client_name: String,
    /// Per-address connect timeout in milliseconds
    pub connect_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            team: Some(DEFAULT_TEAM),
            address: None,
            port: NT4_PORT,
            client_name: DEFAULT_CLIENT_NAME.to_string(),
            connect_timeout_ms: CONNECT_TIMEOUT_MS,
        }
    }
}

impl ServerConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms.max(1))
    }

    /// Short description for the header
    pub fn describe(&self) -> String {
        match (&self.address, self.team) {
            (Some(address), _) if !address.trim().is_empty() => {
                format!("{}:{}", address.trim(), self.port)
            }
            (_, Some(team)) => format!("team {team}"),
            _ => format!("127.0.0.1:{}", self.port),
        }
    }
}

/// Driver station address publisher configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HostConfig {
    /// Publish cadence in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: HOST_POLL_INTERVAL_MS,
        }
    }
}

impl HostConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    pub level: String,
    /// Also write a daily-rolling log file in the data directory
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: true,
        }
    }
}
