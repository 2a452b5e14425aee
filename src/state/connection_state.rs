//! ConnectionState - Telemetry Connection Status

/// State of the telemetry server connection
#[derive(Debug, Clone, Default)]
pub struct ConnectionState {
    connected: bool,
    detail: Option<String>,
}

impl ConnectionState {
    /// Set the current status
    pub fn set_status(&mut self, connected: bool, detail: Option<String>) {
        self.connected = connected;
        self.detail = detail;
    }

    /// Check if the client is connected
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Server address or backoff message
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}
