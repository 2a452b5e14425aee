//! Constants
//!
//! Centralized UI and protocol constants.

/// Default window dimensions
pub const DEFAULT_WINDOW_WIDTH: f32 = 560.0;
pub const DEFAULT_WINDOW_HEIGHT: f32 = 640.0;

/// Width of the caption column in the dashboard grid
pub const CAPTION_COLUMN_WIDTH: f32 = 220.0;

/// Header height
pub const HEADER_HEIGHT: f32 = 44.0;

/// Log panel heights (expanded / collapsed)
pub const LOG_PANEL_HEIGHT: f32 = 150.0;
pub const LOG_PANEL_COLLAPSED_HEIGHT: f32 = 32.0;

/// Log ring buffer capacity and the number of rows rendered
pub const LOG_CAPACITY: usize = 1000;
pub const LOG_VISIBLE_ENTRIES: usize = 50;

/// Team whose robot the dashboard connects to by default
pub const DEFAULT_TEAM: u16 = 488;

/// NetworkTables 4 WebSocket port
pub const NT4_PORT: u16 = 5810;

/// Client identity announced to the server
pub const DEFAULT_CLIENT_NAME: &str = "xdash";

/// WebSocket subprotocols, newest first. No spaces: the server's choice is
/// matched against each entry verbatim.
pub const NT4_SUBPROTOCOLS: &str = "v4.1.networktables.first.wpi.edu,networktables.first.wpi.edu";

/// Per-address connect timeout
pub const CONNECT_TIMEOUT_MS: u64 = 2000;

/// Interval between time-sync pings while connected
pub const TIME_SYNC_INTERVAL_SECS: u64 = 3;

/// Host publisher cadence
pub const HOST_POLL_INTERVAL_MS: u64 = 1000;

/// Retry configuration
pub const RETRY_INITIAL_DELAY_MS: u64 = 500;
pub const RETRY_MAX_DELAY_MS: u64 = 5000;
pub const RETRY_MULTIPLIER: f64 = 2.0;
pub const RETRY_JITTER: f64 = 0.1;
