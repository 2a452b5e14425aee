//! XDash Library
//!
//! Driver-station dashboard for a robot telemetry network: mirrors a fixed
//! set of NetworkTables topics into a caption/value grid, republishes the
//! driver station's own address, and lets the operator request a stream
//! restart.

pub mod app;
pub mod components;
pub mod constants;
pub mod domain;
pub mod error;
pub mod eventing;
pub mod features;
pub mod logging;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod theme;
pub mod utils;
