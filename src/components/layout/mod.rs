//! Layout Components
//!
//! Header and log panel framing the dashboard page.

pub mod header;
pub mod log_panel;
