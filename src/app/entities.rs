//! AppEntities - Global Entity Handles
//!
//! All global GPUI entities are collected here for easy access and management.
//! State is split by update frequency: field values change constantly, the
//! connection rarely.

use gpui::{App, AppContext, Entity, Global};

use crate::domain::field::FieldSpec;
use crate::state::{
    connection_state::ConnectionState, dashboard_state::DashboardState, log_state::LogState,
};

/// Collection of all global Entity handles
#[derive(Clone)]
pub struct AppEntities {
    /// Label text for every grid row
    pub dashboard: Entity<DashboardState>,
    /// Telemetry connection status
    pub connection: Entity<ConnectionState>,
    /// Log messages (ring buffer)
    pub logs: Entity<LogState>,
}

impl Global for AppEntities {}

impl AppEntities {
    /// Initialize all entities, the grid showing each field's default
    pub fn init(fields: &[FieldSpec], cx: &mut App) -> Self {
        Self {
            dashboard: cx.new(|_| DashboardState::new(fields)),
            connection: cx.new(|_| ConnectionState::default()),
            logs: cx.new(|_| LogState::default()),
        }
    }
}
