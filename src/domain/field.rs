//! Field - Dashboard Grid Rows
//!
//! The grid is fixed: every row is declared here, in display order.

use crate::telemetry::{TopicLayout, TopicPath, Value};

/// Topic the driver station IP is published to
pub const DRIVER_STATION_IP: &str = "driverStationIP";
/// Topic the driver station connectivity flag is published to
pub const DRIVER_STATION_CONNECTED: &str = "driverStationConnected";
/// Counter incremented to request a camera stream restart
pub const FORCE_RESTART_COUNT: &str = "streamingForceRestartCount";

pub const STREAMING_STATE: &str = "state";
pub const STREAMING_ERROR: &str = "streamingError";
pub const STREAMING_URL: &str = "streamingUrl";
pub const STREAMING_ITERATION: &str = "streamingIteration";
pub const ROUND_COUNT: &str = "roundCount";
pub const TIMER: &str = "timer";

/// Group holding the autonomous routine parameters
pub const AUTONOMOUS_GROUP: &str = "autonomous";
pub const AUTO_PROGRAM: &str = "program";
pub const AUTO_START_POSITION: &str = "startPosition";
pub const AUTO_DELAY: &str = "delay";

/// Where a row gets its text from
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSource {
    /// A telemetry topic, showing `default` until the first update
    Topic { path: TopicPath, default: Value },
    /// Connection status of the telemetry client
    Connection,
}

/// One caption/value row
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub caption: &'static str,
    pub source: FieldSource,
}

impl FieldSpec {
    fn topic(caption: &'static str, path: TopicPath, default: impl Into<Value>) -> Self {
        Self {
            caption,
            source: FieldSource::Topic {
                path,
                default: default.into(),
            },
        }
    }

    /// Text shown before any update arrives
    pub fn initial_text(&self) -> String {
        match &self.source {
            FieldSource::Topic { default, .. } => default.to_string(),
            FieldSource::Connection => false.to_string(),
        }
    }

    pub fn topic_path(&self) -> Option<&TopicPath> {
        match &self.source {
            FieldSource::Topic { path, .. } => Some(path),
            FieldSource::Connection => None,
        }
    }
}

/// Rows of the dashboard grid, top to bottom
pub fn dashboard_fields(layout: &TopicLayout) -> Vec<FieldSpec> {
    vec![
        FieldSpec::topic("Driver Station IP", layout.topic(DRIVER_STATION_IP), ""),
        FieldSpec {
            caption: "Robot Connected",
            source: FieldSource::Connection,
        },
        FieldSpec::topic("Streaming Status", layout.topic(STREAMING_STATE), ""),
        FieldSpec::topic("Streaming Error", layout.topic(STREAMING_ERROR), ""),
        FieldSpec::topic("Streaming Server URL", layout.topic(STREAMING_URL), ""),
        FieldSpec::topic(
            "Streaming Restart Count",
            layout.topic(STREAMING_ITERATION),
            "",
        ),
        FieldSpec::topic(
            "Streaming Force Restart Count",
            layout.topic(FORCE_RESTART_COUNT),
            0_i64,
        ),
        FieldSpec::topic("Round Count", layout.topic(ROUND_COUNT), 0_i64),
        FieldSpec::topic("Timer", layout.topic(TIMER), 0.0),
        FieldSpec::topic(
            "Auto Program",
            layout.nested(AUTONOMOUS_GROUP, AUTO_PROGRAM),
            "",
        ),
        FieldSpec::topic(
            "Auto Start Position",
            layout.nested(AUTONOMOUS_GROUP, AUTO_START_POSITION),
            "",
        ),
        FieldSpec::topic(
            "Auto Delay",
            layout.nested(AUTONOMOUS_GROUP, AUTO_DELAY),
            0.0,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topics_are_unique() {
        let fields = dashboard_fields(&TopicLayout::default());
        let mut paths: Vec<_> = fields.iter().filter_map(FieldSpec::topic_path).collect();
        let total = paths.len();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), total);
    }

    #[test]
    fn test_initial_text_uses_defaults() {
        let fields = dashboard_fields(&TopicLayout::default());
        let text = |caption: &str| {
            fields
                .iter()
                .find(|f| f.caption == caption)
                .map(FieldSpec::initial_text)
                .expect("field")
        };
        assert_eq!(text("Streaming Status"), "");
        assert_eq!(text("Streaming Force Restart Count"), "0");
        assert_eq!(text("Timer"), "0.0");
        assert_eq!(text("Robot Connected"), "false");
    }

    #[test]
    fn test_autonomous_fields_are_nested() {
        let fields = dashboard_fields(&TopicLayout::default());
        let program = fields
            .iter()
            .find(|f| f.caption == "Auto Program")
            .and_then(FieldSpec::topic_path)
            .expect("auto program");
        assert_eq!(program.as_str(), "/SmartDashboard/BlackMesa/autonomous/program");
    }
}
