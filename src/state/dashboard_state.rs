//! DashboardState - Label Text for Every Grid Row
//!
//! Each row shows its declared default until the first update for its topic,
//! then the most recent value, stringified. Updates for topics no row is
//! bound to are ignored.

use std::collections::HashMap;

use crate::domain::field::{FieldSource, FieldSpec};
use crate::telemetry::{TopicPath, Value};

/// A rendered grid row
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRow {
    pub caption: &'static str,
    pub text: String,
}

/// State for the dashboard grid
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    rows: Vec<FieldRow>,
    by_topic: HashMap<TopicPath, usize>,
    connection_rows: Vec<usize>,
}

impl DashboardState {
    /// Build rows from field specs, each showing its default
    pub fn new(fields: &[FieldSpec]) -> Self {
        let mut state = Self::default();
        for (index, field) in fields.iter().enumerate() {
            state.rows.push(FieldRow {
                caption: field.caption,
                text: field.initial_text(),
            });
            match &field.source {
                FieldSource::Topic { path, .. } => {
                    state.by_topic.insert(path.clone(), index);
                }
                FieldSource::Connection => state.connection_rows.push(index),
            }
        }
        state
    }

    /// Apply a topic update. Returns whether a row changed.
    pub fn apply(&mut self, topic: &TopicPath, value: &Value) -> bool {
        let Some(&index) = self.by_topic.get(topic) else {
            return false;
        };
        let text = value.to_string();
        let row = &mut self.rows[index];
        if row.text == text {
            return false;
        }
        row.text = text;
        true
    }

    /// Reflect the telemetry connection status in connection rows
    pub fn set_connected(&mut self, connected: bool) -> bool {
        let text = connected.to_string();
        let mut changed = false;
        for &index in &self.connection_rows {
            let row = &mut self.rows[index];
            if row.text != text {
                row.text = text.clone();
                changed = true;
            }
        }
        changed
    }

    pub fn rows(&self) -> &[FieldRow] {
        &self.rows
    }

    /// Current text of the row with the given caption
    pub fn text(&self, caption: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.caption == caption)
            .map(|row| row.text.as_str())
    }
}
