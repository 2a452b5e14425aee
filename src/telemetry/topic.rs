//! Topic - Topic Paths and Table Layout

use std::fmt;

use serde::{Deserialize, Serialize};

/// Absolute path of a topic, e.g. `/SmartDashboard/BlackMesa/state`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TopicPath(String);

impl TopicPath {
    /// Build a path from table segments. Empty segments and stray slashes are dropped.
    pub fn from_segments<'a>(segments: impl IntoIterator<Item = &'a str>) -> Self {
        let mut path = String::new();
        for segment in segments {
            for part in segment.split('/').filter(|p| !p.is_empty()) {
                path.push('/');
                path.push_str(part);
            }
        }
        Self(path)
    }

    /// Wrap a full topic name as received from the server
    pub fn from_name(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TopicPath {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

/// Root table and subtable under which all dashboard topics live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicLayout {
    /// Root table (e.g. "SmartDashboard")
    pub root: String,
    /// Named subtable (e.g. "BlackMesa")
    pub subtable: String,
}

impl Default for TopicLayout {
    fn default() -> Self {
        Self {
            root: "SmartDashboard".to_string(),
            subtable: "BlackMesa".to_string(),
        }
    }
}

impl TopicLayout {
    /// Topic directly under the subtable
    pub fn topic(&self, name: &str) -> TopicPath {
        TopicPath::from_segments([self.root.as_str(), self.subtable.as_str(), name])
    }

    /// Topic inside a nested group of the subtable
    pub fn nested(&self, group: &str, name: &str) -> TopicPath {
        TopicPath::from_segments([self.root.as_str(), self.subtable.as_str(), group, name])
    }
}
