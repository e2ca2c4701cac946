//! Formatted output of an event

use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a sink receives: the rendered description of one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub timestamp: DateTime<Utc>,
    /// Level of the originating event, used for stream routing and color
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub level: Option<LogLevel>,
    pub description: String,
}

impl Record {
    pub fn new(timestamp: DateTime<Utc>, level: Option<LogLevel>, description: String) -> Self {
        Self {
            timestamp,
            level,
            description,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}
