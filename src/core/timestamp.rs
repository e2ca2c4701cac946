//! Timestamp formats used by the `Timestamp` formatter component and the
//! JSON formatter.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// How an event's creation time is rendered
///
/// # Examples
///
/// ```
/// use logtree::TimestampFormat;
/// use chrono::Utc;
///
/// let rendered = TimestampFormat::Iso8601.format(&Utc::now());
/// assert!(rendered.ends_with('Z'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// `2025-01-08T10:30:45.123456+00:00`
    Rfc3339,

    /// `2025-01-08 10:30:45.123` in UTC, the format of the `Full` style
    DateTimeMillis,

    /// Same as `DateTimeMillis` but in the local time zone
    LocalDateTimeMillis,

    /// Milliseconds since the Unix epoch
    UnixMillis,

    /// Any strftime-compatible format string, rendered in UTC. A string
    /// chrono can't render falls back to `Iso8601`.
    Custom(String),
}

impl TimestampFormat {
    /// `Custom` format, rejecting strftime strings chrono can't render
    pub fn custom(format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            return Err(LoggerError::config(
                "TimestampFormat",
                format!("invalid strftime format '{}'", format),
            ));
        }
        Ok(TimestampFormat::Custom(format))
    }

    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::DateTimeMillis => {
                datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
            }
            TimestampFormat::LocalDateTimeMillis => datetime
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S%.3f")
                .to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => {
                let mut rendered = String::new();
                match write!(rendered, "{}", datetime.format(format_str)) {
                    Ok(()) => rendered,
                    Err(_) => TimestampFormat::Iso8601.format(datetime),
                }
            }
        }
    }

    /// Renders numeric formats as JSON numbers, everything else as strings
    pub(crate) fn to_json_value(&self, datetime: &DateTime<Utc>) -> serde_json::Value {
        match self {
            TimestampFormat::UnixMillis => {
                serde_json::Value::Number(datetime.timestamp_millis().into())
            }
            _ => serde_json::Value::String(self.format(datetime)),
        }
    }
}
