//! Rendering of events into records
//!
//! Two shapes are supported:
//! - Text: a sequence of components joined without separators, followed by
//!   bracketed suffixes for elapsed time, attached errors and the
//!   "logged once" marker
//! - Json: one JSON object per event

use super::event::Event;
use super::record::Record;
use super::timestamp::TimestampFormat;

/// One piece of a text formatter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    /// Literal text
    Text(String),
    /// The event's creation time
    Timestamp(TimestampFormat),
    /// Key path of the originating logger
    Logger,
    /// Uppercase level name, `UNSPECIFIED` for events without level
    Level,
    /// The forced message
    Message,
    /// Module path of the call site, `<unknown>` when not captured
    Module,
    /// File of the call site
    File,
    /// Line of the call site
    Line,
}

impl Component {
    pub fn text(text: impl Into<String>) -> Self {
        Component::Text(text.into())
    }

    fn render(&self, event: &Event<'_>, out: &mut String) {
        match self {
            Component::Text(text) => out.push_str(text),
            Component::Timestamp(format) => out.push_str(&format.format(&event.timestamp())),
            Component::Logger => out.push_str(&event.logger().to_string()),
            Component::Level => out.push_str(
                event
                    .level()
                    .map(|level| level.as_upper_str())
                    .unwrap_or("UNSPECIFIED"),
            ),
            Component::Message => out.push_str(&event.message().to_string()),
            Component::Module => {
                out.push_str(event.call_site().module_path.unwrap_or("<unknown>"))
            }
            Component::File => out.push_str(event.call_site().file),
            Component::Line => out.push_str(&event.call_site().line.to_string()),
        }
    }
}

/// Predefined formatter layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// `[Logger|LEVEL] message`
    Default,
    /// `message`
    Simple,
    /// `2025-01-08 10:30:45.123 [Logger|LEVEL] message`
    Full,
    /// `{"timestamp":...,"logger":...,"level":...,"message":...}`
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formatter {
    Text(Vec<Component>),
    Json { timestamp_format: TimestampFormat },
}

impl Formatter {
    pub fn new(components: Vec<Component>) -> Self {
        Formatter::Text(components)
    }

    pub fn style(style: Style) -> Self {
        let default_components = || {
            vec![
                Component::text("["),
                Component::Logger,
                Component::text("|"),
                Component::Level,
                Component::text("] "),
                Component::Message,
            ]
        };

        match style {
            Style::Default => Formatter::Text(default_components()),
            Style::Simple => Formatter::Text(vec![Component::Message]),
            Style::Full => {
                let mut components = vec![
                    Component::Timestamp(TimestampFormat::DateTimeMillis),
                    Component::text(" "),
                ];
                components.extend(default_components());
                Formatter::Text(components)
            }
            Style::Json => Formatter::Json {
                timestamp_format: TimestampFormat::default(),
            },
        }
    }

    pub fn json() -> Self {
        Self::style(Style::Json)
    }

    /// Produces the record a handler passes on to its sink
    pub fn record_for_event(&self, event: &Event<'_>) -> Record {
        Record::new(event.timestamp(), event.level(), self.string_for_event(event))
    }

    pub fn string_for_event(&self, event: &Event<'_>) -> String {
        match self {
            Formatter::Text(components) => Self::format_text(components, event),
            Formatter::Json { timestamp_format } => Self::format_json(timestamp_format, event),
        }
    }

    fn format_text(components: &[Component], event: &Event<'_>) -> String {
        let mut out = String::new();
        for component in components {
            component.render(event, &mut out);
        }

        if let Some(elapsed) = event.elapsed() {
            out.push_str(&format!(" [ELAPSED TIME: {:.6}s]", elapsed.as_secs_f64()));
        }

        if let Some(error) = event.error() {
            out.push_str(&format!(" [ERROR: {:?}]", error));
        }

        if event.is_once() {
            out.push_str(" [ONLY LOGGED ONCE]");
        }

        out
    }

    fn format_json(timestamp_format: &TimestampFormat, event: &Event<'_>) -> String {
        let mut json_obj = serde_json::Map::new();

        json_obj.insert(
            "timestamp".to_string(),
            timestamp_format.to_json_value(&event.timestamp()),
        );
        json_obj.insert(
            "logger".to_string(),
            serde_json::Value::String(event.logger().to_string()),
        );
        if let Some(level) = event.level() {
            json_obj.insert(
                "level".to_string(),
                serde_json::Value::String(level.as_upper_str().to_string()),
            );
        }
        json_obj.insert(
            "message".to_string(),
            serde_json::Value::String(event.message().to_string()),
        );

        let call_site = event.call_site();
        json_obj.insert(
            "file".to_string(),
            serde_json::Value::String(call_site.file.to_string()),
        );
        json_obj.insert(
            "line".to_string(),
            serde_json::Value::Number(call_site.line.into()),
        );
        if let Some(module_path) = call_site.module_path {
            json_obj.insert(
                "module_path".to_string(),
                serde_json::Value::String(module_path.to_string()),
            );
        }

        if let Some(elapsed) = event.elapsed() {
            if let Some(seconds) = serde_json::Number::from_f64(elapsed.as_secs_f64()) {
                json_obj.insert("elapsed_seconds".to_string(), serde_json::Value::Number(seconds));
            }
        }
        if let Some(error) = event.error() {
            json_obj.insert(
                "error".to_string(),
                serde_json::Value::String(format!("{:?}", error)),
            );
        }
        if event.is_once() {
            json_obj.insert("once".to_string(), serde_json::Value::Bool(true));
        }

        serde_json::to_string(&serde_json::Value::Object(json_obj)).unwrap_or_default()
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::style(Style::Default)
    }
}
