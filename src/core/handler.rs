//! Handlers: level filter + formatter + sink

use super::{
    error::Result, event::Event, formatter::Formatter, formatter::Style, log_level::LogLevel,
    sink::Sink,
};
use crate::sinks::{FileSink, StenographySink};
use parking_lot::RwLock;
use std::fmt;
use std::path::PathBuf;

#[cfg(feature = "console")]
use crate::sinks::ConsoleSink;

/// Consumes events on behalf of one or more loggers.
///
/// A handler applies its own optional level filter independently of the
/// logger it is attached to, renders the event with its formatter and hands
/// the resulting record to its sink.
pub struct Handler {
    level: RwLock<Option<LogLevel>>,
    formatter: RwLock<Formatter>,
    sink: Box<dyn Sink>,
}

impl Handler {
    pub fn new<S: Sink + 'static>(sink: S, formatter: Formatter) -> Self {
        Self {
            level: RwLock::new(None),
            formatter: RwLock::new(formatter),
            sink: Box::new(sink),
        }
    }

    /// Console handler with the default formatter
    #[cfg(feature = "console")]
    pub fn console() -> Self {
        Self::new(ConsoleSink::new(), Formatter::default())
    }

    /// File handler with the `Full` formatter. Fails if the file can't be
    /// opened or created.
    pub fn file(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(FileSink::new(path)?, Formatter::style(Style::Full)))
    }

    /// Handler recording into the given stenography sink
    pub fn stenography(sink: &StenographySink) -> Self {
        Self::new(sink.clone(), Formatter::default())
    }

    #[must_use]
    pub fn with_level(self, level: impl Into<Option<LogLevel>>) -> Self {
        self.set_level(level);
        self
    }

    #[must_use]
    pub fn with_formatter(self, formatter: Formatter) -> Self {
        self.set_formatter(formatter);
        self
    }

    pub fn level(&self) -> Option<LogLevel> {
        *self.level.read()
    }

    pub fn set_level(&self, level: impl Into<Option<LogLevel>>) {
        *self.level.write() = level.into();
    }

    pub fn formatter(&self) -> Formatter {
        self.formatter.read().clone()
    }

    pub fn set_formatter(&self, formatter: Formatter) {
        *self.formatter.write() = formatter;
    }

    pub fn name(&self) -> &str {
        self.sink.name()
    }

    /// Filters, formats and emits one event.
    ///
    /// Returns `Ok(false)` when the handler's level filtered the event out
    /// or its message could not be produced.
    pub fn emit_event(&self, event: &Event<'_>) -> Result<bool> {
        if !LogLevel::passes(event.level(), self.level()) {
            return Ok(false);
        }
        event.message();
        if event.message_failure().is_some() {
            return Ok(false);
        }

        let record = self.formatter.read().record_for_event(event);
        self.sink.emit(&record)?;
        Ok(true)
    }

    pub fn flush(&self) -> Result<()> {
        self.sink.flush()
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("sink", &self.name())
            .field("level", &self.level())
            .field("formatter", &*self.formatter.read())
            .finish()
    }
}
