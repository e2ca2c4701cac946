//! Log event structure

use super::log_level::LogLevel;
use super::logger::Logger;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cell::{OnceCell, RefCell};
use std::any::Any;
use std::error::Error;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

/// Source location of a logging call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
    pub module_path: Option<&'static str>,
}

impl CallSite {
    pub const fn new(file: &'static str, line: u32, column: u32, module_path: &'static str) -> Self {
        Self {
            file,
            line,
            column,
            module_path: Some(module_path),
        }
    }

    /// Location of the caller of the enclosing `#[track_caller]` function
    #[track_caller]
    pub fn caller() -> Self {
        let location = std::panic::Location::caller();
        Self {
            file: location.file(),
            line: location.line(),
            column: location.column(),
            module_path: None,
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)?;
        if let Some(module_path) = self.module_path {
            write!(f, " {}", module_path)?;
        }
        Ok(())
    }
}

/// Value produced by a message thunk
pub enum Message {
    Text(String),
    Error(Box<dyn Error + Send + Sync>),
}

impl Message {
    pub fn error(error: impl Error + Send + Sync + 'static) -> Self {
        Message::Error(Box::new(error))
    }
}

impl Default for Message {
    fn default() -> Self {
        Message::Text(String::new())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Text(text) => f.write_str(text),
            // Error values show their debug description
            Message::Error(error) => write!(f, "{:?}", error),
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Message::Error(error) => f.debug_tuple("Error").field(error).finish(),
        }
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_owned())
    }
}

impl From<&String> for Message {
    fn from(text: &String) -> Self {
        Message::Text(text.clone())
    }
}

impl From<fmt::Arguments<'_>> for Message {
    fn from(args: fmt::Arguments<'_>) -> Self {
        Message::Text(args.to_string())
    }
}

impl From<Box<dyn Error + Send + Sync>> for Message {
    fn from(error: Box<dyn Error + Send + Sync>) -> Self {
        Message::Error(error)
    }
}

type Thunk<'a> = Box<dyn FnOnce() -> Message + 'a>;

/// Text carried by a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// One occurrence of a logging call.
///
/// The message is produced by a thunk that runs at most once, the first
/// time a formatter asks for it. Filtered events never run it. A thunk that
/// panics leaves an empty message behind and marks the event as failed, so
/// handlers skip it.
pub struct Event<'a> {
    logger: &'a Logger,
    thunk: RefCell<Option<Thunk<'a>>>,
    message: OnceCell<Message>,
    message_failure: OnceCell<String>,
    error: Option<&'a (dyn Error + 'static)>,
    level: Option<LogLevel>,
    timestamp: DateTime<Utc>,
    elapsed: Option<Duration>,
    call_site: CallSite,
    once: bool,
}

impl<'a> Event<'a> {
    pub fn new<F, M>(logger: &'a Logger, level: Option<LogLevel>, message: F, call_site: CallSite) -> Self
    where
        F: FnOnce() -> M + 'a,
        M: Into<Message>,
    {
        Self {
            logger,
            thunk: RefCell::new(Some(Box::new(move || message().into()))),
            message: OnceCell::new(),
            message_failure: OnceCell::new(),
            error: None,
            level,
            timestamp: Utc::now(),
            elapsed: None,
            call_site,
            once: false,
        }
    }

    #[must_use]
    pub fn with_error(mut self, error: &'a (dyn Error + 'static)) -> Self {
        self.error = Some(error);
        self
    }

    #[must_use]
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = Some(elapsed);
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn logged_once(mut self) -> Self {
        self.once = true;
        self
    }

    pub fn logger(&self) -> &'a Logger {
        self.logger
    }

    /// Forces the message thunk on first access
    pub fn message(&self) -> &Message {
        self.message.get_or_init(|| {
            let Some(thunk) = self.thunk.borrow_mut().take() else {
                return Message::default();
            };
            match catch_unwind(AssertUnwindSafe(thunk)) {
                Ok(message) => message,
                Err(payload) => {
                    let _ = self.message_failure.set(panic_message(payload.as_ref()));
                    Message::default()
                }
            }
        })
    }

    /// Panic text of a message thunk that failed while being forced
    pub fn message_failure(&self) -> Option<&str> {
        self.message_failure.get().map(String::as_str)
    }

    /// Whether the message thunk has already run
    pub fn is_message_evaluated(&self) -> bool {
        self.message.get().is_some()
    }

    pub fn error(&self) -> Option<&'a (dyn Error + 'static)> {
        self.error
    }

    pub fn level(&self) -> Option<LogLevel> {
        self.level
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    pub fn call_site(&self) -> &CallSite {
        &self.call_site
    }

    pub fn is_once(&self) -> bool {
        self.once
    }
}

impl fmt::Debug for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("logger", &self.logger.to_string())
            .field("level", &self.level)
            .field("timestamp", &self.timestamp)
            .field("elapsed", &self.elapsed)
            .field("call_site", &self.call_site)
            .field("once", &self.once)
            .finish_non_exhaustive()
    }
}
