//! # logtree
//!
//! A hierarchical, level-filtered logging library. Loggers are addressed by
//! dot-separated key paths and arranged in a tree; handlers attached to any
//! node receive the events logged at that node and below.
//!
//! ## Features
//!
//! - **Hierarchy**: one logger per key path, created on first lookup
//! - **Level Inheritance**: loggers without a level use their nearest ancestor's
//! - **Lazy Messages**: message closures only run when an event is emitted
//! - **Multiple Handlers**: console, file and in-memory sinks, each with its own level
//! - **Timers**: `tic`/`toc` pairs report elapsed time
//!
//! ## Example
//!
//! ```
//! use logtree::prelude::*;
//!
//! let sink = StenographySink::new();
//! let registry = Registry::builder()
//!     .level(LogLevel::Debug)
//!     .handler(Handler::stenography(&sink))
//!     .build();
//!
//! let logger = registry.logger_for_key_path("App.Network");
//! logger.verbose(|| "not shown");
//! logger.info(|| format!("connected to {}", "db"));
//!
//! assert_eq!(sink.last().unwrap().description, "[App.Network|INFO] connected to db");
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::sinks::ConsoleSink;
    pub use crate::sinks::{FileSink, StenographySink};
    pub use crate::core::{
        CallSite, Component, Event, Formatter, Handler, KeyPath, LevelConfig, LogLevel, Logger,
        LoggerError, LoggerMetrics, Message, Record, Registry, RegistryBuilder, Result, Sink,
        Style, TimestampFormat,
    };
}

#[cfg(feature = "console")]
pub use sinks::ConsoleSink;
pub use sinks::{FileSink, StenographySink};
pub use crate::core::{
    CallSite, Component, Event, Formatter, Handler, InvalidEntry, KeyPath, LevelAssignment,
    LevelConfig, LogLevel, Logger, LoggerError, LoggerMetrics, Message, Record, Registry,
    RegistryBuilder, Result, Sink, Style, TimestampFormat, DEFAULT_ROOT_KEY, DETACHED_KEY,
    ENV_PREFIX, KEY_PATH_SEPARATOR,
};
pub use crate::core::registry::{
    configure_from_environment, critical, debug, default_logger, error, get_logger,
    get_logger_for_file, info, log, log_error, log_level, registry, set_log_level, tic, toc,
    verbose, warning,
};
