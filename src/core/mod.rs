//! Core logger types and traits

pub mod config;
pub mod error;
pub mod event;
pub mod formatter;
pub mod handler;
pub mod key_path;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod record;
pub mod registry;
pub mod sink;
pub mod timestamp;

pub use config::{InvalidEntry, LevelAssignment, LevelConfig, ENV_PREFIX};
pub use error::{LoggerError, Result};
pub use event::{CallSite, Event, Message};
pub use formatter::{Component, Formatter, Style};
pub use handler::Handler;
pub use key_path::{KeyPath, KEY_PATH_SEPARATOR};
pub use log_level::LogLevel;
pub use logger::{Logger, DETACHED_KEY};
pub use metrics::LoggerMetrics;
pub use record::Record;
pub use registry::{Registry, RegistryBuilder, DEFAULT_ROOT_KEY};
pub use sink::Sink;
pub use timestamp::TimestampFormat;
