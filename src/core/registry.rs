//! Logger registry and the process-wide entry points
//!
//! A [`Registry`] owns the root of a logger tree and resolves key paths to
//! loggers. The process-wide registry is created lazily on first use, or
//! installed once with [`RegistryBuilder::install`]. Tests and embedders can
//! create independent registries.

use super::{
    config::{LevelConfig, ENV_PREFIX},
    error::{LoggerError, Result},
    event::{CallSite, Message},
    handler::Handler,
    key_path::{KeyPath, KEY_PATH_SEPARATOR},
    log_level::LogLevel,
    logger::Logger,
};
use std::error::Error;
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// Key of the root logger
pub const DEFAULT_ROOT_KEY: &str = "Default";

static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub struct Registry {
    root: Arc<Logger>,
}

impl Registry {
    /// Registry whose root has a single console handler
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn root(&self) -> &Arc<Logger> {
        &self.root
    }

    /// Returns the logger at `key_path`, creating it and any missing
    /// ancestors. A leading component equal to the root key is ignored.
    pub fn logger_for_key_path(&self, key_path: impl Into<KeyPath>) -> Arc<Logger> {
        let key_path = key_path.into();
        let relative = match key_path.first() {
            Some(first) if first == self.root.key() => key_path.pop_first().1,
            _ => key_path,
        };
        self.root.child_for_key_path(relative)
    }

    /// Logger named after the file stem, directly below the root
    pub fn logger_for_file(&self, file: &str) -> Arc<Logger> {
        match Path::new(file).file_stem().and_then(|stem| stem.to_str()) {
            Some(stem) if !stem.is_empty() => self.root.child_for_key_path(KeyPath::new([stem])),
            _ => Arc::clone(&self.root),
        }
    }

    /// Reads `<prefix>.<key path>=<level>` variables from the process
    /// environment. Returns the number of loggers configured.
    #[track_caller]
    pub fn configure_from_env(&self, prefix: &str) -> usize {
        let vars = std::env::vars_os()
            .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)));
        self.configure_from_vars(prefix, vars)
    }

    #[track_caller]
    pub fn configure_from_vars<I, K, V>(&self, prefix: &str, vars: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let config = LevelConfig::from_vars(prefix, vars);
        self.apply_with_source(&config, "environment", CallSite::caller())
    }

    /// Sets the level of every logger named in `config`.
    ///
    /// Invalid level names are reported as Warning events on the root and
    /// skipped. Returns the number of loggers configured.
    #[track_caller]
    pub fn apply_config(&self, config: &LevelConfig) -> usize {
        self.apply_with_source(config, "configuration", CallSite::caller())
    }

    fn apply_with_source(&self, config: &LevelConfig, source: &str, call_site: CallSite) -> usize {
        let (assignments, invalid) = config.resolve();

        for entry in &invalid {
            self.root.log_at(
                LogLevel::Warning,
                || {
                    format!(
                        "Invalid log level '{}' for key path '{}' in {}: {}",
                        entry.value, entry.key_path, source, entry.error
                    )
                },
                call_site,
            );
        }

        for assignment in &assignments {
            self.logger_for_key_path(&assignment.key_path)
                .set_level(assignment.level);
        }

        if assignments.is_empty() {
            self.root.log_at(
                LogLevel::Warning,
                || {
                    format!(
                        "Tried to configure logging from {}, but no valid configuration was found.",
                        source
                    )
                },
                call_site,
            );
        } else {
            self.root.log_at(
                LogLevel::Debug,
                || {
                    let configured = assignments
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!(
                        "Configured logging from {}. Configurations: [{}]",
                        source, configured
                    )
                },
                call_site,
            );
        }

        assignments.len()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`Registry`]
///
/// Without explicit handlers the root gets a console handler (when the
/// `console` feature is enabled).
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    root_key: Option<String>,
    level: Option<LogLevel>,
    handlers: Option<Vec<Arc<Handler>>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root_key(mut self, key: impl Into<String>) -> Self {
        self.root_key = Some(key.into());
        self
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    /// Adds a root handler, replacing the default console handler
    pub fn handler(mut self, handler: impl Into<Arc<Handler>>) -> Self {
        self.handlers
            .get_or_insert_with(Vec::new)
            .push(handler.into());
        self
    }

    /// Root without any handler
    pub fn without_handlers(mut self) -> Self {
        self.handlers = Some(Vec::new());
        self
    }

    /// Like [`RegistryBuilder::build`], but rejects a root key that is empty
    /// or contains the key path separator.
    pub fn try_build(self) -> Result<Registry> {
        if let Some(key) = &self.root_key {
            if key.is_empty() || key.contains(KEY_PATH_SEPARATOR) {
                return Err(LoggerError::config(
                    "RegistryBuilder",
                    format!("root key '{}' must be a single non-empty component", key),
                ));
            }
        }
        Ok(self.build())
    }

    pub fn build(self) -> Registry {
        let root = Logger::new_root(self.root_key.unwrap_or_else(|| DEFAULT_ROOT_KEY.to_string()));
        root.set_level(self.level);

        let handlers = match self.handlers {
            Some(handlers) => handlers,
            None => default_handlers(),
        };
        root.set_handlers(handlers);

        Registry { root }
    }

    /// Installs the built registry as the process-wide one.
    ///
    /// Fails with [`LoggerError::AlreadyInitialized`] if it already exists,
    /// including when it was created lazily by an earlier logging call.
    /// The root key is validated as in [`RegistryBuilder::try_build`].
    pub fn install(self) -> Result<&'static Registry> {
        let built = self.try_build()?;
        REGISTRY
            .set(built)
            .map_err(|_| LoggerError::AlreadyInitialized)?;
        Ok(registry())
    }
}

#[cfg(feature = "console")]
fn default_handlers() -> Vec<Arc<Handler>> {
    vec![Arc::new(Handler::console())]
}

#[cfg(not(feature = "console"))]
fn default_handlers() -> Vec<Arc<Handler>> {
    Vec::new()
}

// ----------------------------------------------------------------------
// Process-wide entry points
// ----------------------------------------------------------------------

/// The process-wide registry, created on first use
pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

pub fn default_logger() -> &'static Arc<Logger> {
    registry().root()
}

pub fn get_logger(key_path: impl Into<KeyPath>) -> Arc<Logger> {
    registry().logger_for_key_path(key_path)
}

pub fn get_logger_for_file(file: &str) -> Arc<Logger> {
    registry().logger_for_file(file)
}

/// Level of the process-wide root
pub fn log_level() -> Option<LogLevel> {
    default_logger().level()
}

pub fn set_log_level(level: impl Into<Option<LogLevel>>) {
    default_logger().set_level(level);
}

/// Reads `LOGTREE.<key path>=<level>` variables into the process-wide tree
#[track_caller]
pub fn configure_from_environment() -> usize {
    registry().configure_from_env(ENV_PREFIX)
}

/// Logs through the logger named after the caller's file
#[track_caller]
pub fn log<F, M>(level: impl Into<Option<LogLevel>>, message: F)
where
    F: FnOnce() -> M,
    M: Into<Message>,
{
    let call_site = CallSite::caller();
    get_logger_for_file(call_site.file).log_at(level, message, call_site);
}

#[track_caller]
pub fn log_error<F, M>(level: impl Into<Option<LogLevel>>, message: F, error: &(dyn Error + 'static))
where
    F: FnOnce() -> M,
    M: Into<Message>,
{
    let call_site = CallSite::caller();
    get_logger_for_file(call_site.file).log_error(level, message, error);
}

#[track_caller]
pub fn verbose<F: FnOnce() -> M, M: Into<Message>>(message: F) {
    log(LogLevel::Verbose, message);
}

#[track_caller]
pub fn debug<F: FnOnce() -> M, M: Into<Message>>(message: F) {
    log(LogLevel::Debug, message);
}

#[track_caller]
pub fn info<F: FnOnce() -> M, M: Into<Message>>(message: F) {
    log(LogLevel::Info, message);
}

#[track_caller]
pub fn warning<F: FnOnce() -> M, M: Into<Message>>(message: F) {
    log(LogLevel::Warning, message);
}

#[track_caller]
pub fn error<F: FnOnce() -> M, M: Into<Message>>(message: F) {
    log(LogLevel::Error, message);
}

#[track_caller]
pub fn critical<F: FnOnce() -> M, M: Into<Message>>(message: F) {
    log(LogLevel::Critical, message);
}

#[track_caller]
pub fn tic<F, M>(level: impl Into<Option<LogLevel>>, message: F, timer_key: Option<&str>)
where
    F: FnOnce() -> M,
    M: Into<Message>,
{
    let call_site = CallSite::caller();
    get_logger_for_file(call_site.file).tic(level, message, timer_key);
}

#[track_caller]
pub fn toc<F, M>(level: impl Into<Option<LogLevel>>, message: F, timer_key: Option<&str>)
where
    F: FnOnce() -> M,
    M: Into<Message>,
{
    let call_site = CallSite::caller();
    get_logger_for_file(call_site.file).toc(level, message, timer_key);
}
