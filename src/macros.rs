//! Logging macros with lazy message formatting.
//!
//! The format arguments are captured in a closure, so nothing is formatted
//! unless the event is actually emitted. Every macro records the exact call
//! site, including the module path.
//!
//! # Examples
//!
//! ```
//! use logtree::prelude::*;
//! use logtree::{info, warning};
//!
//! let sink = StenographySink::new();
//! let registry = Registry::builder().handler(Handler::stenography(&sink)).build();
//! let logger = registry.logger_for_key_path("Server");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! warning!(logger, "Retry attempt {} of {}", 3, 5);
//!
//! assert_eq!(sink.last().unwrap().description, "[Server|WARNING] Retry attempt 3 of 5");
//! ```

/// Call site of the macro invocation
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::new(file!(), line!(), column!(), module_path!())
    };
}

/// Logger of the process-wide registry.
///
/// Without arguments, returns the logger named after the current file.
///
/// ```
/// let by_path = logtree::logger!("Net.Http");
/// assert_eq!(by_path.to_string(), "Net.Http");
/// ```
#[macro_export]
macro_rules! logger {
    () => {
        $crate::get_logger_for_file(file!())
    };
    ($key_path:expr) => {
        $crate::get_logger($key_path)
    };
}

/// Log a message at the given level.
///
/// # Examples
///
/// ```
/// # use logtree::prelude::*;
/// # let registry = Registry::builder().without_handlers().build();
/// # let logger = registry.root();
/// use logtree::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// log!(logger, None, "Always emitted");
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_at($level, || ::std::format!($($arg)+), $crate::call_site!())
    };
}

/// Log a verbose-level message.
#[macro_export]
macro_rules! verbose {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Verbose, $($arg)+)
    };
}

/// Log a debug-level message.
///
/// ```
/// # use logtree::prelude::*;
/// # let registry = Registry::builder().without_handlers().build();
/// use logtree::debug;
/// debug!(registry.root(), "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an error-level message.
///
/// ```
/// # use logtree::prelude::*;
/// # let registry = Registry::builder().without_handlers().build();
/// use logtree::error;
/// error!(registry.root(), "Failed to connect to {}", "db.internal");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Handler, LogLevel, Registry};
    use crate::sinks::StenographySink;
    use std::cell::Cell;

    #[test]
    fn test_macros_are_lazy() {
        let sink = StenographySink::new();
        let registry = Registry::builder()
            .level(LogLevel::Info)
            .handler(Handler::stenography(&sink))
            .build();
        let logger = registry.logger_for_key_path("Macros");
        let formatted = Cell::new(0);
        let counted = || {
            formatted.set(formatted.get() + 1);
            "value"
        };

        debug!(logger, "hidden {}", counted());
        assert_eq!(formatted.get(), 0);

        info!(logger, "shown {}", counted());
        assert_eq!(formatted.get(), 1);
        assert_eq!(sink.last().unwrap().description, "[Macros|INFO] shown value");
    }

    #[test]
    fn test_call_site_has_module_path() {
        let site = call_site!();
        assert_eq!(site.file, file!());
        assert_eq!(site.module_path, Some(module_path!()));
    }
}
