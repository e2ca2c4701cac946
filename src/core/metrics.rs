//! Per-logger dispatch counters
//!
//! Tracks how events that originate at a logger were resolved: emitted by
//! at least one handler, filtered by the effective level, or lost because
//! no handler existed in the propagation chain.

use std::sync::atomic::{AtomicU64, Ordering};

/// # Example
///
/// ```
/// use logtree::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_emitted();
/// metrics.record_filtered();
///
/// assert_eq!(metrics.emitted_count(), 1);
/// assert_eq!(metrics.filtered_count(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Events offered to at least one handler
    emitted_count: AtomicU64,

    /// Events dropped by the logger's effective level
    filtered_count: AtomicU64,

    /// Events that found no handler in the whole chain
    unhandled_count: AtomicU64,

    /// Handler calls that returned an error or panicked
    handler_failures: AtomicU64,

    /// Events whose message closure panicked
    message_failures: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            emitted_count: AtomicU64::new(0),
            filtered_count: AtomicU64::new(0),
            unhandled_count: AtomicU64::new(0),
            handler_failures: AtomicU64::new(0),
            message_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn emitted_count(&self) -> u64 {
        self.emitted_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered_count(&self) -> u64 {
        self.filtered_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn unhandled_count(&self) -> u64 {
        self.unhandled_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn handler_failures(&self) -> u64 {
        self.handler_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn message_failures(&self) -> u64 {
        self.message_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_emitted(&self) -> u64 {
        self.emitted_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_unhandled(&self) -> u64 {
        self.unhandled_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_handler_failure(&self) -> u64 {
        self.handler_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_message_failure(&self) -> u64 {
        self.message_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of events dropped by level filtering, as a percentage
    pub fn filter_rate(&self) -> f64 {
        let filtered = self.filtered_count() as f64;
        let total = filtered + self.emitted_count() as f64 + self.unhandled_count() as f64;
        if total == 0.0 {
            0.0
        } else {
            (filtered / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.emitted_count.store(0, Ordering::Relaxed);
        self.filtered_count.store(0, Ordering::Relaxed);
        self.unhandled_count.store(0, Ordering::Relaxed);
        self.handler_failures.store(0, Ordering::Relaxed);
        self.message_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Snapshot of the current values
    fn clone(&self) -> Self {
        Self {
            emitted_count: AtomicU64::new(self.emitted_count()),
            filtered_count: AtomicU64::new(self.filtered_count()),
            unhandled_count: AtomicU64::new(self.unhandled_count()),
            handler_failures: AtomicU64::new(self.handler_failures()),
            message_failures: AtomicU64::new(self.message_failures()),
        }
    }
}
