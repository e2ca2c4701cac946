//! Hierarchical logger implementation

use super::{
    error::Result,
    event::{panic_message, CallSite, Event, Message},
    handler::Handler,
    key_path::KeyPath,
    log_level::LogLevel,
    metrics::LoggerMetrics,
};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Instant;

/// Key prepended to the description of loggers outside any registry
pub const DETACHED_KEY: &str = "DETACHED";

#[derive(Debug, Default)]
struct Timers {
    default_start: Option<Instant>,
    tagged: HashMap<String, Instant>,
}

impl Timers {
    fn start(&mut self, timer_key: Option<&str>) {
        let now = Instant::now();
        match timer_key {
            Some(key) => {
                self.tagged.insert(key.to_owned(), now);
            }
            None => self.default_start = Some(now),
        }
    }

    fn start_of(&self, timer_key: Option<&str>) -> Option<Instant> {
        match timer_key {
            Some(key) => self.tagged.get(key).copied(),
            None => self.default_start,
        }
    }
}

/// A named node in the logger tree.
///
/// Parents own their children; a child only keeps a weak reference to its
/// parent. Loggers are always handled through `Arc<Logger>`, and the same
/// key path always resolves to the same `Arc`.
pub struct Logger {
    key: String,
    parent: Option<Weak<Logger>>,
    is_root: bool,
    children: RwLock<BTreeMap<String, Arc<Logger>>>,
    level: RwLock<Option<LogLevel>>,
    handlers: RwLock<Vec<Arc<Handler>>>,
    should_propagate: AtomicBool,
    announced: AtomicBool,
    timers: Mutex<Timers>,
    once_sites: Mutex<HashSet<CallSite>>,
    metrics: LoggerMetrics,
}

impl Logger {
    fn with_parent(key: impl Into<String>, parent: Option<Weak<Logger>>, is_root: bool) -> Self {
        Self {
            key: key.into(),
            parent,
            is_root,
            children: RwLock::new(BTreeMap::new()),
            level: RwLock::new(None),
            handlers: RwLock::new(Vec::new()),
            should_propagate: AtomicBool::new(true),
            announced: AtomicBool::new(false),
            timers: Mutex::new(Timers::default()),
            once_sites: Mutex::new(HashSet::new()),
            metrics: LoggerMetrics::new(),
        }
    }

    /// Root of a registry's tree
    pub(crate) fn new_root(key: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::with_parent(key, None, true))
    }

    /// Creates a logger outside of any registry.
    ///
    /// It has no handlers, inherits no level and can't be reached by key
    /// path lookups. Its children form a detached subtree.
    #[must_use]
    pub fn detached(key: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::with_parent(key, None, false))
    }

    // ------------------------------------------------------------------
    // Hierarchy
    // ------------------------------------------------------------------

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn parent(&self) -> Option<Arc<Logger>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    pub fn root(self: &Arc<Self>) -> Arc<Logger> {
        let mut node = Arc::clone(self);
        while let Some(parent) = node.parent() {
            node = parent;
        }
        node
    }

    /// Whether this is the root of a registry
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// Whether the topmost ancestor is not a registry root
    pub fn is_detached(&self) -> bool {
        let (_, top_is_root) = self.ancestry();
        !top_is_root
    }

    /// Keys from the topmost ancestor down to `self`
    fn ancestry(&self) -> (Vec<String>, bool) {
        let mut keys = vec![self.key.clone()];
        let mut top_is_root = self.is_root;
        let mut node = self.parent();
        while let Some(current) = node {
            keys.push(current.key.clone());
            top_is_root = current.is_root;
            node = current.parent();
        }
        keys.reverse();
        (keys, top_is_root)
    }

    /// Full key path from the topmost ancestor, including its key
    pub fn key_path(&self) -> KeyPath {
        KeyPath::new(self.ancestry().0)
    }

    /// Returns the logger at `key_path` relative to `self`, creating every
    /// missing node on the way. An empty path returns `self`.
    pub fn child_for_key_path(self: &Arc<Self>, key_path: impl Into<KeyPath>) -> Arc<Logger> {
        let key_path = key_path.into();
        let mut current = Arc::clone(self);
        for key in key_path.components() {
            current = current.child_or_insert(key);
        }
        current
    }

    fn child_or_insert(self: &Arc<Self>, key: &str) -> Arc<Logger> {
        if let Some(child) = self.children.read().get(key) {
            return Arc::clone(child);
        }

        let mut children = self.children.write();
        let child = children.entry(key.to_owned()).or_insert_with(|| {
            Arc::new(Logger::with_parent(key, Some(Arc::downgrade(self)), false))
        });
        Arc::clone(child)
    }

    /// Looks up a direct child without creating it
    pub fn child(&self, key: &str) -> Option<Arc<Logger>> {
        self.children.read().get(key).cloned()
    }

    pub fn children(&self) -> Vec<Arc<Logger>> {
        self.children.read().values().cloned().collect()
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    /// Explicit level of this logger, if any
    pub fn level(&self) -> Option<LogLevel> {
        *self.level.read()
    }

    pub fn set_level(&self, level: impl Into<Option<LogLevel>>) {
        *self.level.write() = level.into();
    }

    /// Own level, or the nearest ancestor's. `None` means nothing is filtered.
    pub fn effective_level(&self) -> Option<LogLevel> {
        if let Some(level) = self.level() {
            return Some(level);
        }
        let mut node = self.parent();
        while let Some(current) = node {
            if let Some(level) = current.level() {
                return Some(level);
            }
            node = current.parent();
        }
        None
    }

    pub fn handlers(&self) -> Vec<Arc<Handler>> {
        self.handlers.read().clone()
    }

    pub fn add_handler(&self, handler: impl Into<Arc<Handler>>) {
        self.handlers.write().push(handler.into());
    }

    pub fn set_handlers(&self, handlers: Vec<Arc<Handler>>) {
        *self.handlers.write() = handlers;
    }

    /// Removes a handler by identity, returning whether it was attached
    pub fn remove_handler(&self, handler: &Arc<Handler>) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|attached| !Arc::ptr_eq(attached, handler));
        handlers.len() != before
    }

    pub fn clear_handlers(&self) {
        self.handlers.write().clear();
    }

    pub fn should_propagate(&self) -> bool {
        self.should_propagate.load(Ordering::Acquire)
    }

    pub fn set_should_propagate(&self, should_propagate: bool) {
        self.should_propagate.store(should_propagate, Ordering::Release);
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn flush(&self) -> Result<()> {
        for handler in self.handlers() {
            handler.flush()?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Logging
    // ------------------------------------------------------------------

    /// Logs the message produced by `message` at `level`.
    ///
    /// The closure only runs if the event passes the effective level and
    /// reaches a handler whose own level lets it through. Passing `None` as
    /// level bypasses all level filtering.
    #[track_caller]
    pub fn log<F, M>(&self, level: impl Into<Option<LogLevel>>, message: F)
    where
        F: FnOnce() -> M,
        M: Into<Message>,
    {
        self.log_at(level, message, CallSite::caller());
    }

    /// Same as [`Logger::log`] with an explicit call site, used by the macros
    pub fn log_at<F, M>(&self, level: impl Into<Option<LogLevel>>, message: F, call_site: CallSite)
    where
        F: FnOnce() -> M,
        M: Into<Message>,
    {
        let level = level.into();
        if !self.accepts(level) {
            return;
        }
        let event = Event::new(self, level, message, call_site);
        self.dispatch(&event);
    }

    /// Logs a message together with an associated error
    #[track_caller]
    pub fn log_error<F, M>(
        &self,
        level: impl Into<Option<LogLevel>>,
        message: F,
        error: &(dyn Error + 'static),
    ) where
        F: FnOnce() -> M,
        M: Into<Message>,
    {
        let call_site = CallSite::caller();
        let level = level.into();
        if !self.accepts(level) {
            return;
        }
        let event = Event::new(self, level, message, call_site).with_error(error);
        self.dispatch(&event);
    }

    /// Logs only the first time this call site reaches this logger.
    ///
    /// Calls dropped by level filtering don't count.
    #[track_caller]
    pub fn log_once<F, M>(&self, level: impl Into<Option<LogLevel>>, message: F)
    where
        F: FnOnce() -> M,
        M: Into<Message>,
    {
        self.log_once_at(level, message, CallSite::caller());
    }

    pub fn log_once_at<F, M>(
        &self,
        level: impl Into<Option<LogLevel>>,
        message: F,
        call_site: CallSite,
    ) where
        F: FnOnce() -> M,
        M: Into<Message>,
    {
        let level = level.into();
        if !self.accepts(level) {
            return;
        }
        if !self.once_sites.lock().insert(call_site) {
            return;
        }
        let event = Event::new(self, level, message, call_site).logged_once();
        self.dispatch(&event);
    }

    /// Logs a pre-built event through this logger
    pub fn log_event(&self, event: &Event<'_>) {
        if self.accepts(event.level()) {
            self.dispatch(event);
        }
    }

    #[inline]
    #[track_caller]
    pub fn verbose<F: FnOnce() -> M, M: Into<Message>>(&self, message: F) {
        self.log_at(LogLevel::Verbose, message, CallSite::caller());
    }

    #[inline]
    #[track_caller]
    pub fn debug<F: FnOnce() -> M, M: Into<Message>>(&self, message: F) {
        self.log_at(LogLevel::Debug, message, CallSite::caller());
    }

    #[inline]
    #[track_caller]
    pub fn info<F: FnOnce() -> M, M: Into<Message>>(&self, message: F) {
        self.log_at(LogLevel::Info, message, CallSite::caller());
    }

    #[inline]
    #[track_caller]
    pub fn warning<F: FnOnce() -> M, M: Into<Message>>(&self, message: F) {
        self.log_at(LogLevel::Warning, message, CallSite::caller());
    }

    #[inline]
    #[track_caller]
    pub fn error<F: FnOnce() -> M, M: Into<Message>>(&self, message: F) {
        self.log_at(LogLevel::Error, message, CallSite::caller());
    }

    #[inline]
    #[track_caller]
    pub fn critical<F: FnOnce() -> M, M: Into<Message>>(&self, message: F) {
        self.log_at(LogLevel::Critical, message, CallSite::caller());
    }

    // ------------------------------------------------------------------
    // Timing
    // ------------------------------------------------------------------

    /// Starts the timer `timer_key` (or the default timer) and logs.
    #[track_caller]
    pub fn tic<F, M>(&self, level: impl Into<Option<LogLevel>>, message: F, timer_key: Option<&str>)
    where
        F: FnOnce() -> M,
        M: Into<Message>,
    {
        let call_site = CallSite::caller();
        self.timers.lock().start(timer_key);
        self.log_at(level, message, call_site);
    }

    /// Logs with the time elapsed since the matching [`Logger::tic`].
    ///
    /// Does nothing if the timer was never started.
    #[track_caller]
    pub fn toc<F, M>(&self, level: impl Into<Option<LogLevel>>, message: F, timer_key: Option<&str>)
    where
        F: FnOnce() -> M,
        M: Into<Message>,
    {
        let call_site = CallSite::caller();
        let Some(start) = self.timers.lock().start_of(timer_key) else {
            return;
        };
        let elapsed = start.elapsed();

        let level = level.into();
        if !self.accepts(level) {
            return;
        }
        let event = Event::new(self, level, message, call_site).with_elapsed(elapsed);
        self.dispatch(&event);
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Announces handlers along the chain, then applies the effective level
    fn accepts(&self, level: Option<LogLevel>) -> bool {
        self.announce_handlers();

        if LogLevel::passes(level, self.effective_level()) {
            true
        } else {
            self.metrics.record_filtered();
            false
        }
    }

    /// Emits a one-time "Logging to [...]" event at every node of the
    /// propagation chain that has handlers.
    fn announce_handlers(&self) {
        if !self.announced.load(Ordering::Acquire) && !self.announced.swap(true, Ordering::AcqRel)
        {
            let handlers = self.handlers();
            if !handlers.is_empty() {
                let names = handlers
                    .iter()
                    .map(|handler| handler.name())
                    .collect::<Vec<_>>()
                    .join(", ");
                let event = Event::new(
                    self,
                    Some(LogLevel::Info),
                    move || format!("Logging to [{}]...", names),
                    CallSite::new(file!(), line!(), column!(), module_path!()),
                );
                self.handle_event(&event, false);
            }
        }

        if self.should_propagate() {
            if let Some(parent) = self.parent() {
                parent.announce_handlers();
            }
        }
    }

    fn dispatch(&self, event: &Event<'_>) {
        if self.handle_event(event, false) {
            match event.message_failure() {
                Some(reason) => {
                    self.metrics.record_message_failure();
                    eprintln!(
                        "[LOGGER ERROR] Message for logger '{}' panicked and was not emitted: {}. \
                         Call site: {}",
                        self,
                        reason,
                        event.call_site()
                    );
                }
                None => {
                    self.metrics.record_emitted();
                }
            }
        } else {
            self.metrics.record_unhandled();
            // Written directly: going through the tree again could loop
            // forever when the root has no handlers.
            eprintln!(
                "[LOGGER WARNING] Tried to log an event for logger '{}', but no handler was \
                 found in the logger hierarchy to emit the event: {}",
                self,
                event.call_site()
            );
        }
    }

    /// Offers the event to this node's handlers, then to the parent's while
    /// propagation holds. Returns whether any handler was found.
    ///
    /// **Per-Handler Panic Isolation**: each handler call is wrapped in
    /// `catch_unwind` so one failing sink can't keep the event from the
    /// other handlers.
    fn handle_event(&self, event: &Event<'_>, was_handled: bool) -> bool {
        let mut handled = was_handled;

        // Snapshot so sinks may log recursively without holding the lock
        let handlers = self.handlers();
        for (idx, handler) in handlers.iter().enumerate() {
            handled = true;

            let emit_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                handler.emit_event(event)
            }));

            match emit_result {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => {
                    self.metrics.record_handler_failure();
                    eprintln!(
                        "[LOGGER ERROR] Handler #{} ({}) of logger '{}' failed: {}",
                        idx, handler, self, e
                    );
                }
                Err(panic_info) => {
                    self.metrics.record_handler_failure();
                    let panic_msg = panic_message(panic_info.as_ref());
                    eprintln!(
                        "[LOGGER CRITICAL] Handler #{} ({}) of logger '{}' panicked: {}. \
                         Other handlers continue to function.",
                        idx, handler, self, panic_msg
                    );
                }
            }
        }

        if self.should_propagate() {
            if let Some(parent) = self.parent() {
                return parent.handle_event(event, handled);
            }
        }
        handled
    }
}

impl fmt::Display for Logger {
    /// Key path relative to the registry root (the root renders its own
    /// key). Detached trees are prefixed with `DETACHED`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (mut keys, top_is_root) = self.ancestry();
        if top_is_root {
            if keys.len() > 1 {
                keys.remove(0);
            }
        } else {
            keys.insert(0, DETACHED_KEY.to_string());
        }
        f.write_str(&keys.join("."))
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("key_path", &self.to_string())
            .field("level", &self.level())
            .field("handlers", &self.handlers())
            .field("should_propagate", &self.should_propagate())
            .finish()
    }
}
