//! Integration tests for the logger hierarchy
//!
//! These tests verify:
//! - Identity of key path lookups
//! - Level inheritance and filtering
//! - Lazy message evaluation
//! - Timers
//! - Detached loggers
//! - Propagation
//! - File and JSON output

use logtree::prelude::*;
use logtree::{info, warning};
use std::cell::Cell;
use std::fmt;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

/// Registry whose root records into a stenography sink. The announcement
/// record is already consumed.
fn captured_registry() -> (Registry, StenographySink) {
    let sink = StenographySink::new();
    let registry = Registry::builder()
        .handler(Handler::stenography(&sink))
        .build();
    registry.root().log(None, || "warm up");
    sink.clear();
    (registry, sink)
}

#[derive(Debug)]
struct ConnectionRefused {
    port: u16,
}

impl fmt::Display for ConnectionRefused {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "connection refused on port {}", self.port)
    }
}

impl std::error::Error for ConnectionRefused {}

#[test]
fn test_lookup_identity() {
    let registry = Registry::builder().without_handlers().build();

    let first = registry.logger_for_key_path("A.B");
    let second = registry.logger_for_key_path(KeyPath::parse("A.B"));
    let with_root = registry.logger_for_key_path("Default.A.B");
    let relative = registry.logger_for_key_path("A").child_for_key_path("B");

    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first, &with_root));
    assert!(Arc::ptr_eq(&first, &relative));
    assert_eq!(first.to_string(), "A.B");
    assert_eq!(first.key_path(), KeyPath::parse("Default.A.B"));
}

#[test]
fn test_level_inheritance() {
    let registry = Registry::builder().without_handlers().build();
    registry.root().set_level(LogLevel::Debug);

    let child = registry.logger_for_key_path("Child");
    assert_eq!(child.effective_level(), Some(LogLevel::Debug));

    child.set_level(LogLevel::Verbose);
    assert_eq!(child.effective_level(), Some(LogLevel::Verbose));
    assert_eq!(registry.root().effective_level(), Some(LogLevel::Debug));

    let grandchild = child.child_for_key_path("Grandchild");
    assert_eq!(grandchild.effective_level(), Some(LogLevel::Verbose));
}

#[test]
fn test_filtering_under_debug() {
    let (registry, sink) = captured_registry();
    registry.root().set_level(LogLevel::Debug);
    let logger = registry.logger_for_key_path("Filter");

    logger.verbose(|| "dropped");
    logger.info(|| "delivered");

    assert_eq!(sink.descriptions(), vec!["[Filter|INFO] delivered"]);
    assert_eq!(logger.metrics().filtered_count(), 1);
    assert_eq!(logger.metrics().emitted_count(), 1);
}

#[test]
fn test_no_level_anywhere_emits_everything() {
    let (registry, sink) = captured_registry();
    let logger = registry.logger_for_key_path("Open");

    for level in LogLevel::ALL_LEVELS {
        logger.log(level, || "x");
    }

    assert_eq!(sink.len(), LogLevel::ALL_LEVELS.len());
}

#[test]
fn test_lazy_message_evaluation() {
    let (registry, sink) = captured_registry();
    registry.root().set_level(LogLevel::Info);
    let second = StenographySink::new();
    let logger = registry.logger_for_key_path("Lazy");
    logger.add_handler(Handler::stenography(&second));

    let calls = Cell::new(0);
    logger.debug(|| {
        calls.set(calls.get() + 1);
        "expensive"
    });
    assert_eq!(calls.get(), 0);

    logger.warning(|| {
        calls.set(calls.get() + 1);
        "expensive"
    });
    assert_eq!(calls.get(), 1);
    assert_eq!(second.last().unwrap().description, "[Lazy|WARNING] expensive");
    assert_eq!(sink.last().unwrap().description, "[Lazy|WARNING] expensive");
}

#[test]
fn test_message_not_forced_when_every_handler_filters() {
    let (registry, sink) = captured_registry();
    registry.root().handlers()[0].set_level(LogLevel::Error);
    let calls = Cell::new(0);

    registry.logger_for_key_path("Quiet").info(|| {
        calls.set(calls.get() + 1);
        "skipped by handler"
    });

    assert_eq!(calls.get(), 0);
    assert!(sink.is_empty());
}

#[test]
fn test_timer_round_trip() {
    let (registry, sink) = captured_registry();
    let logger = registry.logger_for_key_path("Timer");

    logger.tic(LogLevel::Info, || "Start", Some("x"));
    std::thread::sleep(std::time::Duration::from_millis(5));
    logger.toc(LogLevel::Info, || "Done", Some("x"));

    let records = sink.descriptions();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], "[Timer|INFO] Start");
    assert!(records[1].starts_with("[Timer|INFO] Done [ELAPSED TIME: "));
    assert!(records[1].ends_with("s]"));
}

#[test]
fn test_toc_with_unknown_tag_is_silent() {
    let (registry, sink) = captured_registry();
    let logger = registry.logger_for_key_path("Timer");

    logger.tic(None, || "default timer", None);
    sink.clear();
    logger.toc(None, || "Done", Some("missing"));

    assert!(sink.is_empty());
}

#[test]
fn test_overlapping_timers() {
    let (registry, sink) = captured_registry();
    let logger = registry.logger_for_key_path("Timers");

    logger.tic(None, || "outer", Some("outer"));
    logger.tic(None, || "inner", Some("inner"));
    logger.toc(None, || "inner done", Some("inner"));
    logger.toc(None, || "outer done", Some("outer"));

    let records = sink.records();
    assert_eq!(records.len(), 4);
    assert!(records[2].description.contains("inner done [ELAPSED TIME: "));
    assert!(records[3].description.contains("outer done [ELAPSED TIME: "));
}

#[test]
fn test_detached_logger() {
    let registry = Registry::builder().without_handlers().build();
    registry.root().set_level(LogLevel::Error);

    let detached = Logger::detached("Loose");
    assert_eq!(detached.effective_level(), None);
    assert!(detached.parent().is_none());
    assert!(detached.is_detached());
    assert_eq!(detached.to_string(), "DETACHED.Loose");

    let looked_up = registry.logger_for_key_path("Loose");
    assert!(!Arc::ptr_eq(&detached, &looked_up));
    assert_eq!(looked_up.effective_level(), Some(LogLevel::Error));

    // Nothing handles it, so it is reported and counted instead of emitted
    detached.info(|| "nobody listens");
    assert_eq!(detached.metrics().unhandled_count(), 1);
}

#[test]
fn test_detached_logger_with_handler() {
    let sink = StenographySink::new();
    let detached = Logger::detached("Island");
    detached.add_handler(Handler::stenography(&sink));
    let leaf = detached.child_for_key_path("Leaf");

    leaf.info(|| "hello");

    assert_eq!(
        sink.descriptions(),
        vec![
            "[DETACHED.Island|INFO] Logging to [StenographySink]...",
            "[DETACHED.Island.Leaf|INFO] hello",
        ]
    );
}

#[test]
fn test_level_parse_round_trip() {
    for level in LogLevel::ALL_LEVELS {
        let parsed: LogLevel = level.to_string().parse().unwrap();
        assert_eq!(parsed, level);

        let upper: LogLevel = level.to_string().to_uppercase().parse().unwrap();
        assert_eq!(upper, level);
    }

    assert!(matches!(
        "Loud".parse::<LogLevel>(),
        Err(LoggerError::InvalidLevel { .. })
    ));
}

#[test]
fn test_propagation_toggle() {
    let (registry, root_sink) = captured_registry();
    let child = registry.logger_for_key_path("Child");
    let child_sink = StenographySink::new();
    child.add_handler(Handler::stenography(&child_sink));
    child.log(None, || "warm up");
    root_sink.clear();
    child_sink.clear();

    child.set_should_propagate(false);
    child.info(|| "local");
    assert_eq!(child_sink.len(), 1);
    assert!(root_sink.is_empty());

    child.set_should_propagate(true);
    child.info(|| "everywhere");
    assert_eq!(child_sink.len(), 2);
    assert_eq!(root_sink.descriptions(), vec!["[Child|INFO] everywhere"]);
}

#[test]
fn test_unpropagated_logger_without_handlers_is_unhandled() {
    let (registry, sink) = captured_registry();
    let isolated = registry.logger_for_key_path("Isolated");
    isolated.set_should_propagate(false);

    isolated.error(|| "lost");

    assert!(sink.is_empty());
    assert_eq!(isolated.metrics().unhandled_count(), 1);
}

#[test]
fn test_shared_handler_between_loggers() {
    let sink = StenographySink::new();
    let shared = Arc::new(Handler::stenography(&sink));
    let registry = Registry::builder().without_handlers().build();

    let a = registry.logger_for_key_path("A");
    let b = registry.logger_for_key_path("B");
    a.add_handler(Arc::clone(&shared));
    b.add_handler(Arc::clone(&shared));
    a.log(None, || "warm up a");
    b.log(None, || "warm up b");
    sink.clear();

    a.info(|| "from a");
    b.info(|| "from b");

    assert_eq!(sink.descriptions(), vec!["[A|INFO] from a", "[B|INFO] from b"]);
}

#[test]
fn test_log_error_attaches_error() {
    let (registry, sink) = captured_registry();
    let failure = ConnectionRefused { port: 5432 };

    registry
        .logger_for_key_path("Db")
        .log_error(LogLevel::Error, || "Could not connect", &failure);

    assert_eq!(
        sink.last().unwrap().description,
        "[Db|ERROR] Could not connect [ERROR: ConnectionRefused { port: 5432 }]"
    );
}

#[test]
fn test_error_value_as_message() {
    let (registry, sink) = captured_registry();

    registry
        .logger_for_key_path("Db")
        .error(|| Message::error(ConnectionRefused { port: 80 }));

    assert_eq!(
        sink.last().unwrap().description,
        "[Db|ERROR] ConnectionRefused { port: 80 }"
    );
}

#[test]
fn test_log_once_per_call_site() {
    let (registry, sink) = captured_registry();
    let logger = registry.logger_for_key_path("Once");

    for i in 0..5 {
        logger.log_once(LogLevel::Warning, || format!("iteration {}", i));
    }

    assert_eq!(
        sink.descriptions(),
        vec!["[Once|WARNING] iteration 0 [ONLY LOGGED ONCE]"]
    );
}

#[test]
fn test_macros_route_through_logger() {
    let (registry, sink) = captured_registry();
    let logger = registry.logger_for_key_path("Macro");
    logger.set_level(LogLevel::Warning);

    let user = "alice";
    info!(logger, "user {} logged in", user);
    warning!(logger, "user {} failed {} times", user, 3);

    assert_eq!(
        sink.descriptions(),
        vec!["[Macro|WARNING] user alice failed 3 times"]
    );
}

#[test]
fn test_file_handler() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("app.log");

    let registry = Registry::builder().without_handlers().build();
    let handler = Arc::new(Handler::file(&log_file).expect("Failed to create file handler"));
    registry.root().add_handler(Arc::clone(&handler));

    let logger = registry.logger_for_key_path("Storage");
    logger.info(|| "User login\nERROR fake injected entry");
    registry.root().flush().expect("Failed to flush");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();

    // Announcement plus the message, injected newline escaped
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("[Default|INFO] Logging to [FileSink("));
    assert!(lines[1].contains("[Storage|INFO] User login\\nERROR fake injected entry"));
}

#[test]
fn test_file_handler_writes_without_flush_or_drop() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("durable.log");

    let registry = Registry::builder()
        .handler(Handler::file(&log_file).expect("Failed to create file handler"))
        .build();
    registry.logger_for_key_path("App").warning(|| "must reach disk");

    // Like the process-wide registry, this one is never dropped
    std::mem::forget(registry);

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert!(content.lines().any(|line| line.contains("[App|WARNING] must reach disk")));
}

#[test]
fn test_file_handler_unwritable_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let bad_path = temp_dir.path().join("no").join("such").join("dir.log");

    let result = Handler::file(&bad_path);
    assert!(matches!(result, Err(LoggerError::FileSink { .. })));
}

#[test]
fn test_json_formatter() {
    let sink = StenographySink::new();
    let handler = Handler::stenography(&sink).with_formatter(Formatter::json());
    let registry = Registry::builder().handler(handler).build();
    let logger = registry.logger_for_key_path("Api");
    logger.log(None, || "warm up");
    sink.clear();

    logger.warning(|| "slow response");

    let value: serde_json::Value =
        serde_json::from_str(&sink.last().unwrap().description).expect("valid JSON");
    assert_eq!(value["logger"], "Api");
    assert_eq!(value["level"], "WARNING");
    assert_eq!(value["message"], "slow response");
}

#[test]
fn test_record_keeps_level() {
    let (registry, sink) = captured_registry();
    registry.logger_for_key_path("Levels").critical(|| "meltdown");
    registry.logger_for_key_path("Levels").log(None, || "plain");

    let records = sink.records();
    assert_eq!(records[0].level, Some(LogLevel::Critical));
    assert_eq!(records[1].level, None);
}

#[test]
fn test_apply_json_config() {
    let (registry, sink) = captured_registry();
    let config = LevelConfig::from_json(
        r#"{ "levels": { "Net": "warning", "Net.Http": "verbose", "Db": "nope" } }"#,
    )
    .unwrap();

    let configured = registry.apply_config(&config);

    assert_eq!(configured, 2);
    assert_eq!(registry.logger_for_key_path("Net").level(), Some(LogLevel::Warning));
    assert_eq!(
        registry.logger_for_key_path("Net.Http").level(),
        Some(LogLevel::Verbose)
    );
    assert!(sink
        .descriptions()
        .iter()
        .any(|line| line.starts_with("[Default|WARNING] Invalid log level 'nope' for key path 'Db'")));
}

#[test]
fn test_announcement_respects_handler_level() {
    let sink = StenographySink::new();
    let registry = Registry::builder()
        .handler(Handler::stenography(&sink).with_level(LogLevel::Warning))
        .build();
    registry.root().set_level(LogLevel::Critical);

    registry.logger_for_key_path("Quiet").error(|| "below logger level");

    // The announcement bypasses the logger level but not the handler level
    assert!(sink.is_empty());
}
