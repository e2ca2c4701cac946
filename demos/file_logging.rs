//! File logging example
//!
//! Demonstrates logging to both console and file handlers simultaneously.
//!
//! Run with: cargo run --example file_logging

use logtree::prelude::*;

fn main() -> Result<()> {
    println!("=== logtree - File Logging Example ===\n");

    let registry = Registry::builder()
        .level(LogLevel::Debug)
        .handler(Handler::new(ConsoleSink::new(), Formatter::default()))
        .handler(Handler::file("application.log")?)
        .build();

    let logger = registry.logger_for_key_path("App");

    println!("1. Logging to both console and file:");
    logger.info(|| "Application started");
    logger.debug(|| "Loading configuration...");
    logger.info(|| "Configuration loaded successfully");
    logger.warning(|| "Using default settings for some options");

    let database = logger.child_for_key_path("Database");
    database.info(|| "Connecting to database...");
    database.info(|| "Database connection established");
    logger.error(|| "Failed to load optional plugin");

    println!("\n2. Performing some operations:");
    let worker = registry.logger_for_key_path("App.Worker");
    for i in 1..=5 {
        worker.info(|| format!("Processing item {}/5", i));
        if i == 3 {
            worker.warning(|| "Item 3 took longer than expected");
        }
    }

    logger.info(|| "All operations completed");

    // Flush to ensure all records are written
    registry.root().flush()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log' for the full log output");

    Ok(())
}
