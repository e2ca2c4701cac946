//! Basic logger usage example
//!
//! Demonstrates the process-wide registry, the console handler and level
//! filtering.
//!
//! Run with: cargo run --example basic_usage

use logtree::prelude::*;
use logtree::{info, warning};

fn main() -> Result<()> {
    println!("=== logtree - Basic Usage Example ===\n");

    // The default root logs to the console
    logtree::set_log_level(LogLevel::All);

    println!("1. Logging at different levels:");
    logtree::verbose(|| "This is a verbose message");
    logtree::debug(|| "This is a debug message");
    logtree::info(|| "This is an info message");
    logtree::warning(|| "This is a warning message");
    logtree::error(|| "This is an error message");
    logtree::critical(|| "This is a critical message");

    println!("\n2. Logging with a minimum level:");
    logtree::set_log_level(LogLevel::Info);
    println!("   Root level set to Info - verbose and debug won't show:");
    logtree::verbose(|| "Verbose message (hidden)");
    logtree::debug(|| "Debug message (hidden)");
    logtree::info(|| "Info message (visible)");
    logtree::warning(|| "Warning message (visible)");

    println!("\n3. Macros with lazy formatting:");
    let logger = logtree::logger!("App.Startup");
    let port = 8080;
    info!(logger, "Server listening on port {}", port);
    warning!(logger, "Using default settings for {} options", 3);

    println!("\n4. Timing a task:");
    logtree::tic(LogLevel::Info, || "Loading data...", None);
    std::thread::sleep(std::time::Duration::from_millis(20));
    logtree::toc(LogLevel::Info, || "Data loaded", None);

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
