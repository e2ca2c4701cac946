//! Logger hierarchy example
//!
//! Demonstrates level inheritance, per-handler levels, propagation and
//! configuration from a JSON level map.
//!
//! Run with: cargo run --example hierarchy

use logtree::prelude::*;

fn main() -> Result<()> {
    println!("=== logtree - Hierarchy Example ===\n");

    let registry = Registry::builder().level(LogLevel::Info).build();

    let network = registry.logger_for_key_path("Network");
    let http = registry.logger_for_key_path("Network.Http");

    println!("1. Level inheritance:");
    http.debug(|| "hidden: inherits Info from the root");
    network.set_level(LogLevel::Debug);
    http.debug(|| "shown: inherits Debug from Network");

    println!("\n2. Handler with its own level:");
    let audit = StenographySink::new();
    http.add_handler(Handler::stenography(&audit).with_level(LogLevel::Warning));
    http.info(|| "goes to the console only");
    http.warning(|| "goes to the console and the audit sink");
    println!("   Audit sink holds {} record(s)", audit.len());

    println!("\n3. Propagation:");
    http.set_should_propagate(false);
    http.error(|| "audit sink only, the root never sees this");
    http.set_should_propagate(true);
    println!("   Audit sink holds {} record(s)", audit.len());

    println!("\n4. Configuration from JSON:");
    let config = LevelConfig::from_json(
        r#"{ "levels": { "Network": "warning", "Storage.Cache": "verbose", "Ui": "loud" } }"#,
    )?;
    let configured = registry.apply_config(&config);
    println!("   Configured {} logger(s)", configured);
    http.info(|| "hidden: Network is now at Warning");

    println!("\n5. Detached logger:");
    let scratch = Logger::detached("Scratch");
    scratch.add_handler(Handler::new(ConsoleSink::new(), Formatter::style(Style::Full)));
    scratch.info(|| "not part of the registry tree");

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
