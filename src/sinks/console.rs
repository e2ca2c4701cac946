//! Console sink implementation

use crate::core::{LogLevel, Record, Result, Sink};
use colored::Colorize;
use std::io::Write;

pub struct ConsoleSink {
    use_colors: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, record: &Record) -> String {
        match record.level {
            Some(level) if self.use_colors => record
                .description
                .as_str()
                .color(level.color_code())
                .to_string(),
            _ => record.description.clone(),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn emit(&self, record: &Record) -> Result<()> {
        let output = self.colorize(record);

        // Route Error and Critical levels to stderr, others to stdout
        match record.level {
            Some(LogLevel::Error | LogLevel::Critical) => eprintln!("{}", output),
            _ => println!("{}", output),
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        // Flush both stdout and stderr since we write to both
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "ConsoleSink"
    }
}
