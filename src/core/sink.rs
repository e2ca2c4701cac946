//! Sink trait for log output destinations

use super::{error::Result, record::Record};

/// Final output stage of a handler.
///
/// Sinks are shared between loggers through their handler, so every method
/// takes `&self` and implementations synchronize internally.
pub trait Sink: Send + Sync {
    fn emit(&self, record: &Record) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}
