//! Sink implementations

#[cfg(feature = "console")]
pub mod console;
pub mod file;
pub mod stenography;

#[cfg(feature = "console")]
pub use console::ConsoleSink;
pub use file::FileSink;
pub use stenography::StenographySink;

pub use crate::core::Sink;
