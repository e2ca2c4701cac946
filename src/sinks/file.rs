//! File sink implementation

use crate::core::{LoggerError, Record, Result, Sink};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};

/// Appends one line per record to a file.
///
/// The file is created if absent and opened in append mode, so existing
/// content is kept. Every record reaches the file before `emit` returns.
pub struct FileSink {
    path: PathBuf,
    name: String,
    writer: Mutex<LineWriter<File>>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::file_sink(path.display().to_string(), e.to_string()))?;

        Ok(Self {
            name: format!("FileSink({})", path.display()),
            path,
            writer: Mutex::new(LineWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Escapes line breaks and tabs so a record never spans several lines
    fn sanitize(description: &str) -> String {
        description
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }
}

impl Sink for FileSink {
    fn emit(&self, record: &Record) -> Result<()> {
        let mut line = Self::sanitize(&record.description);
        line.push('\n');

        self.writer
            .lock()
            .write_all(line.as_bytes())
            .map_err(|e| LoggerError::io_operation("writing log file", self.name.clone(), e))
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
