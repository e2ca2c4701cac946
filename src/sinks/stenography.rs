//! In-memory sink that keeps every record, mostly for tests

use crate::core::{Record, Result, Sink};
use parking_lot::Mutex;
use std::sync::Arc;

/// Accumulates records in order.
///
/// Clones share the same storage, so a test can keep one clone and attach
/// another to a handler.
#[derive(Clone, Default)]
pub struct StenographySink {
    records: Arc<Mutex<Vec<Record>>>,
}

impl StenographySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<Record> {
        self.records.lock().clone()
    }

    pub fn descriptions(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .map(|record| record.description.clone())
            .collect()
    }

    pub fn last(&self) -> Option<Record> {
        self.records.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Sink for StenographySink {
    fn emit(&self, record: &Record) -> Result<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "StenographySink"
    }
}
