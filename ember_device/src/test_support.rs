/// Test helpers shared by unit tests

use std::sync::{Arc, Mutex};
use crate::log::{LogEntry, Logger};

/// Logger that keeps entries whose source starts with a prefix
///
/// Filtering by source keeps captures stable while unrelated tests log
/// concurrently.
pub struct CapturingLogger {
    prefix: String,
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl CapturingLogger {
    pub fn with_prefix(prefix: &str) -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        let logger = Self {
            prefix: prefix.to_string(),
            entries: Arc::clone(&entries),
        };
        (logger, entries)
    }
}

impl Logger for CapturingLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.source.starts_with(&self.prefix) {
            if let Ok(mut entries) = self.entries.lock() {
                entries.push(entry.clone());
            }
        }
    }
}
