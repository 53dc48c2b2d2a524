//! Destinations for finished log records.
//!
//! The sink is an injected collaborator rather than process-wide state, so
//! tests can substitute [`MemorySink`] and assert on what was emitted.

use std::sync::Mutex;

use crate::record::LogRecord;

/// Fixed event id attached to every tracking event so downstream consumers
/// can filter them out of general log traffic.
pub const REQUEST_LOG_EVENT_ID: u32 = 419_012_830;

/// Destination for finished records.
///
/// `emit` is called once per tracked request, concurrently from however many
/// requests are in flight; implementations must be `Send + Sync` and should
/// be non-blocking or independently buffered.
pub trait RecordSink: Send + Sync {
    fn emit(&self, record: &LogRecord);
}

/// Emits records as structured `tracing` events at INFO level.
#[derive(Debug, Default)]
pub struct TracingSink;

impl RecordSink for TracingSink {
    fn emit(&self, record: &LogRecord) {
        let request = serde_json::to_string(record)
            .unwrap_or_else(|e| format!(r#"{{"serialize_error":"{e}"}}"#));

        tracing::info!(
            target: "reqtrack",
            event_id = REQUEST_LOG_EVENT_ID,
            method = %record.method,
            url = %record.url,
            request = %request,
            "new request"
        );
    }
}

/// Collects records in memory. Intended for tests and examples.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordSink for MemorySink {
    fn emit(&self, record: &LogRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record.clone());
        }
    }
}
