//! Downstream record sinks
//!
//! Every accepted order yields an Orders record and an InventoryLog record.
//! Sinks hand them to whatever persists them; the ledger stays the source of truth.

use parking_lot::Mutex;
use shared::ExportRecords;

/// Receives the export records of each accepted order.
///
/// `write` runs inside the service's write lock, once per order in ledger order.
/// Implementations must not block.
pub trait RecordSink: Send + Sync {
    fn write(&self, records: &ExportRecords);
}

/// Emits records as structured log events
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl RecordSink for LogSink {
    fn write(&self, records: &ExportRecords) {
        match serde_json::to_string(records) {
            Ok(json) => tracing::info!(target: "amba_server::records", records = %json, "order records"),
            Err(e) => tracing::warn!("failed to encode order records: {}", e),
        }
    }
}

/// Keeps records in memory, in write order
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<ExportRecords>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<ExportRecords> {
        self.records.lock().clone()
    }
}

impl RecordSink for MemorySink {
    fn write(&self, records: &ExportRecords) {
        self.records.lock().push(records.clone());
    }
}
