use raseed_core::Receipt;
use serde::{Deserialize, Serialize};

/// A record that was left out of the collection, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Position in the source (array index for JSON, receipt_id for CSV)
    pub index: String,
    pub reason: String,
}

/// Normalized output of the receipt loaders (format-agnostic)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestReport {
    pub receipts: Vec<Receipt>,
    pub skipped: Vec<SkippedRecord>,
}

impl IngestReport {
    pub(crate) fn skip(&mut self, index: impl ToString, reason: impl ToString) {
        let record = SkippedRecord {
            index: index.to_string(),
            reason: reason.to_string(),
        };
        tracing::warn!(index = %record.index, reason = %record.reason, "skipping receipt record");
        self.skipped.push(record);
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}
