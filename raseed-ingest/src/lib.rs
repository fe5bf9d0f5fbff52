//! raseed-ingest: load receipt collections from JSON and CSV exports.
//!
//! Each record is decoded and validated on its own; a bad record is skipped
//! and reported instead of failing the whole file.

pub mod parsers;
pub mod types;

pub use parsers::receipt_csv::{load_receipts_csv, parse_receipts_csv};
pub use parsers::receipt_json::{load_receipts_json, parse_receipts_json};
pub use types::{IngestReport, SkippedRecord};

use anyhow::Result;
use std::path::Path;

/// Load a receipt file, picking the parser from the extension (`.csv` or JSON).
pub fn load_receipts(path: impl AsRef<Path>) -> Result<IngestReport> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let report = if is_csv {
        load_receipts_csv(path)?
    } else {
        load_receipts_json(path)?
    };

    tracing::info!(
        path = %path.display(),
        receipts = report.receipts.len(),
        skipped = report.skipped.len(),
        "loaded receipts"
    );
    Ok(report)
}
