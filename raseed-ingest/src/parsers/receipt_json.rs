//! Receipt JSON loader.
//!
//! Expected shape is the extraction output, one object per receipt:
//!   [{"date": "2025-06-05", "storeName": "...", "total": 145.0,
//!     "items": [{"name": "...", "amount": 45.0, "category": "home"}]}]

use anyhow::{bail, Context, Result};
use raseed_core::Receipt;
use serde_json::Value;
use std::path::Path;

use crate::types::IngestReport;

/// Parse a JSON array of receipts. Only a non-array top level is fatal.
pub fn parse_receipts_json(text: &str) -> Result<IngestReport> {
    let doc: Value = serde_json::from_str(text).context("receipts file is not valid JSON")?;
    let Value::Array(elements) = doc else {
        bail!("expected a JSON array of receipts");
    };

    let mut report = IngestReport::default();
    for (i, element) in elements.into_iter().enumerate() {
        let receipt: Receipt = match serde_json::from_value(element) {
            Ok(r) => r,
            Err(e) => {
                report.skip(i, e);
                continue;
            }
        };
        if let Err(e) = receipt.validate() {
            report.skip(i, e);
            continue;
        }
        report.receipts.push(receipt);
    }

    Ok(report)
}

pub fn load_receipts_json(path: impl AsRef<Path>) -> Result<IngestReport> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_receipts_json(&text).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_receipts_basic() {
        let text = r#"[
            {"date": "2025-06-05", "storeName": "Home Store", "total": 145,
             "items": [{"name": "lamp", "amount": 45, "category": "home"},
                       {"name": "rug", "amount": 100, "category": ""}]},
            {"date": "2025-05-20", "storeName": "Grocer", "total": 12.5, "tax": 0.5,
             "currency": "EUR", "language": "de", "items": []}
        ]"#;
        let report = parse_receipts_json(text).unwrap();
        assert_eq!(report.receipts.len(), 2);
        assert!(report.skipped.is_empty());
        assert_eq!(report.receipts[1].currency.as_deref(), Some("EUR"));
        assert_eq!(report.receipts[1].tax, Some(0.5));
    }

    #[test]
    fn test_bad_records_are_isolated() {
        let text = r#"[
            {"date": "2025-06-05", "storeName": "ok", "total": 1},
            {"date": "2025-02-30", "storeName": "impossible date", "total": 1},
            {"storeName": "no date", "total": 1},
            {"date": "2025-06-06", "storeName": "negative", "total": -3},
            "not even an object",
            {"date": "2025-06-07", "storeName": "ok too", "total": 2}
        ]"#;
        let report = parse_receipts_json(text).unwrap();
        let stores: Vec<_> = report.receipts.iter().map(|r| r.store_name.as_str()).collect();
        assert_eq!(stores, vec!["ok", "ok too"]);
        let indexes: Vec<_> = report.skipped.iter().map(|s| s.index.as_str()).collect();
        assert_eq!(indexes, vec!["1", "2", "3", "4"]);
        assert!(report.skipped[0].reason.contains("2025-02-30"));
    }

    #[test]
    fn test_non_array_is_fatal() {
        assert!(parse_receipts_json(r#"{"date": "2025-06-05"}"#).is_err());
        assert!(parse_receipts_json("not json").is_err());
    }
}
