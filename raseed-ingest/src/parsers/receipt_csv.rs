//! Flat receipt CSV export, one line item per row:
//!
//!   receipt_id,date,store,total,tax,currency,item,amount,quantity,category
//!   r1,2025-06-05,Home Store,145.00,,USD,lamp,45.00,1,home
//!   r1,2025-06-05,Home Store,145.00,,USD,rug,100.00,,
//!
//! Consecutive rows with the same receipt_id form one receipt; the first row
//! supplies the receipt-level columns. A row with an empty `item` adds no line
//! item, so a receipt without items is a single row.

use anyhow::{Context, Result};
use raseed_core::{LineItem, Receipt};
use std::io::Read;
use std::path::Path;

use crate::types::IngestReport;

const COLUMNS: usize = 10;

fn field<'a>(record: &'a csv::StringRecord, i: usize) -> &'a str {
    record.get(i).unwrap_or("").trim()
}

fn opt(s: &str) -> Option<&str> {
    if s.is_empty() { None } else { Some(s) }
}

fn parse_amount(s: &str, column: &str) -> Result<f64, String> {
    s.replace(',', "")
        .parse::<f64>()
        .map_err(|_| format!("{column}: '{s}' is not a number"))
}

fn parse_line_item(record: &csv::StringRecord) -> Result<Option<LineItem>, String> {
    let name = field(record, 6);
    if name.is_empty() {
        return Ok(None);
    }
    let amount = parse_amount(field(record, 7), "amount")?;
    let quantity = match opt(field(record, 8)) {
        Some(q) => Some(
            q.parse::<u32>()
                .map_err(|_| format!("quantity: '{q}' is not a whole number"))?,
        ),
        None => None,
    };
    Ok(Some(LineItem {
        name: name.to_string(),
        amount,
        quantity,
        category: opt(field(record, 9)).map(str::to_string),
    }))
}

fn parse_receipt_head(record: &csv::StringRecord) -> Result<Receipt, String> {
    let total = parse_amount(field(record, 3), "total")?;
    let tax = match opt(field(record, 4)) {
        Some(t) => Some(parse_amount(t, "tax")?),
        None => None,
    };
    Ok(Receipt {
        date: field(record, 1).to_string(),
        store_name: field(record, 2).to_string(),
        total,
        tax,
        currency: opt(field(record, 5)).map(str::to_string),
        language: None,
        items: Vec::new(),
    })
}

/// Receipt being assembled from consecutive rows.
struct Pending {
    id: String,
    receipt: Result<Receipt, String>,
}

impl Pending {
    fn finish(self, report: &mut IngestReport) {
        match self.receipt {
            Ok(receipt) => match receipt.validate() {
                Ok(()) => report.receipts.push(receipt),
                Err(e) => report.skip(&self.id, e),
            },
            Err(reason) => report.skip(&self.id, reason),
        }
    }
}

pub fn parse_receipts_csv<R: Read>(reader: R) -> Result<IngestReport> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let mut report = IngestReport::default();
    let mut pending: Option<Pending> = None;

    for (row, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                report.skip(format!("row {}", row + 2), e);
                continue;
            }
        };
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        if record.len() < COLUMNS - 1 {
            report.skip(format!("row {}", row + 2), format!("expected {COLUMNS} columns"));
            continue;
        }

        let id = field(&record, 0).to_string();
        let continues = pending.as_ref().is_some_and(|p| p.id == id);
        if !continues {
            if let Some(done) = pending.take() {
                done.finish(&mut report);
            }
            pending = Some(Pending {
                id,
                receipt: parse_receipt_head(&record),
            });
        }

        if let Some(p) = pending.as_mut().filter(|p| p.receipt.is_ok()) {
            match parse_line_item(&record) {
                Ok(Some(item)) => {
                    if let Ok(receipt) = p.receipt.as_mut() {
                        receipt.items.push(item);
                    }
                }
                Ok(None) => {}
                Err(reason) => p.receipt = Err(reason),
            }
        }
    }

    if let Some(done) = pending.take() {
        done.finish(&mut report);
    }

    Ok(report)
}

pub fn load_receipts_csv(path: impl AsRef<Path>) -> Result<IngestReport> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_receipts_csv(file).with_context(|| format!("parsing {}", path.display()))
}
