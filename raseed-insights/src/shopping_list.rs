//! Consolidated shopping list: every distinct item bought across receipts.

use raseed_core::Receipt;
use std::collections::HashSet;

/// Unique item names, first spelling and first appearance kept.
/// Matching ignores case and surrounding whitespace; blank names are dropped.
pub fn consolidate_items(receipts: &[Receipt]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for item in receipts.iter().flat_map(|r| r.items.iter()) {
        let name = item.name.trim();
        if name.is_empty() {
            continue;
        }
        if seen.insert(name.to_lowercase()) {
            out.push(name.to_string());
        }
    }

    out
}
