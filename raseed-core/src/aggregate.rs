//! Aggregator: monthly category breakdown and rolling monthly totals.
//!
//! Both operations are pure over a borrowed receipt slice. A receipt whose date
//! cannot be parsed is left out and counted in `skipped`; it never lands in the
//! reference month.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{CoreError, Result};
use crate::month::MonthKey;
use crate::receipt::Receipt;

/// Number of points in the dashboard's rolling series.
pub const DEFAULT_WINDOW_SIZE: usize = 3;

/// A century of months.
pub const MAX_WINDOW_SIZE: usize = 1200;

/// Reject rolling window sizes above [`MAX_WINDOW_SIZE`].
pub fn check_window_size(window_size: usize) -> Result<usize> {
    if window_size > MAX_WINDOW_SIZE {
        return Err(CoreError::WindowTooLarge {
            requested: window_size,
            max: MAX_WINDOW_SIZE,
        });
    }
    Ok(window_size)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub name: String,
    pub amount: f64,
}

/// Spending for the reference month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBreakdown {
    pub month: MonthKey,
    /// Sum of receipt totals in the month
    pub total: f64,
    /// Sorted by amount, largest first
    pub categories: Vec<CategoryTotal>,
    pub receipt_count: usize,
    pub tax_total: f64,
    /// Distinct currency codes seen in the month, first appearance first
    pub currencies: Vec<String>,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub month: MonthKey,
    pub label: String,
    pub total: f64,
}

/// Rolling series, oldest month first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingTotals {
    pub points: Vec<MonthlyTotal>,
    pub skipped: usize,
}

impl MonthlyBreakdown {
    /// Sum over category amounts; expected to diverge from `total`.
    pub fn categorized_total(&self) -> f64 {
        self.categories.iter().map(|c| c.amount).sum()
    }

    pub fn is_mixed_currency(&self) -> bool {
        self.currencies.len() > 1
    }
}

impl RollingTotals {
    pub fn has_spending(&self) -> bool {
        self.points.iter().any(|p| p.total > 0.0)
    }
}

/// Insertion-ordered accumulation of open-ended category labels.
#[derive(Debug, Default)]
struct CategoryAccumulator {
    index: HashMap<String, usize>,
    totals: Vec<CategoryTotal>,
}

impl CategoryAccumulator {
    fn add(&mut self, name: &str, amount: f64) {
        match self.index.get(name) {
            Some(&i) => self.totals[i].amount += amount,
            None => {
                self.index.insert(name.to_string(), self.totals.len());
                self.totals.push(CategoryTotal {
                    name: name.to_string(),
                    amount,
                });
            }
        }
    }

    fn into_sorted(self) -> Vec<CategoryTotal> {
        let mut totals = self.totals;
        // sort_by is stable: ties keep first appearance order
        totals.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        totals
    }
}

/// Category totals over every line item of `receipts`, largest first.
pub fn category_totals<'a>(receipts: impl IntoIterator<Item = &'a Receipt>) -> Vec<CategoryTotal> {
    let mut acc = CategoryAccumulator::default();
    for r in receipts {
        for item in &r.items {
            acc.add(item.category_label(), item.amount);
        }
    }
    acc.into_sorted()
}

fn dated<'a>(receipts: &'a [Receipt], skipped: &mut usize) -> Vec<(NaiveDate, &'a Receipt)> {
    let mut out = Vec::with_capacity(receipts.len());
    for r in receipts {
        match r.calendar_date() {
            Ok(date) => out.push((date, r)),
            Err(e) => {
                *skipped += 1;
                tracing::debug!(store = %r.store_name, error = %e, "skipping receipt");
            }
        }
    }
    out
}

/// Total and per-category spending for the calendar month containing `reference`.
pub fn monthly_category_breakdown(receipts: &[Receipt], reference: NaiveDate) -> MonthlyBreakdown {
    let month = MonthKey::of(reference);
    let mut skipped = 0usize;
    let mut total = 0.0;
    let mut tax_total = 0.0;
    let mut currencies: Vec<String> = Vec::new();
    let mut in_month: Vec<&Receipt> = Vec::new();

    for (date, r) in dated(receipts, &mut skipped) {
        if !month.contains(date) {
            continue;
        }
        in_month.push(r);
        total += r.total;
        tax_total += r.tax.unwrap_or(0.0);
        if let Some(code) = r.currency.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            if !currencies.iter().any(|c| c.eq_ignore_ascii_case(code)) {
                currencies.push(code.to_uppercase());
            }
        }
    }

    MonthlyBreakdown {
        month,
        total,
        receipt_count: in_month.len(),
        categories: category_totals(in_month),
        tax_total,
        currencies,
        skipped,
    }
}

/// `window_size` monthly totals ending at (and including) the month of `reference`.
pub fn rolling_monthly_totals(
    receipts: &[Receipt],
    reference: NaiveDate,
    window_size: usize,
) -> Result<RollingTotals> {
    let window_size = check_window_size(window_size)?;
    let current = MonthKey::of(reference);
    let mut totals = vec![0.0f64; window_size];
    let mut skipped = 0usize;

    for (date, r) in dated(receipts, &mut skipped) {
        let distance = MonthKey::of(date).months_until(current);
        if distance < 0 || distance >= window_size as i64 {
            continue;
        }
        // index 0 is the oldest month
        let slot = window_size - 1 - distance as usize;
        totals[slot] += r.total;
    }

    let points = totals
        .into_iter()
        .enumerate()
        .map(|(i, total)| {
            let month = current.minus_months((window_size - 1 - i) as u32);
            MonthlyTotal {
                month,
                label: month.label(),
                total,
            }
        })
        .collect();

    Ok(RollingTotals { points, skipped })
}
