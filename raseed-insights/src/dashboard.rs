//! Dashboard snapshot: everything the charts need in one serializable value.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use raseed_core::{
    monthly_category_breakdown, rolling_monthly_totals, MonthlyBreakdown, Receipt, RollingTotals,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub reference: NaiveDate,
    pub this_month: MonthlyBreakdown,
    pub rolling: RollingTotals,
}

/// Compact view for a savings-suggestion collaborator (`raseed summary --spending-data`).
#[derive(Debug, Serialize)]
struct SpendingData<'a> {
    month: String,
    total_this_month: f64,
    categories: Vec<(&'a str, f64)>,
    monthly_totals: Vec<(&'a str, f64)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    currencies: Vec<&'a str>,
}

impl DashboardSnapshot {
    pub fn build(receipts: &[Receipt], reference: NaiveDate, window_size: usize) -> Result<Self> {
        Ok(Self {
            reference,
            this_month: monthly_category_breakdown(receipts, reference),
            rolling: rolling_monthly_totals(receipts, reference, window_size)?,
        })
    }

    pub fn total_this_month(&self) -> f64 {
        self.this_month.total
    }

    /// Receipts with unparseable dates; both halves see the same input.
    pub fn skipped(&self) -> usize {
        self.this_month.skipped.max(self.rolling.skipped)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serialize dashboard snapshot")
    }

    /// Categories, amounts and time periods as JSON text.
    pub fn spending_data_json(&self) -> Result<String> {
        let data = SpendingData {
            month: self.this_month.month.label(),
            total_this_month: self.this_month.total,
            categories: self
                .this_month
                .categories
                .iter()
                .map(|c| (c.name.as_str(), c.amount))
                .collect(),
            monthly_totals: self
                .rolling
                .points
                .iter()
                .map(|p| (p.label.as_str(), p.total))
                .collect(),
            currencies: self.this_month.currencies.iter().map(String::as_str).collect(),
        };
        serde_json::to_string(&data).context("serialize spending data")
    }

    /// Plain-text rendering used by the CLI.
    pub fn render_text(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!(
            "Total spend this month ({}): {:.2}\n",
            self.this_month.month,
            self.this_month.total
        ));
        if self.this_month.is_mixed_currency() {
            s.push_str(&format!(
                "  note: mixed currencies ({}), amounts are not converted\n",
                self.this_month.currencies.join(", ")
            ));
        }

        s.push_str("\nThis month's spending by category\n");
        if self.this_month.categories.is_empty() {
            s.push_str("  No spending data for this month.\n");
        }
        for c in &self.this_month.categories {
            s.push_str(&format!("  {:<24} {:>10.2}\n", c.name, c.amount));
        }

        s.push_str(&format!("\nSpending: last {} months\n", self.rolling.points.len()));
        if !self.rolling.has_spending() {
            s.push_str(&format!(
                "  No spending data for the last {} months.\n",
                self.rolling.points.len()
            ));
        }
        for p in &self.rolling.points {
            s.push_str(&format!("  {:<24} {:>10.2}\n", p.label, p.total));
        }

        if self.skipped() > 0 {
            s.push_str(&format!("\n{} receipt(s) skipped: unreadable date\n", self.skipped()));
        }
        s
    }
}
