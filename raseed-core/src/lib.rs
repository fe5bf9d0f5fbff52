//! raseed-core: receipt model, spending aggregation and time-scoped grounding.
//!
//! Everything here is a pure function over an in-memory receipt slice.

pub mod aggregate;
pub mod error;
pub mod month;
pub mod receipt;
pub mod scope;
pub mod time;

pub use aggregate::{
    category_totals, check_window_size, monthly_category_breakdown, rolling_monthly_totals, CategoryTotal, MonthlyBreakdown,
    MonthlyTotal, RollingTotals, DEFAULT_WINDOW_SIZE, MAX_WINDOW_SIZE,
};
pub use error::CoreError;
pub use month::MonthKey;
pub use receipt::{parse_receipt_date, LineItem, Receipt};
pub use scope::{
    filter_by_window, resolve_window, scope_receipts, ScopedReceipts, TimeExpressionKind, Window,
};
pub use time::parse_reference_instant;

/// Category labels are open-ended free text coming from extraction.
pub mod category {
    /// Label used for items without a category.
    pub const UNCATEGORIZED: &str = "Uncategorized";

    /// Missing or blank categories collapse to [`UNCATEGORIZED`]; anything else
    /// passes through untouched.
    pub fn normalize_category(raw: Option<&str>) -> &str {
        match raw {
            Some(c) if !c.trim().is_empty() => c,
            _ => UNCATEGORIZED,
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_blank_categories_normalize() {
            assert_eq!(normalize_category(None), UNCATEGORIZED);
            assert_eq!(normalize_category(Some("")), UNCATEGORIZED);
            assert_eq!(normalize_category(Some("   ")), UNCATEGORIZED);
        }

        #[test]
        fn test_labels_pass_through() {
            assert_eq!(normalize_category(Some("home")), "home");
            // No case folding: "Home" and "home" are different labels
            assert_eq!(normalize_category(Some("Home")), "Home");
        }
    }
}

pub use category::{normalize_category, UNCATEGORIZED};
