//! Receipt record types as handed over by the ingestion step.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::category::normalize_category;
use crate::error::{CoreError, Result};

/// Wire format of every receipt date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One purchase event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Purchase date (YYYY-MM-DD), kept as delivered so bad values can be isolated
    pub date: String,
    /// Display label only
    #[serde(default)]
    pub store_name: String,
    /// Receipt-level total (tax included when the store prints it that way)
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<f64>,
    /// Currency code, never converted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

/// One purchased product or service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub name: String,
    /// Line total; quantity is already folded in
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Parse a `YYYY-MM-DD` date strictly.
pub fn parse_receipt_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::invalid_date(value, "empty date"));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|e| CoreError::invalid_date(value, e))
}

impl Receipt {
    /// Create a receipt with no tax, currency or items
    pub fn new(date: impl Into<String>, store_name: impl Into<String>, total: f64) -> Self {
        Self {
            date: date.into(),
            store_name: store_name.into(),
            total,
            tax: None,
            currency: None,
            language: None,
            items: Vec::new(),
        }
    }

    pub fn with_item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_tax(mut self, tax: f64) -> Self {
        self.tax = Some(tax);
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// The receipt's calendar date, or `InvalidDate`.
    pub fn calendar_date(&self) -> Result<NaiveDate> {
        parse_receipt_date(&self.date)
    }

    /// Full record check used at ingestion time.
    pub fn validate(&self) -> Result<()> {
        self.calendar_date()?;
        check_amount("total", self.total)?;
        if let Some(tax) = self.tax {
            check_amount("tax", tax)?;
        }
        for item in &self.items {
            check_amount(&format!("item '{}'", item.name), item.amount)?;
            if let Some(q) = item.quantity {
                if q == 0 {
                    return Err(CoreError::InvalidQuantity {
                        item: item.name.clone(),
                        value: q,
                    });
                }
            }
        }
        Ok(())
    }

    /// Sum of line item amounts (may differ from `total`).
    pub fn items_total(&self) -> f64 {
        self.items.iter().map(|i| i.amount).sum()
    }
}

impl LineItem {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            amount,
            quantity: None,
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Quantity with the default of 1 applied
    pub fn effective_quantity(&self) -> u32 {
        self.quantity.unwrap_or(1)
    }

    /// Category label after normalization
    pub fn category_label(&self) -> &str {
        normalize_category(self.category.as_deref())
    }
}

fn check_amount(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::InvalidAmount {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_date_parses_wire_format() {
        let r = Receipt::new("2025-06-05", "Corner Shop", 12.5);
        assert_eq!(r.calendar_date().unwrap(), NaiveDate::from_ymd_opt(2025, 6, 5).unwrap());
    }

    #[test]
    fn test_impossible_dates_are_rejected() {
        for bad in ["2025-02-30", "2025-13-01", "05/06/2025", "", "yesterday"] {
            let r = Receipt::new(bad, "Shop", 1.0);
            assert!(
                matches!(r.calendar_date(), Err(CoreError::InvalidDate { .. })),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_validate_rejects_negative_amounts_and_zero_quantity() {
        let neg_total = Receipt::new("2025-06-05", "Shop", -1.0);
        assert!(matches!(neg_total.validate(), Err(CoreError::InvalidAmount { .. })));

        let neg_item = Receipt::new("2025-06-05", "Shop", 1.0).with_item(LineItem::new("milk", -2.0));
        assert!(matches!(neg_item.validate(), Err(CoreError::InvalidAmount { .. })));

        let zero_qty = Receipt::new("2025-06-05", "Shop", 1.0)
            .with_item(LineItem::new("milk", 1.0).with_quantity(0));
        assert!(matches!(zero_qty.validate(), Err(CoreError::InvalidQuantity { .. })));

        let ok = Receipt::new("2025-06-05", "Shop", 3.0)
            .with_tax(0.2)
            .with_item(LineItem::new("milk", 1.0).with_quantity(2));
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_deserialize_extraction_shape() {
        let json = r#"{
            "date": "2025-06-05",
            "storeName": "Home Depot",
            "total": 145,
            "currency": "USD",
            "items": [
                {"name": "lamp", "amount": 45, "category": "home"},
                {"name": "paint", "amount": 100, "quantity": 2}
            ]
        }"#;
        let r: Receipt = serde_json::from_str(json).unwrap();
        assert_eq!(r.store_name, "Home Depot");
        assert_eq!(r.items.len(), 2);
        assert_eq!(r.items[1].effective_quantity(), 2);
        assert_eq!(r.items[1].category_label(), "Uncategorized");
        assert_eq!(r.items_total(), 145.0);
    }
}
