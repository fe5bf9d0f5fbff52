//! Error taxonomy shared by the aggregator and the scope resolver.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// A receipt date or reference instant is not a calendar date.
    #[error("invalid date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    /// The interpreter handed over a kind the resolver does not know.
    #[error("unrecognized time expression: {0}")]
    UnrecognizedTimeExpression(String),

    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("invalid amount for {field}: {value}")]
    InvalidAmount { field: String, value: f64 },

    #[error("invalid quantity for item '{item}': {value}")]
    InvalidQuantity { item: String, value: u32 },

    #[error("rolling window of {requested} months exceeds the maximum of {max}")]
    WindowTooLarge { requested: usize, max: usize },
}

impl CoreError {
    pub(crate) fn invalid_date(value: &str, reason: impl ToString) -> Self {
        CoreError::InvalidDate {
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
