pub mod receipt_csv;
pub mod receipt_json;
