//! Helpers for reading loosely-typed JSON price documents.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::errors::MarketDataError;

/// Parse a response body into a JSON document.
pub(crate) fn parse_document(source_id: &str, body: &str) -> Result<Value, MarketDataError> {
    serde_json::from_str(body).map_err(|e| MarketDataError::InvalidResponse {
        source_id: source_id.to_string(),
        message: e.to_string(),
    })
}

/// Read a number that may be encoded either as a JSON number or as text.
///
/// Returns `None` for anything that does not parse as a finite decimal.
pub(crate) fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => parse_decimal(&number.to_string()),
        Value::String(text) => parse_decimal(text.trim()),
        _ => None,
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}
