use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::errors::CoreError;
use crate::models::holding::{Holding, HoldingRecord};
use crate::models::portfolio::Portfolio;

/// Indentation used for the pretty-printed portfolio file.
pub const INDENT: &[u8] = b"    ";

/// Encode a portfolio as a pretty-printed JSON document.
///
/// Layout:
/// ```text
/// {
///     "AAPL": { "symbol": "AAPL", "shares": 10, "purchase_price": 150.0,
///               "purchase_date": "2024-01-15", "current_price": 180.0,
///               "company_info": { "Name": "Apple Inc.", ... } },
///     ...
/// }
/// ```
/// Keys appear in portfolio (insertion) order.
pub fn encode(portfolio: &Portfolio) -> Result<String, CoreError> {
    let mut document = Map::new();
    for holding in portfolio.iter() {
        let record = serde_json::to_value(holding.to_record()).map_err(|e| {
            CoreError::Serialization(format!("Failed to serialize {}: {e}", holding.symbol))
        })?;
        document.insert(holding.symbol.clone(), record);
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    Value::Object(document)
        .serialize(&mut serializer)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize portfolio: {e}")))?;

    String::from_utf8(buf)
        .map_err(|e| CoreError::Serialization(format!("Portfolio JSON is not UTF-8: {e}")))
}

/// Decode a portfolio document.
///
/// Every key is uppercased and becomes the holding's symbol; the
/// `symbol` field inside a record is ignored. Missing `current_price`
/// and `company_info` default to "never fetched". If two keys differ
/// only in case, the later record wins and keeps the earlier position.
///
/// A record that cannot be read or breaks a holding invariant (zero
/// shares, non-positive price, bad date) is logged and skipped; the
/// remaining holdings still load. Only an unreadable document fails.
pub fn decode(text: &str) -> Result<Portfolio, CoreError> {
    let root: Value = serde_json::from_str(text)?;
    let document = match root {
        Value::Object(map) => map,
        other => {
            return Err(CoreError::InvalidFileFormat(format!(
                "Expected a JSON object of holdings, found {}",
                json_kind(&other)
            )))
        }
    };

    let mut portfolio = Portfolio::new();
    for (key, value) in document {
        let holding = match decode_record(&key, value) {
            Ok(holding) => holding,
            Err(e) => {
                warn!(%key, error = %e, "Skipping invalid record in portfolio file");
                continue;
            }
        };

        match portfolio.get_mut(&holding.symbol) {
            Some(existing) => {
                warn!(symbol = %holding.symbol, "Duplicate symbol in portfolio file, keeping the later record");
                *existing = holding;
            }
            None => {
                // Absent, so insert cannot be rejected.
                let _ = portfolio.insert(holding);
            }
        }
    }
    Ok(portfolio)
}

fn decode_record(key: &str, value: Value) -> Result<Holding, CoreError> {
    let record: HoldingRecord = serde_json::from_value(value)
        .map_err(|e| CoreError::Deserialization(format!("Invalid record for {key}: {e}")))?;
    Holding::from_record(record, key)
        .map_err(|e| CoreError::InvalidFileFormat(format!("Invalid record for {key}: {e}")))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
