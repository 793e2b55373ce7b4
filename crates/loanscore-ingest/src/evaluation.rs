//! Row preparation for the model evaluation endpoint.

use loanscore_model::{RawRecord, RawValue};

/// Lower-case and trim column names and text values.
///
/// Non-text values pass through unchanged. When two columns collapse to the
/// same normalized name the later one wins.
pub fn normalize_for_evaluation(record: &RawRecord) -> serde_json::Map<String, serde_json::Value> {
    let mut row = serde_json::Map::new();
    for (name, value) in record.iter() {
        let value = match value {
            RawValue::Text(text) => {
                serde_json::Value::String(text.to_lowercase().trim().to_string())
            }
            other => serde_json::Value::from(other),
        };
        row.insert(name.to_lowercase().trim().to_string(), value);
    }
    row
}

/// Normalize every row, preserving order.
pub fn evaluation_rows(records: &[RawRecord]) -> Vec<serde_json::Value> {
    records
        .iter()
        .map(|record| serde_json::Value::Object(normalize_for_evaluation(record)))
        .collect()
}
