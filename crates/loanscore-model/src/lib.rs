pub mod error;
pub mod field;
pub mod outcome;
pub mod record;
pub mod redact;
pub mod vector;

pub use error::{ModelError, Result};
pub use field::{FEATURE_COUNT, FieldSpec};
pub use outcome::{
    ApiFailure, BatchRow, RiskLabel, RowOutcome, RowState, ScoreResult, ValidationIssue,
};
pub use record::{RawRecord, RawValue};
pub use redact::{REDACTED_VALUE, redact_value};
pub use vector::FeatureVector;

/// Parse a JSON object into a [`RawRecord`].
///
/// Anything other than a top-level object is rejected.
pub fn parse_record(json: &str) -> Result<RawRecord> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_object() {
        return Err(ModelError::InvalidRecord(
            "expected a JSON object of field values".to_string(),
        ));
    }
    Ok(serde_json::from_value(value)?)
}
