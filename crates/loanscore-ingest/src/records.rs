//! Loading applicant records from spreadsheets and JSON.

use std::path::Path;

use loanscore_model::RawRecord;
use tracing::info;

use crate::csv_table::read_csv_table;
use crate::error::{IngestError, Result};

/// Input formats accepted for record files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Csv,
    Json,
}

impl RecordFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "csv" | "txt" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Read all records from a CSV or JSON file, in file order.
pub fn read_records(path: &Path) -> Result<Vec<RawRecord>> {
    let format = RecordFormat::from_path(path).ok_or_else(|| IngestError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let records = match format {
        RecordFormat::Csv => read_csv_table(path)?.to_records(),
        RecordFormat::Json => {
            let text = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            parse_records_json(&text, path)?
        }
    };
    info!(path = %path.display(), records = records.len(), "loaded records");
    Ok(records)
}

/// Parse a JSON array of objects, or a single object, into records.
pub fn parse_records_json(text: &str, origin: &Path) -> Result<Vec<RawRecord>> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|source| IngestError::Json {
            path: origin.to_path_buf(),
            source,
        })?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        object @ serde_json::Value::Object(_) => vec![object],
        _ => {
            return Err(IngestError::NotRecords {
                path: origin.to_path_buf(),
                message: "expected an object or an array of objects".to_string(),
            });
        }
    };
    items
        .into_iter()
        .enumerate()
        .map(|(position, item)| {
            if !item.is_object() {
                return Err(IngestError::NotRecords {
                    path: origin.to_path_buf(),
                    message: format!("item {} is not an object", position + 1),
                });
            }
            serde_json::from_value(item).map_err(|source| IngestError::Json {
                path: origin.to_path_buf(),
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use loanscore_model::RawValue;

    use super::*;

    #[test]
    fn detects_format_by_extension() {
        assert_eq!(
            RecordFormat::from_path(Path::new("a/B.CSV")),
            Some(RecordFormat::Csv)
        );
        assert_eq!(
            RecordFormat::from_path(Path::new("rows.json")),
            Some(RecordFormat::Json)
        );
        assert_eq!(RecordFormat::from_path(Path::new("rows.xlsx")), None);
    }

    #[test]
    fn json_object_or_array() {
        let single = parse_records_json(r#"{"person_age": 30}"#, Path::new("x")).expect("object");
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].get("person_age"), Some(&RawValue::Number(30.0)));

        let many = parse_records_json(r#"[{"a": 1}, {"b": "x"}]"#, Path::new("x")).expect("array");
        assert_eq!(many.len(), 2);
    }

    #[test]
    fn json_rejects_non_objects() {
        assert!(matches!(
            parse_records_json("[1]", Path::new("x")),
            Err(IngestError::NotRecords { .. })
        ));
        assert!(matches!(
            parse_records_json("\"text\"", Path::new("x")),
            Err(IngestError::NotRecords { .. })
        ));
    }
}
