//! Writing batch results to CSV or JSON.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use loanscore_model::{BatchRow, RowOutcome};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::contact::{ContactLog, ContactStatus};
use crate::error::{CoreError, Result};

/// Output file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    /// Guess from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// One exported result line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
    pub row: usize,
    pub name: String,
    pub income: String,
    pub credit_score: String,
    pub result: String,
    pub status: String,
    pub contact_status: Option<ContactStatus>,
}

impl ExportRecord {
    pub fn from_row(row: &BatchRow, contacts: &ContactLog) -> Self {
        Self {
            row: row.index,
            name: row.display_name.clone(),
            income: row.income.clone().unwrap_or_else(|| "-".to_string()),
            credit_score: row.credit_score.clone().unwrap_or_else(|| "-".to_string()),
            result: result_text(&row.outcome),
            status: row.state().label().to_string(),
            contact_status: contacts.status(row.index),
        }
    }
}

/// Short result text shown for a row.
#[must_use]
pub fn result_text(outcome: &RowOutcome) -> String {
    match outcome {
        RowOutcome::Scored { result } => result.label.label().to_string(),
        RowOutcome::Skipped { .. } => "Invalid score".to_string(),
        RowOutcome::ApiErrored { .. } => "API error".to_string(),
        RowOutcome::AuthExpired => "Session expired".to_string(),
        RowOutcome::Pending => "Not processed".to_string(),
    }
}

/// Build export records, merging contact annotations by row number.
pub fn export_records(rows: &[BatchRow], contacts: &ContactLog) -> Vec<ExportRecord> {
    rows.iter()
        .map(|row| ExportRecord::from_row(row, contacts))
        .collect()
}

/// Write results to `writer` in the given format.
pub fn write_results<W: Write>(
    writer: W,
    format: ExportFormat,
    records: &[ExportRecord],
) -> Result<()> {
    match format {
        ExportFormat::Csv => {
            let mut csv = csv::Writer::from_writer(writer);
            for record in records {
                csv.serialize(record)?;
            }
            csv.flush()?;
        }
        ExportFormat::Json => {
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, records)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

/// Write results to a file.
pub fn export_to_path(
    path: &Path,
    format: ExportFormat,
    rows: &[BatchRow],
    contacts: &ContactLog,
) -> Result<()> {
    let file = File::create(path).map_err(|e| CoreError::io(path, e))?;
    let records = export_records(rows, contacts);
    write_results(BufWriter::new(file), format, &records)?;
    info!(
        path = %path.display(),
        rows = records.len(),
        format = format_name(format),
        "results exported"
    );
    Ok(())
}

fn format_name(format: ExportFormat) -> &'static str {
    match format {
        ExportFormat::Csv => "csv",
        ExportFormat::Json => "json",
    }
}

#[cfg(test)]
mod tests {
    use loanscore_model::{ApiFailure, ScoreResult};
    use serde_json::json;

    use super::*;

    fn rows() -> Vec<BatchRow> {
        let mut scored = BatchRow::pending(1, "Nguyen Thi A");
        scored.income = Some("52000".to_string());
        scored.credit_score = Some("710".to_string());
        scored.outcome = RowOutcome::Scored {
            result: ScoreResult::from_response(json!({"prediction": [1]})),
        };
        let mut failed = BatchRow::pending(2, "Record #2");
        failed.outcome = RowOutcome::ApiErrored {
            failure: ApiFailure {
                status: Some(500),
                message: "boom".to_string(),
            },
        };
        vec![scored, failed]
    }

    #[test]
    fn csv_has_header_and_contact_column() {
        let mut contacts = ContactLog::in_memory();
        contacts.annotate(1, "Nguyen Thi A", ContactStatus::Contacted);
        let records = export_records(&rows(), &contacts);

        let mut buffer = Vec::new();
        write_results(&mut buffer, ExportFormat::Csv, &records).expect("write csv");
        let text = String::from_utf8(buffer).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "row,name,income,credit_score,result,status,contact_status"
        );
        assert_eq!(lines[1], "1,Nguyen Thi A,52000,710,Low risk,scored,contacted");
        assert_eq!(lines[2], "2,Record #2,-,-,API error,api error,");
    }

    #[test]
    fn json_is_an_array() {
        let records = export_records(&rows(), &ContactLog::in_memory());
        let mut buffer = Vec::new();
        write_results(&mut buffer, ExportFormat::Json, &records).expect("write json");
        let value: serde_json::Value = serde_json::from_slice(&buffer).expect("parse");
        assert_eq!(value[0]["result"], "Low risk");
        assert_eq!(value[1]["contact_status"], serde_json::Value::Null);
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("out.JSON")), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_path(Path::new("out.csv")), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::from_path(Path::new("out.xlsx")), None);
    }
}
