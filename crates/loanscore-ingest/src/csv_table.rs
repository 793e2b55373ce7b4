use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use loanscore_model::{RawRecord, RawValue};
use tracing::debug;

use crate::error::{IngestError, Result};

/// Placeholder header for blank header cells.
pub const EMPTY_HEADER: &str = "__EMPTY";

/// A worksheet: one header row and the data rows below it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    /// Convert rows to records keyed by header, in column order.
    ///
    /// Empty cells are left out of the record, so an empty cell behaves like an
    /// absent column. Whitespace-only cells are kept.
    pub fn to_records(&self) -> Vec<RawRecord> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .zip(row)
                    .filter(|(_, cell)| !cell.is_empty())
                    .map(|(header, cell)| (header.clone(), RawValue::Text(cell.clone())))
                    .collect()
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

/// Cells keep their whitespace; a blank-looking cell is still a value.
fn normalize_cell(raw: &str) -> String {
    raw.trim_matches('\u{feff}').to_string()
}

/// Give blank headers a placeholder and suffix repeated headers with `_1`, `_2`, ...
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    headers
        .into_iter()
        .map(|header| {
            let base = if header.is_empty() {
                EMPTY_HEADER.to_string()
            } else {
                header
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{base}_{count}")
            };
            *count += 1;
            name
        })
        .collect()
}

/// Read a CSV worksheet from any reader. `origin` is only used in errors.
pub fn read_csv_from<R: Read>(input: R, origin: &Path) -> Result<SheetTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Csv {
            path: PathBuf::from(origin),
            source,
        })?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        raw_rows.push(row);
    }
    let mut raw_rows = raw_rows.into_iter();
    let Some(header_row) = raw_rows.next() else {
        return Ok(SheetTable::default());
    };
    let headers = dedupe_headers(
        header_row
            .iter()
            .map(|value| normalize_header(value))
            .collect(),
    );
    let rows: Vec<Vec<String>> = raw_rows
        .map(|record| {
            (0..headers.len())
                .map(|idx| record.get(idx).cloned().unwrap_or_default())
                .collect()
        })
        .collect();
    debug!(
        path = %origin.display(),
        columns = headers.len(),
        rows = rows.len(),
        "read worksheet"
    );
    Ok(SheetTable { headers, rows })
}

/// Read a CSV worksheet from disk.
pub fn read_csv_table(path: &Path) -> Result<SheetTable> {
    let file = std::fs::File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv_from(file, path)
}
