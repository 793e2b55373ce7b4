//! Applicant data ingestion.
//!
//! Worksheets are parsed into ordered [`RawRecord`](loanscore_model::RawRecord)s:
//! the first non-blank row is the header, fully blank rows are skipped and
//! blank cells are left out of the record.

pub mod csv_table;
pub mod error;
pub mod evaluation;
pub mod records;

pub use csv_table::{EMPTY_HEADER, SheetTable, read_csv_from, read_csv_table};
pub use error::{IngestError, Result};
pub use evaluation::{evaluation_rows, normalize_for_evaluation};
pub use records::{RecordFormat, parse_records_json, read_records};
