//! Loan scoring workflows built on the encoder, validator and client crates.
//!
//! - [`batch`]: sequential spreadsheet scoring with early halt on session expiry
//! - [`single`]: one hand-entered record with the full form rule set
//! - [`export`] and [`contact`]: result files and follow-up tracking

pub mod batch;
pub mod contact;
pub mod error;
pub mod export;
pub mod identity;
pub mod scorer;
pub mod single;
pub mod summary;

pub use batch::{BatchOrchestrator, BatchReport, BatchRun};
pub use contact::{
    CONTACTS_FILE_ENV_VAR, ContactAnnotation, ContactLog, ContactStatus, default_contacts_path,
};
pub use error::{CoreError, Result};
pub use export::{
    ExportFormat, ExportRecord, export_records, export_to_path, result_text, write_results,
};
pub use identity::{DEFAULT_NAME_COLUMNS, IdentityExtractor, fallback_name};
pub use scorer::Scorer;
pub use single::{SingleOptions, SingleScore, score_single};
pub use summary::BatchSummary;
