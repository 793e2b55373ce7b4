//! Sequential batch scoring.
//!
//! Rows move through `Pending -> PreValidating -> {Skipped, Scoring}` and end
//! `Scored`, `ApiErrored` or `AuthExpired`. Rows are scored one request at a
//! time in input order. A rejected session halts the run: the row that saw
//! the 401 is marked `AuthExpired` and every later row stays `Pending`
//! without touching the network.

use std::iter::Enumerate;
use std::slice::Iter;

use loanscore_client::ClientError;
use loanscore_model::{ApiFailure, BatchRow, FieldSpec, RawRecord, RowOutcome, RowState};
use loanscore_standards::PreprocessConfig;
use loanscore_transform::vectorize;
use loanscore_validate::validate_batch_row;
use tracing::{debug, info, info_span, warn};

use crate::identity::IdentityExtractor;
use crate::scorer::Scorer;
use crate::summary::BatchSummary;

/// Runs batches against a scorer.
pub struct BatchOrchestrator<'a, S: Scorer + ?Sized> {
    scorer: &'a S,
    config: &'a PreprocessConfig,
    identity: IdentityExtractor,
}

impl<'a, S: Scorer + ?Sized> BatchOrchestrator<'a, S> {
    pub fn new(scorer: &'a S, config: &'a PreprocessConfig) -> Self {
        Self {
            scorer,
            config,
            identity: IdentityExtractor::default(),
        }
    }

    #[must_use]
    pub fn with_identity(mut self, identity: IdentityExtractor) -> Self {
        self.identity = identity;
        self
    }

    /// Start a run over `records`.
    ///
    /// Fails with `Unauthenticated` before any row is touched when no session
    /// exists.
    pub fn start<'r>(
        &'r self,
        records: &'r [RawRecord],
    ) -> Result<BatchRun<'r, S>, ClientError> {
        self.scorer.require_auth()?;
        info!(
            rows = records.len(),
            preprocess = %self.config.describe(),
            "starting batch"
        );
        Ok(BatchRun {
            scorer: self.scorer,
            config: self.config,
            identity: &self.identity,
            records: records.iter().enumerate(),
            halted: false,
        })
    }

    /// Run every row and collect the results.
    pub fn run(&self, records: &[RawRecord]) -> Result<BatchReport, ClientError> {
        let run = self.start(records)?;
        let rows: Vec<BatchRow> = run.collect();
        let report = BatchReport::new(rows);
        let summary = report.summary();
        info!(
            scored = summary.scored,
            skipped = summary.skipped,
            api_errors = summary.api_errors,
            pending = summary.pending,
            session_expired = summary.session_expired,
            "batch finished"
        );
        Ok(report)
    }
}

/// A batch in progress, yielding one [`BatchRow`] per input record.
///
/// Each call to `next` performs at most one network request.
pub struct BatchRun<'r, S: Scorer + ?Sized> {
    scorer: &'r S,
    config: &'r PreprocessConfig,
    identity: &'r IdentityExtractor,
    records: Enumerate<Iter<'r, RawRecord>>,
    halted: bool,
}

impl<S: Scorer + ?Sized> BatchRun<'_, S> {
    /// Whether the session expired during this run.
    pub fn halted(&self) -> bool {
        self.halted
    }

    fn process(&mut self, index: usize, record: &RawRecord) -> BatchRow {
        let mut row = BatchRow::pending(index, self.identity.extract(record, index));
        row.income = display_value(record, FieldSpec::PersonIncome);
        row.credit_score = display_value(record, FieldSpec::CreditScore);
        if self.halted {
            return row;
        }

        let _span = info_span!("batch_row", index).entered();
        debug!(state = %RowState::PreValidating, "pre-validating");
        let issues = validate_batch_row(record);
        if !issues.is_empty() {
            debug!(issues = issues.len(), "row skipped");
            row.outcome = RowOutcome::Skipped { issues };
            return row;
        }

        let vector = vectorize(self.config, record);
        row.vector = Some(vector);
        debug!(state = %RowState::Scoring, "scoring");
        row.outcome = match self.scorer.score(&vector) {
            Ok(result) => RowOutcome::Scored { result },
            Err(ClientError::AuthExpired | ClientError::Unauthenticated) => {
                warn!("session rejected, halting batch");
                self.scorer.invalidate_session();
                self.halted = true;
                RowOutcome::AuthExpired
            }
            Err(err) => {
                warn!(error = %err, "row failed");
                RowOutcome::ApiErrored {
                    failure: ApiFailure {
                        status: err.status(),
                        message: err.to_string(),
                    },
                }
            }
        };
        row
    }
}

impl<S: Scorer + ?Sized> Iterator for BatchRun<'_, S> {
    type Item = BatchRow;

    fn next(&mut self) -> Option<BatchRow> {
        let (position, record) = self.records.next()?;
        Some(self.process(position + 1, record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

impl<S: Scorer + ?Sized> ExactSizeIterator for BatchRun<'_, S> {}

/// Display text of a field, found case-insensitively; `None` when falsy.
fn display_value(record: &RawRecord, field: FieldSpec) -> Option<String> {
    record
        .get_ignore_case(field.name())
        .filter(|value| value.is_truthy())
        .map(loanscore_model::RawValue::to_text)
}

/// Finished batch, rows in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub rows: Vec<BatchRow>,
}

impl BatchReport {
    pub fn new(rows: Vec<BatchRow>) -> Self {
        Self { rows }
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary::from_rows(&self.rows)
    }

    pub fn session_expired(&self) -> bool {
        self.rows
            .iter()
            .any(|row| row.state() == RowState::AuthExpired)
    }
}

#[cfg(test)]
mod tests {
    use loanscore_model::RawValue;

    use super::*;

    #[test]
    fn display_value_skips_falsy() {
        let record = RawRecord::from_pairs([
            ("Person_Income", RawValue::from(52000.0)),
            ("credit_score", RawValue::from("")),
        ]);
        assert_eq!(
            display_value(&record, FieldSpec::PersonIncome).as_deref(),
            Some("52000")
        );
        assert_eq!(display_value(&record, FieldSpec::CreditScore), None);
    }
}
