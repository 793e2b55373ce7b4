//! Batch outcome counts.

use loanscore_model::{BatchRow, RiskLabel, RowOutcome};
use serde::Serialize;

/// Counts of where each row of a batch ended up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub scored: usize,
    pub low_risk: usize,
    pub high_risk: usize,
    /// Scored rows whose label fell back to high risk for lack of a prediction.
    pub defaulted: usize,
    pub skipped: usize,
    pub api_errors: usize,
    pub pending: usize,
    pub session_expired: bool,
}

impl BatchSummary {
    pub fn from_rows(rows: &[BatchRow]) -> Self {
        let mut summary = Self {
            total: rows.len(),
            ..Self::default()
        };
        for row in rows {
            match &row.outcome {
                RowOutcome::Pending => summary.pending += 1,
                RowOutcome::Skipped { .. } => summary.skipped += 1,
                RowOutcome::ApiErrored { .. } => summary.api_errors += 1,
                RowOutcome::AuthExpired => summary.session_expired = true,
                RowOutcome::Scored { result } => {
                    summary.scored += 1;
                    match result.label {
                        RiskLabel::LowRisk => summary.low_risk += 1,
                        RiskLabel::HighRisk => summary.high_risk += 1,
                    }
                    if result.defaulted {
                        summary.defaulted += 1;
                    }
                }
            }
        }
        summary
    }

    /// Rows that reached a final state other than the one that saw the 401.
    pub fn completed(&self) -> usize {
        self.scored + self.skipped + self.api_errors
    }
}

#[cfg(test)]
mod tests {
    use loanscore_model::{ApiFailure, ScoreResult};
    use serde_json::json;

    use super::*;

    fn scored(index: usize, prediction: serde_json::Value) -> BatchRow {
        let mut row = BatchRow::pending(index, format!("Record #{index}"));
        row.outcome = RowOutcome::Scored {
            result: ScoreResult::from_response(prediction),
        };
        row
    }

    #[test]
    fn counts_each_outcome() {
        let mut skipped = BatchRow::pending(3, "c");
        skipped.outcome = RowOutcome::Skipped { issues: Vec::new() };
        let mut failed = BatchRow::pending(4, "d");
        failed.outcome = RowOutcome::ApiErrored {
            failure: ApiFailure {
                status: Some(500),
                message: "boom".to_string(),
            },
        };
        let mut expired = BatchRow::pending(5, "e");
        expired.outcome = RowOutcome::AuthExpired;

        let rows = vec![
            scored(1, json!({"prediction": [1]})),
            scored(2, json!({})),
            skipped,
            failed,
            expired,
            BatchRow::pending(6, "f"),
        ];
        let summary = BatchSummary::from_rows(&rows);
        assert_eq!(summary.total, 6);
        assert_eq!(summary.scored, 2);
        assert_eq!(summary.low_risk, 1);
        assert_eq!(summary.high_risk, 1);
        assert_eq!(summary.defaulted, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.api_errors, 1);
        assert_eq!(summary.pending, 1);
        assert!(summary.session_expired);
        assert_eq!(summary.completed(), 4);
    }
}
