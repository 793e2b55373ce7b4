//! Scoring one hand-entered record.

use loanscore_client::ClientError;
use loanscore_model::{FeatureVector, FieldSpec, RawRecord, ScoreResult};
use loanscore_standards::PreprocessConfig;
use loanscore_transform::{EncodingDefault, derive_loan_percent_income, vectorize_detailed};
use loanscore_validate::validate_form;
use tracing::{debug, info};

use crate::error::{CoreError, Result};
use crate::scorer::Scorer;

/// Options for [`score_single`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SingleOptions {
    /// Compute `loan_percent_income` from loan amount and income when absent.
    pub derive_loan_percent: bool,
}

/// Outcome of scoring one record.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleScore {
    pub vector: FeatureVector,
    pub result: ScoreResult,
    /// Derived `loan_percent_income`, when one was filled in.
    pub derived_loan_percent: Option<f64>,
    /// Fields that fell back to `0` during encoding.
    pub defaults: Vec<(FieldSpec, EncodingDefault)>,
}

/// Validate, vectorize and score one record.
///
/// Unlike batch rows, every failure is returned as an error: missing session,
/// failed form rules (nothing is sent), or any service failure. A rejected
/// session is cleared before the error is returned.
pub fn score_single<S: Scorer + ?Sized>(
    scorer: &S,
    config: &PreprocessConfig,
    record: &RawRecord,
    options: SingleOptions,
) -> Result<SingleScore> {
    scorer.require_auth()?;

    let mut record = record.clone();
    let derived_loan_percent = if options.derive_loan_percent {
        derive_loan_percent_income(&mut record)
    } else {
        None
    };
    if let Some(ratio) = derived_loan_percent {
        debug!(ratio, "derived loan_percent_income");
    }

    let issues = validate_form(&record);
    if !issues.is_empty() {
        return Err(CoreError::Validation { issues });
    }

    let encoded = vectorize_detailed(config, &record);
    let result = match scorer.score(&encoded.vector) {
        Ok(result) => result,
        Err(err @ (ClientError::AuthExpired | ClientError::Unauthenticated)) => {
            scorer.invalidate_session();
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };
    info!(label = %result.label, defaulted = result.defaulted, "record scored");
    Ok(SingleScore {
        vector: encoded.vector,
        result,
        derived_loan_percent,
        defaults: encoded.defaults,
    })
}
