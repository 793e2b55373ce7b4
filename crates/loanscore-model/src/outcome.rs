//! Scoring results and per-row batch outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::FieldSpec;
use crate::vector::FeatureVector;

/// Binary decision returned by the scoring model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLabel {
    /// Prediction `0`: high risk, loan declined.
    HighRisk,
    /// Prediction `1`: low risk, loan approved.
    LowRisk,
}

impl RiskLabel {
    /// Numeric code used by the model.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::HighRisk => 0,
            Self::LowRisk => 1,
        }
    }

    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::HighRisk),
            1 => Some(Self::LowRisk),
            _ => None,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::HighRisk => "High risk",
            Self::LowRisk => "Low risk",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Interpreted prediction response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub label: RiskLabel,
    /// Response body exactly as returned by the endpoint.
    pub raw: serde_json::Value,
    /// Set when the response had no usable `prediction` and the label fell
    /// back to [`RiskLabel::HighRisk`].
    #[serde(default)]
    pub defaulted: bool,
}

impl ScoreResult {
    /// Interpret a prediction response body.
    ///
    /// The label is the first element of the `prediction` array. Anything
    /// else (missing key, non-array, empty array, unrecognized element) yields
    /// [`RiskLabel::HighRisk`] with `defaulted` set.
    #[must_use]
    pub fn from_response(raw: serde_json::Value) -> Self {
        let label = raw
            .get("prediction")
            .and_then(serde_json::Value::as_array)
            .and_then(|items| items.first())
            .and_then(prediction_code)
            .and_then(RiskLabel::from_code);
        Self {
            label: label.unwrap_or(RiskLabel::HighRisk),
            raw,
            defaulted: label.is_none(),
        }
    }
}

fn prediction_code(value: &serde_json::Value) -> Option<u8> {
    match value {
        serde_json::Value::Number(number) => match number.as_f64() {
            Some(code) if code == 0.0 => Some(0),
            Some(code) if code == 1.0 => Some(1),
            _ => None,
        },
        serde_json::Value::Bool(flag) => Some(u8::from(*flag)),
        serde_json::Value::String(text) => match text.trim() {
            "0" => Some(0),
            "1" => Some(1),
            _ => None,
        },
        _ => None,
    }
}

/// A pre-flight check that rejected a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: FieldSpec,
    /// Offending value as text.
    pub value: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (got '{}')", self.field, self.message, self.value)
    }
}

/// A row-local scoring failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFailure {
    /// HTTP status when the server answered; `None` for transport failures.
    pub status: Option<u16>,
    pub message: String,
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {status}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Lifecycle states of a batch row.
///
/// `PreValidating` and `Scoring` are transient; a finished row rests in one of
/// the terminal states or stays `Pending` when the batch halted before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowState {
    Pending,
    PreValidating,
    Skipped,
    Scoring,
    Scored,
    ApiErrored,
    AuthExpired,
}

impl RowState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Skipped | Self::Scored | Self::ApiErrored | Self::AuthExpired
        )
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::PreValidating => "pre-validating",
            Self::Skipped => "skipped",
            Self::Scoring => "scoring",
            Self::Scored => "scored",
            Self::ApiErrored => "api error",
            Self::AuthExpired => "auth expired",
        }
    }
}

impl fmt::Display for RowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a row ended up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowOutcome {
    /// Never processed because the batch halted first.
    Pending,
    /// Failed pre-validation; no network call was made.
    Skipped { issues: Vec<ValidationIssue> },
    Scored { result: ScoreResult },
    ApiErrored { failure: ApiFailure },
    /// The endpoint rejected the session on this row.
    AuthExpired,
}

impl RowOutcome {
    #[must_use]
    pub const fn state(&self) -> RowState {
        match self {
            Self::Pending => RowState::Pending,
            Self::Skipped { .. } => RowState::Skipped,
            Self::Scored { .. } => RowState::Scored,
            Self::ApiErrored { .. } => RowState::ApiErrored,
            Self::AuthExpired => RowState::AuthExpired,
        }
    }

    #[must_use]
    pub fn label(&self) -> Option<RiskLabel> {
        match self {
            Self::Scored { result } => Some(result.label),
            _ => None,
        }
    }
}

/// One spreadsheet row after batch processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRow {
    /// 1-based position in the input.
    pub index: usize,
    pub display_name: String,
    /// Present once the row passed pre-validation.
    pub vector: Option<FeatureVector>,
    pub outcome: RowOutcome,
    /// Income as entered, for display only.
    pub income: Option<String>,
    /// Credit score as entered, for display only.
    pub credit_score: Option<String>,
}

impl BatchRow {
    /// A row the batch never reached.
    #[must_use]
    pub fn pending(index: usize, display_name: impl Into<String>) -> Self {
        Self {
            index,
            display_name: display_name.into(),
            vector: None,
            outcome: RowOutcome::Pending,
            income: None,
            credit_score: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> RowState {
        self.outcome.state()
    }
}
