//! Model comparison through the `/evaluate` endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::{ApiClient, ensure_success, read_json};
use crate::error::{ClientError, Result};

const EVALUATE_PATH: &str = "/evaluate";

/// Models the service compares, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    #[serde(rename = "xgboost")]
    XgBoost,
    RandomForest,
    LogisticRegression,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [
        ModelKind::XgBoost,
        ModelKind::RandomForest,
        ModelKind::LogisticRegression,
    ];

    /// Key in the response body.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::XgBoost => "xgboost",
            Self::RandomForest => "random_forest",
            Self::LogisticRegression => "logistic_regression",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::XgBoost => "XGBoost",
            Self::RandomForest => "Random Forest",
            Self::LogisticRegression => "Logistic Regression",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Metrics for one model. Absent numbers read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    #[serde(default)]
    pub accuracy: f64,
    #[serde(default)]
    pub precision: f64,
    #[serde(default)]
    pub recall: f64,
    #[serde(default)]
    pub f1: f64,
    /// Inference time as reported by the service.
    #[serde(default)]
    pub time: f64,
    /// Set when the service could not evaluate this model.
    #[serde(default)]
    pub error: Option<String>,
}

impl ModelMetrics {
    /// Accuracy as a percentage. Values above 1 are already percentages.
    #[must_use]
    pub fn accuracy_percent(&self) -> f64 {
        if self.accuracy > 1.0 {
            self.accuracy
        } else {
            self.accuracy * 100.0
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.error.is_none()
    }
}

/// Parsed `/evaluate` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub models: Vec<(ModelKind, ModelMetrics)>,
}

impl EvaluationReport {
    /// Extract the known models from a response body. Unknown keys are ignored.
    pub fn from_response(body: &serde_json::Value) -> Result<Self> {
        let object = body.as_object().ok_or_else(|| {
            ClientError::MalformedResponse("evaluation response is not an object".to_string())
        })?;
        let mut models = Vec::new();
        for kind in ModelKind::ALL {
            if let Some(entry) = object.get(kind.key()) {
                let metrics = serde_json::from_value(entry.clone()).map_err(|e| {
                    ClientError::MalformedResponse(format!("{}: {e}", kind.key()))
                })?;
                models.push((kind, metrics));
            }
        }
        Ok(Self { models })
    }

    #[must_use]
    pub fn metrics(&self, kind: ModelKind) -> Option<&ModelMetrics> {
        self.models
            .iter()
            .find(|(candidate, _)| *candidate == kind)
            .map(|(_, metrics)| metrics)
    }

    /// Model with the highest accuracy; the earlier model wins ties.
    ///
    /// Missing models count as zero accuracy, so with no data at all the
    /// first model is returned.
    #[must_use]
    pub fn best_model(&self) -> ModelKind {
        let accuracy = |kind| self.metrics(kind).map_or(0.0, |m| m.accuracy);
        let mut best = ModelKind::ALL[0];
        for kind in &ModelKind::ALL[1..] {
            if accuracy(*kind) > accuracy(best) {
                best = *kind;
            }
        }
        best
    }
}

impl ApiClient {
    /// Post normalized rows for model comparison.
    ///
    /// Requires a session. A 401 clears it and yields `AuthExpired`.
    pub fn evaluate(&self, rows: &[serde_json::Value]) -> Result<EvaluationReport> {
        let request = self.post(EVALUATE_PATH).json(rows);
        let response = ensure_success(self.send_authenticated(EVALUATE_PATH, request)?)?;
        let body: serde_json::Value = read_json(response)?;
        let report = EvaluationReport::from_response(&body)?;
        info!(
            rows = rows.len(),
            best = report.best_model().key(),
            "evaluation complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn best_model_prefers_earliest_on_tie() {
        let report = EvaluationReport::from_response(&json!({
            "xgboost": {"accuracy": 0.91, "precision": 0.9, "recall": 0.8, "f1": 0.85, "time": 12.4},
            "random_forest": {"accuracy": 0.91, "precision": 0.88, "recall": 0.8, "f1": 0.84, "time": 30},
            "logistic_regression": {"accuracy": 0.85},
        }))
        .expect("parse report");
        assert_eq!(report.models.len(), 3);
        assert_eq!(report.best_model(), ModelKind::XgBoost);
    }

    #[test]
    fn best_model_picks_highest() {
        let report = EvaluationReport::from_response(&json!({
            "xgboost": {"accuracy": 0.8},
            "logistic_regression": {"accuracy": 0.9},
            "extra": {"accuracy": 1.0},
        }))
        .expect("parse report");
        assert_eq!(report.models.len(), 2);
        assert_eq!(report.best_model(), ModelKind::LogisticRegression);
        assert!(report.metrics(ModelKind::RandomForest).is_none());
    }

    #[test]
    fn accuracy_percent_handles_both_scales() {
        let fraction = ModelMetrics {
            accuracy: 0.925,
            ..ModelMetrics::default()
        };
        let percent = ModelMetrics {
            accuracy: 92.5,
            ..ModelMetrics::default()
        };
        assert!((fraction.accuracy_percent() - 92.5).abs() < 1e-9);
        assert!((percent.accuracy_percent() - 92.5).abs() < 1e-9);
    }

    #[test]
    fn model_error_is_kept() {
        let report = EvaluationReport::from_response(&json!({
            "random_forest": {"error": "model not loaded"},
        }))
        .expect("parse report");
        let metrics = report.metrics(ModelKind::RandomForest).expect("rf entry");
        assert!(!metrics.is_available());
        assert_eq!(metrics.accuracy, 0.0);
    }

    #[test]
    fn non_object_is_malformed() {
        assert!(matches!(
            EvaluationReport::from_response(&json!([1, 2])),
            Err(ClientError::MalformedResponse(_))
        ));
    }
}
