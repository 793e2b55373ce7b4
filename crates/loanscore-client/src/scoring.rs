//! The prediction endpoint.

use loanscore_model::{FeatureVector, ScoreResult};
use tracing::{debug, warn};

use crate::client::{ApiClient, ensure_success, read_json};
use crate::error::{ClientError, Result};

const PREDICT_PATH: &str = "/predict";

impl ApiClient {
    /// Score one feature vector with the stored session token.
    ///
    /// - no token: `Unauthenticated`, nothing is sent
    /// - HTTP 401: session cleared, `AuthExpired`
    /// - other non-success status: `Api` with the body's `detail`
    /// - success body that is not JSON: `MalformedResponse`
    ///
    /// A JSON body without a usable `prediction` array is not an error; the
    /// result is labelled high risk and flagged as defaulted.
    pub fn score(&self, vector: &FeatureVector) -> Result<ScoreResult> {
        let request = self.post(PREDICT_PATH).json(vector);
        let response = self.send_authenticated(PREDICT_PATH, request)?;
        interpret(response)
    }

    /// Score with an explicit token, bypassing the session store.
    ///
    /// A 401 yields `AuthExpired` but leaves the session untouched.
    pub fn score_with_token(&self, vector: &FeatureVector, token: &str) -> Result<ScoreResult> {
        let request = self.post(PREDICT_PATH).bearer_auth(token).json(vector);
        let response = self.send(PREDICT_PATH, request)?;
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ClientError::AuthExpired);
        }
        interpret(response)
    }
}

fn interpret(response: reqwest::blocking::Response) -> Result<ScoreResult> {
    let response = ensure_success(response)?;
    let body: serde_json::Value = read_json(response)?;
    let result = ScoreResult::from_response(body);
    if result.defaulted {
        warn!("prediction missing from response, defaulting to high risk");
    } else {
        debug!(label = %result.label, "prediction received");
    }
    Ok(result)
}
