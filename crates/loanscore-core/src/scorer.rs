//! The seam between workflows and the prediction endpoint.

use loanscore_client::{ApiClient, ClientError};
use loanscore_model::{FeatureVector, ScoreResult};

/// Something that turns a feature vector into a prediction.
///
/// Implemented by [`ApiClient`]; tests substitute scripted scorers.
pub trait Scorer {
    /// Fail with [`ClientError::Unauthenticated`] when no session exists.
    fn require_auth(&self) -> Result<(), ClientError>;

    /// Score one vector.
    fn score(&self, vector: &FeatureVector) -> Result<ScoreResult, ClientError>;

    /// Drop the session after the service rejected it.
    fn invalidate_session(&self);
}

impl Scorer for ApiClient {
    fn require_auth(&self) -> Result<(), ClientError> {
        self.session().require_auth().map(|_| ())
    }

    fn score(&self, vector: &FeatureVector) -> Result<ScoreResult, ClientError> {
        ApiClient::score(self, vector)
    }

    fn invalidate_session(&self) {
        self.session().invalidate();
    }
}

impl<S: Scorer + ?Sized> Scorer for &S {
    fn require_auth(&self) -> Result<(), ClientError> {
        (**self).require_auth()
    }

    fn score(&self, vector: &FeatureVector) -> Result<ScoreResult, ClientError> {
        (**self).score(vector)
    }

    fn invalidate_session(&self) {
        (**self).invalidate_session();
    }
}
