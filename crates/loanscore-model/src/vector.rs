//! The positional feature vector sent to the scoring endpoint.

use serde::{Deserialize, Serialize};

use crate::field::{FEATURE_COUNT, FieldSpec};

/// Thirteen normalized features in [`FieldSpec::ALL`] order.
///
/// Serializes as a bare JSON array, which is the exact request body of the
/// prediction endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    #[must_use]
    pub const fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Value of one field.
    #[must_use]
    pub fn get(&self, field: FieldSpec) -> f64 {
        self.0[field.index()]
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        FEATURE_COUNT
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Pairs each value with its field, in model order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldSpec, f64)> + '_ {
        FieldSpec::ALL.into_iter().zip(self.0.iter().copied())
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}
