//! Row vectorizer entry points.

use loanscore_model::{FeatureVector, RawRecord};
use loanscore_standards::PreprocessConfig;

use crate::encoder::{FeatureEncoder, VectorizedRecord};

/// Map a record to the 13-value model input, in model field order.
///
/// Pure and deterministic: the same record and configuration always produce
/// the same vector, and extra or reordered columns do not affect it.
pub fn vectorize(config: &PreprocessConfig, record: &RawRecord) -> FeatureVector {
    FeatureEncoder::new(config).vectorize(record)
}

/// Like [`vectorize`], also reporting the fields that fell back to zero.
pub fn vectorize_detailed(config: &PreprocessConfig, record: &RawRecord) -> VectorizedRecord {
    FeatureEncoder::new(config).vectorize_detailed(record)
}

/// Vectorize many records, preserving order.
pub fn vectorize_all<'r>(
    config: &PreprocessConfig,
    records: impl IntoIterator<Item = &'r RawRecord>,
) -> Vec<FeatureVector> {
    let encoder = FeatureEncoder::new(config);
    records
        .into_iter()
        .map(|record| encoder.vectorize(record))
        .collect()
}
