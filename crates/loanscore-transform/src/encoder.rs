//! The feature encoder: one raw field value to one model input number.
//!
//! Encoding never fails. Values that cannot be interpreted encode as `0` and
//! are reported through [`EncodingDefault`] and a `debug` log event.

use std::fmt;

use loanscore_model::{FeatureVector, FieldSpec, RawRecord, RawValue, redact_value};
use loanscore_standards::PreprocessConfig;
use tracing::debug;

use crate::normalization::{coerce_number, resolve_category};

/// Why an encoded value fell back to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingDefault {
    /// Categorical label not in the table and not numeric either.
    UnmappedCategory,
    /// Value could not be coerced to a number.
    NonNumeric,
    /// Value or its standardized result was infinite.
    NonFinite,
}

impl EncodingDefault {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnmappedCategory => "unmapped category",
            Self::NonNumeric => "non-numeric value",
            Self::NonFinite => "non-finite value",
        }
    }
}

impl fmt::Display for EncodingDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An encoded value plus the fallback that produced it, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodedFeature {
    pub value: f64,
    pub default: Option<EncodingDefault>,
}

/// A feature vector plus the fields that fell back to zero along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorizedRecord {
    pub vector: FeatureVector,
    pub defaults: Vec<(FieldSpec, EncodingDefault)>,
}

/// Encodes fields using one preprocessing configuration.
#[derive(Debug, Clone, Copy)]
pub struct FeatureEncoder<'a> {
    config: &'a PreprocessConfig,
}

impl<'a> FeatureEncoder<'a> {
    pub fn new(config: &'a PreprocessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &'a PreprocessConfig {
        self.config
    }

    /// Encode one field value.
    pub fn encode(&self, field: FieldSpec, value: &RawValue) -> f64 {
        self.encode_detailed(field, value).value
    }

    /// Encode a value for a column given by name.
    ///
    /// Names that match no field skip category lookup and standardization;
    /// the value is only coerced.
    pub fn encode_named(&self, name: &str, value: &RawValue) -> f64 {
        match FieldSpec::from_name(name) {
            Some(field) => self.encode(field, value),
            None => {
                let number = coerce_number(value);
                if number.is_finite() { number } else { 0.0 }
            }
        }
    }

    /// Encode one field value and report any fallback.
    ///
    /// Steps: category lookup (categorical fields only), numeric coercion,
    /// then standardization when the field has parameters.
    pub fn encode_detailed(&self, field: FieldSpec, value: &RawValue) -> EncodedFeature {
        let table = self.config.category(field);
        let code = table.and_then(|table| resolve_category(table, value));

        let number = match code {
            Some(code) => code as f64,
            None => coerce_number(value),
        };

        let (number, default) = if number.is_nan() {
            let reason = if table.is_some() {
                EncodingDefault::UnmappedCategory
            } else {
                EncodingDefault::NonNumeric
            };
            (0.0, Some(reason))
        } else if number.is_infinite() {
            // Infinite input is not standardized.
            return defaulted(field, value, EncodingDefault::NonFinite);
        } else {
            (number, None)
        };

        let (encoded, default) = match self.config.scaler(field) {
            Some(params) => {
                let scaled = params.apply(number);
                if scaled.is_finite() {
                    (scaled, default)
                } else {
                    (0.0, Some(EncodingDefault::NonFinite))
                }
            }
            None => (number, default),
        };

        if let Some(reason) = default {
            log_default(field, value, reason);
        }

        EncodedFeature {
            value: encoded,
            default,
        }
    }

    /// Build the feature vector for a record.
    pub fn vectorize(&self, record: &RawRecord) -> FeatureVector {
        self.vectorize_detailed(record).vector
    }

    /// Build the feature vector and collect encoding fallbacks.
    ///
    /// Fields are read in model order with a case-insensitive column lookup;
    /// absent columns encode as a zero input. Extra columns are ignored.
    pub fn vectorize_detailed(&self, record: &RawRecord) -> VectorizedRecord {
        let mut defaults = Vec::new();
        let values = FieldSpec::ALL.map(|field| {
            let raw = record
                .get_ignore_case(field.name())
                .cloned()
                .unwrap_or_default();
            let encoded = self.encode_detailed(field, &raw);
            if let Some(reason) = encoded.default {
                defaults.push((field, reason));
            }
            encoded.value
        });
        VectorizedRecord {
            vector: FeatureVector::new(values),
            defaults,
        }
    }
}

/// Encode one field value with the given configuration.
pub fn encode(config: &PreprocessConfig, field: FieldSpec, value: &RawValue) -> f64 {
    FeatureEncoder::new(config).encode(field, value)
}

fn defaulted(field: FieldSpec, value: &RawValue, reason: EncodingDefault) -> EncodedFeature {
    log_default(field, value, reason);
    EncodedFeature {
        value: 0.0,
        default: Some(reason),
    }
}

fn log_default(field: FieldSpec, value: &RawValue, reason: EncodingDefault) {
    debug!(
        field = %field,
        value = %redact_value(&value.to_text()),
        reason = %reason,
        "encoding default applied"
    );
}
