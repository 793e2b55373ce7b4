//! Inclusive numeric range checks.

use loanscore_model::{FieldSpec, RawValue, ValidationIssue};
use loanscore_transform::normalization::coerce_number;

/// Bounds for one field. `None` leaves that side open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeRule {
    pub field: FieldSpec,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RangeRule {
    pub const fn between(field: FieldSpec, min: f64, max: f64) -> Self {
        Self {
            field,
            min: Some(min),
            max: Some(max),
        }
    }

    pub const fn at_most(field: FieldSpec, max: f64) -> Self {
        Self {
            field,
            min: None,
            max: Some(max),
        }
    }

    pub fn contains(&self, number: f64) -> bool {
        !number.is_nan()
            && self.min.is_none_or(|min| number >= min)
            && self.max.is_none_or(|max| number <= max)
    }

    pub fn describe(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("must be between {min} and {max}"),
            (None, Some(max)) => format!("must be at most {max}"),
            (Some(min), None) => format!("must be at least {min}"),
            (None, None) => "must be a number".to_string(),
        }
    }

    /// Check a raw value. Non-numeric values fail.
    pub fn check(&self, value: &RawValue) -> Option<ValidationIssue> {
        let number = coerce_number(value);
        if self.contains(number) {
            return None;
        }
        let message = if number.is_nan() {
            "must be a number".to_string()
        } else {
            self.describe()
        };
        Some(ValidationIssue {
            field: self.field,
            value: value.to_text(),
            message,
        })
    }
}
