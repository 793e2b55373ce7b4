//! Employment experience against age.

use loanscore_model::{FieldSpec, RawValue, ValidationIssue};
use loanscore_transform::normalization::coerce_number;

/// Age at which working years start counting.
pub const WORKING_AGE: f64 = 18.0;

/// Experience must be non-negative and at most `age - 18` years.
pub fn check(experience: &RawValue, age: &RawValue) -> Option<ValidationIssue> {
    let years = coerce_number(experience);
    let age = coerce_number(age);
    let issue = |message: String| ValidationIssue {
        field: FieldSpec::PersonEmpExp,
        value: experience.to_text(),
        message,
    };
    if years.is_nan() || age.is_nan() {
        return Some(issue("experience and age must be numbers".to_string()));
    }
    let limit = age - WORKING_AGE;
    if years < 0.0 || years > limit {
        return Some(issue(format!(
            "must be between 0 and {limit} for age {age}"
        )));
    }
    None
}
