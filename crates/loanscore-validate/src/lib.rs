//! Pre-flight validation of applicant records.
//!
//! Two rule sets exist. Batch rows only have their credit score checked, and
//! only when one is given; a failing row is skipped without a network call.
//! Single records entered by hand get the full form rule set.

pub mod checks;

use loanscore_model::{FieldSpec, RawRecord, RawValue, ValidationIssue};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use checks::RangeRule;

pub const CREDIT_SCORE_MIN: f64 = 300.0;
pub const CREDIT_SCORE_MAX: f64 = 850.0;

pub const CREDIT_SCORE_RULE: RangeRule =
    RangeRule::between(FieldSpec::CreditScore, CREDIT_SCORE_MIN, CREDIT_SCORE_MAX);

/// Range rules applied to single records, in form order.
pub const FORM_RANGE_RULES: [RangeRule; 5] = [
    RangeRule::between(FieldSpec::PersonAge, 20.0, 66.0),
    RangeRule::at_most(FieldSpec::PersonIncome, 2_000_000.0),
    RangeRule::at_most(FieldSpec::LoanAmnt, 35_000.0),
    RangeRule::between(FieldSpec::LoanIntRate, 0.0, 20.0),
    CREDIT_SCORE_RULE,
];

/// Which rule set to apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Credit score only, and only when present.
    #[default]
    Batch,
    /// Every field required plus all range rules.
    Form,
}

/// Validate a record with the given rule set.
pub fn validate(mode: ValidationMode, record: &RawRecord) -> Vec<ValidationIssue> {
    match mode {
        ValidationMode::Batch => validate_batch_row(record),
        ValidationMode::Form => validate_form(record),
    }
}

/// Batch pre-validation.
///
/// The credit score column is found case-insensitively. Falsy values (absent,
/// empty, zero) are not checked.
pub fn validate_batch_row(record: &RawRecord) -> Vec<ValidationIssue> {
    let Some(score) = record
        .get_ignore_case(FieldSpec::CreditScore.name())
        .filter(|value| value.is_truthy())
    else {
        return Vec::new();
    };
    CREDIT_SCORE_RULE.check(score).into_iter().collect()
}

/// Full single-record validation. Reports every failing field.
pub fn validate_form(record: &RawRecord) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for field in FieldSpec::ALL {
        if is_blank(record.get_ignore_case(field.name())) {
            issues.push(ValidationIssue {
                field,
                value: String::new(),
                message: "is required".to_string(),
            });
        }
    }
    for rule in &FORM_RANGE_RULES {
        match record.get_ignore_case(rule.field.name()) {
            Some(value) if !is_blank(Some(value)) => issues.extend(rule.check(value)),
            _ => {}
        }
    }
    let experience = record.get_ignore_case(FieldSpec::PersonEmpExp.name());
    if let Some(experience) = experience.filter(|value| !is_blank(Some(value))) {
        let age = record
            .get_ignore_case(FieldSpec::PersonAge.name())
            .cloned()
            .unwrap_or_default();
        issues.extend(checks::employment::check(experience, &age));
    }
    if !issues.is_empty() {
        debug!(issues = issues.len(), "form validation failed");
    }
    issues
}

fn is_blank(value: Option<&RawValue>) -> bool {
    match value {
        None | Some(RawValue::Missing) => true,
        Some(RawValue::Text(text)) => text.trim().is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn applicant() -> RawRecord {
        RawRecord::from_pairs([
            ("person_age", RawValue::from("30")),
            ("person_gender", RawValue::from("female")),
            ("person_education", RawValue::from("Bachelor")),
            ("person_income", RawValue::from("60000")),
            ("person_emp_exp", RawValue::from("5")),
            ("person_home_ownership", RawValue::from("RENT")),
            ("loan_amnt", RawValue::from("10000")),
            ("loan_intent", RawValue::from("EDUCATION")),
            ("loan_int_rate", RawValue::from("11.2")),
            ("loan_percent_income", RawValue::from("0.17")),
            ("cb_person_cred_hist_length", RawValue::from("4")),
            ("credit_score", RawValue::from("700")),
            ("previous_loan_defaults_on_file", RawValue::from("No")),
        ])
    }

    #[test]
    fn batch_checks_only_truthy_credit_scores() {
        let bad = RawRecord::from_pairs([("Credit_Score", RawValue::from("900"))]);
        let issues = validate_batch_row(&bad);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, FieldSpec::CreditScore);
        assert_eq!(issues[0].value, "900");

        for skipped in [
            RawRecord::new(),
            RawRecord::from_pairs([("credit_score", RawValue::from(""))]),
            RawRecord::from_pairs([("credit_score", RawValue::from(0.0))]),
        ] {
            assert!(validate_batch_row(&skipped).is_empty());
        }

        let text = RawRecord::from_pairs([("credit_score", RawValue::from("good"))]);
        assert_eq!(validate_batch_row(&text).len(), 1);
    }

    #[test]
    fn batch_ignores_other_fields() {
        let record = RawRecord::from_pairs([
            ("person_age", RawValue::from("5")),
            ("credit_score", RawValue::from("650")),
        ]);
        assert!(validate(ValidationMode::Batch, &record).is_empty());
        assert!(!validate(ValidationMode::Form, &record).is_empty());
    }

    #[test]
    fn complete_form_passes() {
        assert!(validate_form(&applicant()).is_empty());
    }

    #[test]
    fn form_reports_every_problem() {
        let mut record = applicant();
        record.insert("person_age", "19");
        record.insert("loan_amnt", "40000");
        record.insert("person_emp_exp", "5");
        record.insert("loan_intent", " ");
        let issues = validate_form(&record);
        let fields: Vec<_> = issues.iter().map(|issue| issue.field).collect();
        assert_eq!(
            fields,
            vec![
                FieldSpec::LoanIntent,
                FieldSpec::PersonAge,
                FieldSpec::LoanAmnt,
                FieldSpec::PersonEmpExp,
            ]
        );
    }
}
