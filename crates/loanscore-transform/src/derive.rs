//! Derived inputs: loan-to-income ratio and the credit score calculator.

use loanscore_model::{FieldSpec, RawRecord, RawValue};
use thiserror::Error;

use crate::normalization::parse_leading_float;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeriveError {
    #[error("{input} must be between {min} and {max}, got {value}")]
    OutOfRange {
        input: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{input} cannot be negative, got {value}")]
    Negative { input: &'static str, value: f64 },
    #[error("{input} must be a finite number")]
    NotFinite { input: &'static str },
}

/// Round half away from zero to `digits` decimals.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

/// `loan_amnt / person_income`, rounded to three decimals.
///
/// `None` when income is not positive.
pub fn loan_percent_income(loan_amnt: f64, income: f64) -> Option<f64> {
    if !loan_amnt.is_finite() || !income.is_finite() || income <= 0.0 {
        return None;
    }
    Some(round_to(loan_amnt / income, 3))
}

/// Fill `loan_percent_income` from loan amount and income when the record
/// lacks a usable value. Returns the derived value, if one was written.
pub fn derive_loan_percent_income(record: &mut RawRecord) -> Option<f64> {
    let present = record
        .get_ignore_case(FieldSpec::LoanPercentIncome.name())
        .is_some_and(RawValue::is_truthy);
    if present {
        return None;
    }
    let amount = form_number(record.get_ignore_case(FieldSpec::LoanAmnt.name()));
    let income = form_number(record.get_ignore_case(FieldSpec::PersonIncome.name()));
    let ratio = loan_percent_income(amount, income)?;
    let name = FieldSpec::LoanPercentIncome.name();
    let key = record
        .keys()
        .find(|key| key.eq_ignore_ascii_case(name))
        .unwrap_or(name)
        .to_string();
    record.insert(key, ratio);
    Some(ratio)
}

/// A form input read as a leading float; unreadable or absent input is `0`.
fn form_number(value: Option<&RawValue>) -> f64 {
    let number = match value {
        Some(RawValue::Number(number)) => *number,
        Some(RawValue::Text(text)) => parse_leading_float(text),
        _ => 0.0,
    };
    if number.is_nan() { 0.0 } else { number }
}

/// Inputs of the credit score calculator, each a 0-100 rating except the
/// history length, which is in years.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CreditScoreInputs {
    pub payment_rate: f64,
    pub utilization: f64,
    pub history_years: f64,
    pub credit_mix: f64,
    pub new_credit: f64,
}

impl CreditScoreInputs {
    /// Range-check all inputs.
    pub fn validate(&self) -> Result<(), DeriveError> {
        let ratings = [
            ("payment rate", self.payment_rate),
            ("credit utilization", self.utilization),
            ("credit mix", self.credit_mix),
            ("new credit", self.new_credit),
        ];
        for (input, value) in ratings {
            if !value.is_finite() {
                return Err(DeriveError::NotFinite { input });
            }
            if !(0.0..=100.0).contains(&value) {
                return Err(DeriveError::OutOfRange {
                    input,
                    min: 0.0,
                    max: 100.0,
                    value,
                });
            }
        }
        if !self.history_years.is_finite() {
            return Err(DeriveError::NotFinite {
                input: "credit history length",
            });
        }
        if self.history_years < 0.0 {
            return Err(DeriveError::Negative {
                input: "credit history length",
                value: self.history_years,
            });
        }
        Ok(())
    }

    /// Score on the 300-850 scale, rounded to two decimals.
    ///
    /// History is capped at ten years.
    pub fn score(&self) -> Result<f64, DeriveError> {
        self.validate()?;
        let history = (self.history_years / 10.0 * 100.0).min(100.0);
        let raw = 300.0
            + self.payment_rate * 0.35 * 5.5
            + (100.0 - self.utilization) * 0.3 * 5.5
            + history * 0.15 * 5.5
            + self.credit_mix * 0.1 * 5.5
            + self.new_credit * 0.1 * 5.5;
        Ok(round_to(raw, 2))
    }

    /// Whole-number score as shown to users.
    pub fn display_score(&self) -> Result<i64, DeriveError> {
        Ok(self.score()?.round() as i64)
    }
}
