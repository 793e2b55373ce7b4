//! Applicant fields in the order the scoring model was trained on.
//!
//! The remote model consumes a positional vector, so [`FieldSpec::ALL`] is the
//! single source of truth for feature order. Reordering it silently corrupts
//! every prediction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ModelError;

/// Number of features the scoring model expects.
pub const FEATURE_COUNT: usize = 13;

/// One of the 13 applicant attributes consumed by the scoring model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldSpec {
    PersonAge,
    PersonGender,
    PersonEducation,
    PersonIncome,
    PersonEmpExp,
    PersonHomeOwnership,
    LoanAmnt,
    LoanIntent,
    LoanIntRate,
    LoanPercentIncome,
    CbPersonCredHistLength,
    CreditScore,
    PreviousLoanDefaultsOnFile,
}

impl FieldSpec {
    /// All fields in canonical model order.
    pub const ALL: [FieldSpec; FEATURE_COUNT] = [
        FieldSpec::PersonAge,
        FieldSpec::PersonGender,
        FieldSpec::PersonEducation,
        FieldSpec::PersonIncome,
        FieldSpec::PersonEmpExp,
        FieldSpec::PersonHomeOwnership,
        FieldSpec::LoanAmnt,
        FieldSpec::LoanIntent,
        FieldSpec::LoanIntRate,
        FieldSpec::LoanPercentIncome,
        FieldSpec::CbPersonCredHistLength,
        FieldSpec::CreditScore,
        FieldSpec::PreviousLoanDefaultsOnFile,
    ];

    /// Column name as it appears in spreadsheets and the preprocessing artifact.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PersonAge => "person_age",
            Self::PersonGender => "person_gender",
            Self::PersonEducation => "person_education",
            Self::PersonIncome => "person_income",
            Self::PersonEmpExp => "person_emp_exp",
            Self::PersonHomeOwnership => "person_home_ownership",
            Self::LoanAmnt => "loan_amnt",
            Self::LoanIntent => "loan_intent",
            Self::LoanIntRate => "loan_int_rate",
            Self::LoanPercentIncome => "loan_percent_income",
            Self::CbPersonCredHistLength => "cb_person_cred_hist_length",
            Self::CreditScore => "credit_score",
            Self::PreviousLoanDefaultsOnFile => "previous_loan_defaults_on_file",
        }
    }

    /// Position of this field in the feature vector.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether the model treats this field as a categorical label.
    #[must_use]
    pub const fn is_categorical(self) -> bool {
        matches!(
            self,
            Self::PersonGender
                | Self::PersonEducation
                | Self::PersonHomeOwnership
                | Self::LoanIntent
                | Self::PreviousLoanDefaultsOnFile
        )
    }

    /// Look up a field by column name, ignoring ASCII case and surrounding whitespace.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldSpec {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ModelError::UnknownField(s.to_string()))
    }
}

impl Serialize for FieldSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for FieldSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
