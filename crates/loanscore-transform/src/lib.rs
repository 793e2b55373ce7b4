//! Feature preprocessing for the loan scoring model.
//!
//! Raw form and spreadsheet values become the fixed-order numeric vector the
//! remote model expects:
//!
//! 1. categorical labels are replaced with their codes ([`normalization::category`])
//! 2. values are coerced to numbers, with `0` for anything unusable ([`normalization::numeric`])
//! 3. numeric fields are standardized with the artifact's mean and scale ([`encoder`])

pub mod derive;
pub mod encoder;
pub mod normalization;
pub mod vectorize;

pub use derive::{
    CreditScoreInputs, DeriveError, derive_loan_percent_income, loan_percent_income, round_to,
};
pub use encoder::{EncodedFeature, EncodingDefault, FeatureEncoder, VectorizedRecord, encode};
pub use vectorize::{vectorize, vectorize_all, vectorize_detailed};
