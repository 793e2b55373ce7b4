//! Individual record checks.

pub mod employment;
pub mod range;

pub use range::RangeRule;
