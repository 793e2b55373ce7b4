//! Value normalization applied before encoding.
//!
//! - **category**: label lookup against category tables
//! - **numeric**: numeric coercion of text, booleans and missing cells

pub mod category;
pub mod numeric;

pub use category::resolve_category;
pub use numeric::{
    coerce_number, format_numeric, parse_f64, parse_js_number, parse_leading_float,
};
