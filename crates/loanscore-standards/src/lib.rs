#![deny(unsafe_code)]

pub mod category;
pub mod config;
pub mod error;
pub mod hash;
pub mod loader;
pub mod paths;
pub mod scaler;

pub use crate::category::{CategoryTable, normalize_label};
pub use crate::config::PreprocessConfig;
pub use crate::error::{Result, StandardsError};
pub use crate::hash::{sha256_hex, sha256_hex_of_file};
pub use crate::loader::{load_default_preprocess, load_preprocess, parse_preprocess};
pub use crate::paths::{
    DEFAULT_PREPROCESS_VERSION, STANDARDS_ENV_VAR, preprocess_path, standards_root,
};
pub use crate::scaler::{MIN_SCALE, StandardizationParams};
