//! Preprocessing artifact path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the standards directory.
pub const STANDARDS_ENV_VAR: &str = "LOANSCORE_STANDARDS_DIR";

/// Artifact version used when none is requested.
pub const DEFAULT_PREPROCESS_VERSION: &str = "v1";

/// Get the standards root directory.
///
/// Resolution order:
/// 1. `LOANSCORE_STANDARDS_DIR` environment variable
/// 2. `standards/` directory relative to workspace root
pub fn standards_root() -> PathBuf {
    if let Ok(root) = std::env::var(STANDARDS_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../standards")
}

/// Path of a preprocessing artifact version under the standards root.
pub fn preprocess_path(version: &str) -> PathBuf {
    standards_root()
        .join("preprocess")
        .join(format!("{version}.json"))
}
