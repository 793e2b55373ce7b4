//! Loading preprocessing artifacts from JSON.
//!
//! Artifact shape:
//!
//! ```json
//! {
//!   "version": "v1",
//!   "fields": ["person_age", "..."],
//!   "categories": { "person_gender": { "female": 0, "male": 1 } },
//!   "scaler": { "person_age": { "mean": 27.76, "scale": 6.04 } }
//! }
//! ```
//!
//! `fields` is optional; when present it must list the model's field order
//! exactly.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use loanscore_model::FieldSpec;
use serde::Deserialize;
use tracing::{debug, info};

use crate::category::CategoryTable;
use crate::config::PreprocessConfig;
use crate::error::{Result, StandardsError};
use crate::hash::sha256_hex;
use crate::paths::{DEFAULT_PREPROCESS_VERSION, preprocess_path};
use crate::scaler::StandardizationParams;

#[derive(Debug, Deserialize)]
struct PreprocessArtifact {
    version: String,
    #[serde(default)]
    fields: Option<Vec<String>>,
    #[serde(default)]
    categories: BTreeMap<String, BTreeMap<String, i64>>,
    #[serde(default)]
    scaler: BTreeMap<String, StandardizationParams>,
}

/// Load the default artifact version from the standards root.
pub fn load_default_preprocess() -> Result<PreprocessConfig> {
    load_preprocess(&preprocess_path(DEFAULT_PREPROCESS_VERSION))
}

/// Load and validate an artifact file.
pub fn load_preprocess(path: &Path) -> Result<PreprocessConfig> {
    let bytes = std::fs::read(path).map_err(|e| StandardsError::io(path, e))?;
    let mut config = parse_preprocess(&bytes, path)?;
    let hash = sha256_hex(&bytes);
    info!(
        path = %path.display(),
        version = %config.version,
        sha256 = %hash,
        "loaded preprocessing artifact"
    );
    config.sha256 = Some(hash);
    Ok(config)
}

/// Parse and validate artifact bytes. `path` is only used in errors.
pub fn parse_preprocess(bytes: &[u8], path: &Path) -> Result<PreprocessConfig> {
    let artifact: PreprocessArtifact =
        serde_json::from_slice(bytes).map_err(|source| StandardsError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    if let Some(fields) = &artifact.fields {
        check_field_order(fields, path)?;
    }

    let mut config = PreprocessConfig::new(artifact.version);

    for (name, labels) in &artifact.categories {
        let field = resolve_field(name, "categories", path)?;
        let mut table = CategoryTable::new(field);
        for (label, code) in labels {
            table.insert(label, *code);
        }
        debug!(field = %field, labels = table.len(), "category table");
        config.insert_category(table);
    }

    for (name, params) in &artifact.scaler {
        let field = resolve_field(name, "scaler", path)?;
        if !params.mean.is_finite() || !params.scale.is_finite() {
            return Err(StandardsError::InvalidParameter {
                path: path.to_path_buf(),
                field: field.name().to_string(),
                message: "mean and scale must be finite".to_string(),
            });
        }
        if params.is_degenerate() {
            debug!(field = %field, scale = params.scale, "degenerate scale, field encodes to 0");
        }
        config.insert_scaler(field, *params);
    }

    Ok(config)
}

fn resolve_field(name: &str, section: &'static str, path: &Path) -> Result<FieldSpec> {
    FieldSpec::from_name(name).ok_or_else(|| StandardsError::UnknownField {
        path: PathBuf::from(path),
        section,
        field: name.to_string(),
    })
}

fn check_field_order(fields: &[String], path: &Path) -> Result<()> {
    if fields.len() != FieldSpec::ALL.len() {
        return Err(StandardsError::FieldOrder {
            path: path.to_path_buf(),
            message: format!(
                "expected {} fields, found {}",
                FieldSpec::ALL.len(),
                fields.len()
            ),
        });
    }
    for (position, (listed, expected)) in fields.iter().zip(FieldSpec::ALL).enumerate() {
        if FieldSpec::from_name(listed) != Some(expected) {
            return Err(StandardsError::FieldOrder {
                path: path.to_path_buf(),
                message: format!("position {position}: expected {expected}, found '{listed}'"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<PreprocessConfig> {
        parse_preprocess(json.as_bytes(), Path::new("inline.json"))
    }

    #[test]
    fn parses_minimal_artifact() {
        let config = parse(
            r#"{"version": "t", "categories": {"loan_intent": {"Medical": 3}},
                "scaler": {"credit_score": {"mean": 632.6, "scale": 50.4}}}"#,
        )
        .expect("parse artifact");
        assert_eq!(config.version, "t");
        assert_eq!(
            config
                .category(FieldSpec::LoanIntent)
                .and_then(|t| t.lookup("medical")),
            Some(3)
        );
        assert!(config.scaler(FieldSpec::CreditScore).is_some());
        assert!(config.sha256.is_none());
    }

    #[test]
    fn rejects_unknown_field() {
        let err = parse(r#"{"version": "t", "scaler": {"salary": {"mean": 1, "scale": 1}}}"#)
            .expect_err("unknown field");
        assert!(matches!(
            err,
            StandardsError::UnknownField {
                section: "scaler",
                ..
            }
        ));
    }

    #[test]
    fn rejects_reordered_fields() {
        let mut names: Vec<String> = FieldSpec::ALL.iter().map(|f| f.name().to_string()).collect();
        names.swap(0, 1);
        let json = serde_json::json!({"version": "t", "fields": names}).to_string();
        let err = parse(&json).expect_err("reordered");
        assert!(matches!(err, StandardsError::FieldOrder { .. }));

        let json = serde_json::json!({"version": "t", "fields": ["person_age"]}).to_string();
        assert!(matches!(
            parse(&json),
            Err(StandardsError::FieldOrder { .. })
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(parse("{"), Err(StandardsError::Json { .. })));
    }
}
