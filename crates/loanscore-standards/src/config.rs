//! The resolved preprocessing configuration consumed by the feature encoder.

use std::collections::BTreeMap;

use loanscore_model::FieldSpec;

use crate::category::CategoryTable;
use crate::scaler::StandardizationParams;

/// Category tables and standardization parameters for one artifact version.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreprocessConfig {
    pub version: String,
    /// SHA-256 of the artifact bytes, when loaded from a file.
    pub sha256: Option<String>,
    categories: BTreeMap<FieldSpec, CategoryTable>,
    scaler: BTreeMap<FieldSpec, StandardizationParams>,
}

impl PreprocessConfig {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, table: CategoryTable) -> Self {
        self.insert_category(table);
        self
    }

    pub fn with_scaler(mut self, field: FieldSpec, params: StandardizationParams) -> Self {
        self.insert_scaler(field, params);
        self
    }

    pub fn insert_category(&mut self, table: CategoryTable) {
        self.categories.insert(table.field, table);
    }

    pub fn insert_scaler(&mut self, field: FieldSpec, params: StandardizationParams) {
        self.scaler.insert(field, params);
    }

    pub fn category(&self, field: FieldSpec) -> Option<&CategoryTable> {
        self.categories.get(&field)
    }

    pub fn scaler(&self, field: FieldSpec) -> Option<&StandardizationParams> {
        self.scaler.get(&field)
    }

    pub fn categories(&self) -> impl Iterator<Item = &CategoryTable> {
        self.categories.values()
    }

    pub fn scaled_fields(&self) -> impl Iterator<Item = (FieldSpec, &StandardizationParams)> {
        self.scaler.iter().map(|(field, params)| (*field, params))
    }

    /// Short label for logs and reports, e.g. `v1 (3f2a9c1b)`.
    pub fn describe(&self) -> String {
        match &self.sha256 {
            Some(hash) => format!("{} ({})", self.version, &hash[..hash.len().min(8)]),
            None => self.version.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_registers_tables() {
        let mut table = CategoryTable::new(FieldSpec::PersonHomeOwnership);
        table.insert("rent", 3);
        let config = PreprocessConfig::new("test")
            .with_category(table)
            .with_scaler(FieldSpec::PersonAge, StandardizationParams::new(30.0, 5.0));
        assert_eq!(
            config
                .category(FieldSpec::PersonHomeOwnership)
                .and_then(|t| t.lookup("RENT")),
            Some(3)
        );
        assert!(config.scaler(FieldSpec::PersonGender).is_none());
        assert_eq!(config.scaled_fields().count(), 1);
    }

    #[test]
    fn describe_includes_short_hash() {
        let mut config = PreprocessConfig::new("v1");
        assert_eq!(config.describe(), "v1");
        config.sha256 = Some("0123456789abcdef".to_string());
        assert_eq!(config.describe(), "v1 (01234567)");
    }
}
