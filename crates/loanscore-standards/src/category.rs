//! Category tables: label to integer code per categorical field.
//!
//! Labels are stored lower-cased and trimmed, so lookups accept any casing
//! and surrounding whitespace. Several labels may share one code (for example
//! `female` and its Vietnamese synonym `nu` both encode to `0`).

use std::collections::BTreeMap;

use loanscore_model::FieldSpec;
use serde::{Deserialize, Serialize};

/// Normalize a raw label the way lookups expect it.
pub fn normalize_label(value: &str) -> String {
    value.to_lowercase().trim().to_string()
}

/// Label to code mapping for one categorical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTable {
    pub field: FieldSpec,
    /// Key: normalized label.
    codes: BTreeMap<String, i64>,
}

impl CategoryTable {
    pub fn new(field: FieldSpec) -> Self {
        Self {
            field,
            codes: BTreeMap::new(),
        }
    }

    /// Add a label. A later insert of the same normalized label wins.
    pub fn insert(&mut self, label: &str, code: i64) {
        self.codes.insert(normalize_label(label), code);
    }

    /// Code for a raw label, if the label is known.
    pub fn lookup(&self, value: &str) -> Option<i64> {
        self.codes.get(&normalize_label(value)).copied()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.lookup(value).is_some()
    }

    /// Labels in sorted order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.codes.keys().map(String::as_str)
    }

    /// All labels that encode to `code`.
    pub fn synonyms_of(&self, code: i64) -> Vec<&str> {
        self.codes
            .iter()
            .filter(|(_, value)| **value == code)
            .map(|(label, _)| label.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gender() -> CategoryTable {
        let mut table = CategoryTable::new(FieldSpec::PersonGender);
        table.insert("female", 0);
        table.insert("male", 1);
        table.insert("nu", 0);
        table.insert("nam", 1);
        table
    }

    #[test]
    fn lookup_normalizes_label() {
        let table = gender();
        assert_eq!(table.lookup("Female"), Some(0));
        assert_eq!(table.lookup("  MALE "), Some(1));
        assert_eq!(table.lookup("nu"), Some(0));
        assert_eq!(table.lookup("other"), None);
    }

    #[test]
    fn synonyms_share_codes() {
        let table = gender();
        assert_eq!(table.synonyms_of(0), vec!["female", "nu"]);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn inserted_labels_are_normalized() {
        let mut table = CategoryTable::new(FieldSpec::PersonEducation);
        table.insert(" High School ", 3);
        assert!(table.contains("high school"));
        assert_eq!(table.labels().collect::<Vec<_>>(), vec!["high school"]);
    }
}
