//! Category label resolution.

use loanscore_model::RawValue;
use loanscore_standards::CategoryTable;

/// Resolve a raw value to its category code.
///
/// The value's text form is lower-cased and trimmed before lookup. Returns
/// `None` for missing values and unknown labels; callers fall back to numeric
/// coercion of the original value.
pub fn resolve_category(table: &CategoryTable, value: &RawValue) -> Option<i64> {
    if value.is_missing() {
        return None;
    }
    table.lookup(&value.to_text())
}

#[cfg(test)]
mod tests {
    use loanscore_model::FieldSpec;

    use super::*;

    #[test]
    fn resolves_text_labels_only_when_known() {
        let mut table = CategoryTable::new(FieldSpec::PreviousLoanDefaultsOnFile);
        table.insert("no", 0);
        table.insert("yes", 1);
        assert_eq!(resolve_category(&table, &RawValue::from(" Yes ")), Some(1));
        assert_eq!(resolve_category(&table, &RawValue::from("maybe")), None);
        assert_eq!(resolve_category(&table, &RawValue::Missing), None);
        assert_eq!(resolve_category(&table, &RawValue::from(1.0)), None);
    }
}
