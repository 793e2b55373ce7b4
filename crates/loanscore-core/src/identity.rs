//! Display names for batch rows.

use loanscore_model::RawRecord;

/// Name columns tried in order when none are configured.
pub const DEFAULT_NAME_COLUMNS: [&str; 4] = ["Ho_ten", "Name", "HO_TEN", "Full Name"];

/// Picks a display name for a row from an ordered list of candidate columns.
///
/// Column names match exactly; the first candidate with a truthy value wins.
/// Rows with no usable name are called `Record #<index>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityExtractor {
    candidates: Vec<String>,
}

impl Default for IdentityExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_NAME_COLUMNS)
    }
}

impl IdentityExtractor {
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    /// Try `columns` before the current candidates.
    #[must_use]
    pub fn prefer<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut candidates: Vec<String> = columns.into_iter().map(Into::into).collect();
        candidates.append(&mut self.candidates);
        self.candidates = candidates;
        self
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Name for the row at 1-based `index`.
    #[must_use]
    pub fn extract(&self, record: &RawRecord, index: usize) -> String {
        self.candidates
            .iter()
            .filter_map(|column| record.get(column))
            .find(|value| value.is_truthy())
            .map_or_else(|| fallback_name(index), |value| value.to_text())
    }
}

/// Name used when no candidate column has a value.
#[must_use]
pub fn fallback_name(index: usize) -> String {
    format!("Record #{index}")
}
