//! Follow-up status of scored applicants, kept in a local JSON file.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CoreError, Result};

/// Environment variable overriding the contact log location.
pub const CONTACTS_FILE_ENV_VAR: &str = "LOANSCORE_CONTACTS_FILE";

const CONTACTS_FILENAME: &str = "contacts.json";

/// Whether an applicant has been reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    Contacted,
    NotContacted,
    Unreachable,
}

impl ContactStatus {
    pub const ALL: [ContactStatus; 3] = [
        ContactStatus::Contacted,
        ContactStatus::NotContacted,
        ContactStatus::Unreachable,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contacted => "contacted",
            Self::NotContacted => "not_contacted",
            Self::Unreachable => "unreachable",
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().replace('-', "_").to_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| CoreError::UnknownContactStatus(s.to_string()))
    }
}

/// One row's contact status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactAnnotation {
    pub row: usize,
    pub name: String,
    pub status: ContactStatus,
    pub updated_at: DateTime<Utc>,
}

/// Contact annotations keyed by 1-based row number. Last write per row wins.
#[derive(Debug, Clone, Default)]
pub struct ContactLog {
    path: Option<PathBuf>,
    entries: BTreeMap<usize, ContactAnnotation>,
}

impl ContactLog {
    /// Log that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the log at `path`. A missing file is an empty log.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => {
                let annotations: Vec<ContactAnnotation> = serde_json::from_str(&text)?;
                annotations.into_iter().map(|a| (a.row, a)).collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(CoreError::io(&path, e)),
        };
        debug!(path = %path.display(), entries = entries.len(), "contact log loaded");
        Ok(Self {
            path: Some(path),
            entries,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Record a status for a row, replacing any earlier one.
    pub fn annotate(
        &mut self,
        row: usize,
        name: impl Into<String>,
        status: ContactStatus,
    ) -> &ContactAnnotation {
        let annotation = ContactAnnotation {
            row,
            name: name.into(),
            status,
            updated_at: Utc::now(),
        };
        self.entries.insert(row, annotation);
        &self.entries[&row]
    }

    pub fn get(&self, row: usize) -> Option<&ContactAnnotation> {
        self.entries.get(&row)
    }

    pub fn status(&self, row: usize) -> Option<ContactStatus> {
        self.get(row).map(|a| a.status)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContactAnnotation> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the log back to its file. In-memory logs are left alone.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, e))?;
        }
        let annotations: Vec<&ContactAnnotation> = self.entries.values().collect();
        let json = serde_json::to_string_pretty(&annotations)?;
        fs::write(path, json).map_err(|e| CoreError::io(path, e))?;
        debug!(path = %path.display(), entries = self.entries.len(), "contact log saved");
        Ok(())
    }
}

/// Default location of the contact log.
///
/// `LOANSCORE_CONTACTS_FILE` wins; otherwise the platform data directory.
pub fn default_contacts_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONTACTS_FILE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Some(PathBuf::from(path));
    }
    let dirs = ProjectDirs::from("", "", "loanscore");
    if dirs.is_none() {
        warn!("could not determine data directory for the contact log");
    }
    dirs.map(|dirs| dirs.data_dir().join(CONTACTS_FILENAME))
}
