//! Bearer-token session state.
//!
//! The session is one slot holding the current access token and the
//! last-known user role. It is written only by login, logout and 401
//! invalidation; the last write wins.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};

/// Environment variable overriding the session file location.
pub const SESSION_FILE_ENV_VAR: &str = "LOANSCORE_SESSION_FILE";

const APP_QUALIFIER: &str = "";
const APP_ORG: &str = "";
const APP_NAME: &str = "loanscore";
const SESSION_FILENAME: &str = "session.json";

/// What a token store persists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Storage for the session slot.
pub trait SessionContext: Send + Sync {
    /// Current token, if any.
    fn get(&self) -> Option<String>;
    /// Replace the token.
    fn set(&self, token: &str) -> Result<()>;
    /// Remove the token and role.
    fn clear(&self) -> Result<()>;
    /// Last-known role of the logged-in user.
    fn role(&self) -> Option<String>;
    fn set_role(&self, role: Option<&str>) -> Result<()>;
}

/// Process-local session, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<StoredSession>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(StoredSession {
                access_token: Some(token.into()),
                role: None,
            }),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut StoredSession)) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        apply(&mut slot);
    }

    fn read(&self) -> StoredSession {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SessionContext for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.read().access_token
    }

    fn set(&self, token: &str) -> Result<()> {
        self.update(|slot| slot.access_token = Some(token.to_string()));
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.update(|slot| *slot = StoredSession::default());
        Ok(())
    }

    fn role(&self) -> Option<String> {
        self.read().role
    }

    fn set_role(&self, role: Option<&str>) -> Result<()> {
        self.update(|slot| slot.role = role.map(str::to_string));
        Ok(())
    }
}

/// Session persisted as JSON on disk so it survives between invocations.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at [`default_session_path`].
    pub fn open_default() -> Result<Self> {
        default_session_path()
            .map(Self::new)
            .ok_or_else(|| ClientError::Io("could not determine the session file path".to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session. Missing or unreadable files count as empty.
    pub fn load(&self) -> StoredSession {
        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(session) => session,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "ignoring malformed session file");
                    StoredSession::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoredSession::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read session file");
                StoredSession::default()
            }
        }
    }

    fn save(&self, session: &StoredSession) -> Result<()> {
        if session == &StoredSession::default() {
            return self.remove();
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content)?;
        restrict_permissions(&self.path)?;
        debug!(path = %self.path.display(), "saved session");
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

impl SessionContext for FileTokenStore {
    fn get(&self) -> Option<String> {
        self.load().access_token
    }

    fn set(&self, token: &str) -> Result<()> {
        let mut session = self.load();
        session.access_token = Some(token.to_string());
        self.save(&session)
    }

    fn clear(&self) -> Result<()> {
        self.remove()
    }

    fn role(&self) -> Option<String> {
        self.load().role
    }

    fn set_role(&self, role: Option<&str>) -> Result<()> {
        let mut session = self.load();
        session.role = role.map(str::to_string);
        self.save(&session)
    }
}

/// Get the path to the session file.
///
/// `LOANSCORE_SESSION_FILE` wins; otherwise the platform config directory
/// (`~/.config/loanscore/session.json` on Linux). Returns `None` if the
/// platform-specific directory cannot be determined.
pub fn default_session_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(SESSION_FILE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Some(PathBuf::from(path));
    }
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(SESSION_FILENAME))
}

/// Gate on a valid bearer token.
#[derive(Clone)]
pub struct SessionGuard {
    store: Arc<dyn SessionContext>,
}

impl std::fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGuard")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl SessionGuard {
    pub fn new(store: Arc<dyn SessionContext>) -> Self {
        Self { store }
    }

    /// Guard over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.get().is_some_and(|token| !token.is_empty())
    }

    /// The current token, or [`ClientError::Unauthenticated`].
    pub fn require_auth(&self) -> Result<String> {
        self.store
            .get()
            .filter(|token| !token.is_empty())
            .ok_or(ClientError::Unauthenticated)
    }

    /// Store a freshly issued token. Any previous role is dropped.
    pub fn establish(&self, token: &str) -> Result<()> {
        self.store.clear()?;
        self.store.set(token)?;
        info!("session established");
        Ok(())
    }

    /// Drop the session after the service rejected the token.
    pub fn invalidate(&self) {
        match self.store.clear() {
            Ok(()) => warn!("session invalidated"),
            Err(e) => warn!(error = %e, "failed to clear session"),
        }
    }

    /// Clear the session on explicit logout.
    pub fn end(&self) -> Result<()> {
        self.store.clear()?;
        info!("session ended");
        Ok(())
    }

    pub fn role(&self) -> Option<String> {
        self.store.role()
    }

    pub fn record_role(&self, role: Option<&str>) -> Result<()> {
        self.store.set_role(role)
    }
}
