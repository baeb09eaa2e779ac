// cli/src/cli/session_store.rs

// One-shot commands run in separate processes, so the signed-in account is
// kept as JSON between them. The sandbox gets its own file.

use anyhow::{Context, Result};
use log::{debug, warn};
use rest_api::config::config_dir;
use security::Session;
use std::fs;
use std::path::{Path, PathBuf};

pub const SESSION_FILE_NAME: &str = "session.json";
pub const SANDBOX_SESSION_FILE_NAME: &str = "sandbox-session.json";

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SessionStore { path: path.into() }
    }

    /// `<config dir>/hospital-cli/session.json`.
    pub fn default_location(sandbox: bool) -> Result<Self> {
        let dir = config_dir().context("Could not determine the configuration directory")?;
        let file = if sandbox { SANDBOX_SESSION_FILE_NAME } else { SESSION_FILE_NAME };
        Ok(SessionStore::new(dir.join(file)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored session. A missing file means signed out; an unreadable
    /// one is reported and treated the same way.
    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file {}", self.path.display()))?;
        match serde_json::from_str(&content) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!("Ignoring unreadable session file {}: {}", self.path.display(), e);
                Ok(None)
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(session).context("Failed to serialize session")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write session file {}", self.path.display()))?;
        debug!("Session for {} saved to {}", session.user_id(), self.path.display());
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove session file {}", self.path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::medical::{Role, UserProfile};
    use tempfile::tempdir;

    fn session() -> Session {
        Session::new(UserProfile {
            id: "doc-1".into(),
            name: "Gregory".into(),
            family_name: "House".into(),
            email: "house@hospital.test".into(),
            tel: "555".into(),
            address: None,
            specialty: Some("Diagnostics".into()),
            role: Role::Doctor,
        })
    }

    #[test]
    fn save_load_clear() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join(SESSION_FILE_NAME));
        assert!(store.load().unwrap().is_none());

        store.save(&session()).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.user.id, "doc-1");
        assert_eq!(loaded.role(), Role::Doctor);

        store.clear().unwrap();
        assert!(!store.path().exists());
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_reads_as_signed_out() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE_NAME);
        fs::write(&path, "{not json").unwrap();
        assert!(SessionStore::new(path).load().unwrap().is_none());
    }
}
