//! Where the OAuth session is persisted between runs.

use crate::error::MkMeetResult;
use crate::session::Session;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const TOKEN_FILE: &str = "token.json";

/// Storage for the persisted session. A trait so the flat file can be
/// swapped for an encrypted or keychain-backed store without touching
/// call sites.
pub trait TokenStore {
    fn load(&self) -> MkMeetResult<Option<Session>>;
    fn save(&self, session: &Session) -> MkMeetResult<()>;
}

/// Plain JSON file store, `token.json` in the working directory.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileTokenStore {
    fn default() -> Self {
        Self::new(TOKEN_FILE)
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> MkMeetResult<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)?;

        match serde_json::from_str::<Session>(&contents) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                warn!("ignoring unreadable token file {}: {}", self.path.display(), err);
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> MkMeetResult<()> {
        let contents = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, contents)?;

        // Owner-only (0600), the file contains OAuth tokens
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}
