//! Session persistence
//!
//! One JSON file per session id, versioned so an incompatible file is
//! discarded instead of half-loaded.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::AppError;

use super::state::SessionState;

const SESSION_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default)]
    version: u32,
    state: SessionState,
}

/// Get the default session directory
pub(crate) fn default_session_dir() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".cache").join("mmmdash").join("sessions"))
}

fn validate_id(id: &str) -> Result<(), AppError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AppError::InvalidSessionId {
            input: id.to_string(),
        })
    }
}

/// Session-scoped state keyed by a stable session id
pub(crate) struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub(crate) fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, AppError> {
        validate_id(id)?;
        Ok(self.dir.join(format!("{id}.json")))
    }

    /// Load a session, starting fresh when none is stored or the file is unusable
    pub(crate) fn load(&self, id: &str) -> Result<SessionState, AppError> {
        let path = self.path_for(id)?;
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(_) => {
                debug!("Starting new session \"{id}\"");
                return Ok(SessionState::default());
            }
        };
        match serde_json::from_reader::<_, StoredSession>(file) {
            Ok(stored) if stored.version == SESSION_VERSION => Ok(stored.state),
            Ok(stored) => {
                warn!(
                    "Discarding session \"{id}\" stored with version {}",
                    stored.version
                );
                Ok(SessionState::default())
            }
            Err(e) => {
                warn!("Discarding unreadable session {}: {e}", path.display());
                Ok(SessionState::default())
            }
        }
    }

    pub(crate) fn save(&self, id: &str, state: &SessionState) -> Result<(), AppError> {
        let path = self.path_for(id)?;
        std::fs::create_dir_all(&self.dir).map_err(|source| AppError::Write {
            path: self.dir.clone(),
            source,
        })?;
        let stored = StoredSession {
            version: SESSION_VERSION,
            state: state.clone(),
        };
        let json = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&path, json).map_err(|source| AppError::Write { path, source })
    }

    /// Forget a session; the next load starts from defaults
    pub(crate) fn reset(&self, id: &str) -> Result<(), AppError> {
        let path = self.path_for(id)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(AppError::Write { path, source }),
        }
    }
}
