//! Durable session token storage.
//!
//! The bearer token returned by login/register lives in a single file under
//! the user config directory and is attached to every authenticated request.
//! Logout deletes the file; a missing file just means logged out.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no config directory available on this platform")]
    NoConfigDir,

    #[error("session store error: {0}")]
    Io(#[from] io::Error),
}

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store at the fixed per-user location: `<config>/netsanet/token`.
    pub fn open_default() -> Result<Self, SessionError> {
        let dir = dirs::config_dir().ok_or(SessionError::NoConfigDir)?;
        Ok(Self {
            path: dir.join("netsanet").join("token"),
        })
    }

    /// Store at an explicit path.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<Option<String>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, token: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;
        debug!(path = %self.path.display(), "session token saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "session token cleared");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
