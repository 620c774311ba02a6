//! Persisted bearer token storage. The transport client is the sole reader
//! and writer; at most one token is held at a time, under a single well-known
//! key.

use std::io::ErrorKind;
use std::path::PathBuf;

use parking_lot::RwLock;

use crate::error::AuthError;

/// Well-known storage key, mirrored by the file name used by
/// [`FileTokenStore`].
pub const TOKEN_KEY: &str = "token";

pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, AuthError>;
    /// Overwrites any previously stored token.
    fn save(&self, token: &str) -> Result<(), AuthError>;
    /// Clearing an absent token is not an error.
    fn clear(&self) -> Result<(), AuthError>;
}

/// In-memory store for tests and short-lived processes.
#[derive(Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<String>>,
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, AuthError> {
        Ok(self.slot.read().clone())
    }

    fn save(&self, token: &str) -> Result<(), AuthError> {
        *self.slot.write() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        *self.slot.write() = None;
        Ok(())
    }
}

/// Durable store: one file named `token` under the given directory.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(TOKEN_KEY),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, AuthError> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) => {
                let token = s.trim().to_string();
                Ok(if token.is_empty() { None } else { Some(token) })
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AuthError::storage(format!("token read failed: {e}"))),
        }
    }

    fn save(&self, token: &str) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AuthError::storage(format!("token dir create failed: {e}")))?;
        }
        std::fs::write(&self.path, token)
            .map_err(|e| AuthError::storage(format!("token write failed: {e}")))
    }

    fn clear(&self) -> Result<(), AuthError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::storage(format!("token remove failed: {e}"))),
        }
    }
}
