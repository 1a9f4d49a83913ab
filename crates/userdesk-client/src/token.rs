//! Durable storage for the bearer token.
//!
//! The token is the only thing the client persists. It is stored under the
//! fixed key [`TOKEN_KEY`] and removed as soon as it is known to be dead.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::ClientError;

/// Name under which the token is stored.
pub const TOKEN_KEY: &str = "token";

pub trait TokenStorage: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str) -> Result<(), ClientError>;
    fn remove(&self);
}

/// Keeps the token in `<dir>/token`.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(TOKEN_KEY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Option<String> {
        fs::read_to_string(&self.path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn save(&self, token: &str) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ClientError::Transport(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }
        fs::write(&self.path, token).map_err(|e| {
            ClientError::Transport(format!("cannot write {}: {}", self.path.display(), e))
        })
    }

    fn remove(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Stored token removed"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove token"),
        }
    }
}

/// Process-local token storage for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, token: &str) -> Result<(), ClientError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryTokenStorage::new();
        assert_eq!(storage.load(), None);

        storage.save("abc").unwrap();
        assert_eq!(storage.load().as_deref(), Some("abc"));

        storage.remove();
        assert_eq!(storage.load(), None);
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = std::env::temp_dir().join(format!("userdesk-token-{}", std::process::id()));
        let storage = FileTokenStorage::new(&dir);
        assert!(storage.path().ends_with(TOKEN_KEY));

        storage.save("abc.def.ghi").unwrap();
        assert_eq!(storage.load().as_deref(), Some("abc.def.ghi"));

        storage.remove();
        assert_eq!(storage.load(), None);
        // Removing twice is harmless.
        storage.remove();

        let _ = fs::remove_dir_all(&dir);
    }
}
