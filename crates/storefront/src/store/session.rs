//! Durable session cache.
//!
//! The cache is the only state that outlives the process: the bearer token,
//! the last-known user record, and the admin flag. On startup the store
//! reads it to decide whether a session restore is worth attempting; when
//! the profile fetch fails on a network error (not an auth error) the
//! cached user record serves as the fallback identity.
//!
//! The file layout is a single JSON blob. Writes go through a temp file and
//! rename, so a crash mid-write leaves the previous session intact.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use copperleaf_core::User;

/// Errors from reading or writing the session cache.
#[derive(Debug, Error)]
pub enum SessionCacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt session cache: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Snapshot of a session as persisted between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedSession {
    /// Bearer token, absent when the last session ended with a logout.
    pub token: Option<String>,
    /// Last user record the backend confirmed.
    pub user: Option<User>,
    /// Admin flag as of the last confirmed record. Read when the live
    /// state has no user loaded yet.
    #[serde(default)]
    pub is_admin: bool,
}

impl CachedSession {
    /// The cached token wrapped for handoff to the API client.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.token.as_deref().map(SecretString::from)
    }
}

/// Persistence seam for sessions. The storefront uses [`FileSessionCache`];
/// tests swap in [`MemorySessionCache`].
pub trait SessionCache: Send + Sync {
    /// Load the cached session, `None` when nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors or a corrupt cache file.
    fn load(&self) -> Result<Option<CachedSession>, SessionCacheError>;

    /// Persist the session, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Fails on I/O or serialization errors.
    fn save(&self, session: &CachedSession) -> Result<(), SessionCacheError>;

    /// Remove the cached session entirely.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors; a missing file is not an error.
    fn clear(&self) -> Result<(), SessionCacheError>;
}

/// Session cache backed by a JSON file on disk.
#[derive(Debug)]
pub struct FileSessionCache {
    path: PathBuf,
}

impl FileSessionCache {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SessionCache for FileSessionCache {
    fn load(&self) -> Result<Option<CachedSession>, SessionCacheError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, session: &CachedSession) -> Result<(), SessionCacheError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Temp file + rename keeps the previous session readable if this
        // write is interrupted.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(session)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "session cache saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionCacheError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory session cache for tests.
#[derive(Debug, Default)]
pub struct MemorySessionCache {
    session: Mutex<Option<CachedSession>>,
}

impl MemorySessionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the cache, e.g. to simulate a previous run.
    #[must_use]
    pub fn with_session(session: CachedSession) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl SessionCache for MemorySessionCache {
    fn load(&self) -> Result<Option<CachedSession>, SessionCacheError> {
        Ok(lock(&self.session).clone())
    }

    fn save(&self, session: &CachedSession) -> Result<(), SessionCacheError> {
        *lock(&self.session) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionCacheError> {
        *lock(&self.session) = None;
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn file_cache_round_trips() {
        let dir = std::env::temp_dir().join(format!("copperleaf-test-{}", std::process::id()));
        let cache = FileSessionCache::new(dir.join("session.json"));
        cache.clear().unwrap();
        assert!(cache.load().unwrap().is_none());

        let session = CachedSession {
            token: Some("tok-abc".to_string()),
            user: None,
            is_admin: true,
        };
        cache.save(&session).unwrap();

        let loaded = cache.load().unwrap().unwrap();
        assert_eq!(loaded.token.as_deref(), Some("tok-abc"));
        assert!(loaded.is_admin);

        cache.clear().unwrap();
        assert!(cache.load().unwrap().is_none());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn clearing_a_missing_file_is_not_an_error() {
        let cache = FileSessionCache::new(PathBuf::from("/nonexistent/copperleaf/session.json"));
        assert!(cache.clear().is_ok());
    }

    #[test]
    fn memory_cache_round_trips() {
        let cache = MemorySessionCache::new();
        assert!(cache.load().unwrap().is_none());
        cache
            .save(&CachedSession {
                token: Some("t".to_string()),
                ..CachedSession::default()
            })
            .unwrap();
        assert!(cache.load().unwrap().unwrap().token.is_some());
        cache.clear().unwrap();
        assert!(cache.load().unwrap().is_none());
    }
}
