use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::session::{PlannerSession, SessionSnapshot};

pub const APP_STATE_KEY: &str = "appState";
pub const AUTH_TOKEN_KEY: &str = "authToken";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// String blobs addressed by key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// One file per key inside a data directory, created on first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root).map_err(|source| StorageError::Io {
            path: self.root.clone(),
            source,
        })?;
        // Write then rename so a crash never leaves a half-written blob.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|source| StorageError::Io { path: tmp.clone(), source })?;
        fs::rename(&tmp, &path).map_err(|source| StorageError::Io { path, source })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}

/// Restores the saved session. Missing or unreadable state yields `None`.
pub fn load_session(store: &impl KeyValueStore) -> Option<PlannerSession> {
    let raw = match store.get(APP_STATE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, "Could not load state");
            return None;
        }
    };
    let snapshot: SessionSnapshot = match serde_json::from_str(&raw) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(error = %e, "Could not load state");
            return None;
        }
    };

    let mut session = PlannerSession::from_snapshot(snapshot);
    if let Some(token) = load_token(store) {
        session.set_token(&token);
    }
    Some(session)
}

/// Persists the durable part of `session`. Failures are logged, not returned.
pub fn save_session(store: &mut impl KeyValueStore, session: &PlannerSession) {
    let result = serde_json::to_string(&session.snapshot())
        .map_err(StorageError::from)
        .and_then(|json| store.set(APP_STATE_KEY, &json));
    match result {
        Ok(()) => tracing::debug!("Session state saved"),
        Err(e) => tracing::error!(error = %e, "Could not save state"),
    }
}

pub fn load_token(store: &impl KeyValueStore) -> Option<String> {
    match store.get(AUTH_TOKEN_KEY) {
        Ok(token) => token.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
        Err(e) => {
            tracing::warn!(error = %e, "Could not read auth token");
            None
        }
    }
}

pub fn save_token(store: &mut impl KeyValueStore, token: &str) -> Result<(), StorageError> {
    store.set(AUTH_TOKEN_KEY, token)
}

pub fn remove_token(store: &mut impl KeyValueStore) -> Result<(), StorageError> {
    store.remove(AUTH_TOKEN_KEY)
}
