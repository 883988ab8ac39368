//! Session document store.
//!
//! Each session owns one JSON document, `session_<id>.json`, inside the
//! sessions directory. Documents are always read and written whole; writes
//! go through a temp file and a rename so a crash never leaves a truncated
//! document behind.
//!
//! Mutations go through [`DocumentStore::update`], which holds a per-session
//! lock across load, mutate and save so concurrent requests against the same
//! session cannot lose each other's writes.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::{FisError, FisResult};
use crate::models::Catalog;

/// Reads a catalog document from `path`; a missing file is an empty catalog.
pub fn read_catalog(path: &Path) -> FisResult<Catalog> {
    if !path.exists() {
        debug!("No document at {}, starting empty", path.display());
        return Ok(Catalog::new());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        FisError::Storage(format!("Failed to read {}: {e}", path.display()))
    })?;
    let value: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
        FisError::Storage(format!("Failed to parse {}: {e}", path.display()))
    })?;
    Catalog::from_document(value)
}

/// Writes a catalog document to `path` using an atomic write (temp file + rename).
pub fn write_catalog(path: &Path, catalog: &Catalog) -> FisResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                FisError::Storage(format!(
                    "Failed to create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
    }

    let content = serde_json::to_string_pretty(&catalog.to_document())?;
    let temp_path = path.with_extension("json.tmp");

    fs::write(&temp_path, content).map_err(|e| {
        FisError::Storage(format!("Failed to write {}: {e}", temp_path.display()))
    })?;
    fs::rename(&temp_path, path).map_err(|e| {
        FisError::Storage(format!("Failed to rename to {}: {e}", path.display()))
    })?;

    Ok(())
}

/// Checks that a session id is safe to embed in a file name.
pub fn validate_session_id(session: &str) -> FisResult<()> {
    if session.is_empty() {
        return Err(FisError::validation("Session id cannot be empty"));
    }
    if !session
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(FisError::validation(format!(
            "Invalid session id '{session}': only letters, digits, '-' and '_' are allowed"
        )));
    }
    Ok(())
}

/// Derives a stable session id for an unauthenticated client.
///
/// The id is the hex SHA-256 of the user agent and the remote address.
#[must_use]
pub fn session_id_for_client(user_agent: &str, remote_addr: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_agent.as_bytes());
    hasher.update(b"\n");
    hasher.update(remote_addr.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Store of per-session catalog documents.
#[derive(Debug)]
pub struct DocumentStore {
    sessions_dir: PathBuf,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl DocumentStore {
    /// Creates a store rooted at `sessions_dir`. The directory is created on
    /// first write.
    pub fn new(sessions_dir: impl Into<PathBuf>) -> Self {
        Self {
            sessions_dir: sessions_dir.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Directory holding the session documents.
    #[must_use]
    pub fn sessions_dir(&self) -> &Path {
        &self.sessions_dir
    }

    /// Path of a session's document.
    pub fn document_path(&self, session: &str) -> FisResult<PathBuf> {
        validate_session_id(session)?;
        Ok(self.sessions_dir.join(format!("session_{session}.json")))
    }

    fn session_lock(&self, session: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(session.to_string()).or_default())
    }

    /// Loads a session's catalog. A session without a document is empty.
    pub fn load(&self, session: &str) -> FisResult<Catalog> {
        let path = self.document_path(session)?;
        read_catalog(&path)
    }

    /// Replaces a session's document.
    pub fn save(&self, session: &str, catalog: &Catalog) -> FisResult<()> {
        let path = self.document_path(session)?;
        let lock = self.session_lock(session);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        write_catalog(&path, catalog)?;
        info!(
            "Saved session {} ({} variables, {} rules)",
            session,
            catalog.variables.len(),
            catalog.rules.len()
        );
        Ok(())
    }

    /// Loads, mutates and saves a session's catalog under its lock.
    ///
    /// Nothing is written when `mutate` fails.
    pub fn update<T>(
        &self,
        session: &str,
        mutate: impl FnOnce(&mut Catalog) -> FisResult<T>,
    ) -> FisResult<T> {
        let path = self.document_path(session)?;
        let lock = self.session_lock(session);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut catalog = read_catalog(&path)?;
        let result = mutate(&mut catalog)?;
        write_catalog(&path, &catalog)?;
        debug!("Updated session {}", session);
        Ok(result)
    }
}
