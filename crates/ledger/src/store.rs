//! Persistence gateway: durable storage the core reads once at boot and
//! writes after every successful mutation.
//!
//! The gateway only mirrors the snapshot. Save failures are a durability
//! gap, not a core-level error: the ledger logs them and carries on with
//! its in-memory state.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::state::Snapshot;

/// Gateway operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot (de)serialization failed: {0}")]
    Serde(String),

    #[error("storage io failed: {0}")]
    Io(String),
}

/// Durable key-value gateway for the full state tree.
pub trait SnapshotStore {
    /// Read the persisted snapshot, if any. Called once at boot.
    fn load(&self) -> Result<Option<Snapshot>, StoreError>;

    /// Mirror the complete current state tree.
    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;
}

impl<S> SnapshotStore for Arc<S>
where
    S: SnapshotStore + ?Sized,
{
    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        (**self).load()
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        (**self).save(snapshot)
    }
}

/// In-memory gateway for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Option<Snapshot>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start pre-populated, as if a previous session had saved.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            inner: RwLock::new(Some(snapshot)),
        }
    }

    /// What the last save wrote, for assertions.
    pub fn persisted(&self) -> Option<Snapshot> {
        self.inner.read().ok().and_then(|guard| guard.clone())
    }
}

impl SnapshotStore for InMemoryStore {
    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        let guard = self
            .inner
            .read()
            .map_err(|_| StoreError::Io("store lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| StoreError::Io("store lock poisoned".to_string()))?;
        *guard = Some(snapshot.clone());
        Ok(())
    }
}

/// File-backed gateway: one pretty-printed JSON document per ledger.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::Io(err.to_string())),
        };
        let snapshot = serde_json::from_str(&text).map_err(|e| StoreError::Serde(e.to_string()))?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }
        let text =
            serde_json::to_string_pretty(snapshot).map_err(|e| StoreError::Serde(e.to_string()))?;
        fs::write(&self.path, text).map_err(|e| StoreError::Io(e.to_string()))
    }
}
