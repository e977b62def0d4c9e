// Snapshot persistence: the store seam and the in-memory and JSON-file
// backends. The SQLite backend lives in `db`.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::config::{StorageBackend, StorageConfig};
use crate::db::Database;
use crate::draft::state::DraftSnapshot;
use crate::error::PersistenceError;

/// Somewhere a draft snapshot can be written wholesale and read back.
///
/// Last writer wins: `save` replaces whatever was stored before.
pub trait SnapshotStore: Send {
    fn save(&self, snapshot: &DraftSnapshot) -> Result<(), PersistenceError>;

    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<DraftSnapshot>, PersistenceError>;

    fn clear(&self) -> Result<(), PersistenceError>;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Holds the serialized snapshot in memory. Used by tests and by the
/// `memory` storage backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    json: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw JSON currently held, if any.
    pub fn raw(&self) -> Option<String> {
        self.json.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Replace the held JSON without validation.
    pub fn set_raw(&self, json: impl Into<String>) {
        *self.json.lock().unwrap_or_else(|e| e.into_inner()) = Some(json.into());
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&self, snapshot: &DraftSnapshot) -> Result<(), PersistenceError> {
        self.set_raw(snapshot.to_json()?);
        Ok(())
    }

    fn load(&self) -> Result<Option<DraftSnapshot>, PersistenceError> {
        self.raw().map(|json| DraftSnapshot::from_json(&json)).transpose()
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        *self.json.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

/// A single flat JSON file. Writes go to a sibling temp file first and are
/// renamed into place, so a crash mid-write leaves the previous snapshot.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for JsonFileStore {
    fn save(&self, snapshot: &DraftSnapshot) -> Result<(), PersistenceError> {
        let json = snapshot.to_json()?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
        }
        let tmp = self.temp_path();
        std::fs::write(&tmp, json).map_err(|e| PersistenceError::io(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| PersistenceError::io(&self.path, e))?;
        debug!("saved snapshot to {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<DraftSnapshot>, PersistenceError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PersistenceError::io(&self.path, e)),
        };
        DraftSnapshot::from_json(&json).map(Some)
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistenceError::io(&self.path, e)),
        }
    }
}

// ---------------------------------------------------------------------------
// Construction from config
// ---------------------------------------------------------------------------

/// Open the store selected by `[storage]`, resolving relative paths
/// against `base_dir`.
pub fn open_store(
    config: &StorageConfig,
    base_dir: &Path,
) -> Result<Box<dyn SnapshotStore>, PersistenceError> {
    let path = base_dir.join(&config.path);
    match config.backend {
        StorageBackend::Memory => Ok(Box::new(MemoryStore::new())),
        StorageBackend::Json => Ok(Box::new(JsonFileStore::new(path))),
        StorageBackend::Sqlite => {
            let path = path.to_string_lossy().into_owned();
            Ok(Box::new(Database::open(&path)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::pick::Position;
    use crate::draft::roster::RosterRequirement;
    use crate::draft::state::{DraftConfig, DraftState};

    fn sample_state(picks: usize) -> DraftState {
        let config = DraftConfig::new(4, 2, RosterRequirement::default()).unwrap();
        let mut state = DraftState::new(config);
        for i in 0..picks {
            let team = state.team_on_clock().unwrap();
            state.history.push(team, format!("Player {i}"), Position::Mid);
        }
        state.team_names.insert(2, "Mine".into());
        state
    }

    fn roundtrip(store: &dyn SnapshotStore, state: &DraftState) -> DraftState {
        store.save(&DraftSnapshot::capture(state)).unwrap();
        store.load().unwrap().unwrap().into_state().unwrap()
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());
        for picks in [0, 3, 12] {
            let state = sample_state(picks);
            assert_eq!(roundtrip(&store, &state), state);
        }
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn memory_store_reports_garbage_as_error() {
        let store = MemoryStore::new();
        store.set_raw("{not json");
        assert!(store.load().is_err());
    }

    #[test]
    fn json_store_roundtrip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/draft.json"));
        assert!(store.load().unwrap().is_none());

        let state = sample_state(5);
        assert_eq!(roundtrip(&store, &state), state);
        assert!(store.path().exists());
        assert!(!dir.path().join("nested/draft.json.tmp").exists());

        store.clear().unwrap();
        assert!(!store.path().exists());
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn json_store_last_writer_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("draft.json"));
        store.save(&DraftSnapshot::capture(&sample_state(5))).unwrap();
        let later = sample_state(2);
        assert_eq!(roundtrip(&store, &later), later);
    }

    #[test]
    fn json_store_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.json");
        std::fs::write(&path, "garbage").unwrap();
        let store = JsonFileStore::new(path);
        assert!(store.load().is_err());
    }

    #[test]
    fn open_store_selects_backend() {
        let dir = tempfile::tempdir().unwrap();
        for backend in [StorageBackend::Memory, StorageBackend::Json, StorageBackend::Sqlite] {
            let config = StorageConfig {
                backend,
                path: format!("draft-{backend:?}"),
            };
            let store = open_store(&config, dir.path()).unwrap();
            let state = sample_state(3);
            assert_eq!(roundtrip(store.as_ref(), &state), state);
        }
    }
}
