//! JSON-based database for cut windows
//!
//! Stores the name -> cut window mapping in `cuts.json` under the storage
//! root. The whole map is rewritten on every mutation.

use crate::error::LibraryError;
use crate::models::CutWindow;
use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Cut metadata for every recording, mirrored to a JSON file
#[derive(Debug)]
pub struct CutStore {
    path: PathBuf,
    cuts: HashMap<String, CutWindow>,
}

impl CutStore {
    /// Load the store from disk.
    ///
    /// A missing file yields an empty store; a file that does not parse is an
    /// error the caller must not paper over.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LibraryError> {
        let path = path.into();
        remove_stale_temp_files(&path);

        let cuts = match fs::read(&path) {
            Ok(contents) => serde_json::from_slice(&contents).map_err(|source| {
                LibraryError::Corrupt {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(LibraryError::storage(&path, e)),
        };

        debug!("Loaded {} cut windows from {}", cuts.len(), path.display());
        Ok(Self { path, cuts })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, name: &str) -> Option<CutWindow> {
        self.cuts.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.cuts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    /// Insert or overwrite the window for `name` and persist.
    pub fn set(&mut self, name: &str, window: CutWindow) -> Result<(), LibraryError> {
        let mut next = self.cuts.clone();
        next.insert(name.to_string(), window);
        self.commit(next)
    }

    /// Remove the window for `name`, if any, and persist.
    pub fn remove(&mut self, name: &str) -> Result<(), LibraryError> {
        let mut next = self.cuts.clone();
        next.remove(name);
        self.commit(next)
    }

    // In-memory state only changes once the file write went through.
    fn commit(&mut self, next: HashMap<String, CutWindow>) -> Result<(), LibraryError> {
        write_cuts(&self.path, &next)?;
        self.cuts = next;
        Ok(())
    }
}

// Name of the sibling `write_cuts` stages into before renaming
fn temp_path(path: &Path) -> PathBuf {
    path.with_extension(format!("{}.tmp", uuid::Uuid::new_v4().simple()))
}

/// Delete `<stem>.*.tmp` siblings left behind by a write that never reached
/// its rename.
fn remove_stale_temp_files(path: &Path) {
    let (Some(dir), Some(stem)) = (path.parent(), path.file_stem().and_then(|s| s.to_str()))
    else {
        return;
    };
    let prefix = format!("{}.", stem);

    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        if !file_name.starts_with(&prefix) || !file_name.ends_with(".tmp") {
            continue;
        }
        match fs::remove_file(entry.path()) {
            Ok(()) => debug!("Removed stale temporary file {}", entry.path().display()),
            Err(e) => warn!(
                "Failed to remove stale temporary file {}: {}",
                entry.path().display(),
                e
            ),
        }
    }
}

/// Serialize `cuts` and replace the file at `path` with it.
///
/// Goes through a temporary sibling and a rename so readers never observe a
/// half-written document.
fn write_cuts(path: &Path, cuts: &HashMap<String, CutWindow>) -> Result<(), LibraryError> {
    let contents = serde_json::to_vec(cuts)?;

    let tmp = temp_path(path);
    fs::write(&tmp, contents).map_err(|e| LibraryError::storage(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        LibraryError::storage(path, e)
    })?;

    debug!("Persisted {} cut windows to {}", cuts.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> CutStore {
        CutStore::open(dir.path().join("cuts.json")).unwrap()
    }

    #[test]
    fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.len(), 0);
        assert!(!store.path().exists());
    }

    #[test]
    fn malformed_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cuts.json");
        fs::write(&path, "{\"memo\": {\"start\": ").unwrap();

        let err = CutStore::open(&path).unwrap_err();
        assert!(matches!(err, LibraryError::Corrupt { .. }));
    }

    #[test]
    fn set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        store.set("memo", CutWindow::new(0.5, 2.0)).unwrap();
        assert_eq!(store.get("memo"), Some(CutWindow::new(0.5, 2.0)));

        store.set("memo", CutWindow::new(1.0, 1.5)).unwrap();
        assert_eq!(store.get("memo"), Some(CutWindow::new(1.0, 1.5)));

        store.remove("memo").unwrap();
        assert_eq!(store.get("memo"), None);

        // Removing an absent entry is not an error
        store.remove("memo").unwrap();
    }

    #[test]
    fn persisted_map_reloads_equal() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.set("a", CutWindow::new(0.0, 1.25)).unwrap();
        store.set("b", CutWindow::new(0.125, 3.5)).unwrap();
        store.set("c", CutWindow::new(2.0, 2.0)).unwrap();
        store.remove("c").unwrap();

        let reloaded = store_in(&dir);
        assert_eq!(reloaded.cuts, store.cuts);
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn file_is_json_object_keyed_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.set("memo", CutWindow::new(0.25, 0.75)).unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(raw["memo"]["start"], 0.25);
        assert_eq!(raw["memo"]["end"], 0.75);

        // No temporary files left behind
        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn every_write_rewrites_whole_map() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.set("memo", CutWindow::new(0.25, 0.75)).unwrap();
        fs::remove_file(store.path()).unwrap();

        store.set("other", CutWindow::new(1.0, 2.0)).unwrap();
        let reloaded = store_in(&dir);
        assert_eq!(reloaded.get("memo"), Some(CutWindow::new(0.25, 0.75)));
        assert_eq!(reloaded.get("other"), Some(CutWindow::new(1.0, 2.0)));
    }

    #[test]
    fn open_removes_leftover_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cuts.json");
        fs::write(&path, r#"{"memo":{"start":0.5,"end":1.0}}"#).unwrap();
        let leftover = temp_path(&path);
        fs::write(&leftover, "{\"memo\": ").unwrap();
        fs::write(dir.path().join("memo.wav"), b"x").unwrap();
        fs::write(dir.path().join("notes.tmp"), b"x").unwrap();

        let store = CutStore::open(&path).unwrap();
        assert_eq!(store.get("memo"), Some(CutWindow::new(0.5, 1.0)));
        assert!(!leftover.exists());
        assert!(dir.path().join("memo.wav").exists());
        assert!(dir.path().join("notes.tmp").exists());
    }

    #[test]
    fn failed_persist_leaves_memory_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("cuts.json");
        let mut store = CutStore::open(&path).unwrap();

        let err = store.set("memo", CutWindow::new(0.0, 1.0)).unwrap_err();
        assert!(matches!(err, LibraryError::Storage { .. }));
        assert_eq!(store.get("memo"), None);
    }
}
