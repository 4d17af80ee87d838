//! The recording library: blob store and cut metadata behind one lock
//!
//! Every operation that reads or mutates either store holds the same mutex
//! for its whole duration, so an add or delete is observed as a unit across
//! both the `.wav` file and its `cuts.json` entry.

use crate::error::LibraryError;
use crate::models::{sanitize_name, CutWindow, ListingEntry};
use crate::settings::Settings;
use crate::state::{CutStore, RecordingRepository};
use log::{info, warn};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A stored recording as loaded for editing
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub name: String,
    pub audio: Vec<u8>,
    pub cut: CutWindow,
}

struct Storage {
    cuts: CutStore,
    recordings: RecordingRepository,
}

/// Shared handle over both stores. Wrap in an `Arc` to hand to request handlers.
pub struct Library {
    storage: Mutex<Storage>,
}

impl Library {
    /// Open the library under the configured storage root.
    pub fn open(settings: &Settings) -> Result<Self, LibraryError> {
        let cuts = CutStore::open(settings.cuts_path())?;
        let recordings = RecordingRepository::new(settings.root());
        info!(
            "Opened recording library at {} ({} cut windows in {})",
            recordings.recordings_dir().display(),
            cuts.len(),
            cuts.path().display()
        );

        let library = Self {
            storage: Mutex::new(Storage { cuts, recordings }),
        };

        for name in library.orphaned_cuts()? {
            warn!("Cut window for '{}' has no recording file", name);
        }

        Ok(library)
    }

    fn lock(&self) -> MutexGuard<'_, Storage> {
        // CutStore only swaps its map after a successful write, so a poisoned
        // lock still guards consistent memory.
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All recordings on disk together with their stored cut windows.
    pub fn list(&self) -> Result<Vec<ListingEntry>, LibraryError> {
        let storage = self.lock();
        let entries = storage
            .recordings
            .list()?
            .into_iter()
            .map(|name| ListingEntry {
                cut: storage.cuts.get(&name),
                name,
            })
            .collect();
        Ok(entries)
    }

    /// Write the blob and cut window for `name`, replacing any previous
    /// recording under the same sanitized name. Returns the sanitized name.
    pub fn save(&self, name: &str, audio: &[u8], cut: CutWindow) -> Result<String, LibraryError> {
        let name = sanitize_name(name);
        if name.is_empty() {
            return Err(LibraryError::InvalidUpload(
                "recording name is empty after sanitizing".to_string(),
            ));
        }

        let mut storage = self.lock();
        storage.recordings.save(&name, audio)?;
        storage.cuts.set(&name, cut)?;
        Ok(name)
    }

    /// Load a recording and its cut window. Both must be present.
    pub fn edit(&self, name: &str) -> Result<Recording, LibraryError> {
        let name = sanitize_name(name);
        let storage = self.lock();

        let cut = storage
            .cuts
            .get(&name)
            .ok_or_else(|| LibraryError::NotFound(name.clone()))?;
        let audio = storage.recordings.load(&name)?;

        Ok(Recording { name, audio, cut })
    }

    /// Remove the cut window and the blob. The metadata entry is dropped even
    /// when the blob turns out to be missing.
    pub fn delete(&self, name: &str) -> Result<(), LibraryError> {
        let name = sanitize_name(name);
        let mut storage = self.lock();

        storage.cuts.remove(&name)?;
        storage.recordings.delete(&name)
    }

    /// Cut entries whose recording file is missing, e.g. after a crash
    /// between the blob write and the metadata write.
    pub fn orphaned_cuts(&self) -> Result<Vec<String>, LibraryError> {
        let storage = self.lock();
        let on_disk = storage.recordings.list()?;
        Ok(storage
            .cuts
            .names()
            .filter(|name| !on_disk.iter().any(|n| n == *name))
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn open_in(dir: &tempfile::TempDir) -> Library {
        let settings = Settings::resolve(Some(dir.path().to_path_buf())).unwrap();
        Library::open(&settings).unwrap()
    }

    fn names(library: &Library) -> Vec<String> {
        let mut names: Vec<String> = library.list().unwrap().into_iter().map(|e| e.name).collect();
        names.sort();
        names
    }

    #[test]
    fn save_then_edit_returns_exact_payload() {
        let dir = tempfile::tempdir().unwrap();
        let library = open_in(&dir);
        let window = CutWindow::new(0.25, 1.5);

        let name = library.save("memo", b"audio-bytes", window).unwrap();
        assert_eq!(name, "memo");
        assert_eq!(names(&library), vec!["memo".to_string()]);

        let recording = library.edit("memo").unwrap();
        assert_eq!(recording.audio, b"audio-bytes");
        assert_eq!(recording.cut, window);
    }

    #[test]
    fn save_sanitizes_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let library = open_in(&dir);

        assert_eq!(library.save("a/b.c", b"one", CutWindow::new(0.0, 1.0)).unwrap(), "abc");
        library.save("abc", b"two", CutWindow::new(0.5, 0.75)).unwrap();

        let recording = library.edit("a.b.c").unwrap();
        assert_eq!(recording.audio, b"two");
        assert_eq!(recording.cut, CutWindow::new(0.5, 0.75));
        assert_eq!(names(&library), vec!["abc".to_string()]);
    }

    #[test]
    fn empty_sanitized_name_is_rejected_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let library = open_in(&dir);

        let err = library.save("../.", b"x", CutWindow::default()).unwrap_err();
        assert!(matches!(err, LibraryError::InvalidUpload(_)));
        assert!(names(&library).is_empty());
        assert!(!dir.path().join("cuts.json").exists());
    }

    #[test]
    fn delete_is_inverse_of_save() {
        let dir = tempfile::tempdir().unwrap();
        let library = open_in(&dir);
        library.save("memo", b"x", CutWindow::new(0.0, 1.0)).unwrap();

        library.delete("memo").unwrap();
        assert!(names(&library).is_empty());
        assert!(matches!(library.edit("memo"), Err(LibraryError::NotFound(_))));
        assert!(matches!(library.delete("memo"), Err(LibraryError::NotFound(_))));
    }

    #[test]
    fn edit_requires_both_blob_and_cut() {
        let dir = tempfile::tempdir().unwrap();
        let library = open_in(&dir);
        std::fs::write(dir.path().join("loose.wav"), b"x").unwrap();

        assert!(matches!(library.edit("loose"), Err(LibraryError::NotFound(_))));
        assert_eq!(library.list().unwrap()[0].cut, None);
    }

    #[test]
    fn delete_removes_blob_without_cut_entry() {
        let dir = tempfile::tempdir().unwrap();
        let library = open_in(&dir);
        library.save("memo", b"x", CutWindow::new(0.0, 1.0)).unwrap();
        std::fs::write(dir.path().join("loose.wav"), b"x").unwrap();
        assert_eq!(names(&library), vec!["loose".to_string(), "memo".to_string()]);

        library.delete("loose").unwrap();
        assert_eq!(names(&library), vec!["memo".to_string()]);
        assert!(!dir.path().join("loose.wav").exists());
        assert!(library.edit("memo").is_ok());
    }

    #[test]
    fn delete_drops_orphaned_cut_even_without_blob() {
        let dir = tempfile::tempdir().unwrap();
        let library = open_in(&dir);
        library.save("memo", b"x", CutWindow::new(0.0, 1.0)).unwrap();
        std::fs::remove_file(dir.path().join("memo.wav")).unwrap();
        assert_eq!(library.orphaned_cuts().unwrap(), vec!["memo".to_string()]);

        assert!(matches!(library.delete("memo"), Err(LibraryError::NotFound(_))));
        assert!(library.orphaned_cuts().unwrap().is_empty());
    }

    #[test]
    fn state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        open_in(&dir)
            .save("memo", b"x", CutWindow::new(0.125, 0.5))
            .unwrap();

        let reopened = open_in(&dir);
        assert_eq!(reopened.edit("memo").unwrap().cut, CutWindow::new(0.125, 0.5));
    }

    #[test]
    fn corrupt_metadata_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cuts.json"), "not json").unwrap();
        let settings = Settings::resolve(Some(dir.path().to_path_buf())).unwrap();

        assert!(matches!(
            Library::open(&settings),
            Err(LibraryError::Corrupt { .. })
        ));
    }

    #[test]
    fn concurrent_add_and_delete_stay_atomic_across_stores() {
        let dir = tempfile::tempdir().unwrap();
        let library = Arc::new(open_in(&dir));
        library.save("second", b"2", CutWindow::new(0.0, 2.0)).unwrap();

        std::thread::scope(|scope| {
            let writer = Arc::clone(&library);
            scope.spawn(move || {
                for _ in 0..50 {
                    writer.save("first", b"1", CutWindow::new(0.0, 1.0)).unwrap();
                    writer.delete("first").unwrap();
                }
            });

            let deleter = Arc::clone(&library);
            scope.spawn(move || {
                for _ in 0..50 {
                    deleter.delete("second").unwrap();
                    deleter.save("second", b"2", CutWindow::new(0.0, 2.0)).unwrap();
                }
            });

            let reader = Arc::clone(&library);
            scope.spawn(move || {
                for _ in 0..200 {
                    for entry in reader.list().unwrap() {
                        assert!(entry.cut.is_some(), "{} listed without its cut", entry.name);
                    }
                    assert!(reader.orphaned_cuts().unwrap().is_empty());
                }
            });
        });

        assert_eq!(names(&library), vec!["second".to_string()]);
    }
}
