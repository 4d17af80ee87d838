//! On-disk recording blobs
//!
//! One `<name>.wav` file per recording directly under the storage root.

use crate::error::LibraryError;
use crate::models::sanitize_name;
use crate::settings::AUDIO_EXTENSION;
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Store of recording audio files keyed by sanitized name
#[derive(Debug, Clone)]
pub struct RecordingRepository {
    recordings_dir: PathBuf,
}

impl RecordingRepository {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            recordings_dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Get the recordings directory
    pub fn recordings_dir(&self) -> &Path {
        &self.recordings_dir
    }

    /// Path of the blob for `name` (sanitized here as well)
    pub fn recording_path(&self, name: &str) -> PathBuf {
        self.recordings_dir
            .join(format!("{}.{}", sanitize_name(name), AUDIO_EXTENSION))
    }

    /// Names of all recordings currently on disk, in directory order
    pub fn list(&self) -> Result<Vec<String>, LibraryError> {
        let entries = fs::read_dir(&self.recordings_dir)
            .map_err(|e| LibraryError::storage(&self.recordings_dir, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| LibraryError::storage(&self.recordings_dir, e))?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if let Some(stem) = file_name.strip_suffix(&format!(".{}", AUDIO_EXTENSION)) {
                names.push(stem.to_string());
            }
        }

        Ok(names)
    }

    /// Write or overwrite the blob for `name`
    pub fn save(&self, name: &str, bytes: &[u8]) -> Result<(), LibraryError> {
        let path = self.recording_path(name);
        fs::write(&path, bytes).map_err(|e| LibraryError::storage(&path, e))?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    pub fn load(&self, name: &str) -> Result<Vec<u8>, LibraryError> {
        let path = self.recording_path(name);
        fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LibraryError::NotFound(sanitize_name(name)),
            _ => LibraryError::storage(&path, e),
        })
    }

    pub fn delete(&self, name: &str) -> Result<(), LibraryError> {
        let path = self.recording_path(name);
        fs::remove_file(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LibraryError::NotFound(sanitize_name(name)),
            _ => LibraryError::storage(&path, e),
        })?;
        debug!("Removed {}", path.display());
        Ok(())
    }
}
