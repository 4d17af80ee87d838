//! Storage layout and server settings
//!
//! Everything lives under a single storage root: one `<name>.wav` per
//! recording plus the `cuts.json` sidecar.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

/// Name of the cut metadata file inside the storage root
pub const CUTS_FILE: &str = "cuts.json";

/// Suffix of every recording blob
pub const AUDIO_EXTENSION: &str = "wav";

/// Resolved storage settings
#[derive(Debug, Clone)]
pub struct Settings {
    root: PathBuf,
}

impl Settings {
    /// Resolve the storage root, falling back to the per-user data directory.
    /// The directory is created if it does not exist yet.
    pub fn resolve(root: Option<PathBuf>) -> anyhow::Result<Self> {
        let root = root.unwrap_or_else(Self::default_root);
        fs::create_dir_all(&root)
            .with_context(|| format!("failed to create storage root {}", root.display()))?;
        let root = fs::canonicalize(&root)
            .with_context(|| format!("failed to get absolute root path for {}", root.display()))?;
        Ok(Self { root })
    }

    fn default_root() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wavecut")
            .join("recordings")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cuts_path(&self) -> PathBuf {
        self.root.join(CUTS_FILE)
    }
}
