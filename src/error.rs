//! Error types for the recording library and the audio layer

use std::path::PathBuf;

use thiserror::Error;

/// Failures of the recording library (blob store + cut metadata).
#[derive(Debug, Error)]
pub enum LibraryError {
    /// The request was malformed; nothing was written.
    #[error("invalid upload: {0}")]
    InvalidUpload(String),
    #[error("recording '{0}' not found")]
    NotFound(String),
    /// Durable state could not be read or written. Never reported as success.
    #[error("storage failure at {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The cut metadata file exists but does not parse.
    #[error("corrupt cut metadata in {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode cut metadata: {0}")]
    Encode(#[from] serde_json::Error),
}

impl LibraryError {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }
}

/// Errors surfaced while decoding, cropping or playing audio.
#[derive(Debug, Error)]
pub enum SoundError {
    #[error("WAV decode failed: {0}")]
    Wav(#[from] hound::Error),
    #[error("recording contains no audio frames")]
    Empty,
    #[error("invalid cut window {start:.3}s..{end:.3}s")]
    InvalidWindow { start: f64, end: f64 },
    #[error("playback output failed: {0}")]
    Output(#[from] std::io::Error),
}
