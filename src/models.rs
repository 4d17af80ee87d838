//! Wire models shared by the HTTP handlers and the library

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::LibraryError;

/// A selected time range of a recording, in seconds.
///
/// The server stores whatever the client sends; ordering of `start` and `end`
/// is maintained by the editor, not enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct CutWindow {
    pub start: f64,
    pub end: f64,
}

impl CutWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}

/// Body of an upload request
#[derive(Debug, Clone, Deserialize)]
pub struct UploadRequest {
    pub name: String,
    /// Base64 (standard alphabet) encoded WAV bytes
    pub data: String,
    /// Missing on a fresh recording; defaults to `0..0`
    #[serde(default)]
    pub cut: CutWindow,
}

impl UploadRequest {
    /// Parse a raw request body.
    pub fn from_json(raw: &[u8]) -> Result<Self, LibraryError> {
        serde_json::from_slice(raw)
            .map_err(|e| LibraryError::InvalidUpload(format!("invalid upload JSON: {}", e)))
    }

    /// Decode the audio payload.
    pub fn audio(&self) -> Result<Vec<u8>, LibraryError> {
        general_purpose::STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| LibraryError::InvalidUpload(format!("invalid base64 audio: {}", e)))
    }
}

/// Everything the editor needs to reopen a recording
#[derive(Debug, Clone, Serialize)]
pub struct EditResponse {
    pub name: String,
    pub data: String,
    pub start: f64,
    pub end: f64,
}

impl EditResponse {
    pub fn new(name: String, audio: &[u8], cut: CutWindow) -> Self {
        Self {
            name,
            data: general_purpose::STANDARD.encode(audio),
            start: cut.start,
            end: cut.end,
        }
    }
}

/// One row of the recording listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingEntry {
    pub name: String,
    pub cut: Option<CutWindow>,
}

/// Homepage listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub files: Vec<ListingEntry>,
    pub file_count: usize,
}

impl From<Vec<ListingEntry>> for Listing {
    fn from(files: Vec<ListingEntry>) -> Self {
        let file_count = files.len();
        Self { files, file_count }
    }
}

/// Strip every `/` and `.` from a user supplied recording name.
///
/// Names that differ only by those characters map to the same recording.
pub fn sanitize_name(raw: &str) -> String {
    raw.chars().filter(|c| *c != '/' && *c != '.').collect()
}
