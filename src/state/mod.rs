//! Persistent state: recording blobs, cut metadata and the lock tying them together

mod database;
mod library;
mod recordings;

pub use database::CutStore;
pub use library::Library;
pub use recordings::RecordingRepository;
