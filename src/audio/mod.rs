//! Audio handling
//!
//! This module provides:
//! - WAV decoding, energy histogram and cropping via hound
//! - A play/pause controller for the cut segment

mod playback;
mod sound;

pub use playback::{PlaybackController, WavFileSink};
pub use sound::{Sound, WavSound};

#[cfg(test)]
pub(crate) use sound::{tests::padded_tone, HISTOGRAM_BUCKETS};
