//! Playback of the cut segment
//!
//! [`PlaybackController`] is a two-state toggle: starting crops the current
//! window out of the loaded sound and hands the WAV bytes to a
//! [`PlaybackSink`]; stopping (or the sink reporting completion) returns to
//! idle. There is never more than one segment in flight.

use crate::audio::Sound;
use crate::error::SoundError;
use crate::models::CutWindow;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Where cropped audio goes
pub trait PlaybackSink {
    /// Begin playing an encoded WAV segment
    fn play(&mut self, wav: Vec<u8>) -> Result<(), SoundError>;

    /// Stop whatever is playing immediately
    fn stop(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
}

/// Play/pause toggle for the cut window of one recording
pub struct PlaybackController<S: PlaybackSink> {
    sink: S,
    state: PlaybackState,
}

impl<S: PlaybackSink> PlaybackController<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            state: PlaybackState::Idle,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Idle -> crop and play; Playing -> stop. Returns the new state.
    ///
    /// On a crop or sink failure the controller stays idle.
    pub fn toggle(
        &mut self,
        sound: &dyn Sound,
        window: CutWindow,
    ) -> Result<PlaybackState, SoundError> {
        match self.state {
            PlaybackState::Idle => {
                let wav = sound.crop(window.start, window.end)?;
                debug!(
                    "Cropped {:.3}s..{:.3}s into {} bytes",
                    window.start,
                    window.end,
                    wav.len()
                );
                self.sink.play(wav)?;
                self.state = PlaybackState::Playing;
            }
            PlaybackState::Playing => {
                self.sink.stop();
                self.state = PlaybackState::Idle;
            }
        }
        Ok(self.state)
    }

    /// Completion event from the sink: the segment reached its end.
    pub fn finished(&mut self) {
        if self.state == PlaybackState::Playing {
            debug!("Playback finished");
            self.state = PlaybackState::Idle;
        }
    }
}

/// Sink that "plays" a segment by writing it to a WAV file
#[derive(Debug, Clone)]
pub struct WavFileSink {
    path: PathBuf,
    written: usize,
}

impl WavFileSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            written: 0,
        }
    }

    /// Bytes written by the last segment
    pub fn written(&self) -> usize {
        self.written
    }
}

impl PlaybackSink for WavFileSink {
    fn play(&mut self, wav: Vec<u8>) -> Result<(), SoundError> {
        fs::write(&self.path, &wav)?;
        self.written = wav.len();
        info!("Wrote {} bytes to {}", wav.len(), self.path.display());
        Ok(())
    }

    fn stop(&mut self) {}
}
