//! WAV decoding, energy histogram and cropping using hound
//!
//! The editor and the playback controller only see the [`Sound`] trait;
//! [`WavSound`] is the in-memory implementation backed by a decoded WAV file.

use crate::error::SoundError;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::Cursor;

/// Number of buckets in a recording's energy histogram
pub const HISTOGRAM_BUCKETS: usize = 96;

/// What the editor and player need from a decoded recording
pub trait Sound {
    /// Length in seconds
    fn duration(&self) -> f64;

    /// Fixed-length RMS energy per equal slice of the recording, in `[0, 1]`
    fn histogram(&self) -> &[f32];

    /// Encode the `start..end` seconds range as a standalone WAV file
    fn crop(&self, start: f64, end: f64) -> Result<Vec<u8>, SoundError>;
}

/// Interleaved samples kept in their on-disk representation so a crop
/// re-encodes without loss.
#[derive(Debug, Clone)]
enum Samples {
    Int(Vec<i32>),
    Float(Vec<f32>),
}

/// A decoded WAV recording
#[derive(Debug, Clone)]
pub struct WavSound {
    spec: WavSpec,
    samples: Samples,
    histogram: Vec<f32>,
}

impl WavSound {
    /// Decode WAV bytes
    pub fn decode(bytes: &[u8]) -> Result<Self, SoundError> {
        let reader = WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();

        let samples = match spec.sample_format {
            SampleFormat::Float => {
                Samples::Float(reader.into_samples::<f32>().collect::<Result<_, _>>()?)
            }
            SampleFormat::Int => {
                Samples::Int(reader.into_samples::<i32>().collect::<Result<_, _>>()?)
            }
        };

        let mut sound = Self {
            spec,
            samples,
            histogram: Vec::new(),
        };
        if sound.frame_count() == 0 {
            return Err(SoundError::Empty);
        }
        sound.histogram = compute_histogram(&sound.mono(), HISTOGRAM_BUCKETS);

        Ok(sound)
    }

    #[cfg(test)]
    pub fn spec(&self) -> WavSpec {
        self.spec
    }

    fn channels(&self) -> usize {
        self.spec.channels.max(1) as usize
    }

    fn sample_count(&self) -> usize {
        match &self.samples {
            Samples::Int(s) => s.len(),
            Samples::Float(s) => s.len(),
        }
    }

    pub fn frame_count(&self) -> usize {
        self.sample_count() / self.channels()
    }

    /// Mono mix normalised to `[-1, 1]`
    fn mono(&self) -> Vec<f32> {
        let channels = self.channels();
        let normalised: Vec<f32> = match &self.samples {
            Samples::Float(s) => s.clone(),
            Samples::Int(s) => {
                let max_value = (1i64 << (self.spec.bits_per_sample.max(1) - 1)) as f32;
                s.iter().map(|&v| v as f32 / max_value).collect()
            }
        };

        normalised
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    }

    fn frame_at(&self, seconds: f64) -> usize {
        let frame = (seconds * self.spec.sample_rate as f64).round();
        (frame.max(0.0) as usize).min(self.frame_count())
    }
}

impl Sound for WavSound {
    fn duration(&self) -> f64 {
        self.frame_count() as f64 / self.spec.sample_rate as f64
    }

    fn histogram(&self) -> &[f32] {
        &self.histogram
    }

    fn crop(&self, start: f64, end: f64) -> Result<Vec<u8>, SoundError> {
        if !(start.is_finite() && end.is_finite()) || end < start {
            return Err(SoundError::InvalidWindow { start, end });
        }

        let channels = self.channels();
        let first = self.frame_at(start) * channels;
        let last = self.frame_at(end) * channels;

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, self.spec)?;
            match &self.samples {
                Samples::Int(s) => {
                    for &sample in &s[first..last] {
                        writer.write_sample(sample)?;
                    }
                }
                Samples::Float(s) => {
                    for &sample in &s[first..last] {
                        writer.write_sample(sample)?;
                    }
                }
            }
            writer.finalize()?;
        }

        Ok(cursor.into_inner())
    }
}

/// RMS energy of `buckets` equal slices of `samples`.
///
/// Slices that fall between samples of a very short recording read as 0.
pub fn compute_histogram(samples: &[f32], buckets: usize) -> Vec<f32> {
    (0..buckets)
        .map(|i| {
            let start = i * samples.len() / buckets;
            let end = (i + 1) * samples.len() / buckets;
            if start < end {
                let sum_squares: f32 = samples[start..end].iter().map(|s| s * s).sum();
                (sum_squares / (end - start) as f32).sqrt().min(1.0)
            } else {
                0.0
            }
        })
        .collect()
}
