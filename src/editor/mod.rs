//! Waveform editor for one recording
//!
//! An [`EditSession`] owns the histogram of a recording, the current cut
//! window and a small raster it redraws after every change. Pointer input is
//! expressed in display pixels; times are seconds.

mod frame;

pub use frame::Frame;
#[cfg(test)]
pub use frame::Pixel;

use crate::audio::Sound;
use crate::models::CutWindow;
use log::trace;

pub const DISPLAY_WIDTH: usize = 96;
pub const DISPLAY_HEIGHT: usize = 24;

/// Default energy level separating silence from signal
pub const AUTOCUT_THRESHOLD: f32 = 0.03;

/// Which marker, if any, follows the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    DraggingStart,
    DraggingEnd,
}

#[derive(Debug, Clone)]
pub struct EditSession {
    name: String,
    duration: f64,
    histogram: Vec<f32>,
    start: f64,
    end: f64,
    drag: DragState,
    frame: Frame,
}

impl EditSession {
    /// Open a session on a decoded recording. Without a stored window the
    /// whole recording is selected.
    pub fn new(name: impl Into<String>, sound: &dyn Sound, cut: Option<CutWindow>) -> Self {
        Self::from_histogram(name, sound.duration(), sound.histogram().to_vec(), cut)
    }

    pub fn from_histogram(
        name: impl Into<String>,
        duration: f64,
        histogram: Vec<f32>,
        cut: Option<CutWindow>,
    ) -> Self {
        let cut = cut.unwrap_or(CutWindow::new(0.0, duration));
        let mut session = Self {
            name: name.into(),
            duration,
            histogram,
            start: cut.start,
            end: cut.end,
            drag: DragState::Idle,
            frame: Frame::new(DISPLAY_WIDTH, DISPLAY_HEIGHT),
        };
        session.render();
        session
    }

    /// Change the display size and redraw
    pub fn with_display(mut self, width: usize, height: usize) -> Self {
        self.frame = Frame::new(width.max(1), height.max(1));
        self.render();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn window(&self) -> CutWindow {
        CutWindow::new(self.start, self.end)
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Display x coordinate of `time`
    pub fn pixel_for(&self, time: f64) -> f64 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        time / self.duration * self.frame.width() as f64
    }

    /// Inverse of [`pixel_for`](Self::pixel_for), clamped to the recording
    pub fn time_for(&self, pixel_x: f64) -> f64 {
        let time = pixel_x / self.frame.width() as f64 * self.duration;
        time.clamp(0.0, self.duration.max(0.0))
    }

    fn bucket_time(&self, bucket: usize) -> f64 {
        bucket as f64 * self.duration / self.histogram.len() as f64
    }

    /// Redraw histogram bars and both markers from scratch.
    pub fn render(&mut self) -> &Frame {
        let width = self.frame.width();
        let height = self.frame.height();
        self.frame.clear();

        if !self.histogram.is_empty() {
            for x in 0..width {
                let bucket = x * self.histogram.len() / width;
                let value = self.histogram[bucket].clamp(0.0, 1.0);
                self.frame.bar(x, (value * height as f32).round() as usize);
            }
        }

        for time in [self.start, self.end] {
            let x = self.pixel_for(time).max(0.0) as usize;
            self.frame.marker(x.min(width - 1));
        }

        &self.frame
    }

    /// Move the markers to the first and last buckets louder than
    /// `threshold`. A side with no such bucket keeps its current value.
    pub fn autocut(&mut self, threshold: f32) {
        if let Some(first) = self.histogram.iter().position(|&v| v > threshold) {
            self.start = self.bucket_time(first);
        }
        if let Some(last) = self.histogram.iter().rposition(|&v| v > threshold) {
            self.end = self.bucket_time(last);
        }
        trace!(
            "Autocut '{}' at {} -> {:.3}s..{:.3}s",
            self.name,
            threshold,
            self.start,
            self.end
        );
        self.render();
    }

    /// Pointer down: grab whichever marker is nearer. Ties go to the end marker.
    pub fn begin_drag(&mut self, pixel_x: f64) {
        let to_start = (pixel_x - self.pixel_for(self.start)).abs();
        let to_end = (pixel_x - self.pixel_for(self.end)).abs();
        self.drag = if to_start < to_end {
            DragState::DraggingStart
        } else {
            DragState::DraggingEnd
        };
    }

    /// Pointer move: place the grabbed marker under the pointer. Crossing the
    /// other marker swaps the two values and hands the drag over, so the bar
    /// under the pointer keeps following it.
    pub fn update_drag(&mut self, pixel_x: f64) {
        let time = self.time_for(pixel_x);
        match self.drag {
            DragState::Idle => return,
            DragState::DraggingStart => self.start = time,
            DragState::DraggingEnd => self.end = time,
        }

        if self.end < self.start {
            std::mem::swap(&mut self.start, &mut self.end);
            self.drag = match self.drag {
                DragState::DraggingStart => DragState::DraggingEnd,
                DragState::DraggingEnd => DragState::DraggingStart,
                DragState::Idle => DragState::Idle,
            };
        }

        self.render();
    }

    /// Pointer up
    pub fn end_drag(&mut self) {
        self.drag = DragState::Idle;
    }

    /// A complete pointer gesture: press at `from`, move to `to`, release.
    pub fn drag(&mut self, from: f64, to: f64) {
        self.begin_drag(from);
        let grabbed = self.drag_state();
        self.update_drag(to);
        trace!(
            "Dragged {:?} from {}px to {}px, released as {:?} -> {:.3}s..{:.3}s",
            grabbed,
            from,
            to,
            self.drag_state(),
            self.start,
            self.end
        );
        self.end_drag();
    }
}
