//! Frame rate detection from presented-frame callbacks
//!
//! The media layer reports `(media_time, presented_frames)` for every frame
//! it shows. The interval between consecutive callbacks, divided by the
//! number of frames presented in between, approximates one frame duration.
//! A running average over at most [`MAX_FPS_SAMPLES`] intervals gives the
//! estimate; once half the samples are in, the closest standard rate is
//! promoted to the editor's frame rate.

use crate::types::FrameRate;

/// Intervals collected before detection completes
pub const MAX_FPS_SAMPLES: usize = 50;

/// Certainty (percent) at which the estimate is promoted
pub const PROMOTE_CERTAINTY: f64 = 50.0;

/// Snapshot of the running estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FpsEstimate {
    /// Mean frames per second, unrounded
    pub fps: f64,
    /// `samples * 2`, in percent
    pub certainty: f64,
}

impl FpsEstimate {
    /// Whole-number rate shown in the UI
    pub fn rounded(&self) -> f64 {
        self.fps.round()
    }

    /// Closest standard rate, once certain enough
    pub fn promoted(&self) -> Option<FrameRate> {
        (self.certainty >= PROMOTE_CERTAINTY).then(|| FrameRate::closest_standard(self.fps))
    }
}

/// Per-frame state of an in-progress frame delivery
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresentedFrame {
    pub media_time: f64,
    pub presented_frames: u64,
    pub playback_rate: f64,
    pub has_focus: bool,
}

/// Running frame-interval averager
#[derive(Debug, Clone)]
pub struct FpsDetector {
    intervals: Vec<f64>,
    last_media_time: Option<f64>,
    last_presented: Option<u64>,
    frame_not_seeked: bool,
    promoted: bool,
}

impl Default for FpsDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsDetector {
    pub fn new() -> Self {
        Self {
            intervals: Vec::with_capacity(MAX_FPS_SAMPLES),
            last_media_time: None,
            last_presented: None,
            frame_not_seeked: true,
            promoted: false,
        }
    }

    /// Forget everything (new media loaded)
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn sample_count(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_complete(&self) -> bool {
        self.intervals.len() >= MAX_FPS_SAMPLES
    }

    /// Feed one presented-frame callback
    ///
    /// Returns the updated estimate when the frame contributed a sample.
    /// Samples are only taken at normal speed with focus, right after a frame
    /// that was not followed by a seek, and with a plausible interval.
    pub fn on_frame(&mut self, frame: PresentedFrame) -> Option<FpsEstimate> {
        let mut accepted = false;

        if let (Some(last_time), Some(last_frames)) = (self.last_media_time, self.last_presented) {
            let frames = frame.presented_frames.abs_diff(last_frames);
            if frames > 0 {
                let interval = (frame.media_time - last_time).abs() / frames as f64;
                if interval.is_finite()
                    && interval > 0.0
                    && interval < 1.0
                    && self.frame_not_seeked
                    && self.intervals.len() < MAX_FPS_SAMPLES
                    && frame.playback_rate == 1.0
                    && frame.has_focus
                {
                    self.intervals.push(interval);
                    accepted = true;
                }
            }
        }

        self.frame_not_seeked = true;
        self.last_media_time = Some(frame.media_time);
        self.last_presented = Some(frame.presented_frames);

        if accepted {
            let estimate = self.estimate();
            if let Some(est) = estimate {
                log::trace!(
                    "FpsDetector: {:.3} fps, certainty {:.0}%",
                    est.fps,
                    est.certainty
                );
            }
            estimate
        } else {
            None
        }
    }

    /// The playhead jumped: drop the last interval and skip the next frame
    pub fn on_seek(&mut self) {
        self.intervals.pop();
        self.frame_not_seeked = false;
    }

    /// Standard rate to adopt, handed out once per detection run
    ///
    /// Returns `None` until the estimate is certain enough and after the
    /// rate has been taken, so a later manual choice is not overridden.
    pub fn take_promotion(&mut self) -> Option<FrameRate> {
        if self.promoted {
            return None;
        }
        let rate = self.estimate()?.promoted()?;
        self.promoted = true;
        log::info!("FpsDetector: promoting {}", rate);
        Some(rate)
    }

    /// Current estimate, `None` before the first sample
    pub fn estimate(&self) -> Option<FpsEstimate> {
        if self.intervals.is_empty() {
            return None;
        }
        let mean = self.intervals.iter().sum::<f64>() / self.intervals.len() as f64;
        Some(FpsEstimate {
            fps: 1.0 / mean,
            certainty: (self.intervals.len() * 2) as f64,
        })
    }
}
