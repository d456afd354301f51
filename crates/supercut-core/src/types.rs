//! Common types for Supercut
//!
//! Fundamental time types shared by every component of the editor core:
//! the frame rate used for timecodes and frame stepping, and the in/out
//! selection range.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default frame rate when nothing else is known (NTSC video)
pub const DEFAULT_FRAME_RATE: f64 = 29.97;

/// Time tolerance for marker/silent-region navigation (seconds)
pub const NAVIGATION_EPSILON: f64 = 0.1;

/// Smallest duration a marker may be resized to (seconds)
pub const MIN_MARKER_DURATION: f64 = 0.1;

/// Video frame rate in frames per second
///
/// Always finite and positive. Either one of [`FrameRate::STANDARD`] or a
/// value reported by the FPS detector.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct FrameRate(f64);

impl FrameRate {
    /// The enumerated rates offered to the user
    pub const STANDARD: [f64; 8] = [23.976, 24.0, 25.0, 29.97, 30.0, 50.0, 59.94, 60.0];

    /// Create a frame rate, rejecting zero, negative and non-finite values
    pub fn new(fps: f64) -> Option<Self> {
        (fps.is_finite() && fps > 0.0).then_some(Self(fps))
    }

    /// Frames per second
    pub fn fps(&self) -> f64 {
        self.0
    }

    /// Duration of a single frame in seconds
    pub fn frame_duration(&self) -> f64 {
        1.0 / self.0
    }

    /// Snap an arbitrary rate to the nearest entry of [`FrameRate::STANDARD`]
    pub fn closest_standard(fps: f64) -> Self {
        let closest = Self::STANDARD
            .iter()
            .copied()
            .min_by(|a, b| (a - fps).abs().total_cmp(&(b - fps).abs()))
            .unwrap_or(DEFAULT_FRAME_RATE);
        Self(closest)
    }

    /// Whether this is one of the drop-frame NTSC family rates
    pub fn is_ntsc(&self) -> bool {
        [23.976, 29.97, 59.94]
            .iter()
            .any(|r| (self.0 - r).abs() < 1e-6)
    }

    /// Whether this rate is one of the enumerated standard rates
    pub fn is_standard(&self) -> bool {
        Self::STANDARD.iter().any(|r| (self.0 - r).abs() < 1e-6)
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self(DEFAULT_FRAME_RATE)
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} fps", self.0)
    }
}

impl TryFrom<f64> for FrameRate {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("invalid frame rate: {}", value))
    }
}

impl From<FrameRate> for f64 {
    fn from(rate: FrameRate) -> f64 {
        rate.0
    }
}

/// The editor's current in/out range in absolute seconds
///
/// Independent of any marker until a marker is loaded into it or it is
/// committed as a new marker.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub start: f64,
    pub end: f64,
}

impl Selection {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Selection covering the whole media
    pub fn full(duration: f64) -> Self {
        Self {
            start: 0.0,
            end: duration.max(0.0),
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether `time` lies within the selection (inclusive)
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }

    /// Midpoint of the range
    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}
