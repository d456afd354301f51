//! Editor configuration sections
//!
//! Every section is `#[serde(default)]`, so a partial YAML file only
//! overrides the keys it names. `validate()` clamps values into the ranges
//! the editor UI offers.

use super::io::Validate;
use crate::silence::SilenceParams;
use crate::timecode::DEFAULT_CACHE_CAPACITY;
use crate::types::{FrameRate, DEFAULT_FRAME_RATE, MIN_MARKER_DURATION, NAVIGATION_EPSILON};
use crate::zoom::DEFAULT_ZOOM_PADDING;
use serde::{Deserialize, Serialize};

/// Root configuration
///
/// Stored at `~/.config/supercut/config.yaml`:
///
/// ```yaml
/// timecode:
///   frame_rate: 25.0
/// silence:
///   threshold_db: -45.0
///   min_silence_duration: 0.8
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub timecode: TimecodeConfig,
    pub silence: SilenceConfig,
    pub interaction: InteractionConfig,
    pub playback: PlaybackConfig,
}

impl Validate for EditorConfig {
    fn validate(&mut self) {
        self.timecode.validate();
        self.silence.validate();
        self.interaction.validate();
        self.playback.validate();
    }
}

// =============================================================================
// Timecode
// =============================================================================

/// Timecode display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimecodeConfig {
    /// Frame rate used until one is detected or chosen. Default: 29.97
    pub frame_rate: f64,
    /// Cached conversions before the cache resets. Default: 1000
    pub cache_capacity: usize,
}

impl Default for TimecodeConfig {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl TimecodeConfig {
    pub fn frame_rate(&self) -> FrameRate {
        FrameRate::new(self.frame_rate).unwrap_or_default()
    }
}

impl Validate for TimecodeConfig {
    fn validate(&mut self) {
        if FrameRate::new(self.frame_rate).is_none() {
            log::warn!(
                "TimecodeConfig: invalid frame rate {}, using {}",
                self.frame_rate,
                DEFAULT_FRAME_RATE
            );
            self.frame_rate = DEFAULT_FRAME_RATE;
        }
        self.frame_rate = self.frame_rate.min(240.0);
        self.cache_capacity = self.cache_capacity.clamp(1, 100_000);
    }
}

// =============================================================================
// Silence detection
// =============================================================================

/// Silence detection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SilenceConfig {
    /// Silence threshold in dBFS (range: -60 to -10). Default: -40
    pub threshold_db: f64,
    /// Shortest silence kept, in seconds (range: 0.1 to 5). Default: 0.5
    pub min_silence_duration: f64,
    /// Step used by add/remove padding, in seconds (range: 0.01 to 1). Default: 0.05
    pub padding: f64,
    /// Gaps up to this many seconds are merged. Default: 0.1
    pub merge_distance: f64,
}

impl Default for SilenceConfig {
    fn default() -> Self {
        Self {
            threshold_db: -40.0,
            min_silence_duration: 0.5,
            padding: 0.05,
            merge_distance: 0.1,
        }
    }
}

impl SilenceConfig {
    pub fn params(&self) -> SilenceParams {
        SilenceParams {
            threshold_db: self.threshold_db,
            min_silence_duration: self.min_silence_duration,
            merge_distance: self.merge_distance,
        }
    }
}

impl Validate for SilenceConfig {
    fn validate(&mut self) {
        let defaults = Self::default();
        self.threshold_db = clamp_or(self.threshold_db, -60.0, -10.0, defaults.threshold_db);
        self.min_silence_duration =
            clamp_or(self.min_silence_duration, 0.1, 5.0, defaults.min_silence_duration);
        self.padding = clamp_or(self.padding, 0.01, 1.0, defaults.padding);
        self.merge_distance = clamp_or(self.merge_distance, 0.0, 5.0, defaults.merge_distance);
    }
}

// =============================================================================
// Interaction
// =============================================================================

/// Pointer gesture and navigation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Smallest marker a resize may produce, in seconds. Default: 0.1
    pub min_marker_duration: f64,
    /// Minimum interval between handled pointer moves, in ms. Default: 16
    pub pointer_throttle_ms: f64,
    /// Tolerance for previous/next navigation, in seconds. Default: 0.1
    pub navigation_epsilon: f64,
    /// Fraction of a range added on each side when zooming onto it. Default: 0.1
    pub zoom_padding: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            min_marker_duration: MIN_MARKER_DURATION,
            pointer_throttle_ms: 16.0,
            navigation_epsilon: NAVIGATION_EPSILON,
            zoom_padding: DEFAULT_ZOOM_PADDING,
        }
    }
}

impl Validate for InteractionConfig {
    fn validate(&mut self) {
        let defaults = Self::default();
        self.min_marker_duration =
            clamp_or(self.min_marker_duration, 0.01, 10.0, defaults.min_marker_duration);
        self.pointer_throttle_ms =
            clamp_or(self.pointer_throttle_ms, 0.0, 1000.0, defaults.pointer_throttle_ms);
        self.navigation_epsilon =
            clamp_or(self.navigation_epsilon, 0.0, 5.0, defaults.navigation_epsilon);
        self.zoom_padding = clamp_or(self.zoom_padding, 0.0, 1.0, defaults.zoom_padding);
    }
}

// =============================================================================
// Playback
// =============================================================================

/// Clock arbitration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Seeks closer than this to the current time are skipped, in seconds. Default: 0.001
    pub seek_epsilon: f64,
    /// Window after a manual seek during which sync seeks are ignored, in ms. Default: 50
    pub seek_suppression_ms: f64,
    /// Waveform/media drift that triggers a resync, in seconds. Default: 0.01
    pub sync_epsilon: f64,
    /// Pause between regions when reviewing silences, in ms. Default: 500
    pub region_gap_ms: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            seek_epsilon: 0.001,
            seek_suppression_ms: 50.0,
            sync_epsilon: 0.01,
            region_gap_ms: 500.0,
        }
    }
}

impl Validate for PlaybackConfig {
    fn validate(&mut self) {
        let defaults = Self::default();
        self.seek_epsilon = clamp_or(self.seek_epsilon, 0.0, 1.0, defaults.seek_epsilon);
        self.seek_suppression_ms =
            clamp_or(self.seek_suppression_ms, 0.0, 1000.0, defaults.seek_suppression_ms);
        self.sync_epsilon = clamp_or(self.sync_epsilon, 0.0, 1.0, defaults.sync_epsilon);
        self.region_gap_ms = clamp_or(self.region_gap_ms, 0.0, 10_000.0, defaults.region_gap_ms);
    }
}

/// Clamp a value, replacing NaN with `fallback`
fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}
