//! Silence detection workflow state
//!
//! [`SilenceSession`] owns the user-facing detection parameters and guards
//! against overlapping runs. A run replaces any previously detected silent
//! markers with one marker per detected region.

use super::detect::{detect_silence, SilenceParams};
use crate::config::{SilenceConfig, Validate};
use crate::marker::{Marker, MarkerStore};
use std::fmt;

/// Outcome of a detection request, shown to the user as a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionStatus {
    /// Detection ran and produced this many regions
    Found(usize),
    /// Detection ran and found nothing
    NoneFound,
    /// No waveform/amplitude data available yet
    WaveformNotReady,
    /// A run is already pending
    Busy,
}

impl fmt::Display for DetectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionStatus::Found(1) => write!(f, "Found 1 silent region."),
            DetectionStatus::Found(n) => write!(f, "Found {} silent regions.", n),
            DetectionStatus::NoneFound => {
                write!(f, "No silent regions found with the current settings.")
            }
            DetectionStatus::WaveformNotReady => {
                write!(f, "Please load a video with a waveform first.")
            }
            DetectionStatus::Busy => write!(f, "Silence detection is already running."),
        }
    }
}

/// Detection parameters plus the pending-run guard
#[derive(Debug, Clone)]
pub struct SilenceSession {
    config: SilenceConfig,
    pending: bool,
    last_status: Option<DetectionStatus>,
}

impl Default for SilenceSession {
    fn default() -> Self {
        Self::new(SilenceConfig::default())
    }
}

impl SilenceSession {
    pub fn new(mut config: SilenceConfig) -> Self {
        config.validate();
        Self {
            config,
            pending: false,
            last_status: None,
        }
    }

    pub fn config(&self) -> &SilenceConfig {
        &self.config
    }

    /// Update the threshold, clamped to the supported range
    pub fn set_threshold_db(&mut self, db: f64) {
        self.config.threshold_db = db;
        self.config.validate();
    }

    /// Update the minimum silence duration, clamped to the supported range
    pub fn set_min_silence_duration(&mut self, seconds: f64) {
        self.config.min_silence_duration = seconds;
        self.config.validate();
    }

    /// Update the padding step, clamped to the supported range
    pub fn set_padding(&mut self, seconds: f64) {
        self.config.padding = seconds;
        self.config.validate();
    }

    pub fn params(&self) -> SilenceParams {
        self.config.params()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn last_status(&self) -> Option<DetectionStatus> {
        self.last_status
    }

    /// Reserve a detection run
    ///
    /// Refused with [`DetectionStatus::Busy`] while a run is pending, and with
    /// [`DetectionStatus::WaveformNotReady`] when there is nothing to scan.
    pub fn request(&mut self, waveform_ready: bool) -> Result<(), DetectionStatus> {
        if self.pending {
            log::debug!("SilenceSession::request: refused, run already pending");
            return Err(DetectionStatus::Busy);
        }
        if !waveform_ready {
            self.last_status = Some(DetectionStatus::WaveformNotReady);
            return Err(DetectionStatus::WaveformNotReady);
        }
        self.pending = true;
        Ok(())
    }

    /// Execute a reserved run against the marker store
    ///
    /// Clears earlier silent markers, then adds one silent marker per detected
    /// region. The pending flag is released whatever the outcome.
    pub fn run(
        &mut self,
        samples: Option<&[f32]>,
        duration: Option<f64>,
        store: &mut MarkerStore,
    ) -> DetectionStatus {
        self.pending = false;

        let status = match (samples, duration) {
            (Some(samples), Some(duration)) if !samples.is_empty() && duration > 0.0 => {
                let regions = detect_silence(samples, duration, &self.params());
                clear_silent_markers(store);
                for (index, region) in regions.iter().enumerate() {
                    store.add(Marker::silent(region.start(), region.end(), index + 1));
                }
                if regions.is_empty() {
                    DetectionStatus::NoneFound
                } else {
                    DetectionStatus::Found(regions.len())
                }
            }
            _ => DetectionStatus::WaveformNotReady,
        };

        log::info!("SilenceSession::run: {}", status);
        self.last_status = Some(status);
        status
    }
}

/// Remove every silent marker, returning how many were removed
pub fn clear_silent_markers(store: &mut MarkerStore) -> usize {
    let removed = store.retain(|m| !m.is_silent);
    if removed > 0 {
        log::debug!("clear_silent_markers: removed {}", removed);
    }
    removed
}
