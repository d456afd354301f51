//! Waveform peaks payload
//!
//! Pre-computed peaks arrive as JSON `{ "bits": 8, "data": [...] }` where
//! `data` is either one flat series or one series per channel. Values are
//! signed integers at the given bit depth and are normalized to `-1.0..=1.0`.

use crate::error::{PeaksError, PeaksResult};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PeakData {
    Channels(Vec<Vec<f64>>),
    Flat(Vec<f64>),
}

#[derive(Debug, Deserialize)]
struct PeaksPayload {
    #[serde(default)]
    bits: Option<u32>,
    #[serde(default)]
    data: Option<PeakData>,
}

/// Normalized amplitude series used for display and silence detection
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformPeaks {
    samples: Vec<f32>,
    bits: u32,
}

impl WaveformPeaks {
    /// Wrap an already-normalized series
    pub fn from_samples(samples: Vec<f32>) -> Self {
        Self { samples, bits: 32 }
    }

    /// Decode a peaks JSON payload
    ///
    /// Multi-channel data uses the first channel. A missing `bits` field
    /// defaults to 8.
    pub fn from_json(json: &str) -> PeaksResult<Self> {
        let payload: PeaksPayload = serde_json::from_str(json)?;
        let bits = payload.bits.unwrap_or(8);
        if !(1..=32).contains(&bits) {
            return Err(PeaksError::InvalidBits(bits));
        }

        let raw = match payload.data {
            Some(PeakData::Flat(values)) => values,
            Some(PeakData::Channels(channels)) => channels.into_iter().next().unwrap_or_default(),
            None => Vec::new(),
        };
        if raw.is_empty() {
            return Err(PeaksError::MissingData);
        }

        let scale = 2f64.powi(bits as i32 - 1);
        let samples = raw.iter().map(|&v| (v / scale) as f32).collect();

        log::info!(
            "WaveformPeaks::from_json: {} peaks at {} bits",
            raw.len(),
            bits
        );
        Ok(Self { samples, bits })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
