//! SMPTE-style timecode conversion
//!
//! Converts between seconds and `HH:MM:SS:FF` strings for a given frame rate.
//! Formatting is called on every playhead update, so [`TimecodeConverter`]
//! keeps a small cache keyed by millisecond-rounded time and frame rate. The
//! cache is cleared wholesale once it grows past its capacity.

use crate::error::{TimecodeError, TimecodeResult};
use crate::types::FrameRate;
use std::collections::HashMap;

/// Default number of cached conversions before the cache is reset
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Tolerance absorbing float error when extracting the frame field
const FRAME_EPSILON: f64 = 1e-9;

/// Format seconds as `HH:MM:SS:FF`
///
/// Negative and non-finite input formats as `00:00:00:00`. The frame field is
/// the floor of the fractional second times the frame rate, so it never
/// reaches the frame rate itself.
pub fn to_timecode(seconds: f64, frame_rate: FrameRate) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "00:00:00:00".to_string();
    }

    let whole = seconds.floor();
    let total = whole as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    let fps = frame_rate.fps();
    let max_frame = (fps.ceil() as u64).saturating_sub(1);
    let frames = (((seconds - whole) * fps + FRAME_EPSILON).floor() as u64).min(max_frame);

    format!("{:02}:{:02}:{:02}:{:02}", hours, minutes, secs, frames)
}

/// Parse an `HH:MM:SS:FF` string back into seconds
///
/// Requires exactly four colon-delimited non-negative integer fields. The
/// frame field is divided by the frame rate.
pub fn parse_timecode(text: &str, frame_rate: FrameRate) -> TimecodeResult<f64> {
    let parts: Vec<&str> = text.trim().split(':').collect();
    if parts.len() != 4 {
        return Err(TimecodeError::FieldCount(parts.len()));
    }

    let mut fields = [0u64; 4];
    for (slot, part) in fields.iter_mut().zip(parts.iter()) {
        *slot = part
            .trim()
            .parse::<u64>()
            .map_err(|_| TimecodeError::InvalidField(part.to_string()))?;
    }
    let [hours, minutes, secs, frames] = fields;

    let whole = hours
        .checked_mul(3600)
        .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
        .and_then(|hm| hm.checked_add(secs))
        .ok_or_else(|| TimecodeError::InvalidField(text.trim().to_string()))?;
    Ok(whole as f64 + frames as f64 / frame_rate.fps())
}

/// Cached timecode formatter
#[derive(Debug, Clone)]
pub struct TimecodeConverter {
    cache: HashMap<(i64, u64), String>,
    capacity: usize,
}

impl Default for TimecodeConverter {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl TimecodeConverter {
    /// Create a converter whose cache resets after `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Format seconds, reusing a cached string when one exists
    pub fn format(&mut self, seconds: f64, frame_rate: FrameRate) -> String {
        if !seconds.is_finite() {
            return to_timecode(seconds, frame_rate);
        }

        let key = ((seconds * 1000.0).round() as i64, frame_rate.fps().to_bits());
        if let Some(cached) = self.cache.get(&key) {
            return cached.clone();
        }

        let formatted = to_timecode(seconds, frame_rate);
        if self.cache.len() >= self.capacity {
            log::trace!("TimecodeConverter: cache full ({}), clearing", self.cache.len());
            self.cache.clear();
        }
        self.cache.insert(key, formatted.clone());
        formatted
    }

    /// Parse a timecode (uncached)
    pub fn parse(&self, text: &str, frame_rate: FrameRate) -> TimecodeResult<f64> {
        parse_timecode(text, frame_rate)
    }

    /// Drop all cached conversions
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Number of cached entries
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}
