//! Silence detection over an amplitude series
//!
//! Scans per-sample (or per-peak) amplitudes for runs below a dB threshold,
//! keeps runs at least `min_silence_duration` long and merges runs separated
//! by no more than `merge_distance`. Everything here is a pure function of
//! its inputs.

use serde::Serialize;

/// Detection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilenceParams {
    /// Amplitudes quieter than this (in dBFS) count as silence
    pub threshold_db: f64,
    /// Shortest run kept, in seconds
    pub min_silence_duration: f64,
    /// Runs whose gap is at most this many seconds are merged
    pub merge_distance: f64,
}

impl Default for SilenceParams {
    fn default() -> Self {
        Self {
            threshold_db: -40.0,
            min_silence_duration: 0.5,
            merge_distance: 0.1,
        }
    }
}

/// A detected silent time range in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SilentRegion {
    start: f64,
    end: f64,
    duration: f64,
}

impl SilentRegion {
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            duration: end - start,
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }
}

/// Convert a dBFS value to linear amplitude
pub fn db_to_linear(db: f64) -> f64 {
    10f64.powf(db / 20.0)
}

/// Find silent regions in an amplitude series
///
/// Sample `i` sits at `i * duration / samples.len()` seconds. A run still
/// open at the end of the series closes at `duration`. Returns an empty list
/// when there are no samples or the duration is unknown.
pub fn detect_silence(samples: &[f32], duration: f64, params: &SilenceParams) -> Vec<SilentRegion> {
    if samples.is_empty() || !(duration.is_finite() && duration > 0.0) {
        log::warn!(
            "detect_silence: no amplitude data ({} samples, duration {})",
            samples.len(),
            duration
        );
        return Vec::new();
    }

    let runs = find_silent_runs(samples, duration, params);
    let regions = merge_regions(&runs, params.merge_distance);

    log::info!(
        "detect_silence: {} runs, {} regions after merge (threshold {:.1} dB, min {:.2}s)",
        runs.len(),
        regions.len(),
        params.threshold_db,
        params.min_silence_duration
    );
    regions
}

/// Sub-threshold runs that meet the minimum duration, before merging
pub fn find_silent_runs(samples: &[f32], duration: f64, params: &SilenceParams) -> Vec<SilentRegion> {
    if samples.is_empty() || duration <= 0.0 {
        return Vec::new();
    }

    let linear = db_to_linear(params.threshold_db);
    let scale = duration / samples.len() as f64;
    let mut runs = Vec::new();
    let mut run_start: Option<usize> = None;

    let close_run = |start: usize, end_time: f64, runs: &mut Vec<SilentRegion>| {
        let start_time = start as f64 * scale;
        if end_time - start_time >= params.min_silence_duration {
            runs.push(SilentRegion::new(start_time, end_time));
        }
    };

    for (i, &amplitude) in samples.iter().enumerate() {
        // NaN compares false and ends a run like a loud sample
        if (amplitude.abs() as f64) < linear {
            run_start.get_or_insert(i);
        } else if let Some(start) = run_start.take() {
            close_run(start, i as f64 * scale, &mut runs);
        }
    }

    if let Some(start) = run_start {
        close_run(start, duration, &mut runs);
    }

    runs
}

/// Merge regions whose gap is at most `merge_distance`
///
/// Input must be ordered by start; the output keeps that order.
pub fn merge_regions(regions: &[SilentRegion], merge_distance: f64) -> Vec<SilentRegion> {
    let mut merged: Vec<SilentRegion> = Vec::with_capacity(regions.len());
    for region in regions {
        match merged.last_mut() {
            Some(last) if region.start - last.end <= merge_distance => {
                *last = SilentRegion::new(last.start, last.end.max(region.end));
            }
            _ => merged.push(*region),
        }
    }
    merged
}
