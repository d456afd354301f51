//! Bulk fine-tuning of silent regions
//!
//! Shifts one boundary of every silent region by the same delta, clamped so
//! regions keep a minimum width and stay inside the media. Used directly for
//! the start/end nudge controls and twice in a row for padding.

use super::detect::SilentRegion;
use crate::marker::MarkerStore;

/// Smallest width a region may be squeezed to, in seconds
pub const BOUNDARY_EPSILON: f64 = 0.01;

/// Which edge of a region to move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionBoundary {
    Start,
    End,
}

/// Move one boundary of `(start, end)` by `delta`
///
/// Start stays within `[0, end - ε]`, end within `[start + ε, duration]`.
pub fn adjust_bounds(
    start: f64,
    end: f64,
    boundary: RegionBoundary,
    delta: f64,
    duration: f64,
) -> (f64, f64) {
    match boundary {
        RegionBoundary::Start => (
            (start + delta).min(end - BOUNDARY_EPSILON).max(0.0),
            end,
        ),
        RegionBoundary::End => (
            start,
            (end + delta).min(duration).max(start + BOUNDARY_EPSILON),
        ),
    }
}

/// Move one boundary of every region by `delta`
pub fn adjust_all_regions(
    regions: &[SilentRegion],
    boundary: RegionBoundary,
    delta: f64,
    duration: f64,
) -> Vec<SilentRegion> {
    regions
        .iter()
        .map(|r| {
            let (start, end) = adjust_bounds(r.start(), r.end(), boundary, delta, duration);
            SilentRegion::new(start, end)
        })
        .collect()
}

/// Grow every region by `padding` on both sides
pub fn pad_regions(regions: &[SilentRegion], padding: f64, duration: f64) -> Vec<SilentRegion> {
    let widened = adjust_all_regions(regions, RegionBoundary::Start, -padding, duration);
    adjust_all_regions(&widened, RegionBoundary::End, padding, duration)
}

/// Shrink every region by `padding` on both sides
pub fn unpad_regions(regions: &[SilentRegion], padding: f64, duration: f64) -> Vec<SilentRegion> {
    let narrowed = adjust_all_regions(regions, RegionBoundary::Start, padding, duration);
    adjust_all_regions(&narrowed, RegionBoundary::End, -padding, duration)
}

/// Apply [`adjust_bounds`] to every silent marker in the store
///
/// Returns the number of markers touched. The store is re-sorted since
/// moving starts can reorder silent markers against regular ones.
pub fn adjust_silent_markers(
    store: &mut MarkerStore,
    boundary: RegionBoundary,
    delta: f64,
    duration: f64,
) -> usize {
    let mut touched = 0;
    for index in 0..store.len() {
        if let Some(marker) = store.get_mut(index).filter(|m| m.is_silent) {
            let (start, end) =
                adjust_bounds(marker.start(), marker.end(), boundary, delta, duration);
            marker.set_bounds(start, end);
            touched += 1;
        }
    }
    if touched > 0 {
        store.sort_by_start();
    }
    log::debug!(
        "adjust_silent_markers: {:?} {:+.3}s on {} markers",
        boundary,
        delta,
        touched
    );
    touched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::Marker;

    #[test]
    fn test_adjust_start_clamps() {
        assert_eq!(adjust_bounds(1.0, 2.0, RegionBoundary::Start, -0.5, 10.0), (0.5, 2.0));
        assert_eq!(adjust_bounds(0.2, 2.0, RegionBoundary::Start, -0.5, 10.0), (0.0, 2.0));
        let (start, _) = adjust_bounds(1.0, 2.0, RegionBoundary::Start, 5.0, 10.0);
        assert!((start - 1.99).abs() < 1e-9);
    }

    #[test]
    fn test_adjust_end_clamps() {
        assert_eq!(adjust_bounds(1.0, 2.0, RegionBoundary::End, 0.5, 10.0), (1.0, 2.5));
        assert_eq!(adjust_bounds(1.0, 9.8, RegionBoundary::End, 0.5, 10.0), (1.0, 10.0));
        let (_, end) = adjust_bounds(1.0, 2.0, RegionBoundary::End, -5.0, 10.0);
        assert!((end - 1.01).abs() < 1e-9);
    }

    #[test]
    fn test_adjust_all_recomputes_duration() {
        let regions = vec![SilentRegion::new(1.0, 2.0), SilentRegion::new(5.0, 7.0)];
        let adjusted = adjust_all_regions(&regions, RegionBoundary::End, 0.25, 10.0);
        assert!((adjusted[0].duration() - 1.25).abs() < 1e-9);
        assert!((adjusted[1].duration() - 2.25).abs() < 1e-9);
    }

    #[test]
    fn test_pad_and_unpad() {
        let regions = vec![SilentRegion::new(1.0, 2.0)];
        let padded = pad_regions(&regions, 0.1, 10.0);
        assert!((padded[0].start() - 0.9).abs() < 1e-9);
        assert!((padded[0].end() - 2.1).abs() < 1e-9);

        let restored = unpad_regions(&padded, 0.1, 10.0);
        assert!((restored[0].start() - 1.0).abs() < 1e-9);
        assert!((restored[0].end() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_adjust_only_silent_markers() {
        let mut store = MarkerStore::new();
        store.add(Marker::new(1.0, 2.0));
        store.add(Marker::silent(4.0, 5.0, 1));
        let touched = adjust_silent_markers(&mut store, RegionBoundary::Start, -0.5, 10.0);
        assert_eq!(touched, 1);
        assert_eq!(store.get(0).unwrap().start(), 1.0);
        assert!((store.get(1).unwrap().start() - 3.5).abs() < 1e-9);
        assert!((store.get(1).unwrap().duration() - 1.5).abs() < 1e-9);
    }
}
