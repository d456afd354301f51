//! Zoom window and selection-slider mapping
//!
//! The selection slider always spans 0-100, but only represents the slice of
//! the timeline covered by the current [`ZoomWindow`] (itself a percentage of
//! the media duration). [`ZoomMapper`] converts between slider values and
//! absolute media time.

use crate::types::Selection;
use serde::{Deserialize, Serialize};

// =============================================================================
// Constants
// =============================================================================

/// Fraction of the requested range added on each side for a padded zoom
pub const DEFAULT_ZOOM_PADDING: f64 = 0.1;

/// Narrowest zoom window in percent of the media duration
pub const MIN_ZOOM_RANGE: f64 = 0.1;

/// Slider coordinate space upper bound
pub const SLIDER_MAX: f64 = 100.0;

// =============================================================================
// Zoom window
// =============================================================================

/// Slice of the timeline mapped onto the selection slider, in percent
///
/// Always satisfies `0 <= start < end <= 100`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomWindow {
    start: f64,
    end: f64,
}

impl Default for ZoomWindow {
    fn default() -> Self {
        Self::FULL
    }
}

impl ZoomWindow {
    /// The whole timeline
    pub const FULL: ZoomWindow = ZoomWindow {
        start: 0.0,
        end: 100.0,
    };

    /// Build a window, clamping into `[0, 100]` and widening degenerate ranges
    pub fn new(start: f64, end: f64) -> Self {
        let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
        let lo = if lo.is_finite() { lo.clamp(0.0, 100.0) } else { 0.0 };
        let hi = if hi.is_finite() { hi.clamp(0.0, 100.0) } else { 100.0 };

        if hi - lo >= MIN_ZOOM_RANGE {
            return Self { start: lo, end: hi };
        }

        // Widen around the centre, shifting back inside the bounds at the edges
        let centre = (lo + hi) / 2.0;
        let half = MIN_ZOOM_RANGE / 2.0;
        let start = (centre - half).clamp(0.0, 100.0 - MIN_ZOOM_RANGE);
        Self {
            start,
            end: start + MIN_ZOOM_RANGE,
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// Width of the window in percent
    pub fn range(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_full(&self) -> bool {
        self.start <= 0.0 && self.end >= 100.0
    }
}

// =============================================================================
// Mapper
// =============================================================================

/// Converts between selection-slider values and absolute media time
#[derive(Debug, Clone)]
pub struct ZoomMapper {
    window: ZoomWindow,
    padding: f64,
}

impl Default for ZoomMapper {
    fn default() -> Self {
        Self::new(DEFAULT_ZOOM_PADDING)
    }
}

impl ZoomMapper {
    /// Create a mapper with the given padding fraction for padded zooms
    pub fn new(padding: f64) -> Self {
        Self {
            window: ZoomWindow::FULL,
            padding: padding.max(0.0),
        }
    }

    /// Current zoom window
    pub fn window(&self) -> ZoomWindow {
        self.window
    }

    /// Slider value (0-100) to absolute seconds
    pub fn slider_to_time(&self, value: f64, duration: f64) -> f64 {
        if duration <= 0.0 {
            return 0.0;
        }
        let value = value.clamp(0.0, SLIDER_MAX);
        (value / 100.0) * duration * (self.window.range() / 100.0)
            + duration * (self.window.start / 100.0)
    }

    /// Absolute seconds to a slider value, clamped to 0-100
    ///
    /// Times outside the zoom window pin to the nearest slider end.
    pub fn time_to_slider(&self, time: f64, duration: f64) -> f64 {
        if duration <= 0.0 {
            return 0.0;
        }
        let percent = (time / duration) * 100.0;
        ((percent - self.window.start) / self.window.range() * 100.0).clamp(0.0, SLIDER_MAX)
    }

    /// Slider handle positions for a selection
    pub fn selection_to_slider(&self, selection: &Selection, duration: f64) -> (f64, f64) {
        (
            self.time_to_slider(selection.start, duration),
            self.time_to_slider(selection.end, duration),
        )
    }

    /// Selection described by a pair of slider handle values
    pub fn slider_to_selection(&self, values: (f64, f64), duration: f64) -> Selection {
        let (a, b) = if values.0 <= values.1 {
            values
        } else {
            (values.1, values.0)
        };
        Selection::new(
            self.slider_to_time(a, duration),
            self.slider_to_time(b, duration),
        )
    }

    /// Set the zoom window from percentages of the duration
    ///
    /// With `with_padding`, the window grows on both sides by the padding
    /// fraction of its own range before clamping to `[0, 100]`.
    pub fn update_zoom(&mut self, start_pct: f64, end_pct: f64, with_padding: bool) -> ZoomWindow {
        let (mut start, mut end) = (start_pct, end_pct);
        if with_padding {
            let pad = (end - start).abs() * self.padding;
            start -= pad;
            end += pad;
        }
        self.window = ZoomWindow::new(start, end);
        log::trace!(
            "update_zoom: {:.3}% - {:.3}% (padded={})",
            self.window.start,
            self.window.end,
            with_padding
        );
        self.window
    }

    /// Zoom onto an absolute time range
    pub fn focus(&mut self, start: f64, end: f64, duration: f64, with_padding: bool) -> ZoomWindow {
        if duration <= 0.0 {
            return self.window;
        }
        self.update_zoom(
            start / duration * 100.0,
            end / duration * 100.0,
            with_padding,
        )
    }

    /// Back to the full timeline
    pub fn reset(&mut self) {
        self.window = ZoomWindow::FULL;
    }
}

/// Shift a pair of slider values by `delta`, preserving their width
///
/// The range stops at either end of the slider rather than shrinking.
pub fn shift_slider_range(values: (f64, f64), delta: f64) -> (f64, f64) {
    let width = (values.1 - values.0).abs().min(SLIDER_MAX);
    let start = (values.0.min(values.1) + delta).clamp(0.0, SLIDER_MAX - width);
    (start, start + width)
}
