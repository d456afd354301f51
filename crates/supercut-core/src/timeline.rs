//! Shared timeline model
//!
//! Bundles the state every editing operation reads and writes: the media
//! duration, the current selection, the zoom window and the marker store.
//! Before a duration is known, every time-based operation is a no-op.

use crate::marker::MarkerStore;
use crate::types::Selection;
use crate::zoom::{ZoomMapper, ZoomWindow};

/// Media duration, selection, zoom and markers
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    duration: Option<f64>,
    pub selection: Selection,
    pub zoom: ZoomMapper,
    pub markers: MarkerStore,
}

impl Timeline {
    pub fn new(zoom_padding: f64) -> Self {
        Self {
            duration: None,
            selection: Selection::default(),
            zoom: ZoomMapper::new(zoom_padding),
            markers: MarkerStore::new(),
        }
    }

    /// Reset for newly loaded media
    ///
    /// Selection covers the whole media, zoom returns to full and markers
    /// are dropped (they come back only through an explicit import).
    pub fn load_media(&mut self, duration: Option<f64>) {
        self.duration = duration.filter(|d| d.is_finite() && *d > 0.0);
        self.selection = Selection::full(self.duration.unwrap_or(0.0));
        self.zoom.reset();
        self.markers.clear();
        log::info!("Timeline::load_media: duration {:?}", self.duration);
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn is_loaded(&self) -> bool {
        self.duration.is_some()
    }

    pub fn zoom_window(&self) -> ZoomWindow {
        self.zoom.window()
    }

    /// Set the selection, ordered and clamped to the media
    pub fn set_selection(&mut self, start: f64, end: f64) -> Option<Selection> {
        let duration = self.duration?;
        let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
        self.selection = Selection::new(lo.clamp(0.0, duration), hi.clamp(0.0, duration));
        Some(self.selection)
    }

    /// Selection back to the full media
    pub fn reset_selection(&mut self) {
        self.selection = Selection::full(self.duration.unwrap_or(0.0));
    }

    /// Slider handle positions for the current selection
    pub fn slider_values(&self) -> (f64, f64) {
        self.zoom
            .selection_to_slider(&self.selection, self.duration.unwrap_or(0.0))
    }

    /// Selection described by slider handle values
    pub fn selection_from_slider(&self, values: (f64, f64)) -> Option<Selection> {
        let duration = self.duration?;
        Some(self.zoom.slider_to_selection(values, duration))
    }

    /// Zoom onto the current selection
    pub fn focus_selection(&mut self, with_padding: bool) {
        if let Some(duration) = self.duration {
            let sel = self.selection;
            self.zoom.focus(sel.start, sel.end, duration, with_padding);
        }
    }
}
