//! Marker and selection gesture state machine
//!
//! One gesture runs at a time. Pointer-driven gestures (marker body drag,
//! marker resize, slider range drag) take pixel positions and convert the
//! movement to time with `Δt = Δpx / width_px * duration`. Slider handle
//! drags take slider values directly. Every step mirrors the active marker
//! into the selection and returns a [`GestureUpdate`] for observers.
//!
//! Releasing a gesture that touched an active marker re-sorts the store and
//! deselects the marker.

use crate::animation::PointerThrottle;
use crate::timeline::Timeline;
use crate::types::{Selection, MIN_MARKER_DURATION};
use crate::zoom::shift_slider_range;

/// Which slider handle is being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleSide {
    In,
    Out,
}

/// Part of a marker under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerZone {
    Body,
    LeftHandle,
    RightHandle,
}

/// Current gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// Whole slider range being moved
    SelectingRange,
    DraggingHandle(HandleSide),
    DraggingMarkerBody,
    ResizingLeft,
    ResizingRight,
}

impl GestureState {
    fn for_zone(zone: MarkerZone) -> Self {
        match zone {
            MarkerZone::Body => GestureState::DraggingMarkerBody,
            MarkerZone::LeftHandle => GestureState::ResizingLeft,
            MarkerZone::RightHandle => GestureState::ResizingRight,
        }
    }

    fn is_marker_gesture(&self) -> bool {
        matches!(
            self,
            GestureState::DraggingMarkerBody | GestureState::ResizingLeft | GestureState::ResizingRight
        )
    }
}

/// Result of pressing on a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressOutcome {
    /// Marker the caller must load (select, zoom, seek) first
    pub load: Option<usize>,
    /// Gesture now in progress
    pub gesture: GestureState,
}

/// State after one gesture step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureUpdate {
    pub selection: Selection,
    /// Slider handle values for the new selection
    pub slider: (f64, f64),
    /// Active marker that was changed
    pub marker: Option<usize>,
    /// Where the playhead should go
    pub seek: Option<f64>,
}

/// Result of releasing the pointer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReleaseOutcome {
    /// Last throttled move, applied before finalizing
    pub update: Option<GestureUpdate>,
    /// Store was re-sorted and the marker deselected
    pub finalized: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct RangeGrab {
    x: f64,
    values: (f64, f64),
    /// Relative playhead position inside the selection at drag start
    playhead_ratio: Option<f64>,
}

/// Gesture state machine
#[derive(Debug, Clone)]
pub struct MarkerInteraction {
    state: GestureState,
    last_x: f64,
    touched_active: bool,
    range: Option<RangeGrab>,
    throttle: PointerThrottle,
    min_duration: f64,
}

impl Default for MarkerInteraction {
    fn default() -> Self {
        Self::new(MIN_MARKER_DURATION, PointerThrottle::default())
    }
}

impl MarkerInteraction {
    pub fn new(min_duration: f64, throttle: PointerThrottle) -> Self {
        Self {
            state: GestureState::Idle,
            last_x: 0.0,
            touched_active: false,
            range: None,
            throttle,
            min_duration: min_duration.max(0.0),
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == GestureState::Idle
    }

    fn begin(&mut self, state: GestureState, x: f64, touched_active: bool) {
        self.state = state;
        self.last_x = x;
        self.touched_active = touched_active;
        self.range = None;
        self.throttle.reset();
        log::debug!("MarkerInteraction: begin {:?}", state);
    }

    // -------------------------------------------------------------------------
    // Gesture start
    // -------------------------------------------------------------------------

    /// Pointer pressed on marker `index`
    ///
    /// Pressing the body of an inactive marker only loads it; dragging needs a
    /// second press. Resize handles load and start resizing in one go.
    pub fn press_marker(
        &mut self,
        index: usize,
        zone: MarkerZone,
        x: f64,
        timeline: &Timeline,
    ) -> PressOutcome {
        if !timeline.is_loaded() || index >= timeline.markers.len() {
            return PressOutcome {
                load: None,
                gesture: self.state,
            };
        }

        let is_active = timeline.markers.active_index() == Some(index);
        let load = (!is_active).then_some(index);
        let gesture = GestureState::for_zone(zone);

        if !is_active && zone == MarkerZone::Body {
            self.state = GestureState::Idle;
            return PressOutcome {
                load,
                gesture: GestureState::Idle,
            };
        }

        self.begin(gesture, x, true);
        PressOutcome { load, gesture }
    }

    /// Slider handle grabbed
    pub fn begin_handle_drag(&mut self, side: HandleSide, timeline: &Timeline) {
        if timeline.is_loaded() {
            let touched = timeline.markers.active_index().is_some();
            self.begin(GestureState::DraggingHandle(side), 0.0, touched);
        }
    }

    /// Slider range grabbed between the handles
    pub fn begin_range_drag(&mut self, x: f64, playhead: f64, timeline: &Timeline) {
        if !timeline.is_loaded() {
            return;
        }
        let touched = timeline.markers.active_index().is_some();
        self.begin(GestureState::SelectingRange, x, touched);

        let sel = timeline.selection;
        let playhead_ratio = (sel.contains(playhead) && sel.duration() > 0.0)
            .then(|| (playhead - sel.start) / sel.duration());
        self.range = Some(RangeGrab {
            x,
            values: timeline.slider_values(),
            playhead_ratio,
        });
    }

    // -------------------------------------------------------------------------
    // Gesture steps
    // -------------------------------------------------------------------------

    /// Pointer moved to `x`; throttled
    ///
    /// `width_px` is the width of the element being dragged across: the
    /// timeline for marker gestures, the slider for range drags.
    pub fn move_pointer(
        &mut self,
        x: f64,
        now_ms: f64,
        width_px: f64,
        timeline: &mut Timeline,
    ) -> Option<GestureUpdate> {
        if self.is_idle() {
            return None;
        }
        let x = self.throttle.offer(x, now_ms)?;
        self.apply_pointer(x, width_px, timeline)
    }

    /// Slider handles moved to `values`
    pub fn drag_handle(&mut self, values: (f64, f64), timeline: &mut Timeline) -> Option<GestureUpdate> {
        let GestureState::DraggingHandle(side) = self.state else {
            return None;
        };
        let duration = timeline.duration()?;
        let mut sel = timeline.selection_from_slider(values)?;

        if self.touched_active {
            // Keep the active marker at least the minimum length
            match side {
                HandleSide::In => sel.start = sel.start.min(sel.end - self.min_duration).max(0.0),
                HandleSide::Out => {
                    sel.end = sel.end.max(sel.start + self.min_duration).min(duration)
                }
            }
        }

        timeline.selection = sel;
        let marker = self.mirror_selection_into_active(timeline);
        let seek = Some(match side {
            HandleSide::In => sel.start,
            HandleSide::Out => sel.end,
        });
        Some(GestureUpdate {
            selection: sel,
            slider: timeline.slider_values(),
            marker,
            seek,
        })
    }

    fn apply_pointer(&mut self, x: f64, width_px: f64, timeline: &mut Timeline) -> Option<GestureUpdate> {
        let duration = timeline.duration()?;
        if width_px <= 0.0 {
            return None;
        }

        match self.state {
            GestureState::SelectingRange => self.apply_range_drag(x, width_px, timeline),
            state if state.is_marker_gesture() => {
                let delta = (x - self.last_x) / width_px * duration;
                self.last_x = x;
                let min_duration = self.min_duration;
                let index = timeline.markers.active_index()?;
                let marker = timeline.markers.get_mut(index)?;
                let (start, end) = (marker.start(), marker.end());

                match state {
                    GestureState::DraggingMarkerBody => {
                        let length = marker.duration();
                        let new_start = (start + delta).min(duration - length).max(0.0);
                        marker.set_bounds(new_start, new_start + length);
                    }
                    GestureState::ResizingLeft => {
                        let new_start = (start + delta).min(end - min_duration).max(0.0);
                        marker.set_bounds(new_start, end);
                    }
                    _ => {
                        let new_end = (end + delta).max(start + min_duration).min(duration);
                        marker.set_bounds(start, new_end);
                    }
                }

                timeline.selection = Selection::new(marker.start(), marker.end());
                log::trace!(
                    "MarkerInteraction: {:?} -> {:.3}-{:.3}",
                    state,
                    timeline.selection.start,
                    timeline.selection.end
                );
                Some(GestureUpdate {
                    selection: timeline.selection,
                    slider: timeline.slider_values(),
                    marker: Some(index),
                    seek: None,
                })
            }
            _ => None,
        }
    }

    fn apply_range_drag(&mut self, x: f64, width_px: f64, timeline: &mut Timeline) -> Option<GestureUpdate> {
        let anchor = self.range?;
        let delta_pct = (x - anchor.x) / width_px * 100.0;
        let values = shift_slider_range(anchor.values, delta_pct);
        let sel = timeline.selection_from_slider(values)?;

        timeline.selection = sel;
        let marker = self.mirror_selection_into_active(timeline);
        let seek = Some(match anchor.playhead_ratio {
            Some(ratio) => sel.start + ratio * sel.duration(),
            None => sel.start,
        });
        Some(GestureUpdate {
            selection: sel,
            slider: values,
            marker,
            seek,
        })
    }

    fn mirror_selection_into_active(&self, timeline: &mut Timeline) -> Option<usize> {
        if !self.touched_active {
            return None;
        }
        let index = timeline.markers.active_index()?;
        let sel = timeline.selection;
        if sel.end > sel.start {
            timeline.markers.get_mut(index)?.set_bounds(sel.start, sel.end);
        }
        Some(index)
    }

    // -------------------------------------------------------------------------
    // Gesture end
    // -------------------------------------------------------------------------

    /// Pointer released or slider handle let go
    pub fn release(&mut self, width_px: f64, timeline: &mut Timeline) -> ReleaseOutcome {
        if self.is_idle() {
            return ReleaseOutcome::default();
        }

        let update = self
            .throttle
            .flush()
            .and_then(|x| self.apply_pointer(x, width_px, timeline));

        let finalized = self.touched_active && timeline.markers.active_index().is_some();
        if finalized {
            timeline.markers.sort_by_start();
            timeline.markers.set_active(None);
        }

        log::debug!(
            "MarkerInteraction: end {:?} (finalized={})",
            self.state,
            finalized
        );
        self.state = GestureState::Idle;
        self.touched_active = false;
        self.range = None;
        ReleaseOutcome { update, finalized }
    }

    /// Drop the current gesture without finalizing
    pub fn cancel(&mut self) {
        self.state = GestureState::Idle;
        self.touched_active = false;
        self.range = None;
        self.throttle.reset();
    }
}
