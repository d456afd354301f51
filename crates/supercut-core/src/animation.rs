//! Redraw scheduling and pointer-move throttling
//!
//! The playhead is redrawn from a single self-rescheduling frame callback
//! that only runs while playing. Pointer moves during gestures are thinned
//! to roughly display rate, but the last position is never lost: it is
//! delivered on release.

/// Interval between playhead redraws (60 Hz)
pub const REDRAW_INTERVAL_MS: f64 = 1000.0 / 60.0;

/// Default interval between handled pointer moves
pub const POINTER_THROTTLE_MS: f64 = 16.0;

/// Outcome of one animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    /// Draw the playhead now
    pub redraw: bool,
    /// Another frame has been requested
    pub rescheduled: bool,
}

/// At-most-one pending frame callback
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    pending: bool,
    last_redraw_ms: Option<f64>,
    interval_ms: f64,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(REDRAW_INTERVAL_MS)
    }
}

impl FrameScheduler {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            pending: false,
            last_redraw_ms: None,
            interval_ms: interval_ms.max(0.0),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Request a frame; no-op when one is already pending or playback is paused
    pub fn request(&mut self, playing: bool) -> bool {
        if self.pending || !playing {
            return false;
        }
        self.pending = true;
        true
    }

    /// Run the pending frame
    ///
    /// Redraws at most once per interval and reschedules only while playing.
    pub fn tick(&mut self, now_ms: f64, playing: bool) -> FrameTick {
        self.pending = false;
        if !playing {
            return FrameTick {
                redraw: false,
                rescheduled: false,
            };
        }

        let redraw = self
            .last_redraw_ms
            .map_or(true, |last| now_ms - last >= self.interval_ms);
        if redraw {
            self.last_redraw_ms = Some(now_ms);
        }
        self.pending = true;
        FrameTick {
            redraw,
            rescheduled: true,
        }
    }

    /// Playback paused: drop the pending frame
    ///
    /// The caller draws the final playhead position itself, once.
    pub fn on_pause(&mut self) {
        self.pending = false;
        self.last_redraw_ms = None;
    }
}

/// Thins pointer moves to one per interval without dropping the last one
#[derive(Debug, Clone)]
pub struct PointerThrottle {
    interval_ms: f64,
    last_accepted_ms: Option<f64>,
    pending: Option<f64>,
}

impl Default for PointerThrottle {
    fn default() -> Self {
        Self::new(POINTER_THROTTLE_MS)
    }
}

impl PointerThrottle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(0.0),
            last_accepted_ms: None,
            pending: None,
        }
    }

    /// Offer a pointer position; returns it when it should be handled now
    pub fn offer(&mut self, x: f64, now_ms: f64) -> Option<f64> {
        let due = self
            .last_accepted_ms
            .map_or(true, |last| now_ms - last >= self.interval_ms);
        if due {
            self.last_accepted_ms = Some(now_ms);
            self.pending = None;
            Some(x)
        } else {
            self.pending = Some(x);
            None
        }
    }

    /// Position held back by the throttle, if any
    pub fn flush(&mut self) -> Option<f64> {
        self.pending.take()
    }

    /// Start a fresh gesture
    pub fn reset(&mut self) {
        self.last_accepted_ms = None;
        self.pending = None;
    }
}
