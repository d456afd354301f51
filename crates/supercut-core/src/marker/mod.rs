//! Marker regions and the store that owns them
//!
//! A [`Marker`] is a named time range on the timeline. Markers are created
//! explicitly, by silence detection, or by project import, and live in a
//! [`MarkerStore`] kept sorted by start time.

mod store;

pub use store::{MarkerHandle, MarkerStore, NavDirection};

use serde::{Deserialize, Serialize};

/// A text annotation attached to a marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A named time range on the timeline
///
/// Bounds are only changed through [`Marker::set_bounds`] so that
/// `duration == end - start` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    start: f64,
    end: f64,
    duration: f64,
    /// Annotations, the first one is shown as the marker's label
    pub comments: Vec<Comment>,
    /// Created by silence detection
    pub is_silent: bool,
}

impl Marker {
    /// Create a plain marker with no comments
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            duration: end - start,
            comments: Vec::new(),
            is_silent: false,
        }
    }

    /// Create a silent-region marker labelled `"Silent region {number}"`
    pub fn silent(start: f64, end: f64, number: usize) -> Self {
        Self {
            comments: vec![Comment::new(format!("Silent region {}", number))],
            is_silent: true,
            ..Self::new(start, end)
        }
    }

    /// Builder-style label
    pub fn with_label(mut self, text: &str) -> Self {
        self.set_label(text);
        self
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

    /// Replace both bounds and recompute the duration
    pub fn set_bounds(&mut self, start: f64, end: f64) {
        self.start = start;
        self.end = end;
        self.duration = end - start;
    }

    /// Text of the first comment
    pub fn label(&self) -> Option<&str> {
        self.comments.first().map(|c| c.text.as_str())
    }

    /// Set the first comment; empty or whitespace-only text clears all comments
    pub fn set_label(&mut self, text: &str) {
        if text.trim().is_empty() {
            self.comments.clear();
        } else if let Some(first) = self.comments.first_mut() {
            first.text = text.to_string();
        } else {
            self.comments.push(Comment::new(text));
        }
    }

    /// Clamp the bounds into `[0, duration]`
    ///
    /// Returns `None` when nothing of the marker is left inside the media.
    pub fn clamped_to(mut self, duration: f64) -> Option<Self> {
        let start = self.start.clamp(0.0, duration);
        let end = self.end.clamp(0.0, duration);
        if end <= start {
            return None;
        }
        self.set_bounds(start, end);
        Some(self)
    }

    /// Whether `time` lies inside the marker (inclusive)
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_to_media() {
        let marker = Marker::new(96.0, 110.0).with_label("tail");
        let clamped = marker.clamped_to(100.0).unwrap();
        assert_eq!((clamped.start(), clamped.end(), clamped.duration()), (96.0, 100.0, 4.0));
        assert_eq!(clamped.label(), Some("tail"));

        assert!(Marker::new(110.0, 120.0).clamped_to(100.0).is_none());
        assert!(Marker::new(100.0, 120.0).clamped_to(100.0).is_none());
    }

    #[test]
    fn test_duration_follows_bounds() {
        let mut m = Marker::new(10.0, 20.0);
        assert!((m.duration() - 10.0).abs() < 1e-9);
        m.set_bounds(12.5, 30.0);
        assert!((m.duration() - 17.5).abs() < 1e-9);
    }

    #[test]
    fn test_silent_marker_label() {
        let m = Marker::silent(1.0, 2.0, 3);
        assert!(m.is_silent);
        assert_eq!(m.label(), Some("Silent region 3"));
    }

    #[test]
    fn test_set_label() {
        let mut m = Marker::new(0.0, 1.0);
        assert_eq!(m.label(), None);
        m.set_label("Intro");
        assert_eq!(m.label(), Some("Intro"));
        m.set_label("Verse");
        assert_eq!(m.comments.len(), 1);
        assert_eq!(m.label(), Some("Verse"));
        m.set_label("   ");
        assert!(m.comments.is_empty());
    }
}
