//! Supercut Core - Timeline, marker and silence-detection engine for the video editor
//!
//! The UI layer feeds pointer, keyboard and media events into [`editor::Editor`]
//! and redraws from the [`editor::EditorEvent`]s it queues.

pub mod animation;
pub mod config;
pub mod editor;
pub mod error;
pub mod fps;
pub mod interaction;
pub mod marker;
pub mod peaks;
pub mod playback;
pub mod project;
pub mod silence;
pub mod timecode;
pub mod timeline;
pub mod types;
pub mod zoom;

pub use editor::{Editor, EditorEvent, RangeAnchor};
pub use types::*;
