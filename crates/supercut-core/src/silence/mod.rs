//! Silence detection engine
//!
//! - [`detect`]: pure scan/merge over an amplitude series
//! - [`adjust`]: bulk boundary fine-tuning and padding
//! - [`session`]: detection workflow that materializes silent markers
//! - [`playlist`]: sequential playback of every silent region

pub mod adjust;
pub mod detect;
pub mod playlist;
pub mod session;

pub use adjust::{
    adjust_all_regions, adjust_bounds, adjust_silent_markers, pad_regions, unpad_regions,
    RegionBoundary, BOUNDARY_EPSILON,
};
pub use detect::{db_to_linear, detect_silence, find_silent_runs, merge_regions, SilenceParams, SilentRegion};
pub use playlist::{PlaylistAction, SilencePlaylist, DEFAULT_REGION_GAP_MS};
pub use session::{clear_silent_markers, DetectionStatus, SilenceSession};
