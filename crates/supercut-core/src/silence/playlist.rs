//! Sequential review of silent regions
//!
//! Plays every silent marker in timeline order. Each region plays until the
//! playhead reaches its end or playback pauses, then a short gap elapses
//! before the next one starts. After the last region playback is paused.
//!
//! The playlist is polled with the current playhead and a millisecond
//! timestamp; it returns the action the caller should perform.

use crate::marker::MarkerStore;
use crate::types::Selection;

/// Pause between two regions, in milliseconds
pub const DEFAULT_REGION_GAP_MS: f64 = 500.0;

/// What the caller should do after a poll
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaylistAction {
    /// Select this range, seek to its start and play
    PlayRegion { index: usize, selection: Selection },
    /// Nothing to do yet
    Wait,
    /// Review finished, pause playback
    Finish,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Playing { position: usize, end: f64 },
    Gap { next: usize, until_ms: f64 },
}

/// Plays silent regions one after another
#[derive(Debug, Clone)]
pub struct SilencePlaylist {
    regions: Vec<Selection>,
    phase: Phase,
    gap_ms: f64,
}

impl Default for SilencePlaylist {
    fn default() -> Self {
        Self::new(DEFAULT_REGION_GAP_MS)
    }
}

impl SilencePlaylist {
    pub fn new(gap_ms: f64) -> Self {
        Self {
            regions: Vec::new(),
            phase: Phase::Idle,
            gap_ms: gap_ms.max(0.0),
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Index within the playlist of the region currently playing
    pub fn current(&self) -> Option<usize> {
        match self.phase {
            Phase::Playing { position, .. } => Some(position),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Collect the store's silent markers and start with the first one
    ///
    /// Returns [`PlaylistAction::Finish`] when there are no silent markers.
    pub fn start(&mut self, store: &MarkerStore) -> PlaylistAction {
        self.regions = store
            .iter()
            .filter(|m| m.is_silent)
            .map(|m| Selection::new(m.start(), m.end()))
            .collect();

        log::info!("SilencePlaylist::start: {} regions", self.regions.len());
        if self.regions.is_empty() {
            self.phase = Phase::Idle;
            return PlaylistAction::Finish;
        }
        self.play(0)
    }

    /// Advance the playlist
    pub fn poll(&mut self, now_ms: f64, current_time: f64, paused: bool) -> PlaylistAction {
        match self.phase {
            Phase::Idle => PlaylistAction::Wait,
            Phase::Playing { position, end } => {
                if current_time < end && !paused {
                    return PlaylistAction::Wait;
                }
                if position + 1 >= self.regions.len() {
                    self.phase = Phase::Idle;
                    log::info!("SilencePlaylist::poll: finished");
                    return PlaylistAction::Finish;
                }
                self.phase = Phase::Gap {
                    next: position + 1,
                    until_ms: now_ms + self.gap_ms,
                };
                PlaylistAction::Wait
            }
            Phase::Gap { next, until_ms } => {
                if now_ms >= until_ms {
                    self.play(next)
                } else {
                    PlaylistAction::Wait
                }
            }
        }
    }

    /// Abandon the review
    pub fn cancel(&mut self) {
        self.phase = Phase::Idle;
    }

    fn play(&mut self, position: usize) -> PlaylistAction {
        let selection = self.regions[position];
        self.phase = Phase::Playing {
            position,
            end: selection.end,
        };
        PlaylistAction::PlayRegion {
            index: position,
            selection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::Marker;

    fn store() -> MarkerStore {
        let mut store = MarkerStore::new();
        store.add(Marker::silent(1.0, 2.0, 1));
        store.add(Marker::new(3.0, 4.0));
        store.add(Marker::silent(5.0, 6.0, 2));
        store
    }

    #[test]
    fn test_plays_silent_regions_in_order() {
        let mut playlist = SilencePlaylist::default();
        let first = playlist.start(&store());
        assert_eq!(
            first,
            PlaylistAction::PlayRegion {
                index: 0,
                selection: Selection::new(1.0, 2.0)
            }
        );
        assert_eq!(playlist.len(), 2);

        assert_eq!(playlist.poll(0.0, 1.5, false), PlaylistAction::Wait);
        // Region end reached, gap starts
        assert_eq!(playlist.poll(100.0, 2.0, false), PlaylistAction::Wait);
        assert_eq!(playlist.poll(400.0, 2.3, false), PlaylistAction::Wait);
        assert_eq!(
            playlist.poll(600.0, 2.5, false),
            PlaylistAction::PlayRegion {
                index: 1,
                selection: Selection::new(5.0, 6.0)
            }
        );
        assert_eq!(playlist.poll(700.0, 6.0, false), PlaylistAction::Finish);
        assert!(!playlist.is_running());
    }

    #[test]
    fn test_pause_advances() {
        let mut playlist = SilencePlaylist::new(0.0);
        playlist.start(&store());
        assert_eq!(playlist.poll(0.0, 1.2, true), PlaylistAction::Wait);
        assert!(matches!(
            playlist.poll(1.0, 1.2, false),
            PlaylistAction::PlayRegion { index: 1, .. }
        ));
    }

    #[test]
    fn test_empty_store_finishes() {
        let mut playlist = SilencePlaylist::default();
        assert_eq!(playlist.start(&MarkerStore::new()), PlaylistAction::Finish);
        assert!(!playlist.is_running());
    }

    #[test]
    fn test_cancel() {
        let mut playlist = SilencePlaylist::default();
        playlist.start(&store());
        playlist.cancel();
        assert_eq!(playlist.poll(0.0, 10.0, false), PlaylistAction::Wait);
    }
}
