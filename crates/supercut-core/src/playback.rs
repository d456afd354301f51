//! Playback time authority
//!
//! Two clocks can report and drive the playhead: the raw media element and,
//! once decoded, the waveform player. Exactly one is authoritative at a time:
//! the waveform player when it is attached and ready, otherwise the media
//! element. All seeks, transport commands and time reads go through
//! [`PlaybackAuthority`] so the rest of the editor never has to know which
//! clock is in charge.
//!
//! Timestamps (`now_ms`) are monotonic milliseconds supplied by the caller.

use crate::config::PlaybackConfig;
use crate::types::{FrameRate, Selection};

/// A clock that can be read, seeked and started/stopped
pub trait PlaybackBackend {
    /// Current playhead in seconds
    fn current_time(&self) -> f64;
    /// Move the playhead
    fn seek(&mut self, time: f64);
    fn play(&mut self);
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
}

/// Which clock is authoritative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockSource {
    MediaElement,
    Waveform,
}

/// Origin of a seek request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekSource {
    /// Transport controls, keyboard, navigation
    User,
    /// Timeline click or gesture
    Timeline,
    /// Loop/repeat handling
    Repeat,
    /// Echo from one clock catching up with the other
    Sync,
}

/// Direction for single-frame steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStep {
    Backward,
    Forward,
}

/// Result of a periodic time update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeUpdate {
    /// Nothing loaded yet
    Idle,
    /// Playhead at this time
    Position(f64),
    /// Repeat mode sent the playhead back to this time
    Looped(f64),
}

/// Arbitrates between the media element and the waveform player
#[derive(Debug)]
pub struct PlaybackAuthority<M, W> {
    media: M,
    waveform: Option<W>,
    waveform_ready: bool,
    duration: Option<f64>,
    repeat: bool,
    seeking_until_ms: Option<f64>,
    config: PlaybackConfig,
}

impl<M: PlaybackBackend, W: PlaybackBackend> PlaybackAuthority<M, W> {
    pub fn new(media: M, config: PlaybackConfig) -> Self {
        Self {
            media,
            waveform: None,
            waveform_ready: false,
            duration: None,
            repeat: false,
            seeking_until_ms: None,
            config,
        }
    }

    // -------------------------------------------------------------------------
    // Media and clock lifecycle
    // -------------------------------------------------------------------------

    /// New media metadata arrived; `None` or a non-positive value unloads
    pub fn set_duration(&mut self, duration: Option<f64>) {
        self.duration = duration.filter(|d| d.is_finite() && *d > 0.0);
        self.seeking_until_ms = None;
        log::info!("PlaybackAuthority: duration {:?}", self.duration);
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Attach a waveform player; it becomes authoritative once marked ready
    pub fn attach_waveform(&mut self, waveform: W) {
        self.waveform = Some(waveform);
        self.waveform_ready = false;
    }

    /// The waveform finished decoding (or failed with `false`)
    pub fn set_waveform_ready(&mut self, ready: bool) {
        self.waveform_ready = ready && self.waveform.is_some();
        log::debug!("PlaybackAuthority: authority now {:?}", self.authority());
    }

    pub fn detach_waveform(&mut self) -> Option<W> {
        self.waveform_ready = false;
        self.waveform.take()
    }

    pub fn waveform_ready(&self) -> bool {
        self.waveform_ready
    }

    pub fn authority(&self) -> ClockSource {
        if self.waveform_ready && self.waveform.is_some() {
            ClockSource::Waveform
        } else {
            ClockSource::MediaElement
        }
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn waveform(&self) -> Option<&W> {
        self.waveform.as_ref()
    }

    fn clock(&self) -> &dyn PlaybackBackend {
        match (self.authority(), self.waveform.as_ref()) {
            (ClockSource::Waveform, Some(waveform)) => waveform,
            _ => &self.media,
        }
    }

    fn clock_mut(&mut self) -> &mut dyn PlaybackBackend {
        if self.waveform_ready {
            if let Some(waveform) = self.waveform.as_mut() {
                return waveform;
            }
        }
        &mut self.media
    }

    // -------------------------------------------------------------------------
    // Time
    // -------------------------------------------------------------------------

    /// Playhead of the authoritative clock, 0 when nothing is loaded
    pub fn current_time(&self) -> f64 {
        if self.duration.is_none() {
            return 0.0;
        }
        self.clock().current_time()
    }

    /// Whether a manual seek is still settling
    pub fn is_seeking(&self, now_ms: f64) -> bool {
        self.seeking_until_ms.is_some_and(|until| now_ms < until)
    }

    /// Seek the authoritative clock
    ///
    /// Clamps to `[0, duration]` and skips the write when the clock is already
    /// within the seek epsilon. `Sync` seeks are dropped while a manual seek
    /// is settling. Returns the clamped target, or `None` when ignored.
    pub fn seek_to(&mut self, time: f64, source: SeekSource, now_ms: f64) -> Option<f64> {
        let duration = self.duration?;
        if source == SeekSource::Sync && self.is_seeking(now_ms) {
            log::trace!("seek_to: sync seek suppressed");
            return None;
        }
        if !time.is_finite() {
            return None;
        }

        let target = time.clamp(0.0, duration);
        let epsilon = self.config.seek_epsilon;
        let clock = self.clock_mut();
        if (clock.current_time() - target).abs() > epsilon {
            clock.seek(target);
        }

        if source != SeekSource::Sync {
            self.seeking_until_ms = Some(now_ms + self.config.seek_suppression_ms);
        }
        log::trace!("seek_to: {:.3}s ({:?})", target, source);
        Some(target)
    }

    /// The waveform player reported a seek of its own
    ///
    /// Brings the media element along when it drifted past the sync epsilon.
    pub fn on_waveform_seeking(&mut self, time: f64, now_ms: f64) -> bool {
        if self.duration.is_none() || self.is_seeking(now_ms) {
            return false;
        }
        if (self.media.current_time() - time).abs() > self.config.sync_epsilon {
            self.media.seek(time);
            return true;
        }
        false
    }

    /// Move by one frame at `frame_rate`
    pub fn step_frame(&mut self, step: FrameStep, frame_rate: FrameRate, now_ms: f64) -> Option<f64> {
        self.duration?;
        let fps = frame_rate.fps();
        let frame = (self.current_time() * fps).round();
        let target = match step {
            FrameStep::Backward => frame - 1.0,
            FrameStep::Forward => frame + 1.0,
        } / fps;
        self.seek_to(target, SeekSource::User, now_ms)
    }

    // -------------------------------------------------------------------------
    // Transport
    // -------------------------------------------------------------------------

    pub fn play(&mut self) {
        if self.duration.is_some() {
            self.clock_mut().play();
        }
    }

    pub fn pause(&mut self) {
        if self.duration.is_some() {
            self.clock_mut().pause();
        }
    }

    pub fn toggle_play(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.duration.is_some() && !self.clock().is_paused()
    }

    // -------------------------------------------------------------------------
    // Repeat
    // -------------------------------------------------------------------------

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    pub fn set_repeat(&mut self, enabled: bool) {
        self.repeat = enabled;
    }

    /// Toggle repeat; enabling while paused starts playing the selection
    pub fn toggle_repeat(&mut self, selection: &Selection, now_ms: f64) -> bool {
        self.repeat = !self.repeat;
        if self.repeat && !self.is_playing() {
            self.seek_to(selection.start, SeekSource::Repeat, now_ms);
            self.play();
        }
        self.repeat
    }

    /// Periodic time update from the authoritative clock
    ///
    /// With repeat on, reaching the selection end jumps back to its start
    /// and keeps playing.
    pub fn on_time_update(&mut self, selection: &Selection, now_ms: f64) -> TimeUpdate {
        if self.duration.is_none() {
            return TimeUpdate::Idle;
        }
        let time = self.current_time();
        if self.repeat && selection.duration() > 0.0 && time >= selection.end {
            let target = self
                .seek_to(selection.start, SeekSource::Repeat, now_ms)
                .unwrap_or(selection.start);
            self.play();
            return TimeUpdate::Looped(target);
        }
        TimeUpdate::Position(time)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// In-memory clock recording every seek
    #[derive(Debug, Default)]
    pub(crate) struct FakeClock {
        pub time: f64,
        pub paused: bool,
        pub seeks: Vec<f64>,
    }

    impl FakeClock {
        pub fn new() -> Self {
            Self {
                paused: true,
                ..Self::default()
            }
        }
    }

    impl PlaybackBackend for FakeClock {
        fn current_time(&self) -> f64 {
            self.time
        }
        fn seek(&mut self, time: f64) {
            self.time = time;
            self.seeks.push(time);
        }
        fn play(&mut self) {
            self.paused = false;
        }
        fn pause(&mut self) {
            self.paused = true;
        }
        fn is_paused(&self) -> bool {
            self.paused
        }
    }

    fn authority() -> PlaybackAuthority<FakeClock, FakeClock> {
        let mut auth = PlaybackAuthority::new(FakeClock::new(), PlaybackConfig::default());
        auth.set_duration(Some(100.0));
        auth
    }

    #[test]
    fn test_no_duration_is_noop() {
        let mut auth: PlaybackAuthority<FakeClock, FakeClock> =
            PlaybackAuthority::new(FakeClock::new(), PlaybackConfig::default());
        assert_eq!(auth.seek_to(10.0, SeekSource::User, 0.0), None);
        auth.play();
        assert!(!auth.is_playing());
        assert_eq!(auth.on_time_update(&Selection::new(0.0, 1.0), 0.0), TimeUpdate::Idle);
        assert!(auth.media().seeks.is_empty());
    }

    #[test]
    fn test_seek_clamps() {
        let mut auth = authority();
        assert_eq!(auth.seek_to(150.0, SeekSource::User, 0.0), Some(100.0));
        assert_eq!(auth.seek_to(-5.0, SeekSource::User, 100.0), Some(0.0));
        assert_eq!(auth.media().seeks, vec![100.0, 0.0]);
    }

    #[test]
    fn test_seek_skips_tiny_delta() {
        let mut auth = authority();
        auth.seek_to(10.0, SeekSource::User, 0.0);
        auth.seek_to(10.0005, SeekSource::User, 100.0);
        assert_eq!(auth.media().seeks, vec![10.0]);
    }

    #[test]
    fn test_sync_suppressed_while_seeking() {
        let mut auth = authority();
        auth.seek_to(10.0, SeekSource::User, 0.0);
        assert!(auth.is_seeking(20.0));
        assert_eq!(auth.seek_to(20.0, SeekSource::Sync, 20.0), None);
        assert!(!auth.is_seeking(60.0));
        assert_eq!(auth.seek_to(20.0, SeekSource::Sync, 60.0), Some(20.0));
        // Sync seeks do not open a new suppression window
        assert!(!auth.is_seeking(61.0));
    }

    #[test]
    fn test_waveform_becomes_authoritative_when_ready() {
        let mut auth = authority();
        auth.attach_waveform(FakeClock::new());
        assert_eq!(auth.authority(), ClockSource::MediaElement);

        auth.set_waveform_ready(true);
        assert_eq!(auth.authority(), ClockSource::Waveform);
        auth.seek_to(42.0, SeekSource::Timeline, 0.0);
        assert_eq!(auth.waveform().unwrap().seeks, vec![42.0]);
        assert!(auth.media().seeks.is_empty());
        assert!((auth.current_time() - 42.0).abs() < 1e-9);

        auth.detach_waveform();
        assert_eq!(auth.authority(), ClockSource::MediaElement);
    }

    #[test]
    fn test_waveform_seek_syncs_media() {
        let mut auth = authority();
        auth.attach_waveform(FakeClock::new());
        auth.set_waveform_ready(true);
        assert!(auth.on_waveform_seeking(5.0, 0.0));
        assert_eq!(auth.media().seeks, vec![5.0]);
        // Within the sync epsilon: nothing to do
        assert!(!auth.on_waveform_seeking(5.005, 10.0));
    }

    #[test]
    fn test_repeat_loops_at_selection_end() {
        let mut auth = authority();
        auth.set_repeat(true);
        auth.media_mut().time = 20.0;
        let sel = Selection::new(10.0, 20.0);
        assert_eq!(auth.on_time_update(&sel, 0.0), TimeUpdate::Looped(10.0));
        assert!(auth.is_playing());
        assert!((auth.current_time() - 10.0).abs() < 1e-9);
        assert_eq!(auth.on_time_update(&sel, 10.0), TimeUpdate::Position(10.0));
    }

    #[test]
    fn test_no_loop_without_repeat() {
        let mut auth = authority();
        auth.media_mut().time = 25.0;
        let sel = Selection::new(10.0, 20.0);
        assert_eq!(auth.on_time_update(&sel, 0.0), TimeUpdate::Position(25.0));
    }

    #[test]
    fn test_toggle_repeat_starts_selection() {
        let mut auth = authority();
        let sel = Selection::new(30.0, 40.0);
        assert!(auth.toggle_repeat(&sel, 0.0));
        assert!(auth.is_playing());
        assert!((auth.current_time() - 30.0).abs() < 1e-9);
        assert!(!auth.toggle_repeat(&sel, 10.0));
    }

    #[test]
    fn test_step_frame() {
        let mut auth = authority();
        let fr = FrameRate::new(25.0).unwrap();
        auth.seek_to(1.0, SeekSource::User, 0.0);
        let forward = auth.step_frame(FrameStep::Forward, fr, 100.0).unwrap();
        assert!((forward - 1.04).abs() < 1e-9);
        let back = auth.step_frame(FrameStep::Backward, fr, 200.0).unwrap();
        assert!((back - 1.0).abs() < 1e-9);

        auth.seek_to(0.0, SeekSource::User, 300.0);
        assert_eq!(auth.step_frame(FrameStep::Backward, fr, 400.0), Some(0.0));
    }

    #[test]
    fn test_toggle_play() {
        let mut auth = authority();
        auth.toggle_play();
        assert!(auth.is_playing());
        auth.toggle_play();
        assert!(!auth.is_playing());
    }
}
