//! Editor facade
//!
//! [`Editor`] owns every piece of editing state (timeline, gestures,
//! playback authority, silence workflow, frame rate) and exposes the
//! operations the UI invokes. Each operation runs synchronously and queues
//! [`EditorEvent`]s describing what changed; the UI drains them after every
//! input event and redraws accordingly.
//!
//! Timestamps (`now_ms`) are monotonic milliseconds from the event source.

use crate::animation::{FrameScheduler, FrameTick, PointerThrottle};
use crate::config::EditorConfig;
use crate::error::ProjectResult;
use crate::fps::{FpsDetector, FpsEstimate, PresentedFrame};
use crate::interaction::{GestureState, HandleSide, MarkerInteraction, MarkerZone, PressOutcome};
use crate::marker::{Marker, MarkerStore, NavDirection};
use crate::peaks::WaveformPeaks;
use crate::playback::{FrameStep, PlaybackAuthority, PlaybackBackend, SeekSource, TimeUpdate};
use crate::project::ProjectFile;
use crate::silence::{
    adjust_silent_markers, clear_silent_markers, DetectionStatus, PlaylistAction, RegionBoundary,
    SilencePlaylist, SilenceSession,
};
use crate::timecode::{parse_timecode, TimecodeConverter};
use crate::timeline::Timeline;
use crate::types::{FrameRate, Selection};
use crate::zoom::ZoomWindow;

/// Notification queued by an editor operation
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    SelectionChanged(Selection),
    ZoomChanged(ZoomWindow),
    /// A single marker's bounds or comments changed
    MarkerUpdated(usize),
    /// Markers were added, removed or reordered
    MarkersChanged,
    ActiveMarkerChanged(Option<usize>),
    /// Playhead moved by a seek
    Seeked(f64),
    /// Playhead redraw from the animation loop or a pause
    PlayheadRedraw(f64),
    FrameRateChanged(FrameRate),
    /// User-facing status line
    Status(String),
}

/// Anchor for [`Editor::set_precise_range`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeAnchor {
    /// Range starts at the playhead
    In,
    /// Range ends at the playhead
    Out,
    /// Range is centred on the playhead
    Mid,
}

/// The editor core
pub struct Editor<M, W> {
    config: EditorConfig,
    frame_rate: FrameRate,
    timecode: TimecodeConverter,
    timeline: Timeline,
    interaction: MarkerInteraction,
    playback: PlaybackAuthority<M, W>,
    scheduler: FrameScheduler,
    fps: FpsDetector,
    silence: SilenceSession,
    playlist: SilencePlaylist,
    peaks: Option<WaveformPeaks>,
    events: Vec<EditorEvent>,
}

impl<M: PlaybackBackend, W: PlaybackBackend> Editor<M, W> {
    pub fn new(media: M, config: EditorConfig) -> Self {
        let interaction = MarkerInteraction::new(
            config.interaction.min_marker_duration,
            PointerThrottle::new(config.interaction.pointer_throttle_ms),
        );
        Self {
            frame_rate: config.timecode.frame_rate(),
            timecode: TimecodeConverter::new(config.timecode.cache_capacity),
            timeline: Timeline::new(config.interaction.zoom_padding),
            interaction,
            playback: PlaybackAuthority::new(media, config.playback.clone()),
            scheduler: FrameScheduler::default(),
            fps: FpsDetector::new(),
            silence: SilenceSession::new(config.silence.clone()),
            playlist: SilencePlaylist::new(config.playback.region_gap_ms),
            peaks: None,
            events: Vec::new(),
            config,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn markers(&self) -> &MarkerStore {
        &self.timeline.markers
    }

    pub fn selection(&self) -> Selection {
        self.timeline.selection
    }

    pub fn zoom_window(&self) -> ZoomWindow {
        self.timeline.zoom_window()
    }

    pub fn gesture(&self) -> GestureState {
        self.interaction.state()
    }

    pub fn playback(&self) -> &PlaybackAuthority<M, W> {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut PlaybackAuthority<M, W> {
        &mut self.playback
    }

    pub fn silence(&self) -> &SilenceSession {
        &self.silence
    }

    pub fn silence_mut(&mut self) -> &mut SilenceSession {
        &mut self.silence
    }

    pub fn current_time(&self) -> f64 {
        self.playback.current_time()
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: EditorEvent) {
        self.events.push(event);
    }

    fn emit_selection(&mut self) {
        let sel = self.timeline.selection;
        self.emit(EditorEvent::SelectionChanged(sel));
    }

    fn emit_zoom(&mut self) {
        let window = self.timeline.zoom_window();
        self.emit(EditorEvent::ZoomChanged(window));
    }

    fn emit_active(&mut self) {
        let active = self.timeline.markers.active_index();
        self.emit(EditorEvent::ActiveMarkerChanged(active));
    }

    // -------------------------------------------------------------------------
    // Media lifecycle
    // -------------------------------------------------------------------------

    /// New media loaded (`None` while metadata is unknown)
    ///
    /// Resets selection, zoom, markers, FPS detection and any waveform.
    pub fn load_media(&mut self, duration: Option<f64>) {
        self.interaction.cancel();
        self.playlist.cancel();
        self.playback.detach_waveform();
        self.playback.set_duration(duration);
        self.timeline.load_media(duration);
        self.fps.reset();
        self.peaks = None;

        self.emit(EditorEvent::MarkersChanged);
        self.emit_active();
        self.emit_selection();
        self.emit_zoom();
    }

    /// Attach a waveform player that will take over once its peaks are ready
    pub fn attach_waveform(&mut self, waveform: W) {
        self.playback.attach_waveform(waveform);
    }

    /// Waveform decoded: it becomes the authoritative clock
    pub fn waveform_ready(&mut self, peaks: WaveformPeaks) {
        self.peaks = Some(peaks);
        self.playback.set_waveform_ready(true);
    }

    /// Waveform decoding failed: keep using the media element
    pub fn waveform_failed(&mut self) {
        log::warn!("Editor: waveform unavailable, media element stays authoritative");
        self.peaks = None;
        self.playback.set_waveform_ready(false);
    }

    pub fn peaks(&self) -> Option<&WaveformPeaks> {
        self.peaks.as_ref()
    }

    // -------------------------------------------------------------------------
    // Frame rate and timecode
    // -------------------------------------------------------------------------

    pub fn frame_rate(&self) -> FrameRate {
        self.frame_rate
    }

    /// Change the frame rate; stored marker times are unaffected
    pub fn set_frame_rate(&mut self, frame_rate: FrameRate) {
        if frame_rate == self.frame_rate {
            return;
        }
        log::info!("Editor: frame rate {} -> {}", self.frame_rate, frame_rate);
        self.frame_rate = frame_rate;
        self.timecode.clear();
        self.emit(EditorEvent::FrameRateChanged(frame_rate));
    }

    /// Format seconds at the current frame rate
    pub fn format_time(&mut self, seconds: f64) -> String {
        self.timecode.format(seconds, self.frame_rate)
    }

    /// Feed a presented-frame callback to the FPS detector
    ///
    /// Promotes the closest standard rate once per media, when the estimate
    /// first becomes certain enough.
    pub fn on_presented_frame(&mut self, frame: PresentedFrame) -> Option<FpsEstimate> {
        let estimate = self.fps.on_frame(frame)?;
        if let Some(rate) = self.fps.take_promotion() {
            self.set_frame_rate(rate);
        }
        Some(estimate)
    }

    /// Playback jumped: the FPS detector discards the interval around it
    pub fn on_media_seeked(&mut self) {
        self.fps.on_seek();
    }

    // -------------------------------------------------------------------------
    // Playback
    // -------------------------------------------------------------------------

    /// Seek the authoritative clock
    pub fn seek(&mut self, time: f64, now_ms: f64) -> Option<f64> {
        self.seek_from(time, SeekSource::User, now_ms)
    }

    fn seek_from(&mut self, time: f64, source: SeekSource, now_ms: f64) -> Option<f64> {
        let target = self.playback.seek_to(time, source, now_ms)?;
        self.emit(EditorEvent::Seeked(target));
        Some(target)
    }

    /// The waveform player seeked on its own (user clicked the waveform)
    pub fn on_waveform_seeking(&mut self, time: f64, now_ms: f64) {
        if self.playback.on_waveform_seeking(time, now_ms) {
            self.emit(EditorEvent::Seeked(time));
        }
    }

    pub fn play(&mut self) {
        self.playback.play();
        self.scheduler.request(self.playback.is_playing());
    }

    /// Pause and redraw the playhead once at its final position
    ///
    /// No-op before media is loaded.
    pub fn pause(&mut self) {
        if !self.timeline.is_loaded() {
            return;
        }
        self.playback.pause();
        self.scheduler.on_pause();
        let time = self.playback.current_time();
        self.emit(EditorEvent::PlayheadRedraw(time));
    }

    pub fn toggle_play(&mut self) {
        if self.playback.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn toggle_repeat(&mut self, now_ms: f64) -> bool {
        let sel = self.timeline.selection;
        let enabled = self.playback.toggle_repeat(&sel, now_ms);
        self.scheduler.request(self.playback.is_playing());
        enabled
    }

    /// Periodic time update from the media
    pub fn on_time_update(&mut self, now_ms: f64) -> TimeUpdate {
        let sel = self.timeline.selection;
        let update = self.playback.on_time_update(&sel, now_ms);
        if let TimeUpdate::Looped(time) = update {
            self.emit(EditorEvent::Seeked(time));
        }
        update
    }

    /// Animation frame callback
    pub fn animation_frame(&mut self, now_ms: f64) -> FrameTick {
        let tick = self.scheduler.tick(now_ms, self.playback.is_playing());
        if tick.redraw {
            let time = self.playback.current_time();
            self.emit(EditorEvent::PlayheadRedraw(time));
        }
        tick
    }

    pub fn step_frame(&mut self, step: FrameStep, now_ms: f64) -> Option<f64> {
        let target = self.playback.step_frame(step, self.frame_rate, now_ms)?;
        self.emit(EditorEvent::Seeked(target));
        Some(target)
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    fn apply_selection(&mut self, start: f64, end: f64) {
        if self.timeline.set_selection(start, end).is_some() {
            self.timeline.focus_selection(true);
            self.emit_selection();
            self.emit_zoom();
        }
    }

    /// Selection start at the playhead
    ///
    /// Collapses to the playhead when it lies past the selection end.
    pub fn set_in_point(&mut self) {
        if !self.timeline.is_loaded() {
            return;
        }
        let time = self.current_time();
        let end = self.timeline.selection.end.max(time);
        self.apply_selection(time, end);
    }

    /// Selection end at the playhead
    ///
    /// Collapses to the playhead when it lies before the selection start.
    pub fn set_out_point(&mut self) {
        if !self.timeline.is_loaded() {
            return;
        }
        let time = self.current_time();
        let start = self.timeline.selection.start.min(time);
        self.apply_selection(start, time);
    }

    /// Selection of `length` seconds anchored at the playhead
    pub fn set_precise_range(&mut self, length: f64, anchor: RangeAnchor) {
        if !self.timeline.is_loaded() || !(length.is_finite() && length > 0.0) {
            return;
        }
        let time = self.current_time();
        let (start, end) = match anchor {
            RangeAnchor::In => (time, time + length),
            RangeAnchor::Out => (time - length, time),
            RangeAnchor::Mid => (time - length / 2.0, time + length / 2.0),
        };
        self.apply_selection(start, end);
    }

    pub fn jump_to_in(&mut self, now_ms: f64) -> Option<f64> {
        let start = self.timeline.selection.start;
        self.seek(start, now_ms)
    }

    pub fn jump_to_out(&mut self, now_ms: f64) -> Option<f64> {
        let end = self.timeline.selection.end;
        self.seek(end, now_ms)
    }

    /// Full-media selection, full zoom, nothing active
    pub fn reset_zoom(&mut self) {
        if !self.timeline.is_loaded() {
            return;
        }
        self.timeline.reset_selection();
        self.timeline.zoom.update_zoom(0.0, 100.0, false);
        self.deselect();
        self.emit_selection();
        self.emit_zoom();
    }

    /// Clear the active marker (Escape, explicit clear)
    pub fn deselect(&mut self) {
        self.interaction.cancel();
        if self.timeline.markers.active_index().is_some() {
            self.timeline.markers.set_active(None);
            self.emit_active();
        }
    }

    // -------------------------------------------------------------------------
    // Markers
    // -------------------------------------------------------------------------

    /// Commit the selection as a new active marker
    ///
    /// Empty selections are ignored.
    pub fn add_marker_from_selection(&mut self) -> Option<usize> {
        let sel = self.timeline.selection;
        if !self.timeline.is_loaded() || sel.end <= sel.start {
            return None;
        }
        let handle = self.timeline.markers.add(Marker::new(sel.start, sel.end));
        let index = self.timeline.markers.index_of(handle);
        self.timeline.markers.set_active(index);
        self.emit(EditorEvent::MarkersChanged);
        self.emit_active();
        index
    }

    /// Open a marker for editing: select it, zoom onto it, seek to its start
    pub fn load_marker(&mut self, index: usize, now_ms: f64) -> bool {
        let Some(duration) = self.timeline.duration() else {
            return false;
        };
        let Some((start, end)) = self.timeline.markers.get(index).map(|m| (m.start(), m.end())) else {
            return false;
        };

        self.timeline.selection = Selection::new(start, end);
        self.timeline.zoom.focus(start, end, duration, true);
        self.timeline.markers.set_active(Some(index));
        self.seek_from(start, SeekSource::Timeline, now_ms);

        self.emit_selection();
        self.emit_zoom();
        self.emit_active();
        true
    }

    pub fn remove_marker(&mut self, index: usize) -> Option<Marker> {
        let had_active = self.timeline.markers.active_index();
        let removed = self.timeline.markers.remove(index)?;
        self.emit(EditorEvent::MarkersChanged);
        if self.timeline.markers.active_index() != had_active {
            self.emit_active();
        }
        Some(removed)
    }

    /// Edit a marker's label and, optionally, its bounds from timecodes
    ///
    /// Empty text clears the comments. The bounds change only when both
    /// timecodes parse and `in < out`; they are clamped to the media.
    /// Returns whether the bounds were replaced.
    pub fn edit_marker(
        &mut self,
        index: usize,
        text: &str,
        in_timecode: Option<&str>,
        out_timecode: Option<&str>,
    ) -> bool {
        let duration = self.timeline.duration().unwrap_or(f64::INFINITY);
        let bounds = match (in_timecode, out_timecode) {
            (Some(a), Some(b)) => match (
                parse_timecode(a, self.frame_rate),
                parse_timecode(b, self.frame_rate),
            ) {
                (Ok(start), Ok(end)) if start < end => Some((start.min(duration), end.min(duration))),
                (Err(e), _) | (_, Err(e)) => {
                    log::debug!("edit_marker: ignoring bounds: {}", e);
                    None
                }
                _ => None,
            },
            _ => None,
        };

        let Some(marker) = self.timeline.markers.get_mut(index) else {
            return false;
        };
        marker.set_label(text);
        let applied = match bounds {
            Some((start, end)) if start < end => {
                marker.set_bounds(start, end);
                true
            }
            _ => false,
        };

        self.timeline.markers.sort_by_start();
        self.emit(EditorEvent::MarkersChanged);
        applied
    }

    /// Markers whose label contains `term` (case-insensitive)
    pub fn search_markers(&self, term: &str) -> Vec<(usize, &Marker)> {
        self.timeline.markers.search(term)
    }

    /// Load the previous marker before the playhead (wrapping)
    pub fn previous_marker(&mut self, now_ms: f64) -> Option<usize> {
        self.navigate_markers(NavDirection::Previous, now_ms)
    }

    /// Load the next marker after the playhead (wrapping)
    pub fn next_marker(&mut self, now_ms: f64) -> Option<usize> {
        self.navigate_markers(NavDirection::Next, now_ms)
    }

    fn navigate_markers(&mut self, direction: NavDirection, now_ms: f64) -> Option<usize> {
        self.timeline.duration()?;
        let index = self.timeline.markers.navigate(
            self.current_time(),
            direction,
            self.config.interaction.navigation_epsilon,
            |_| true,
        )?;
        self.load_marker(index, now_ms);
        Some(index)
    }

    // -------------------------------------------------------------------------
    // Gestures
    // -------------------------------------------------------------------------

    /// Pointer pressed on a marker in the timeline
    pub fn press_marker(&mut self, index: usize, zone: MarkerZone, x: f64, now_ms: f64) -> PressOutcome {
        let outcome = self.interaction.press_marker(index, zone, x, &self.timeline);
        if let Some(load) = outcome.load {
            self.load_marker(load, now_ms);
        }
        outcome
    }

    /// Pointer pressed on empty timeline space: deselect and seek there
    pub fn press_timeline(&mut self, time: f64, now_ms: f64) {
        self.deselect();
        self.seek_from(time, SeekSource::Timeline, now_ms);
    }

    pub fn begin_handle_drag(&mut self, side: HandleSide) {
        self.interaction.begin_handle_drag(side, &self.timeline);
    }

    pub fn begin_range_drag(&mut self, x: f64) {
        let playhead = self.current_time();
        self.interaction.begin_range_drag(x, playhead, &self.timeline);
    }

    /// Slider handles moved
    pub fn drag_handle(&mut self, values: (f64, f64), now_ms: f64) {
        if let Some(update) = self.interaction.drag_handle(values, &mut self.timeline) {
            self.apply_gesture_update(update, now_ms);
        }
    }

    /// Pointer moved during a gesture
    pub fn pointer_move(&mut self, x: f64, width_px: f64, now_ms: f64) {
        if let Some(update) = self
            .interaction
            .move_pointer(x, now_ms, width_px, &mut self.timeline)
        {
            self.apply_gesture_update(update, now_ms);
        }
    }

    /// Pointer released: flush the last move and finalize
    pub fn pointer_up(&mut self, width_px: f64, now_ms: f64) {
        let outcome = self.interaction.release(width_px, &mut self.timeline);
        if let Some(update) = outcome.update {
            self.apply_gesture_update(update, now_ms);
        }
        if outcome.finalized {
            self.emit(EditorEvent::MarkersChanged);
            self.emit_active();
        }
    }

    fn apply_gesture_update(&mut self, update: crate::interaction::GestureUpdate, now_ms: f64) {
        if let Some(index) = update.marker {
            self.emit(EditorEvent::MarkerUpdated(index));
        }
        self.emit(EditorEvent::SelectionChanged(update.selection));
        if let Some(time) = update.seek {
            self.seek_from(time, SeekSource::Timeline, now_ms);
        }
    }

    // -------------------------------------------------------------------------
    // Silence
    // -------------------------------------------------------------------------

    /// Reserve a detection run (the UI defers [`Editor::run_silence_detection`])
    pub fn request_silence_detection(&mut self) -> Result<(), DetectionStatus> {
        let ready = self.peaks.is_some() && self.timeline.is_loaded();
        let result = self.silence.request(ready);
        if let Err(status) = result {
            self.emit(EditorEvent::Status(status.to_string()));
        }
        result
    }

    /// Run detection and replace the silent markers
    pub fn run_silence_detection(&mut self) -> DetectionStatus {
        let samples = self.peaks.as_ref().map(|p| p.samples());
        let status = self
            .silence
            .run(samples, self.timeline.duration(), &mut self.timeline.markers);
        self.emit(EditorEvent::MarkersChanged);
        self.emit_active();
        self.emit(EditorEvent::Status(status.to_string()));
        status
    }

    pub fn clear_silent_markers(&mut self) -> usize {
        let removed = clear_silent_markers(&mut self.timeline.markers);
        if removed > 0 {
            self.emit(EditorEvent::MarkersChanged);
            self.emit_active();
        }
        removed
    }

    /// Shift one boundary of every silent marker
    pub fn adjust_silent_regions(&mut self, boundary: RegionBoundary, delta: f64) -> usize {
        let Some(duration) = self.timeline.duration() else {
            return 0;
        };
        let touched = adjust_silent_markers(&mut self.timeline.markers, boundary, delta, duration);
        if touched > 0 {
            self.emit(EditorEvent::MarkersChanged);
        }
        touched
    }

    /// Widen every silent marker by the configured padding
    pub fn add_padding(&mut self) -> usize {
        let padding = self.silence.config().padding;
        self.adjust_silent_regions(RegionBoundary::Start, -padding);
        self.adjust_silent_regions(RegionBoundary::End, padding)
    }

    /// Narrow every silent marker by the configured padding
    pub fn remove_padding(&mut self) -> usize {
        let padding = self.silence.config().padding;
        self.adjust_silent_regions(RegionBoundary::Start, padding);
        self.adjust_silent_regions(RegionBoundary::End, -padding)
    }

    /// Seek to the previous silent region start (no load)
    pub fn previous_silent_region(&mut self, now_ms: f64) -> Option<f64> {
        self.navigate_silent(NavDirection::Previous, now_ms)
    }

    /// Seek to the next silent region start (no load)
    pub fn next_silent_region(&mut self, now_ms: f64) -> Option<f64> {
        self.navigate_silent(NavDirection::Next, now_ms)
    }

    fn navigate_silent(&mut self, direction: NavDirection, now_ms: f64) -> Option<f64> {
        self.timeline.duration()?;
        let index = self.timeline.markers.navigate(
            self.current_time(),
            direction,
            self.config.interaction.navigation_epsilon,
            |m| m.is_silent,
        )?;
        let start = self.timeline.markers.get(index)?.start();
        self.seek(start, now_ms)
    }

    /// Start playing every silent region in turn
    pub fn start_silence_review(&mut self, now_ms: f64) {
        if !self.timeline.is_loaded() {
            return;
        }
        let action = self.playlist.start(&self.timeline.markers);
        self.apply_playlist_action(action, now_ms);
    }

    /// Advance the silence review; call periodically while it runs
    pub fn poll_silence_review(&mut self, now_ms: f64) -> PlaylistAction {
        let time = self.current_time();
        let paused = !self.playback.is_playing();
        let action = self.playlist.poll(now_ms, time, paused);
        self.apply_playlist_action(action, now_ms);
        action
    }

    pub fn cancel_silence_review(&mut self) {
        self.playlist.cancel();
    }

    pub fn silence_review_running(&self) -> bool {
        self.playlist.is_running()
    }

    fn apply_playlist_action(&mut self, action: PlaylistAction, now_ms: f64) {
        match action {
            PlaylistAction::PlayRegion { selection, .. } => {
                self.timeline.selection = selection;
                self.emit_selection();
                self.seek_from(selection.start, SeekSource::User, now_ms);
                self.play();
            }
            PlaylistAction::Finish => self.pause(),
            PlaylistAction::Wait => {}
        }
    }

    // -------------------------------------------------------------------------
    // Project import/export
    // -------------------------------------------------------------------------

    /// Markers as a frame-based project at the current frame rate
    pub fn export_project(&self) -> ProjectFile {
        ProjectFile::from_markers(self.timeline.markers.iter(), self.frame_rate)
    }

    /// Replace all markers with the project's clips, adopting its frame rate
    ///
    /// With media loaded, clips are clamped to its duration and clips lying
    /// entirely past the end are dropped. Returns the number of imported
    /// markers. On error nothing changes.
    pub fn import_project(&mut self, project: &ProjectFile) -> ProjectResult<usize> {
        let (frame_rate, mut markers) = project.to_markers()?;
        if let Some(duration) = self.timeline.duration() {
            let total = markers.len();
            markers = markers
                .into_iter()
                .filter_map(|m| m.clamped_to(duration))
                .collect();
            if markers.len() < total {
                log::warn!(
                    "import_project: dropped {} clips past the media end",
                    total - markers.len()
                );
            }
        }
        let count = markers.len();
        self.interaction.cancel();
        self.timeline.markers.replace_all(markers);
        self.set_frame_rate(frame_rate);
        self.emit(EditorEvent::MarkersChanged);
        self.emit_active();
        log::info!("import_project: {} markers at {}", count, frame_rate);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::tests::FakeClock;

    type TestEditor = Editor<FakeClock, FakeClock>;

    fn editor() -> TestEditor {
        let mut editor = Editor::new(FakeClock::new(), EditorConfig::default());
        editor.load_media(Some(100.0));
        editor.drain_events();
        editor
    }

    fn loud_middle() -> WaveformPeaks {
        WaveformPeaks::from_samples(
            (0..1000)
                .map(|i| if (400..600).contains(&i) { 0.5 } else { 0.0 })
                .collect(),
        )
    }

    #[test]
    fn test_unloaded_editor_is_inert() {
        let mut editor: TestEditor = Editor::new(FakeClock::new(), EditorConfig::default());
        assert_eq!(editor.seek(10.0, 0.0), None);
        editor.set_in_point();
        assert_eq!(editor.add_marker_from_selection(), None);
        assert!(!editor.load_marker(0, 0.0));
        assert_eq!(editor.next_marker(0.0), None);
        editor.pause();
        assert!(editor.drain_events().is_empty());
    }

    #[test]
    fn test_add_marker_from_selection_makes_it_active() {
        let mut editor = editor();
        editor.markers_mut_for_test().add(Marker::new(50.0, 60.0));
        editor.timeline.set_selection(10.0, 20.0);
        let index = editor.add_marker_from_selection().unwrap();
        assert_eq!(index, 0);
        assert_eq!(editor.markers().active_index(), Some(0));
        assert!(editor.drain_events().contains(&EditorEvent::ActiveMarkerChanged(Some(0))));
    }

    #[test]
    fn test_load_marker_selects_zooms_and_seeks() {
        let mut editor = editor();
        editor.markers_mut_for_test().add(Marker::new(10.0, 20.0));
        assert!(editor.load_marker(0, 0.0));
        assert_eq!(editor.selection(), Selection::new(10.0, 20.0));
        assert!((editor.zoom_window().start() - 9.0).abs() < 1e-9);
        assert!((editor.zoom_window().end() - 21.0).abs() < 1e-9);
        assert!((editor.current_time() - 10.0).abs() < 1e-9);
        assert_eq!(editor.markers().active_index(), Some(0));
    }

    #[test]
    fn test_set_in_out_points() {
        let mut editor = editor();
        editor.seek(30.0, 0.0);
        editor.set_in_point();
        assert_eq!(editor.selection(), Selection::new(30.0, 100.0));
        editor.seek(40.0, 100.0);
        editor.set_out_point();
        assert_eq!(editor.selection(), Selection::new(30.0, 40.0));

        // Out point before the in point collapses the selection
        editor.seek(10.0, 200.0);
        editor.set_out_point();
        assert_eq!(editor.selection(), Selection::new(10.0, 10.0));
        assert!(editor.zoom_window().range() > 0.0);
    }

    #[test]
    fn test_precise_range_anchors() {
        let mut editor = editor();
        editor.seek(50.0, 0.0);
        editor.set_precise_range(10.0, RangeAnchor::In);
        assert_eq!(editor.selection(), Selection::new(50.0, 60.0));
        editor.set_precise_range(10.0, RangeAnchor::Out);
        assert_eq!(editor.selection(), Selection::new(40.0, 50.0));
        editor.set_precise_range(10.0, RangeAnchor::Mid);
        assert_eq!(editor.selection(), Selection::new(45.0, 55.0));

        editor.seek(98.0, 100.0);
        editor.set_precise_range(10.0, RangeAnchor::In);
        assert_eq!(editor.selection(), Selection::new(98.0, 100.0));
    }

    #[test]
    fn test_reset_zoom_deselects() {
        let mut editor = editor();
        editor.markers_mut_for_test().add(Marker::new(10.0, 20.0));
        editor.load_marker(0, 0.0);
        editor.reset_zoom();
        assert_eq!(editor.selection(), Selection::new(0.0, 100.0));
        assert!(editor.zoom_window().is_full());
        assert_eq!(editor.markers().active_index(), None);
    }

    #[test]
    fn test_edit_marker() {
        let mut editor = editor();
        editor.set_frame_rate(FrameRate::new(25.0).unwrap());
        editor.markers_mut_for_test().add(Marker::new(10.0, 20.0));
        editor.markers_mut_for_test().add(Marker::new(30.0, 40.0));

        assert!(editor.edit_marker(1, "moved", Some("00:00:05:00"), Some("00:00:06:12")));
        assert_eq!(editor.markers().get(0).unwrap().label(), Some("moved"));
        assert!((editor.markers().get(0).unwrap().end() - 6.48).abs() < 1e-9);

        // Reversed bounds are ignored, the label still changes
        assert!(!editor.edit_marker(0, "kept", Some("00:00:09:00"), Some("00:00:08:00")));
        assert_eq!(editor.markers().get(0).unwrap().label(), Some("kept"));
        assert!((editor.markers().get(0).unwrap().start() - 5.0).abs() < 1e-9);

        // Malformed timecode is ignored
        assert!(!editor.edit_marker(0, "", Some("5:00"), Some("00:00:08:00")));
        assert!(editor.markers().get(0).unwrap().comments.is_empty());
    }

    #[test]
    fn test_marker_navigation_loads() {
        let mut editor = editor();
        editor.markers_mut_for_test().add(Marker::new(10.0, 12.0));
        editor.markers_mut_for_test().add(Marker::new(30.0, 32.0));
        editor.seek(15.0, 0.0);
        assert_eq!(editor.next_marker(100.0), Some(1));
        assert_eq!(editor.markers().active_index(), Some(1));
        assert!((editor.current_time() - 30.0).abs() < 1e-9);
        assert_eq!(editor.next_marker(200.0), Some(0));
    }

    #[test]
    fn test_press_timeline_deselects_and_seeks() {
        let mut editor = editor();
        editor.markers_mut_for_test().add(Marker::new(10.0, 20.0));
        editor.load_marker(0, 0.0);
        editor.press_timeline(70.0, 100.0);
        assert_eq!(editor.markers().active_index(), None);
        assert!((editor.current_time() - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_gesture_through_editor() {
        let mut editor = editor();
        editor.markers_mut_for_test().add(Marker::new(10.0, 20.0));
        let outcome = editor.press_marker(0, MarkerZone::RightHandle, 200.0, 0.0);
        assert_eq!(outcome.load, Some(0));
        editor.pointer_move(250.0, 1000.0, 20.0);
        editor.pointer_up(1000.0, 40.0);

        let marker = editor.markers().get(0).unwrap();
        assert!((marker.end() - 25.0).abs() < 1e-9);
        assert_eq!(editor.selection(), Selection::new(10.0, 25.0));
        assert_eq!(editor.markers().active_index(), None);
        assert_eq!(editor.gesture(), GestureState::Idle);
    }

    #[test]
    fn test_silence_requires_waveform() {
        let mut editor = editor();
        assert_eq!(
            editor.request_silence_detection(),
            Err(DetectionStatus::WaveformNotReady)
        );
        assert!(editor
            .drain_events()
            .contains(&EditorEvent::Status("Please load a video with a waveform first.".into())));
    }

    #[test]
    fn test_silence_detection_and_padding() {
        let mut editor = editor();
        editor.attach_waveform(FakeClock::new());
        editor.waveform_ready(loud_middle());
        editor.request_silence_detection().unwrap();
        assert_eq!(editor.run_silence_detection(), DetectionStatus::Found(2));
        assert_eq!(editor.markers().silent_count(), 2);

        editor.silence_mut().set_padding(0.5);
        editor.remove_padding();
        let first = editor.markers().get(0).unwrap();
        assert!((first.start() - 0.5).abs() < 1e-9);
        assert!((first.end() - 39.5).abs() < 1e-9);

        editor.add_padding();
        let first = editor.markers().get(0).unwrap();
        assert!(first.start().abs() < 1e-9);
        assert!((first.end() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_silent_navigation_seeks_without_loading() {
        let mut editor = editor();
        editor.markers_mut_for_test().add(Marker::silent(10.0, 12.0, 1));
        editor.markers_mut_for_test().add(Marker::new(20.0, 22.0));
        editor.markers_mut_for_test().add(Marker::silent(30.0, 32.0, 2));
        editor.seek(11.0, 0.0);
        assert_eq!(editor.next_silent_region(100.0), Some(30.0));
        assert_eq!(editor.markers().active_index(), None);
        assert_eq!(editor.next_silent_region(200.0), Some(10.0));
        assert_eq!(editor.previous_silent_region(300.0), Some(30.0));
    }

    #[test]
    fn test_frame_rate_promoted_by_detector() {
        let mut editor = editor();
        for n in 0..40u64 {
            editor.on_presented_frame(PresentedFrame {
                media_time: n as f64 / 25.0,
                presented_frames: n,
                playback_rate: 1.0,
                has_focus: true,
            });
        }
        assert_eq!(editor.frame_rate().fps(), 25.0);
        assert!(editor
            .drain_events()
            .iter()
            .any(|e| matches!(e, EditorEvent::FrameRateChanged(_))));
    }

    #[test]
    fn test_manual_frame_rate_survives_detection() {
        let mut editor = editor();
        let frame = |n: u64| PresentedFrame {
            media_time: n as f64 / 25.0,
            presented_frames: n,
            playback_rate: 1.0,
            has_focus: true,
        };
        for n in 0..26 {
            editor.on_presented_frame(frame(n));
        }
        assert_eq!(editor.frame_rate().fps(), 25.0);

        editor.set_frame_rate(FrameRate::new(30.0).unwrap());
        for n in 26..45 {
            editor.on_presented_frame(frame(n));
        }
        assert_eq!(editor.frame_rate().fps(), 30.0);
    }

    #[test]
    fn test_pause_forces_redraw() {
        let mut editor = editor();
        editor.seek(12.0, 0.0);
        editor.play();
        editor.drain_events();
        editor.pause();
        assert_eq!(editor.drain_events(), vec![EditorEvent::PlayheadRedraw(12.0)]);
        let tick = editor.animation_frame(100.0);
        assert!(!tick.rescheduled);
    }

    #[test]
    fn test_project_roundtrip_through_editor() {
        let mut editor = editor();
        editor.markers_mut_for_test().add(Marker::new(1.0, 2.0).with_label("a"));
        let project = editor.export_project();
        editor.load_media(Some(100.0));
        assert!(editor.markers().is_empty());
        assert_eq!(editor.import_project(&project).unwrap(), 1);
        assert_eq!(editor.markers().get(0).unwrap().label(), Some("a"));
    }

    #[test]
    fn test_import_clamps_to_media() {
        let mut editor = editor();
        let project = ProjectFile::from_json(
            r#"{"frame_rate": 25.0, "clips": [
                {"id": "1", "start": 250, "end": 500},
                {"id": "2", "start": 2400, "end": 2600},
                {"id": "3", "start": 2750, "end": 3000}
            ]}"#,
        )
        .unwrap();
        assert_eq!(editor.import_project(&project).unwrap(), 2);

        let last = editor.markers().get(1).unwrap();
        assert!((last.start() - 96.0).abs() < 1e-9);
        assert!((last.end() - 100.0).abs() < 1e-9);
        assert!((last.duration() - 4.0).abs() < 1e-9);
        assert!(editor.markers().iter().all(|m| m.end() <= 100.0));
    }

    impl TestEditor {
        fn markers_mut_for_test(&mut self) -> &mut MarkerStore {
            &mut self.timeline.markers
        }
    }
}
