//! Fullscreen playback engine.
//!
//! Player does NOT own the project or the audio engine. It manages playback
//! state only; the app's render loop calls [`Player::tick`] with the
//! current project and (when a track is attached) the audio playhead, and
//! syncs the audio engine on the transitions this module reports. Entering
//! or leaving playback never mutates authoring selection or view state.
//!
//! # State machine
//!
//! `Idle -> Countdown -> Playing`, with `Countdown` skipped when the
//! pre-roll is disabled. `Playing -> Idle` on toggle (position kept) or on
//! reaching the total duration (position reset to 0). Escape cancels a
//! running countdown back to `Idle`.
//!
//! # Timing model
//!
//! With an audio track attached the audio playhead is the authoritative
//! clock; without one, a wall-clock delta scaled by the speed multiplier
//! accumulates into the position. A short guard window after every manual
//! seek keeps the loop from fighting the just-set time with a stale audio
//! playhead.

use std::time::{Duration, Instant};

use crate::core::events::{EventBus, PlaybackTick};
use crate::core::{coordinator, timeline};
use crate::state::{Project, Segment};

/// Coordinator key for the fullscreen player surface.
pub const PLAYER_OWNER_KEY: &str = "fullscreen-player";

/// Window after a manual seek during which a stale audio clock is ignored.
const SEEK_GUARD: Duration = Duration::from_millis(250);

/// Speed multiplier bounds (shared with the remote protocol).
const SPEED_MIN: f64 = 0.5;
const SPEED_MAX: f64 = 2.0;

/// The player's phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPhase {
    /// Not playing; position frozen.
    Idle,
    /// Pre-roll counting down, whole seconds remaining.
    Countdown(u32),
    /// Render loop live.
    Playing,
}

/// What a call to [`Player::tick`] decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Nothing to do (not playing).
    Noop,
    /// Still playing; current position attached.
    Advanced(f64),
    /// Reached the end of the timeline; playback stopped, position reset.
    Finished,
}

/// Playback state manager (does NOT own Project or audio).
#[derive(Debug, Clone)]
pub struct Player {
    phase: PlayerPhase,
    /// Current position in seconds on the merged timeline.
    position: f64,
    /// Speed multiplier for the wall-clock path.
    speed: f64,
    muted: bool,
    /// Pre-roll length; zero disables the countdown entirely.
    pub countdown_seconds: u32,
    /// Audible beep on each countdown tick.
    pub countdown_beep: bool,
    last_tick: Option<Instant>,
    seek_guard_until: Option<Instant>,
}

impl Player {
    pub fn new() -> Self {
        Self {
            phase: PlayerPhase::Idle,
            position: 0.0,
            speed: 1.0,
            muted: false,
            countdown_seconds: 3,
            countdown_beep: true,
            last_tick: None,
            seek_guard_until: None,
        }
    }

    pub fn phase(&self) -> PlayerPhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == PlayerPhase::Playing
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Clamp and set the speed multiplier.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.clamp(SPEED_MIN, SPEED_MAX);
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Play/pause toggle.
    ///
    /// From `Idle` this enters the countdown (or goes straight to `Playing`
    /// when the pre-roll is disabled); from `Countdown` or `Playing` it
    /// drops back to `Idle`, remembering the paused position.
    pub fn toggle_play(&mut self) {
        match self.phase {
            PlayerPhase::Idle => {
                coordinator::stop_all_except(PLAYER_OWNER_KEY);
                if self.countdown_seconds > 0 {
                    self.phase = PlayerPhase::Countdown(self.countdown_seconds);
                } else {
                    self.start_playing();
                }
            }
            PlayerPhase::Countdown(_) | PlayerPhase::Playing => {
                self.phase = PlayerPhase::Idle;
                self.last_tick = None;
            }
        }
    }

    /// One 1-second countdown interval fired. Returns true when the beep
    /// should sound for this tick.
    pub fn countdown_tick(&mut self) -> bool {
        let PlayerPhase::Countdown(remaining) = self.phase else {
            return false;
        };
        if remaining <= 1 {
            self.start_playing();
        } else {
            self.phase = PlayerPhase::Countdown(remaining - 1);
        }
        self.countdown_beep
    }

    /// Cancel a running countdown (Escape).
    pub fn cancel_countdown(&mut self) {
        if matches!(self.phase, PlayerPhase::Countdown(_)) {
            self.phase = PlayerPhase::Idle;
        }
    }

    fn start_playing(&mut self) {
        self.phase = PlayerPhase::Playing;
        self.last_tick = None;
    }

    /// Stop and forget the position (remote "stop").
    pub fn stop(&mut self) {
        self.phase = PlayerPhase::Idle;
        self.position = 0.0;
        self.last_tick = None;
    }

    /// Total cleanup on window close: playback halts and the pre-roll state
    /// clears. The caller pauses/unloads audio and releases fullscreen.
    pub fn shutdown(&mut self) {
        self.phase = PlayerPhase::Idle;
        self.last_tick = None;
        self.seek_guard_until = None;
        coordinator::unregister(PLAYER_OWNER_KEY);
    }

    // =========================================================================
    // Render loop
    // =========================================================================

    /// Advance the clock by one loop iteration.
    ///
    /// `audio_clock` is the audio engine's playhead when a track is loaded;
    /// it wins over the wall clock except inside the post-seek guard
    /// window. Emits a tick on the bus every call while playing.
    pub fn tick(
        &mut self,
        project: &Project,
        audio_clock: Option<f64>,
        now: Instant,
        bus: &EventBus,
    ) -> TickOutcome {
        if self.phase != PlayerPhase::Playing {
            self.last_tick = None;
            return TickOutcome::Noop;
        }

        let guard_active = self
            .seek_guard_until
            .map(|until| now < until)
            .unwrap_or(false);

        match audio_clock {
            Some(clock) if !guard_active => {
                self.position = clock;
            }
            _ => {
                if let Some(last) = self.last_tick {
                    let delta = now.saturating_duration_since(last).as_secs_f64();
                    self.position += delta * self.speed;
                }
            }
        }
        self.last_tick = Some(now);

        let total = project.duration();
        if total > 0.0 && self.position >= total {
            self.phase = PlayerPhase::Idle;
            self.position = 0.0;
            self.last_tick = None;
            bus.emit_tick(PlaybackTick {
                time: 0.0,
                is_playing: false,
            });
            return TickOutcome::Finished;
        }

        bus.emit_tick(PlaybackTick {
            time: self.position,
            is_playing: true,
        });
        TickOutcome::Advanced(self.position)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// The visible segment to display right now, with its page index.
    pub fn current_segment<'a>(&self, project: &'a Project) -> Option<(usize, &'a Segment)> {
        timeline::segment_at(&project.pages, self.position)
    }

    /// Jump to the start of the next visible segment. Returns the new
    /// position for audio sync when something changed.
    pub fn skip_next(&mut self, project: &Project) -> Option<f64> {
        let next_start = timeline::global_segments_ordered(&project.pages)
            .into_iter()
            .filter(|s| !s.is_hidden)
            .map(|s| s.start_time)
            .filter(|start| *start > self.position + 1e-9)
            .fold(None::<f64>, |best, start| match best {
                Some(b) if b <= start => Some(b),
                _ => Some(start),
            })?;
        self.seek(next_start);
        Some(next_start)
    }

    /// Jump to the start of the previous visible segment (or the start of
    /// the current one when the position is mid-segment).
    pub fn skip_prev(&mut self, project: &Project) -> Option<f64> {
        let prev_start = timeline::global_segments_ordered(&project.pages)
            .into_iter()
            .filter(|s| !s.is_hidden)
            .map(|s| s.start_time)
            .filter(|start| *start < self.position - 1e-9)
            .fold(None::<f64>, |best, start| match best {
                Some(b) if b >= start => Some(b),
                _ => Some(start),
            })?;
        self.seek(prev_start);
        Some(prev_start)
    }

    /// Scrub from a progress-bar click: map the x-fraction to the total
    /// duration. Returns the new position for audio sync.
    pub fn scrub_fraction(&mut self, project: &Project, fraction: f64) -> f64 {
        let target = project.duration() * fraction.clamp(0.0, 1.0);
        self.seek(target);
        target
    }

    /// Set an absolute position and arm the post-seek guard.
    pub fn seek(&mut self, position: f64) {
        self.position = position.max(0.0);
        self.seek_guard_until = Some(Instant::now() + SEEK_GUARD);
        self.last_tick = None;
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Region;
    use uuid::Uuid;

    fn two_page_project() -> Project {
        // Page 0: A[0,5) B[5,10); page 1: C[10,15).
        let mut project = Project::new("Playback");
        project.add_page(Uuid::new_v4(), false);
        project.add_segment(0, Region::new(0.0, 0.0, 40.0, 40.0));
        project.add_segment(0, Region::new(40.0, 0.0, 40.0, 40.0));
        project.add_page(Uuid::new_v4(), false);
        project.add_segment(1, Region::new(0.0, 40.0, 40.0, 40.0));
        project
    }

    #[test]
    fn test_countdown_path() {
        let mut player = Player::new();
        player.countdown_seconds = 2;
        player.toggle_play();
        assert_eq!(player.phase(), PlayerPhase::Countdown(2));
        player.countdown_tick();
        assert_eq!(player.phase(), PlayerPhase::Countdown(1));
        player.countdown_tick();
        assert_eq!(player.phase(), PlayerPhase::Playing);
    }

    #[test]
    fn test_countdown_disabled_goes_straight_to_playing() {
        let mut player = Player::new();
        player.countdown_seconds = 0;
        player.toggle_play();
        assert_eq!(player.phase(), PlayerPhase::Playing);
    }

    #[test]
    fn test_escape_cancels_countdown() {
        let mut player = Player::new();
        player.toggle_play();
        player.cancel_countdown();
        assert_eq!(player.phase(), PlayerPhase::Idle);
    }

    #[test]
    fn test_pause_remembers_position() {
        let project = two_page_project();
        let bus = EventBus::new();
        let mut player = Player::new();
        player.countdown_seconds = 0;
        player.toggle_play();

        let start = Instant::now();
        player.tick(&project, None, start, &bus);
        player.tick(&project, None, start + Duration::from_secs(2), &bus);
        assert!((player.position() - 2.0).abs() < 1e-6);

        player.toggle_play();
        assert_eq!(player.phase(), PlayerPhase::Idle);
        assert!((player.position() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_speed_scales_wall_clock() {
        let project = two_page_project();
        let bus = EventBus::new();
        let mut player = Player::new();
        player.countdown_seconds = 0;
        player.set_speed(2.0);
        player.toggle_play();

        let start = Instant::now();
        player.tick(&project, None, start, &bus);
        player.tick(&project, None, start + Duration::from_secs(3), &bus);
        assert!((player.position() - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_audio_clock_is_authoritative() {
        let project = two_page_project();
        let bus = EventBus::new();
        let mut player = Player::new();
        player.countdown_seconds = 0;
        player.toggle_play();

        let start = Instant::now();
        player.tick(&project, Some(7.25), start, &bus);
        assert_eq!(player.position(), 7.25);
    }

    #[test]
    fn test_finishes_and_resets_at_total_duration() {
        let project = two_page_project();
        assert_eq!(project.duration(), 15.0);
        let bus = EventBus::new();
        let mut player = Player::new();
        player.countdown_seconds = 0;
        player.toggle_play();

        let start = Instant::now();
        player.tick(&project, None, start, &bus);
        let outcome = player.tick(&project, None, start + Duration::from_secs(20), &bus);
        assert_eq!(outcome, TickOutcome::Finished);
        assert_eq!(player.phase(), PlayerPhase::Idle);
        assert_eq!(player.position(), 0.0);
    }

    #[test]
    fn test_scrub_resolves_segment_and_page() {
        let project = two_page_project();
        let mut player = Player::new();
        player.scrub_fraction(&project, 12.0 / 15.0);
        let (page_index, segment) = player.current_segment(&project).unwrap();
        assert_eq!(page_index, 1);
        assert_eq!(segment.start_time, 10.0);
    }

    #[test]
    fn test_skip_next_and_prev() {
        let project = two_page_project();
        let mut player = Player::new();
        assert_eq!(player.skip_next(&project), Some(5.0));
        assert_eq!(player.skip_next(&project), Some(10.0));
        assert_eq!(player.skip_next(&project), None);
        assert_eq!(player.skip_prev(&project), Some(5.0));
        assert_eq!(player.skip_prev(&project), Some(0.0));
        assert_eq!(player.skip_prev(&project), None);
    }

    #[test]
    fn test_gap_resolution_holds_previous_segment() {
        // A[0,5) and C[10,15) with a gap in between.
        let mut project = Project::new("Gap");
        project.chain_mode = false;
        project.add_page(Uuid::new_v4(), false);
        let a = project
            .add_segment(0, Region::new(0.0, 0.0, 40.0, 40.0))
            .unwrap();
        let c = project
            .add_segment(0, Region::new(40.0, 0.0, 40.0, 40.0))
            .unwrap();
        project.update_segment_times(a, Some(0.0), Some(5.0));
        project.update_segment_times(c, Some(10.0), Some(15.0));

        let mut player = Player::new();
        player.seek(7.0);
        let (_, segment) = player.current_segment(&project).unwrap();
        assert_eq!(segment.id, a);
    }
}
