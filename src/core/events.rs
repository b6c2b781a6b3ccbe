//! Typed event bus for playback ticks and remote-control commands.
//!
//! Replaces the stringly-typed window events the web build used: the player
//! owns an [`EventBus`], time-display widgets subscribe to ticks without
//! touching the heavier editor store, and the remote server feeds commands
//! in through the same bus.

use tokio::sync::broadcast;

/// Broadcast from the render loop at tick frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackTick {
    /// Current elapsed time on the merged timeline, in seconds.
    pub time: f64,
    /// True while the player is in the playing phase.
    pub is_playing: bool,
}

/// A command from an out-of-process control surface.
///
/// These map 1:1 onto the same handlers the on-screen buttons use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RemoteEvent {
    Play,
    Pause,
    Stop,
    NextSegment,
    PrevSegment,
    /// Speed multiplier, clamped by the sender to [0.5, 2.0].
    SetSpeed(f64),
    /// Absolute position in seconds.
    Seek(f64),
    ResetPosition,
}

/// Channel capacity; slow subscribers drop old ticks rather than blocking.
const CHANNEL_CAPACITY: usize = 64;

/// Owner of the broadcast channels. Cheap to clone and hand to components.
#[derive(Debug, Clone)]
pub struct EventBus {
    ticks: broadcast::Sender<PlaybackTick>,
    remote: broadcast::Sender<RemoteEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (ticks, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (remote, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { ticks, remote }
    }

    /// Publish a playback tick. Lagging receivers miss ticks, never block.
    pub fn emit_tick(&self, tick: PlaybackTick) {
        let _ = self.ticks.send(tick);
    }

    /// Publish a remote command.
    pub fn emit_remote(&self, event: RemoteEvent) {
        let _ = self.remote.send(event);
    }

    /// Subscribe to playback ticks.
    pub fn subscribe_ticks(&self) -> broadcast::Receiver<PlaybackTick> {
        self.ticks.subscribe()
    }

    /// Subscribe to remote commands.
    pub fn subscribe_remote(&self) -> broadcast::Receiver<RemoteEvent> {
        self.remote.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_reaches_subscriber() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe_ticks();
        bus.emit_tick(PlaybackTick {
            time: 1.5,
            is_playing: true,
        });
        let tick = rx.try_recv().unwrap();
        assert_eq!(tick.time, 1.5);
    }

    #[test]
    fn test_emit_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.emit_remote(RemoteEvent::Play);
    }
}
