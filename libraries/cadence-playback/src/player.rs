//! Player state machine
//!
//! Owns the queue and the playback device, mediates every transition and
//! reconciles device callbacks with the user's latest intent.
//!
//! ```text
//!          play_track_at / resume
//!   Idle ───────────────────────▶ Loading ──resolved ok──▶ Playing
//!                                   │  ▲                      │
//!                      rejected /   │  │ advance, repeat one  │ pause, end of queue
//!                      device error ▼  │                      ▼
//!                                  Paused ◀───────────────────┘
//! ```
//!
//! Play requests are asynchronous. Each one carries a [`PlayRequest`] token
//! and only the latest token may change state; anything older was superseded
//! by a newer command and is dropped.

use crate::{
    config::PlayerConfig,
    device::{PlayRequest, PlaybackDevice},
    error::{PlayerError, Result},
    events::PlayerEvent,
    queue::Queue,
    types::{Direction, PlaybackState, PlayerState, RepeatMode, Track},
};
use rand::Rng;
use tracing::{debug, warn};

/// Playlist player
///
/// Generic over the device so the same state machine drives the browser
/// audio element, the console's simulated clock and the test doubles.
pub struct Player<D: PlaybackDevice> {
    device: D,
    queue: Queue,
    state: PlaybackState,
    volume: f32,
    shuffle_on_load: bool,

    // Latest outstanding play request, if any
    pending_request: Option<PlayRequest>,
    next_request: PlayRequest,

    // Event queue for presentation sync
    pending_events: Vec<PlayerEvent>,
}

impl<D: PlaybackDevice> Player<D> {
    /// Create a player around a device
    ///
    /// The configured volume is applied to the device right away.
    pub fn new(mut device: D, config: PlayerConfig) -> Self {
        let volume = clamp_volume(config.initial_volume).unwrap_or(1.0);
        device.set_volume(volume);

        let mut queue = Queue::new();
        queue.set_repeat(config.repeat);

        Self {
            device,
            queue,
            state: PlaybackState::Idle,
            volume,
            shuffle_on_load: config.shuffle,
            pending_request: None,
            next_request: PlayRequest::first(),
            pending_events: Vec::new(),
        }
    }

    // ===== Queue =====

    /// Replace the track list
    ///
    /// Stops whatever was playing. An empty list fails with
    /// [`PlayerError::EmptyQueue`], a list where two tracks share an id with
    /// [`PlayerError::DuplicateTrackId`]; either leaves the player untouched.
    pub fn load(&mut self, tracks: Vec<Track>) -> Result<()> {
        let was_shuffled = self.queue.is_shuffled();
        self.queue.load(tracks)?;

        self.device.pause();
        self.pending_request = None;
        self.set_state(PlaybackState::Idle);
        debug!(tracks = self.queue.len(), "Loaded queue");
        self.pending_events.push(PlayerEvent::QueueLoaded {
            tracks: self.queue.tracks().to_vec(),
        });

        if self.shuffle_on_load {
            self.toggle_shuffle();
        } else if was_shuffled {
            self.pending_events
                .push(PlayerEvent::ShuffleChanged { enabled: false });
        }
        Ok(())
    }

    /// Drop every track and return to `Idle`
    pub fn clear_queue(&mut self) {
        self.device.pause();
        self.pending_request = None;
        self.queue.clear();
        self.set_state(PlaybackState::Idle);
        self.pending_events
            .push(PlayerEvent::QueueLoaded { tracks: Vec::new() });
    }

    // ===== Transport =====

    /// Select the track at `index` and start playing it
    ///
    /// State becomes `Loading` until the device resolves the request.
    pub fn play_track_at(&mut self, index: usize) -> Result<()> {
        if self.queue.is_empty() {
            return Err(PlayerError::EmptyQueue);
        }

        let track = self.queue.select(index)?.clone();
        debug!(index, track_id = %track.id, "Playing track");

        self.device.pause();
        self.device.load(&track.source_url);
        self.pending_events
            .push(PlayerEvent::TrackChanged { index, track });
        self.request_play();
        Ok(())
    }

    /// Play/pause button
    ///
    /// Starts the first track when nothing is selected. A pending play
    /// request counts as playing, so pausing while loading cancels it.
    pub fn toggle_play_pause(&mut self) -> Result<()> {
        if self.queue.is_empty() {
            return Err(PlayerError::EmptyQueue);
        }

        if self.queue.current_index().is_none() {
            return self.play_track_at(0);
        }

        match self.state {
            PlaybackState::Playing | PlaybackState::Loading => self.pause(),
            PlaybackState::Paused | PlaybackState::Idle => {
                debug!("Resuming playback");
                self.request_play();
            }
        }
        Ok(())
    }

    /// Next/previous buttons
    ///
    /// Running off the end of the queue without repeat pauses on the last
    /// track instead of starting a new one.
    pub fn advance(&mut self, direction: Direction) -> Result<()> {
        if self.queue.is_empty() {
            return Err(PlayerError::EmptyQueue);
        }

        let current = self.queue.current_index();
        let target = match direction {
            Direction::Next => self.queue.resolve_next(current),
            Direction::Previous => self.queue.resolve_previous(current),
        };

        match target {
            Some(index) => self.play_track_at(index),
            None => {
                debug!(?current, "Reached end of queue");
                self.pause();
                Ok(())
            }
        }
    }

    /// Seek to a fraction of the current track
    ///
    /// Out-of-range fractions are clamped. Does nothing while the device
    /// does not know the duration.
    pub fn seek_to(&mut self, fraction: f64) {
        if fraction.is_nan() {
            return;
        }

        let Some(duration) = self.device.known_duration() else {
            debug!("Seek ignored, duration unknown");
            return;
        };

        let position = fraction.clamp(0.0, 1.0) * duration;
        self.device.set_current_time(position);
        self.pending_events.push(PlayerEvent::Progress {
            current_time: position,
            duration,
        });
    }

    /// Set output volume, clamped to [0, 1]
    pub fn set_volume(&mut self, fraction: f32) {
        let Some(volume) = clamp_volume(fraction) else {
            return;
        };

        self.volume = volume;
        self.device.set_volume(volume);
        self.pending_events
            .push(PlayerEvent::VolumeChanged { volume });
    }

    // ===== Shuffle & Repeat =====

    /// Toggle shuffle, keeping the current track selected
    pub fn toggle_shuffle(&mut self) -> bool {
        self.toggle_shuffle_with(&mut rand::thread_rng())
    }

    /// Toggle shuffle with an explicit random source
    pub fn toggle_shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let enabled = self.queue.toggle_shuffle_with(rng);
        debug!(enabled, "Shuffle toggled");

        self.pending_events
            .push(PlayerEvent::ShuffleChanged { enabled });
        self.pending_events.push(PlayerEvent::QueueReordered {
            track_ids: self.queue.tracks().iter().map(|t| t.id.clone()).collect(),
            current_index: self.queue.current_index(),
        });
        enabled
    }

    /// Advance repeat mode: Off → All → One → Off
    pub fn cycle_repeat(&mut self) -> RepeatMode {
        let mode = self.queue.cycle_repeat();
        self.pending_events
            .push(PlayerEvent::RepeatModeChanged { mode });
        mode
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        if self.queue.repeat_mode() == mode {
            return;
        }
        self.queue.set_repeat(mode);
        self.pending_events
            .push(PlayerEvent::RepeatModeChanged { mode });
    }

    // ===== Device callbacks =====

    /// Apply the outcome of a play request
    ///
    /// Returns `false` when the request was superseded and ignored.
    pub fn on_play_resolved(
        &mut self,
        request: PlayRequest,
        outcome: std::result::Result<(), String>,
    ) -> bool {
        if self.pending_request != Some(request) {
            debug!(%request, "Ignoring superseded play request");
            return false;
        }
        self.pending_request = None;

        match outcome {
            Ok(()) => self.set_state(PlaybackState::Playing),
            Err(reason) => self.reject(reason),
        }
        true
    }

    /// The current track played to its end
    pub fn on_playback_finished(&mut self) -> Result<()> {
        if self.queue.current_index().is_none() {
            return Ok(());
        }

        if self.queue.repeat_mode() == RepeatMode::One {
            debug!("Repeating current track");
            self.device.set_current_time(0.0);
            self.request_play();
            return Ok(());
        }

        self.advance(Direction::Next)
    }

    /// The device failed to load or decode the current track
    pub fn on_device_error(&mut self, reason: &str) {
        if self.queue.current_index().is_none() {
            return;
        }
        self.pending_request = None;
        self.reject(reason.to_string());
    }

    /// Periodic clock tick from the device
    pub fn on_time_update(&mut self) {
        if let Some(duration) = self.device.known_duration() {
            self.pending_events.push(PlayerEvent::Progress {
                current_time: self.device.current_time(),
                duration,
            });
        }
    }

    // ===== State Queries =====

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Snapshot of the visible player state
    pub fn snapshot(&self) -> PlayerState {
        PlayerState {
            current_index: self.queue.current_index(),
            is_playing: self.is_playing(),
            is_shuffle: self.queue.is_shuffled(),
            repeat_mode: self.queue.repeat_mode(),
            volume: self.volume,
        }
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.queue.current_track()
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Outstanding play request, if the device has not answered yet
    pub fn pending_request(&self) -> Option<PlayRequest> {
        self.pending_request
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    // ===== Events =====

    /// Take all queued notifications
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internal =====

    fn request_play(&mut self) {
        let request = self.next_request;
        self.next_request = request.next();
        self.pending_request = Some(request);

        self.set_state(PlaybackState::Loading);
        self.device.request_play(request);
    }

    fn pause(&mut self) {
        self.device.pause();
        self.pending_request = None;
        self.set_state(PlaybackState::Paused);
    }

    fn reject(&mut self, reason: String) {
        let track_id = self.queue.current_track().map(|t| t.id.clone());
        warn!(track_id = ?track_id, %reason, "Playback failed");

        self.device.pause();
        self.set_state(PlaybackState::Paused);
        self.pending_events
            .push(PlayerEvent::PlaybackRejected { track_id, reason });
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state == state {
            return;
        }
        self.state = state;
        self.pending_events.push(PlayerEvent::PlaybackStateChanged {
            state,
            is_playing: state == PlaybackState::Playing,
        });
    }
}

/// Clamp to [0, 1]; NaN is rejected
fn clamp_volume(volume: f32) -> Option<f32> {
    (!volume.is_nan()).then(|| volume.clamp(0.0, 1.0))
}
