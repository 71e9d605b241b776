//! Player session driven by console commands
//!
//! Owns the player, answers its play requests on the simulated device and
//! keeps the presentation surfaces in sync after every command.

use crate::{
    commands::Command,
    config::ConsoleConfig,
    device::{SimulatedDevice, TickOutcome},
};
use anyhow::Context;
use cadence_playback::{
    presentation::{
        self, NowPlaying, PresentationSync, ProgressBar, TrackList, TransportControls,
        VolumeSlider,
    },
    Direction, Player, PlayerError, PlayerEvent, Result, Track,
};
use std::path::Path;
use tracing::{debug, info, warn};

/// Whether the input loop should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    player: Player<SimulatedDevice>,
    config: ConsoleConfig,

    // Presentation surfaces
    now_playing: NowPlaying,
    progress: ProgressBar,
    track_list: TrackList,
    controls: TransportControls,
    volume: VolumeSlider,

    // Notifications produced by the last command
    last_events: Vec<PlayerEvent>,
}

impl Session {
    /// Start a session over `tracks`
    ///
    /// An empty list is not fatal: the session starts with the transport
    /// disabled and every transport command reports the empty queue.
    pub fn new(tracks: Vec<Track>, config: ConsoleConfig) -> Self {
        let device = SimulatedDevice::for_tracks(&tracks);
        let player = Player::new(device, config.player.clone());

        let mut session = Self {
            controls: TransportControls::from_state(&player.snapshot(), false),
            volume: VolumeSlider::new(player.volume()),
            player,
            config,
            now_playing: NowPlaying::default(),
            progress: ProgressBar::default(),
            track_list: TrackList::default(),
            last_events: Vec::new(),
        };

        match session.player.load(tracks) {
            Ok(()) => info!(tracks = session.player.queue().len(), "Queue ready"),
            Err(PlayerError::EmptyQueue) => warn!("Track list is empty, transport disabled"),
            Err(e) => warn!(error = %e, "Failed to load tracks"),
        }
        session.sync();
        session
    }

    /// Replace the queue with a new track list
    pub fn reload(&mut self, tracks: Vec<Track>) -> Result<()> {
        self.player.device_mut().learn(&tracks);
        self.player.load(tracks)?;
        self.sync();
        Ok(())
    }

    /// Run one command
    ///
    /// Queue errors leave the player untouched and are returned to the
    /// caller for display.
    pub fn execute(&mut self, command: Command) -> Result<Flow> {
        debug!(?command, "Executing");

        match command {
            Command::Play(index) => self.player.play_track_at(index)?,
            Command::Toggle => self.player.toggle_play_pause()?,
            Command::Next => self.player.advance(Direction::Next)?,
            Command::Previous => self.player.advance(Direction::Previous)?,
            Command::Shuffle => {
                self.player.toggle_shuffle();
            }
            Command::Repeat => {
                self.player.cycle_repeat();
            }
            Command::Seek(fraction) => self.player.seek_to(fraction),
            Command::Volume(volume) => self.player.set_volume(volume),
            Command::Tick(secs) => self.tick(secs)?,
            Command::Fail => self.player.device_mut().arm_rejection(),
            Command::Status | Command::Help => {}
            Command::Quit => return Ok(Flow::Quit),
        }

        self.settle();
        self.sync();
        Ok(Flow::Continue)
    }

    // ===== Accessors =====

    pub fn player(&self) -> &Player<SimulatedDevice> {
        &self.player
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn now_playing(&self) -> &NowPlaying {
        &self.now_playing
    }

    pub fn progress(&self) -> &ProgressBar {
        &self.progress
    }

    pub fn track_list(&self) -> &TrackList {
        &self.track_list
    }

    pub fn controls(&self) -> &TransportControls {
        &self.controls
    }

    pub fn volume_slider(&self) -> &VolumeSlider {
        &self.volume
    }

    pub fn last_events(&self) -> &[PlayerEvent] {
        &self.last_events
    }

    // ===== Internal =====

    /// Time past the end of a track is dropped.
    fn tick(&mut self, secs: f64) -> Result<()> {
        match self.player.device_mut().tick(secs) {
            TickOutcome::Idle => debug!("Clock idle"),
            TickOutcome::Advanced => self.player.on_time_update(),
            TickOutcome::Finished => {
                self.player.on_time_update();
                self.player.on_playback_finished()?;
            }
        }
        Ok(())
    }

    /// Answer every outstanding play request in issue order
    fn settle(&mut self) {
        while let Some(request) = self.player.device_mut().take_issued() {
            let outcome = self.player.device_mut().outcome();
            self.player.on_play_resolved(request, outcome);
        }
    }

    fn sync(&mut self) {
        let events = self.player.drain_events();
        presentation::publish(
            &events,
            &mut [
                &mut self.now_playing as &mut dyn PresentationSync,
                &mut self.progress,
                &mut self.track_list,
                &mut self.controls,
                &mut self.volume,
            ],
        );
        self.last_events = events;
    }
}

/// Read a JSON array of tracks
pub fn read_tracks(path: &Path) -> anyhow::Result<Vec<Track>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid track list in {}", path.display()))
}
