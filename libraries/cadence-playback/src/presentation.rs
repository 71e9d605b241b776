//! Presentation sync
//!
//! Pure view-models for the player's UI surfaces. Each surface consumes the
//! same [`PlayerEvent`] stream independently, so a layout with two progress
//! bars (desktop and mobile) simply subscribes two [`ProgressBar`]s. The
//! DOM layer only copies these fields into elements.

use crate::events::PlayerEvent;
use crate::types::{PlayerState, RepeatMode, Track};
use std::collections::HashMap;

/// Cover shown when a track has no artwork
pub const PLACEHOLDER_COVER: &str = "https://via.placeholder.com/64?text=Art";

/// A UI surface that follows player notifications
pub trait PresentationSync {
    fn apply(&mut self, event: &PlayerEvent);
}

/// Deliver every event to every surface, in order
pub fn publish(events: &[PlayerEvent], surfaces: &mut [&mut dyn PresentationSync]) {
    for event in events {
        for surface in surfaces.iter_mut() {
            surface.apply(event);
        }
    }
}

/// Format seconds as `m:ss`
///
/// Non-finite or negative input renders as `0:00`.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "0:00".to_string();
    }

    let total = secs.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Horizontal click position as a ratio of the element's width
///
/// Not clamped; the player clamps seek and volume ratios itself.
pub fn pointer_ratio(client_x: f64, left: f64, width: f64) -> f64 {
    if width <= 0.0 || !width.is_finite() {
        return 0.0;
    }
    (client_x - left) / width
}

/// Progress bar with elapsed/total labels
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressBar {
    /// Filled portion in [0, 1]
    pub fraction: f64,
    pub elapsed: String,
    pub total: String,
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self {
            fraction: 0.0,
            elapsed: format_time(0.0),
            total: format_time(0.0),
        }
    }
}

impl ProgressBar {
    /// Fill width as a CSS percentage
    pub fn width_percent(&self) -> f64 {
        self.fraction * 100.0
    }
}

impl PresentationSync for ProgressBar {
    fn apply(&mut self, event: &PlayerEvent) {
        match event {
            PlayerEvent::Progress {
                current_time,
                duration,
            } => {
                self.fraction = event.progress_fraction().unwrap_or(0.0);
                self.elapsed = format_time(*current_time);
                self.total = format_time(*duration);
            }
            PlayerEvent::TrackChanged { .. } | PlayerEvent::QueueLoaded { .. } => {
                *self = Self::default();
            }
            _ => {}
        }
    }
}

/// Title, artist and artwork of the selected track
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NowPlaying {
    pub title: String,
    pub artist: String,
    pub cover_url: String,
}

impl PresentationSync for NowPlaying {
    fn apply(&mut self, event: &PlayerEvent) {
        match event {
            PlayerEvent::TrackChanged { track, .. } => {
                self.title.clone_from(&track.title);
                self.artist.clone_from(&track.artist);
                self.cover_url = if track.cover_url.is_empty() {
                    PLACEHOLDER_COVER.to_string()
                } else {
                    track.cover_url.clone()
                };
            }
            PlayerEvent::QueueLoaded { .. } => *self = Self::default(),
            _ => {}
        }
    }
}

/// One row of the track list
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRow {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration_label: String,
    pub cover_url: String,
}

impl From<&Track> for TrackRow {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            duration_label: track.duration_label.clone(),
            cover_url: track.cover_url.clone(),
        }
    }
}

/// Track list in playback order with the active row marked
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackList {
    pub rows: Vec<TrackRow>,
    pub active: Option<usize>,
}

impl TrackList {
    /// Badge text, e.g. "12 tracks"
    pub fn count_label(&self) -> String {
        format!("{} tracks", self.rows.len())
    }

    pub fn is_active(&self, row: usize) -> bool {
        self.active == Some(row)
    }

    fn reorder(&mut self, track_ids: &[String]) {
        let mut by_id: HashMap<String, TrackRow> = self
            .rows
            .drain(..)
            .map(|row| (row.id.clone(), row))
            .collect();

        self.rows = track_ids.iter().filter_map(|id| by_id.remove(id)).collect();
    }
}

impl PresentationSync for TrackList {
    fn apply(&mut self, event: &PlayerEvent) {
        match event {
            PlayerEvent::QueueLoaded { tracks } => {
                self.rows = tracks.iter().map(TrackRow::from).collect();
                self.active = None;
            }
            PlayerEvent::QueueReordered {
                track_ids,
                current_index,
            } => {
                self.reorder(track_ids);
                self.active = *current_index;
            }
            PlayerEvent::TrackChanged { index, .. } => self.active = Some(*index),
            _ => {}
        }
    }
}

/// Play/pause, shuffle and repeat buttons
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportControls {
    /// False until a non-empty queue is loaded
    pub enabled: bool,
    pub is_playing: bool,
    pub shuffle: bool,
    pub repeat: RepeatMode,
}

impl TransportControls {
    /// Controls reflecting an existing player snapshot
    pub fn from_state(state: &PlayerState, has_tracks: bool) -> Self {
        Self {
            enabled: has_tracks,
            is_playing: state.is_playing,
            shuffle: state.is_shuffle,
            repeat: state.repeat_mode,
        }
    }

    /// Icon for the play/pause button
    pub fn play_icon(&self) -> &'static str {
        if self.is_playing {
            "pause"
        } else {
            "play"
        }
    }

    /// Repeat button highlight
    pub fn repeat_active(&self) -> bool {
        self.repeat != RepeatMode::Off
    }
}

impl PresentationSync for TransportControls {
    fn apply(&mut self, event: &PlayerEvent) {
        match event {
            PlayerEvent::QueueLoaded { tracks } => {
                self.enabled = !tracks.is_empty();
                self.is_playing = false;
            }
            PlayerEvent::PlaybackStateChanged { is_playing, .. } => self.is_playing = *is_playing,
            PlayerEvent::ShuffleChanged { enabled } => self.shuffle = *enabled,
            PlayerEvent::RepeatModeChanged { mode } => self.repeat = *mode,
            _ => {}
        }
    }
}

/// Volume slider fill
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeSlider {
    pub volume: f32,
}

impl VolumeSlider {
    pub fn new(volume: f32) -> Self {
        Self { volume }
    }

    pub fn width_percent(&self) -> f32 {
        self.volume * 100.0
    }
}

impl PresentationSync for VolumeSlider {
    fn apply(&mut self, event: &PlayerEvent) {
        if let PlayerEvent::VolumeChanged { volume } = event {
            self.volume = *volume;
        }
    }
}
