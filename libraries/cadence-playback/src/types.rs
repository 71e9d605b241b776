//! Core types for playlist playback

use serde::{Deserialize, Serialize};

/// A playable entry in the track list
///
/// Supplied once by the surrounding UI and never mutated afterwards.
/// Field names serialize in camelCase so track lists coming from JS or JSON
/// files deserialize directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique identifier, used for identity across reorders
    pub id: String,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name
    #[serde(default)]
    pub album: String,

    /// Display duration as written in the track list (e.g. "3:45")
    #[serde(default)]
    pub duration_label: String,

    /// Cover art URL
    #[serde(default)]
    pub cover_url: String,

    /// Media URL handed to the playback device
    pub source_url: String,
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// No track selected
    #[default]
    Idle,

    /// Play request issued, waiting for the device
    Loading,

    /// Device confirmed playback
    Playing,

    /// Stopped mid-track or at the end of the queue
    Paused,
}

impl PlaybackState {
    /// Lowercase name used by the JS bindings and the console
    pub fn as_str(self) -> &'static str {
        match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Loading => "loading",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
        }
    }
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the queue ends
    #[default]
    Off,

    /// Loop the entire queue
    All,

    /// Loop the current track
    One,
}

impl RepeatMode {
    /// Next mode in the Off → All → One → Off cycle
    pub fn cycled(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RepeatMode::Off => "off",
            RepeatMode::All => "all",
            RepeatMode::One => "one",
        }
    }
}

/// Direction for `Player::advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Snapshot of the player's externally visible state
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    /// Index of the selected track in the working queue
    pub current_index: Option<usize>,

    /// True only while the device is confirmed playing
    pub is_playing: bool,

    /// Whether the queue is shuffled
    pub is_shuffle: bool,

    /// Current repeat mode
    pub repeat_mode: RepeatMode,

    /// Output volume in [0, 1]
    pub volume: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_cycle_order() {
        assert_eq!(RepeatMode::Off.cycled(), RepeatMode::All);
        assert_eq!(RepeatMode::All.cycled(), RepeatMode::One);
        assert_eq!(RepeatMode::One.cycled(), RepeatMode::Off);
    }

    #[test]
    fn track_deserializes_from_camel_case() {
        let json = r#"{
            "id": "a1",
            "title": "Intro",
            "artist": "Someone",
            "album": "First",
            "durationLabel": "3:45",
            "coverUrl": "covers/a1.jpg",
            "sourceUrl": "audio/a1.mp3"
        }"#;

        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.id, "a1");
        assert_eq!(track.duration_label, "3:45");
        assert_eq!(track.source_url, "audio/a1.mp3");
    }

    #[test]
    fn track_optional_fields_default_to_empty() {
        let json = r#"{"id":"x","title":"T","artist":"A","sourceUrl":"x.mp3"}"#;
        let track: Track = serde_json::from_str(json).unwrap();
        assert!(track.album.is_empty());
        assert!(track.cover_url.is_empty());
    }
}
