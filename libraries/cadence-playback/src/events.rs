//! Player notifications
//!
//! The player queues an event for every externally visible change. Hosts
//! drain them with `Player::drain_events` and hand them to the presentation
//! surfaces. Events are emitted at:
//! - Track selection (immediately, before the device confirms playback)
//! - Playback state transitions
//! - Progress updates from the device clock and after seeks
//! - Queue, shuffle, repeat and volume changes
//! - Rejected play requests and device errors

use crate::types::{PlaybackState, RepeatMode, Track};
use serde::Serialize;

/// Events emitted by the player
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PlayerEvent {
    /// A new track was selected
    TrackChanged {
        /// Position in the working queue
        index: usize,
        /// The selected track
        track: Track,
    },

    /// Playback state changed
    PlaybackStateChanged {
        state: PlaybackState,
        /// Shorthand for `state == Playing`
        is_playing: bool,
    },

    /// Position update
    Progress {
        /// Current position in seconds
        current_time: f64,
        /// Track duration in seconds
        duration: f64,
    },

    /// A new track list replaced the queue (empty when cleared)
    QueueLoaded {
        tracks: Vec<Track>,
    },

    /// Queue order changed (shuffle toggled)
    QueueReordered {
        /// Track ids in the new playback order
        track_ids: Vec<String>,
        /// Position of the selected track in the new order
        current_index: Option<usize>,
    },

    RepeatModeChanged {
        mode: RepeatMode,
    },

    ShuffleChanged {
        enabled: bool,
    },

    VolumeChanged {
        /// Volume in [0, 1]
        volume: f32,
    },

    /// The device refused or failed to play the current track
    PlaybackRejected {
        /// Track that failed, if one was selected
        track_id: Option<String>,
        reason: String,
    },
}

impl PlayerEvent {
    /// Progress as a fraction of the duration, for `Progress` events
    pub fn progress_fraction(&self) -> Option<f64> {
        match self {
            PlayerEvent::Progress {
                current_time,
                duration,
            } if *duration > 0.0 => Some((current_time / duration).clamp(0.0, 1.0)),
            _ => None,
        }
    }
}
