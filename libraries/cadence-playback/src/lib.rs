//! Cadence - Playlist Playback
//!
//! Platform-agnostic playlist player core.
//!
//! This crate provides:
//! - Queue model with load-order restore after shuffle
//! - Repeat modes (Off, All, One) and next/previous resolution
//! - Player state machine (Idle, Loading, Playing, Paused)
//! - Superseding play requests by token
//! - Event stream and view-models for presentation sync
//!
//! # Architecture
//!
//! `cadence-playback` never touches a concrete media element. The platform
//! implements [`PlaybackDevice`] (an `HTMLAudioElement` behind the `wasm`
//! feature, a simulated clock in the console) and feeds device callbacks
//! back into the [`Player`].
//!
//! # Example
//!
//! ```rust
//! use cadence_playback::{Direction, PlayRequest, PlaybackDevice, Player, PlayerConfig, Track};
//!
//! #[derive(Default)]
//! struct Silent {
//!     requests: Vec<PlayRequest>,
//! }
//!
//! impl PlaybackDevice for Silent {
//!     fn load(&mut self, _url: &str) {}
//!     fn request_play(&mut self, request: PlayRequest) {
//!         self.requests.push(request);
//!     }
//!     fn pause(&mut self) {}
//!     fn current_time(&self) -> f64 { 0.0 }
//!     fn set_current_time(&mut self, _secs: f64) {}
//!     fn duration(&self) -> Option<f64> { None }
//!     fn set_volume(&mut self, _volume: f32) {}
//! }
//!
//! let track = |id: &str| Track {
//!     id: id.to_string(),
//!     title: format!("Song {id}"),
//!     artist: "Artist".to_string(),
//!     album: "Album".to_string(),
//!     duration_label: "3:00".to_string(),
//!     cover_url: String::new(),
//!     source_url: format!("audio/{id}.mp3"),
//! };
//!
//! let mut player = Player::new(Silent::default(), PlayerConfig::default());
//! player.load(vec![track("a"), track("b")]).unwrap();
//!
//! player.play_track_at(0).unwrap();
//! let request = player.device().requests[0];
//! player.on_play_resolved(request, Ok(()));
//! assert!(player.is_playing());
//!
//! player.advance(Direction::Next).unwrap();
//! assert_eq!(player.current_track().unwrap().id, "b");
//! ```

mod config;
mod device;
mod error;
pub mod events;
mod player;
pub mod presentation;
mod queue;
mod shuffle;
pub mod types;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use config::PlayerConfig;
pub use device::{PlayRequest, PlaybackDevice};
pub use error::{PlayerError, Result};
pub use events::PlayerEvent;
pub use player::Player;
pub use queue::Queue;
pub use shuffle::shuffle_tracks;
pub use types::{Direction, PlaybackState, PlayerState, RepeatMode, Track};
