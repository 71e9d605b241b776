//! Playback device contract
//!
//! Abstracts the media element that actually decodes and outputs audio
//! (an `HTMLAudioElement` in the browser, a simulated clock in the console).

use std::fmt;

/// Token identifying one play request
///
/// Every call to [`PlaybackDevice::request_play`] carries a fresh token. The
/// device hands it back through `Player::on_play_resolved`; the player
/// ignores resolutions whose token is no longer current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayRequest(u64);

impl PlayRequest {
    pub(crate) fn first() -> Self {
        Self(1)
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Raw value, for crossing the JS boundary
    pub fn id(self) -> u64 {
        self.0
    }

    pub fn from_id(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for PlayRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Platform media element
///
/// All calls are synchronous except `request_play`, whose outcome arrives
/// later through `Player::on_play_resolved`. Natural end of media and
/// media errors are reported through `Player::on_playback_finished` and
/// `Player::on_device_error`.
pub trait PlaybackDevice {
    /// Point the device at a new media resource
    fn load(&mut self, url: &str);

    /// Ask the device to start playback
    fn request_play(&mut self, request: PlayRequest);

    /// Pause without resetting the position
    fn pause(&mut self);

    /// Current position in seconds
    fn current_time(&self) -> f64;

    /// Move the playback position (seconds)
    fn set_current_time(&mut self, secs: f64);

    /// Media duration in seconds, `None` while unknown
    fn duration(&self) -> Option<f64>;

    /// Output volume in [0, 1]
    fn set_volume(&mut self, volume: f32);

    /// Duration only when it is usable for seeking and progress
    fn known_duration(&self) -> Option<f64> {
        self.duration().filter(|d| d.is_finite() && *d > 0.0)
    }
}
