//! Simulated playback device
//!
//! Stands in for a media element: keeps a clock, knows track durations from
//! their labels and queues play requests until the session answers them.

use cadence_playback::{PlayRequest, PlaybackDevice, Track};
use std::collections::{HashMap, VecDeque};
use tracing::trace;

/// What happened to the clock during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Nothing is playing
    Idle,
    /// Time moved forward
    Advanced,
    /// The track reached its end
    Finished,
}

#[derive(Debug, Default)]
pub struct SimulatedDevice {
    durations: HashMap<String, f64>,
    source: Option<String>,
    time: f64,
    duration: Option<f64>,
    volume: f32,
    running: bool,
    issued: VecDeque<PlayRequest>,
    reject_next: bool,
}

impl SimulatedDevice {
    /// Device that knows the duration of every track with a parseable label
    pub fn for_tracks(tracks: &[Track]) -> Self {
        let durations = tracks
            .iter()
            .filter_map(|track| {
                parse_duration_label(&track.duration_label)
                    .map(|secs| (track.source_url.clone(), secs))
            })
            .collect();

        Self {
            durations,
            ..Self::default()
        }
    }

    /// Register durations for tracks loaded later
    pub fn learn(&mut self, tracks: &[Track]) {
        for track in tracks {
            if let Some(secs) = parse_duration_label(&track.duration_label) {
                self.durations.insert(track.source_url.clone(), secs);
            }
        }
    }

    /// Next play request waiting for an answer
    pub fn take_issued(&mut self) -> Option<PlayRequest> {
        self.issued.pop_front()
    }

    /// Make the next answered request fail
    pub fn arm_rejection(&mut self) {
        self.reject_next = true;
    }

    /// Answer for a request taken with [`take_issued`](Self::take_issued)
    pub fn outcome(&mut self) -> Result<(), String> {
        if std::mem::take(&mut self.reject_next) {
            Err("play() request was rejected by the device".to_string())
        } else {
            Ok(())
        }
    }

    /// Advance the clock by `secs` while running
    pub fn tick(&mut self, secs: f64) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }

        self.time += secs.max(0.0);
        match self.duration {
            Some(duration) if self.time >= duration => {
                self.time = duration;
                self.running = false;
                TickOutcome::Finished
            }
            _ => TickOutcome::Advanced,
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl PlaybackDevice for SimulatedDevice {
    fn load(&mut self, url: &str) {
        trace!(url, "Loading source");
        self.source = Some(url.to_string());
        self.duration = self.durations.get(url).copied();
        self.time = 0.0;
        self.running = false;
    }

    fn request_play(&mut self, request: PlayRequest) {
        trace!(%request, "Play requested");
        self.running = self.source.is_some();
        self.issued.push_back(request);
    }

    fn pause(&mut self) {
        self.running = false;
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn set_current_time(&mut self, secs: f64) {
        self.time = secs;
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }
}

/// Parse "m:ss" or "h:mm:ss" into seconds
pub fn parse_duration_label(label: &str) -> Option<f64> {
    let mut total = 0u64;
    let mut parts = 0;

    for part in label.trim().split(':') {
        let value: u64 = part.parse().ok()?;
        if parts > 0 && value >= 60 {
            return None;
        }
        total = total * 60 + value;
        parts += 1;
    }

    (2..=3).contains(&parts).then_some(total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_track(id: &str, label: &str) -> Track {
        Track {
            id: id.to_string(),
            title: id.to_uppercase(),
            artist: "Artist".to_string(),
            album: String::new(),
            duration_label: label.to_string(),
            cover_url: String::new(),
            source_url: format!("audio/{id}.mp3"),
        }
    }

    #[test]
    fn parses_labels() {
        assert_eq!(parse_duration_label("3:05"), Some(185.0));
        assert_eq!(parse_duration_label("0:00"), Some(0.0));
        assert_eq!(parse_duration_label("1:02:03"), Some(3723.0));
        assert_eq!(parse_duration_label(" 12:00 "), Some(720.0));
    }

    #[test]
    fn rejects_malformed_labels() {
        assert_eq!(parse_duration_label(""), None);
        assert_eq!(parse_duration_label("185"), None);
        assert_eq!(parse_duration_label("3:75"), None);
        assert_eq!(parse_duration_label("a:bc"), None);
        assert_eq!(parse_duration_label("1:2:3:4"), None);
    }

    #[test]
    fn load_picks_up_known_duration() {
        let tracks = vec![create_test_track("a", "2:00"), create_test_track("b", "live")];
        let mut device = SimulatedDevice::for_tracks(&tracks);

        device.load("audio/a.mp3");
        assert_eq!(device.duration(), Some(120.0));

        device.load("audio/b.mp3");
        assert_eq!(device.duration(), None);
        assert_eq!(device.source(), Some("audio/b.mp3"));
    }

    #[test]
    fn tick_runs_until_end() {
        let tracks = vec![create_test_track("a", "0:10")];
        let mut device = SimulatedDevice::for_tracks(&tracks);
        device.load("audio/a.mp3");

        assert_eq!(device.tick(5.0), TickOutcome::Idle);

        device.request_play(PlayRequest::from_id(1));
        assert_eq!(device.tick(4.0), TickOutcome::Advanced);
        assert_eq!(device.current_time(), 4.0);
        assert_eq!(device.tick(8.0), TickOutcome::Finished);
        assert_eq!(device.current_time(), 10.0);
        assert!(!device.is_running());
    }

    #[test]
    fn armed_rejection_applies_once() {
        let mut device = SimulatedDevice::default();
        device.arm_rejection();
        assert!(device.outcome().is_err());
        assert!(device.outcome().is_ok());
    }

    #[test]
    fn issued_requests_are_answered_in_order() {
        let mut device = SimulatedDevice::default();
        let first = PlayRequest::from_id(1);
        let second = PlayRequest::from_id(2);
        device.request_play(first);
        device.request_play(second);

        assert_eq!(device.take_issued(), Some(first));
        assert_eq!(device.take_issued(), Some(second));
        assert_eq!(device.take_issued(), None);
    }
}
