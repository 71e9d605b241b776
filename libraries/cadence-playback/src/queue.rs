//! Playlist queue
//!
//! Holds the working track order, the load-time order used to undo a
//! shuffle, the selected index and the repeat mode.
//!
//! ```text
//! original: [A, B, C, D]      (load order, never reordered)
//! tracks:   [C, A, D, B]      (working order, shuffled)
//! current:  Some(1) -> A
//! ```
//!
//! `tracks` is always a permutation of `original`. The current index follows
//! the selected track's identity across reorders.

use crate::error::{PlayerError, Result};
use crate::shuffle::shuffle_tracks;
use crate::types::{RepeatMode, Track};
use rand::Rng;
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct Queue {
    /// Working order (possibly shuffled)
    tracks: Vec<Track>,

    /// Order at load time
    original: Vec<Track>,

    /// Selected position in `tracks`
    current: Option<usize>,

    /// Whether `tracks` is currently shuffled
    is_shuffled: bool,

    repeat: RepeatMode,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the queue with a new track list
    ///
    /// Clears the selection and turns shuffle off. An empty list or one with
    /// repeated track ids is rejected and leaves the queue unchanged.
    pub fn load(&mut self, tracks: Vec<Track>) -> Result<()> {
        if tracks.is_empty() {
            return Err(PlayerError::EmptyQueue);
        }

        {
            let mut seen = HashSet::with_capacity(tracks.len());
            if let Some(dup) = tracks.iter().find(|t| !seen.insert(t.id.as_str())) {
                return Err(PlayerError::DuplicateTrackId(dup.id.clone()));
            }
        }

        self.tracks.clone_from(&tracks);
        self.original = tracks;
        self.current = None;
        self.is_shuffled = false;
        Ok(())
    }

    /// Remove every track
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.original.clear();
        self.current = None;
        self.is_shuffled = false;
    }

    /// Toggle shuffle using the thread-local RNG
    ///
    /// Returns the new shuffle flag.
    pub fn toggle_shuffle(&mut self) -> bool {
        self.toggle_shuffle_with(&mut rand::thread_rng())
    }

    /// Toggle shuffle with an explicit random source
    ///
    /// Enabling draws a fresh permutation of all tracks; disabling restores
    /// the load order. The selected track stays selected.
    pub fn toggle_shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let current_id = self.current_track().map(|t| t.id.clone());

        self.is_shuffled = !self.is_shuffled;
        if self.is_shuffled {
            self.tracks.clone_from(&self.original);
            shuffle_tracks(&mut self.tracks, rng);
        } else {
            self.tracks.clone_from(&self.original);
        }

        self.current = current_id.and_then(|id| self.position_of(&id));
        self.is_shuffled
    }

    /// Advance repeat mode: Off → All → One → Off
    pub fn cycle_repeat(&mut self) -> RepeatMode {
        self.repeat = self.repeat.cycled();
        self.repeat
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    /// Index to play after `current` ends or on "next"
    ///
    /// `None` means stop. Running off the end wraps to 0 only with
    /// `RepeatMode::All`. With nothing selected the first track is next.
    pub fn resolve_next(&self, current: Option<usize>) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }

        let Some(current) = current else {
            return Some(0);
        };

        let next = current + 1;
        if next < self.tracks.len() {
            Some(next)
        } else if self.repeat == RepeatMode::All {
            Some(0)
        } else {
            None
        }
    }

    /// Index to play on "previous"
    ///
    /// Never stops: at the start it wraps to the last track with
    /// `RepeatMode::All` and otherwise restarts the first track. Only an
    /// empty queue yields `None`.
    pub fn resolve_previous(&self, current: Option<usize>) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }

        let last = self.tracks.len() - 1;
        match current {
            None => Some(0),
            Some(0) if self.repeat == RepeatMode::All => Some(last),
            Some(0) => Some(0),
            Some(index) => Some((index - 1).min(last)),
        }
    }

    /// Bounds-checked lookup
    pub fn track_at(&self, index: usize) -> Result<&Track> {
        self.tracks.get(index).ok_or(PlayerError::IndexOutOfRange {
            index,
            len: self.tracks.len(),
        })
    }

    /// Mark `index` as the selected track
    pub(crate) fn select(&mut self, index: usize) -> Result<&Track> {
        let len = self.tracks.len();
        if index >= len {
            return Err(PlayerError::IndexOutOfRange { index, len });
        }

        self.current = Some(index);
        Ok(&self.tracks[index])
    }

    /// Position of a track in the working order
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    /// Tracks in playback order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Tracks in load order
    pub fn original_order(&self) -> &[Track] {
        &self.original
    }

    pub fn is_shuffled(&self) -> bool {
        self.is_shuffled
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn create_test_track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            title: format!("Track {}", id),
            artist: "Test Artist".to_string(),
            album: "Test Album".to_string(),
            duration_label: "3:00".to_string(),
            cover_url: String::new(),
            source_url: format!("/music/{}.mp3", id),
        }
    }

    fn loaded(ids: &[&str]) -> Queue {
        let mut queue = Queue::new();
        queue
            .load(ids.iter().map(|id| create_test_track(id)).collect())
            .unwrap();
        queue
    }

    fn ids(tracks: &[Track]) -> Vec<&str> {
        tracks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn create_empty_queue() {
        let queue = Queue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.current_index(), None);
        assert_eq!(queue.repeat_mode(), RepeatMode::Off);
    }

    #[test]
    fn load_empty_is_rejected_and_keeps_contents() {
        let mut queue = loaded(&["a", "b"]);
        assert_eq!(queue.load(vec![]), Err(PlayerError::EmptyQueue));
        assert_eq!(ids(queue.tracks()), vec!["a", "b"]);
    }

    #[test]
    fn load_rejects_repeated_ids() {
        let mut queue = loaded(&["x", "y"]);
        let tracks = vec![
            create_test_track("a"),
            create_test_track("a"),
            create_test_track("b"),
        ];

        assert_eq!(
            queue.load(tracks),
            Err(PlayerError::DuplicateTrackId("a".to_string()))
        );
        assert_eq!(ids(queue.tracks()), vec!["x", "y"]);
        assert_eq!(ids(queue.original_order()), vec!["x", "y"]);
    }

    #[test]
    fn load_resets_selection_and_shuffle() {
        let mut queue = loaded(&["a", "b", "c"]);
        queue.select(2).unwrap();
        queue.toggle_shuffle_with(&mut StdRng::seed_from_u64(3));

        queue.load(vec![create_test_track("x")]).unwrap();
        assert_eq!(queue.current_index(), None);
        assert!(!queue.is_shuffled());
        assert_eq!(ids(queue.original_order()), vec!["x"]);
    }

    #[test]
    fn shuffle_keeps_current_track() {
        let mut queue = loaded(&["a", "b", "c", "d", "e", "f"]);
        queue.select(3).unwrap();

        for seed in 0..20 {
            queue.toggle_shuffle_with(&mut StdRng::seed_from_u64(seed));
            assert_eq!(queue.current_track().unwrap().id, "d");
        }
    }

    #[test]
    fn unshuffle_restores_original_order() {
        let mut queue = loaded(&["a", "b", "c", "d", "e"]);
        queue.select(1).unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        assert!(queue.toggle_shuffle_with(&mut rng));
        assert!(!queue.toggle_shuffle_with(&mut rng));

        assert_eq!(ids(queue.tracks()), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(queue.current_index(), Some(1));
    }

    #[test]
    fn shuffle_without_selection_keeps_none() {
        let mut queue = loaded(&["a", "b", "c"]);
        queue.toggle_shuffle_with(&mut StdRng::seed_from_u64(5));
        assert_eq!(queue.current_index(), None);
    }

    #[test]
    fn cycle_repeat_wraps_after_three() {
        let mut queue = Queue::new();
        assert_eq!(queue.cycle_repeat(), RepeatMode::All);
        assert_eq!(queue.cycle_repeat(), RepeatMode::One);
        assert_eq!(queue.cycle_repeat(), RepeatMode::Off);
    }

    #[test]
    fn resolve_next_boundaries() {
        let mut queue = loaded(&["a", "b", "c"]);

        assert_eq!(queue.resolve_next(None), Some(0));
        assert_eq!(queue.resolve_next(Some(0)), Some(1));
        assert_eq!(queue.resolve_next(Some(2)), None);

        queue.set_repeat(RepeatMode::All);
        assert_eq!(queue.resolve_next(Some(2)), Some(0));

        // Repeat One only matters for natural track end
        queue.set_repeat(RepeatMode::One);
        assert_eq!(queue.resolve_next(Some(2)), None);
    }

    #[test]
    fn resolve_previous_boundaries() {
        let mut queue = loaded(&["a", "b", "c"]);

        assert_eq!(queue.resolve_previous(Some(2)), Some(1));
        assert_eq!(queue.resolve_previous(Some(0)), Some(0));
        assert_eq!(queue.resolve_previous(None), Some(0));

        queue.set_repeat(RepeatMode::All);
        assert_eq!(queue.resolve_previous(Some(0)), Some(2));
        assert_eq!(queue.resolve_previous(None), Some(0));
    }

    #[test]
    fn resolve_on_empty_queue() {
        let queue = Queue::new();
        assert_eq!(queue.resolve_next(None), None);
        assert_eq!(queue.resolve_previous(Some(0)), None);
    }

    #[test]
    fn track_at_bounds() {
        let queue = loaded(&["a", "b"]);
        assert_eq!(queue.track_at(1).unwrap().id, "b");
        assert_eq!(
            queue.track_at(2),
            Err(PlayerError::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn clear_queue() {
        let mut queue = loaded(&["a", "b"]);
        queue.select(0).unwrap();
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.current_index(), None);
        assert!(queue.original_order().is_empty());
    }
}
