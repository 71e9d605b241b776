//! Queue randomization
//!
//! Uniform Fisher-Yates shuffle over the whole track list.

use crate::types::Track;
use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle tracks in place with the given random source
///
/// Each permutation is equally likely.
pub fn shuffle_tracks<R: Rng + ?Sized>(tracks: &mut [Track], rng: &mut R) {
    tracks.shuffle(rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

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

    #[test]
    fn shuffle_preserves_all_tracks() {
        let mut tracks: Vec<Track> = (0..10).map(|i| create_test_track(&i.to_string())).collect();
        let mut rng = StdRng::seed_from_u64(7);

        shuffle_tracks(&mut tracks, &mut rng);

        let ids: HashSet<String> = tracks.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids.len(), 10);
        for i in 0..10 {
            assert!(ids.contains(&i.to_string()));
        }
    }

    #[test]
    fn shuffle_is_deterministic_for_a_seed() {
        let original: Vec<Track> = (0..8).map(|i| create_test_track(&i.to_string())).collect();

        let mut a = original.clone();
        let mut b = original.clone();
        shuffle_tracks(&mut a, &mut StdRng::seed_from_u64(42));
        shuffle_tracks(&mut b, &mut StdRng::seed_from_u64(42));

        assert_eq!(a, b);
    }

    #[test]
    fn shuffle_empty_and_single() {
        let mut rng = StdRng::seed_from_u64(1);

        let mut empty: Vec<Track> = vec![];
        shuffle_tracks(&mut empty, &mut rng);
        assert!(empty.is_empty());

        let mut single = vec![create_test_track("1")];
        shuffle_tracks(&mut single, &mut rng);
        assert_eq!(single[0].id, "1");
    }
}
