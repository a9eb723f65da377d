//! Test utilities and fixtures for music-guess tests.
//!
//! This module provides track and pool factories plus a seeded random
//! source so round generation is reproducible in tests.
//!
//! # Example
//!
//! ```ignore
//! use music_guess::test_utils::{pool_of, seeded_rng};
//!
//! #[test]
//! fn test_something() {
//!     let pool = pool_of(8);
//!     let round = Round::generate(&pool, &mut seeded_rng(1)).unwrap();
//!     // ... test logic
//! }
//! ```

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;

use crate::model::{RawTrack, Track};
use crate::pool::{TrackPool, build_pool};

/// Deterministic random source.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a playable raw track with a preview and artwork.
pub fn raw_track(id: &str, title: &str, artist: &str) -> RawTrack {
    RawTrack {
        id: id.to_string(),
        title: title.to_string(),
        artist: artist.to_string(),
        preview_ref: Some(format!("https://cdn.example.com/preview/{}.mp3", id)),
        artwork_ref: Some(format!("https://cdn.example.com/cover/{}.jpg", id)),
    }
}

/// Creates a raw track the pool builder must reject.
pub fn raw_track_without_preview(id: &str, title: &str, artist: &str) -> RawTrack {
    RawTrack {
        preview_ref: None,
        ..raw_track(id, title, artist)
    }
}

/// `n` distinct playable raw tracks.
pub fn raw_tracks(n: usize) -> Vec<RawTrack> {
    (0..n)
        .map(|i| raw_track(&format!("track-{i}"), &format!("Song {i}"), &format!("Artist {i}")))
        .collect()
}

/// Creates a mock Track with sensible defaults.
///
/// Customize using struct update syntax:
///
/// ```ignore
/// let track = Track {
///     title: "Custom Title".to_string(),
///     ..mock_track("1")
/// };
/// ```
pub fn mock_track(id: &str) -> Track {
    Track {
        id: id.to_string(),
        title: format!("Song {}", id),
        artist: "Test Artist".to_string(),
        preview_ref: format!("https://cdn.example.com/preview/{}.mp3", id),
        artwork_ref: None,
    }
}

/// A valid pool of `n` (>= 4) tracks.
pub fn pool_of(n: usize) -> Arc<TrackPool> {
    let pool = build_pool(vec![raw_tracks(n)], &mut seeded_rng(n as u64))
        .expect("fixture pool should be valid");
    Arc::new(pool)
}

/// A pool below the minimum size, bypassing the builder.
pub fn undersized_pool(n: usize) -> Arc<TrackPool> {
    let tracks = (0..n).map(|i| mock_track(&i.to_string())).collect();
    Arc::new(TrackPool::from_tracks_unchecked(tracks))
}
