//! Track pool construction.
//!
//! Turns raw catalog hits from one or more providers into a [`TrackPool`]:
//! 1. Drop tracks without a usable preview
//! 2. Deduplicate by case-insensitive (title, artist), keeping the first
//! 3. Shuffle uniformly so provider ordering doesn't leak into the game
//!
//! A pool always holds at least [`MIN_POOL_SIZE`] tracks.

pub mod cache;
mod source;

pub use cache::PoolCache;
pub use source::{PoolRequest, load_pool};

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::game::GameError;
use crate::model::{RawTrack, Track, dedup_key};

/// One correct answer plus three distractors.
pub const MIN_POOL_SIZE: usize = 4;

/// Deduplicated, shuffled tracks available to a session.
///
/// Read-only once built; share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPool {
    tracks: Vec<Track>,
}

impl TrackPool {
    /// All tracks in pool order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Look up a track by id.
    pub fn get(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Track at a pool index.
    pub(crate) fn at(&self, index: usize) -> &Track {
        &self.tracks[index]
    }

    /// Pool that skips validation, for exercising size checks.
    #[cfg(test)]
    pub(crate) fn from_tracks_unchecked(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }
}

/// What the builder threw away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Raw tracks seen across all batches
    pub received: usize,
    /// Dropped for a missing or blank preview
    pub missing_preview: usize,
    /// Dropped as (title, artist) or id duplicates
    pub duplicates: usize,
    /// Tracks kept
    pub kept: usize,
}

/// Build a pool from provider result batches.
///
/// Batches are merged in order, so earlier providers/queries win ties.
pub fn build_pool<I, R>(batches: I, rng: &mut R) -> Result<TrackPool, GameError>
where
    I: IntoIterator<Item = Vec<RawTrack>>,
    R: Rng + ?Sized,
{
    build_pool_with_report(batches, rng).map(|(pool, _)| pool)
}

/// Same as [`build_pool`], also returning the drop counts.
pub fn build_pool_with_report<I, R>(
    batches: I,
    rng: &mut R,
) -> Result<(TrackPool, BuildReport), GameError>
where
    I: IntoIterator<Item = Vec<RawTrack>>,
    R: Rng + ?Sized,
{
    let mut report = BuildReport::default();
    let mut seen_keys: HashSet<(String, String)> = HashSet::new();
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut tracks = Vec::new();

    for raw in batches.into_iter().flatten() {
        report.received += 1;

        let Some(track) = to_track(&raw) else {
            report.missing_preview += 1;
            continue;
        };

        let key = track.dedup_key();
        if seen_keys.contains(&key) || seen_ids.contains(&track.id) {
            report.duplicates += 1;
            continue;
        }

        seen_keys.insert(key);
        seen_ids.insert(track.id.clone());
        tracks.push(track);
    }

    report.kept = tracks.len();

    if tracks.len() < MIN_POOL_SIZE {
        tracing::warn!(
            received = report.received,
            missing_preview = report.missing_preview,
            duplicates = report.duplicates,
            "Not enough playable tracks for a pool"
        );
        return Err(GameError::InsufficientTracks {
            available: tracks.len(),
            required: MIN_POOL_SIZE,
        });
    }

    tracks.shuffle(rng);

    tracing::info!(
        kept = report.kept,
        missing_preview = report.missing_preview,
        duplicates = report.duplicates,
        "Built track pool"
    );

    Ok((TrackPool { tracks }, report))
}

/// Rebuild a pool from previously built tracks (e.g. a cache entry).
///
/// Runs the full validation again; nothing loaded from disk is trusted.
pub fn rebuild_pool<R>(tracks: Vec<Track>, rng: &mut R) -> Result<TrackPool, GameError>
where
    R: Rng + ?Sized,
{
    let raw = tracks
        .into_iter()
        .map(|t| RawTrack {
            id: t.id,
            title: t.title,
            artist: t.artist,
            preview_ref: Some(t.preview_ref),
            artwork_ref: t.artwork_ref,
        })
        .collect();
    build_pool(std::iter::once(raw), rng)
}

/// Validate a raw hit. Returns `None` when it has no usable preview.
fn to_track(raw: &RawTrack) -> Option<Track> {
    let preview = raw.usable_preview()?;
    let title = raw.title.trim().to_string();
    let artist = raw.artist.trim().to_string();

    let id = match raw.id.trim() {
        "" => synthetic_id(&title, &artist),
        id => id.to_string(),
    };

    Some(Track {
        id,
        title,
        artist,
        preview_ref: preview.to_string(),
        artwork_ref: raw
            .artwork_ref
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string),
    })
}

/// Stable id for providers that don't assign one.
fn synthetic_id(title: &str, artist: &str) -> String {
    let (title, artist) = dedup_key(title, artist);
    format!("{}-{}", artist, title)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
