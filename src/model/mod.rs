//! Core data models for the quiz.
//!
//! Defines the primary entities: [`Track`] (a song that made it into a pool),
//! [`RawTrack`] (a catalog search hit that may still be unusable),
//! [`Difficulty`] and [`Category`].
//!
//! # Lifecycle
//!
//! - Catalog providers produce [`RawTrack`]s
//! - The pool builder turns the playable ones into [`Track`]s
//! - Tracks are immutable once placed in a pool

use serde::{Deserialize, Serialize};
use std::fmt;

/// Artwork shown when a track has no cover art of its own.
pub const PLACEHOLDER_ARTWORK: &str = "placeholder:cover";

/// A catalog search hit, before validation.
///
/// Any field may be missing or blank; the pool builder decides what survives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTrack {
    /// Provider-assigned identifier
    pub id: String,
    /// Song title
    pub title: String,
    /// Primary artist name
    pub artist: String,
    /// Playable preview (URL or equivalent), if the provider has one
    pub preview_ref: Option<String>,
    /// Cover art reference
    pub artwork_ref: Option<String>,
}

impl RawTrack {
    /// Trimmed preview reference, or `None` if absent or blank.
    pub fn usable_preview(&self) -> Option<&str> {
        self.preview_ref
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// A playable song candidate inside a track pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    /// Unique within the pool
    pub id: String,
    /// Song title
    pub title: String,
    /// Artist name
    pub artist: String,
    /// Never empty
    pub preview_ref: String,
    /// Optional cover art
    pub artwork_ref: Option<String>,
}

impl Track {
    /// Cover art reference, falling back to the placeholder.
    pub fn artwork_or_placeholder(&self) -> &str {
        self.artwork_ref
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or(PLACEHOLDER_ARTWORK)
    }

    /// "Title - Artist" label for option lists.
    pub fn display_label(&self) -> String {
        if self.artist.is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.title, self.artist)
        }
    }

    /// Case-insensitive (title, artist) identity used for deduplication.
    pub fn dedup_key(&self) -> (String, String) {
        dedup_key(&self.title, &self.artist)
    }
}

/// Normalized (title, artist) pair.
pub fn dedup_key(title: &str, artist: &str) -> (String, String) {
    (title.trim().to_lowercase(), artist.trim().to_lowercase())
}

/// Game difficulty, which fixes the number of rounds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Rounds per session.
    pub fn max_rounds(self) -> u32 {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Medium => 10,
            Difficulty::Hard => 15,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Music category used to pick catalog search queries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Pop,
    Rock,
    Indie,
    Electronic,
    Latin,
    Hits,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Pop => "pop",
            Category::Rock => "rock",
            Category::Indie => "indie",
            Category::Electronic => "electronic",
            Category::Latin => "latin",
            Category::Hits => "hits",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
