//! Last.fm API Data Transfer Objects
//!
//! These types match `method=track.search&format=json`.
//! DO NOT use these types outside the lastfm module - convert to domain types.

use serde::{Deserialize, Serialize};

/// Last.fm collapses single-element lists to a bare object
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    pub results: Option<Results>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Results {
    pub trackmatches: Option<TrackMatches>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackMatches {
    #[serde(default)]
    pub track: OneOrMany<Track>,
}

/// A search hit. `artist` is a plain string in search results.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Track {
    pub name: String,
    pub artist: String,
    pub url: Option<String>,
    pub listeners: Option<String>,
    pub mbid: Option<String>,
    #[serde(default)]
    pub image: Vec<Image>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Image {
    #[serde(rename = "#text")]
    pub url: String,
    pub size: String,
}

/// In-band error (`{"error": 10, "message": "Invalid API key"}`)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: u32,
    pub message: String,
}
