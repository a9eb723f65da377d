//! Deezer API Data Transfer Objects
//!
//! These types match what the `/search` endpoint returns.
//! DO NOT use these types outside the deezer module - convert to domain types.

use serde::{Deserialize, Serialize};

/// Search response. Errors arrive with HTTP 200 and an `error` object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub data: Vec<Track>,
    pub total: Option<u32>,
    pub error: Option<ApiError>,
}

/// A track search hit
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Track {
    pub id: u64,
    pub title: String,
    /// 30s MP3 preview; empty string when unavailable
    #[serde(default)]
    pub preview: Option<String>,
    pub artist: Artist,
    pub album: Option<Album>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Artist {
    pub id: Option<u64>,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Album {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub cover_medium: Option<String>,
    pub cover_big: Option<String>,
}

/// Error object
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub message: String,
    pub code: Option<i32>,
}
