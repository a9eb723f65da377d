//! Adapter layer: Convert Spotify DTOs to raw tracks

use super::dto;
use crate::model::RawTrack;

/// Convert a search response. A missing tracks page means no results.
pub fn to_raw_tracks(response: dto::SearchResponse) -> Vec<RawTrack> {
    response
        .tracks
        .map(|page| page.items.into_iter().map(convert_track).collect())
        .unwrap_or_default()
}

fn convert_track(track: dto::Track) -> RawTrack {
    let artist = track
        .artists
        .into_iter()
        .next()
        .map(|a| a.name)
        .unwrap_or_default();

    // Images are ordered widest first
    let artwork_ref = track
        .album
        .and_then(|album| album.images.into_iter().next())
        .map(|image| image.url);

    RawTrack {
        id: track.id,
        title: track.name,
        artist,
        preview_ref: track.preview_url,
        artwork_ref,
    }
}
