//! Adapter layer: Convert Last.fm search hits to raw tracks

use super::dto;
use crate::model::RawTrack;

const EMBED_SEARCH_URL: &str = "https://www.youtube.com/embed?listType=search&list=";

/// Convert a search response. Missing result sections mean no hits.
pub fn to_raw_tracks(response: dto::SearchResponse) -> Vec<RawTrack> {
    response
        .results
        .and_then(|r| r.trackmatches)
        .map(|m| m.track.into_vec())
        .unwrap_or_default()
        .into_iter()
        .map(convert_track)
        .collect()
}

fn convert_track(track: dto::Track) -> RawTrack {
    let id = format!("lastfm-{}-{}", track.artist, track.name)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();

    let artwork_ref = track
        .image
        .into_iter()
        .find(|img| img.size == "large")
        .map(|img| img.url)
        .filter(|url| !url.is_empty());

    RawTrack {
        preview_ref: Some(embed_search_ref(&track.artist, &track.name)),
        id,
        title: track.name,
        artist: track.artist,
        artwork_ref,
    }
}

/// YouTube embed URL that plays the first search hit for "artist title".
pub fn embed_search_ref(artist: &str, title: &str) -> String {
    let query = format!("{} {}", artist.trim(), title.trim());
    format!("{}{}", EMBED_SEARCH_URL, urlencoding::encode(&query))
}
