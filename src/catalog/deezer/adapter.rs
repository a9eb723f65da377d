//! Adapter layer: Convert Deezer DTOs to raw tracks

use super::dto;
use crate::catalog::domain::CatalogError;
use crate::model::RawTrack;

/// Deezer's "quota exceeded" error code
const QUOTA_EXCEEDED: i32 = 4;

/// Convert a search response, surfacing in-band API errors.
pub fn to_raw_tracks(response: dto::SearchResponse) -> Result<Vec<RawTrack>, CatalogError> {
    if let Some(error) = response.error {
        if error.code == Some(QUOTA_EXCEEDED) {
            return Err(CatalogError::RateLimited);
        }
        return Err(CatalogError::ApiError(error.message));
    }

    Ok(response.data.into_iter().map(convert_track).collect())
}

fn convert_track(track: dto::Track) -> RawTrack {
    let artwork_ref = track
        .album
        .and_then(|a| a.cover_big.or(a.cover_medium))
        .filter(|url| !url.is_empty());

    RawTrack {
        id: format!("deezer-{}", track.id),
        title: track.title,
        artist: track.artist.name,
        preview_ref: track.preview.filter(|p| !p.is_empty()),
        artwork_ref,
    }
}
