//! Adapter layer: Convert YouTube search results to raw tracks
//!
//! Video titles carry decorations ("(Official Video)", "[Lyrics]", "HD")
//! and usually follow an "Artist - Title" layout; channel names carry
//! suffixes like "VEVO" or "- Topic". Both are cleaned up here.

use super::dto;
use crate::model::RawTrack;

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Bracketed or dashed decorations removed from titles (matched lowercase)
const TITLE_DECORATIONS: &[&str] = &[
    "official music video",
    "official lyric video",
    "official video",
    "official audio",
    "lyrics",
];

/// Standalone words dropped from titles
const TITLE_NOISE: &[&str] = &["hd", "4k"];

/// Standalone words dropped from channel names
const CHANNEL_NOISE: &[&str] = &["official", "music", "channel", "records", "entertainment", "vevo"];

/// Convert a search response, skipping non-video results.
pub fn to_raw_tracks(response: dto::SearchResponse) -> Vec<RawTrack> {
    response.items.into_iter().filter_map(convert_result).collect()
}

fn convert_result(result: dto::SearchResult) -> Option<RawTrack> {
    let video_id = result.id.video_id.filter(|id| !id.is_empty())?;
    let snippet = result.snippet?;

    let artist = extract_artist(&snippet.title, &snippet.channel_title);
    let title = clean_title(&snippet.title);
    let title = match title.split_once(" - ") {
        Some((_, song)) if !song.trim().is_empty() => song.trim().to_string(),
        _ => title,
    };

    let artwork_ref = snippet
        .thumbnails
        .and_then(|t| t.high.or(t.medium).or(t.default))
        .map(|t| t.url);

    Some(RawTrack {
        preview_ref: Some(format!("{}{}", WATCH_URL, video_id)),
        id: video_id,
        title,
        artist,
        artwork_ref,
    })
}

/// Strip video decorations from a title.
pub fn clean_title(title: &str) -> String {
    let mut cleaned = title.to_string();
    for decoration in TITLE_DECORATIONS {
        cleaned = remove_decoration(&cleaned, decoration);
    }

    cleaned
        .split_whitespace()
        .filter(|word| !is_noise(word, TITLE_NOISE))
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(|c: char| c == '-' || c == '|' || c.is_whitespace())
        .to_string()
}

/// Artist from an "Artist - Title" title, else the cleaned channel name.
pub fn extract_artist(title: &str, channel_title: &str) -> String {
    if let Some((artist, _)) = title.split_once(" - ") {
        let artist = artist.trim();
        if !artist.is_empty() {
            return artist.to_string();
        }
    }

    let channel = channel_title.trim();
    let channel = strip_suffix_ignore_case(channel, "- topic").unwrap_or(channel);
    let channel = strip_suffix_ignore_case(channel, "vevo").unwrap_or(channel);

    channel
        .split_whitespace()
        .filter(|word| !is_noise(word, CHANNEL_NOISE))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Remove every occurrence of `decoration`, with any wrapping brackets and
/// a leading " - " or " | " separator.
fn remove_decoration(text: &str, decoration: &str) -> String {
    let mut result = text.to_string();
    // ASCII lowercasing keeps byte offsets aligned with `result`
    while let Some(start) = result.to_ascii_lowercase().find(decoration) {
        let mut from = start;
        let mut to = start + decoration.len();

        let before = &result[..from];
        let trimmed = before.trim_end();
        if trimmed.ends_with('(') || trimmed.ends_with('[') {
            from = trimmed.len() - 1;
            let after = &result[to..];
            let after_trimmed = after.trim_start();
            if after_trimmed.starts_with(')') || after_trimmed.starts_with(']') {
                to += after.len() - after_trimmed.len() + 1;
            }
        } else if trimmed.ends_with('-') || trimmed.ends_with('|') {
            from = trimmed.len() - 1;
        }

        result = format!("{} {}", result[..from].trim_end(), result[to..].trim_start());
    }
    result.trim().to_string()
}

fn is_noise(word: &str, noise: &[&str]) -> bool {
    let bare = word.trim_matches(|c: char| c == '(' || c == ')' || c == '[' || c == ']');
    noise.iter().any(|n| bare.eq_ignore_ascii_case(n))
}

fn strip_suffix_ignore_case<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    let split = text.len().checked_sub(suffix.len())?;
    if !text.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = text.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then(|| head.trim_end())
}
