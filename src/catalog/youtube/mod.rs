//! YouTube Data API integration
//!
//! Music videos stand in for audio previews: the preview reference is the
//! video's watch URL.
//! API docs: https://developers.google.com/youtube/v3/docs/search/list

mod adapter;
mod client;
pub mod dto;

pub use adapter::{clean_title, extract_artist, to_raw_tracks};
pub use client::YouTubeClient;
