//! Last.fm track search integration
//!
//! Last.fm serves metadata only. Each hit gets a YouTube embed search
//! reference as its preview so the game can still play something.
//! API docs: https://www.last.fm/api/show/track.search

mod adapter;
mod client;
pub mod dto;

pub use adapter::{embed_search_ref, to_raw_tracks};
pub use client::LastFmClient;
