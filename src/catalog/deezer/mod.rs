//! Deezer search integration
//!
//! Deezer's public search API needs no key and returns 30-second MP3
//! previews for most tracks.
//! API docs: https://developers.deezer.com/api/search

mod adapter;
mod client;
pub mod dto;

pub use adapter::to_raw_tracks;
pub use client::DeezerClient;
