//! Spotify Web API integration
//!
//! Uses the client-credentials flow: no user login, search only.
//! API docs: https://developer.spotify.com/documentation/web-api/reference/search

mod adapter;
mod client;
pub mod dto;

pub use adapter::to_raw_tracks;
pub use client::SpotifyClient;
