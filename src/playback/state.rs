//! Playback state and event types.

use std::time::Duration;

/// Current playback status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Shared playback state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackState {
    /// Current playback status
    pub status: PlaybackStatus,
    /// Preview reference being played or last played
    pub current: Option<String>,
    /// Snippet length applied to the current preview
    pub snippet: Duration,
    /// Bumped on every play/pause/stop so stale timers can tell they lost
    pub(super) generation: u64,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }
}

/// Notifications sent to the presentation layer.
///
/// Each event carries the controller generation it was emitted under, so
/// one still queued after a newer play can be recognised as stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// The snippet ran its full length and the sink was stopped
    Finished { preview_ref: String, generation: u64 },
    /// Playback was paused before the snippet ended
    Paused { preview_ref: String, generation: u64 },
}

impl PlaybackEvent {
    pub fn preview_ref(&self) -> &str {
        match self {
            Self::Finished { preview_ref, .. } | Self::Paused { preview_ref, .. } => preview_ref,
        }
    }

    pub fn generation(&self) -> u64 {
        match self {
            Self::Finished { generation, .. } | Self::Paused { generation, .. } => *generation,
        }
    }
}

/// Format a duration as M:SS.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
