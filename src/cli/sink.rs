//! Terminal stand-in for a media element.

use crate::playback::{AudioSink, PlaybackError};

/// Announces previews on stdout.
///
/// Only the host is shown while a round is open: some preview references
/// (Last.fm's YouTube search embeds) spell out the artist and title. The
/// full link is printed once the answer is revealed.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl AudioSink for ConsoleSink {
    fn start(&self, preview_ref: &str) -> Result<(), PlaybackError> {
        println!("{}", now_playing_line(preview_ref));
        Ok(())
    }

    fn stop(&self) {}
}

fn now_playing_line(preview_ref: &str) -> String {
    match preview_host(preview_ref) {
        Some(host) => format!("  ♪ snippet playing ({})", host),
        None => "  ♪ snippet playing".to_string(),
    }
}

/// Host part of a URL-like reference.
fn preview_host(preview_ref: &str) -> Option<&str> {
    let (_, rest) = preview_ref.split_once("://")?;
    let host = rest.split(['/', '?', '#']).next()?;
    (!host.is_empty()).then_some(host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::lastfm::embed_search_ref;

    #[test]
    fn test_announcement_hides_search_terms() {
        let preview_ref = embed_search_ref("Lady Gaga", "Bad Romance");
        let line = now_playing_line(&preview_ref);

        assert_eq!(line, "  ♪ snippet playing (www.youtube.com)");
        for hint in ["Lady", "Gaga", "Bad", "Romance", "list="] {
            assert!(!line.contains(hint), "{line:?} leaks {hint:?}");
        }
    }

    #[test]
    fn test_announcement_without_host() {
        assert_eq!(now_playing_line("local-preview"), "  ♪ snippet playing");
        assert_eq!(
            preview_host("https://cdns-preview.dzcdn.net/a.mp3"),
            Some("cdns-preview.dzcdn.net")
        );
    }
}
