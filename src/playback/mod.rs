//! Time-bounded preview playback.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │          PlaybackController (caller)         │
//! │   play / pause / stop, owns the auto-stop    │
//! └───────────────┬───────────────────┬──────────┘
//!                 │ start / stop      │ tokio timer task
//!                 ▼                   ▼
//! ┌───────────────────────┐  ┌───────────────────────────┐
//! │   AudioSink (media)   │  │  PlaybackEvent over mpsc  │
//! └───────────────────────┘  └───────────────────────────┘
//! ```
//!
//! The round engine never sees timers. The presentation layer listens for
//! [`PlaybackEvent`]s and mirrors them into the engine's `is_playing` flag.

mod state;

pub use state::{PlaybackEvent, PlaybackState, PlaybackStatus, format_duration};

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Default snippet length.
pub const DEFAULT_SNIPPET: Duration = Duration::from_secs(10);

/// The platform media element.
///
/// `start` begins sounding a preview; `stop` silences whatever is playing.
pub trait AudioSink: Send + Sync {
    fn start(&self, preview_ref: &str) -> Result<(), PlaybackError>;
    fn stop(&self);
}

/// Drives an [`AudioSink`] for at most one snippet at a time.
pub struct PlaybackController {
    sink: Arc<dyn AudioSink>,
    snippet: Duration,
    state: Arc<RwLock<PlaybackState>>,
    events: mpsc::UnboundedSender<PlaybackEvent>,
    timer: Option<JoinHandle<()>>,
}

impl PlaybackController {
    /// Create a controller and the receiving end of its event channel.
    pub fn new(
        sink: Arc<dyn AudioSink>,
        snippet: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<PlaybackEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let controller = Self {
            sink,
            snippet,
            state: Arc::new(RwLock::new(PlaybackState::default())),
            events,
            timer: None,
        };
        (controller, rx)
    }

    /// Start a preview, replacing anything already playing.
    ///
    /// Must be called from within a tokio runtime; the auto-stop is a
    /// spawned timer task.
    pub fn play(&mut self, preview_ref: &str) -> Result<(), PlaybackError> {
        if preview_ref.trim().is_empty() {
            return Err(PlaybackError::EmptyReference);
        }
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| PlaybackError::NoRuntime)?;

        self.cancel_timer();
        self.sink.stop();
        if let Err(e) = self.sink.start(preview_ref) {
            let mut state = self.state.write();
            state.generation += 1;
            state.status = PlaybackStatus::Stopped;
            return Err(e);
        }

        let generation = {
            let mut state = self.state.write();
            state.generation += 1;
            state.status = PlaybackStatus::Playing;
            state.current = Some(preview_ref.to_string());
            state.snippet = self.snippet;
            state.generation
        };

        tracing::debug!(preview_ref, snippet = ?self.snippet, "Playback started");

        self.timer = Some(runtime.spawn(auto_stop(
            Arc::clone(&self.sink),
            Arc::clone(&self.state),
            self.events.clone(),
            generation,
            self.snippet,
        )));
        Ok(())
    }

    /// Pause the current preview. Does nothing unless playing.
    pub fn pause(&mut self) {
        let (preview_ref, generation) = {
            let mut state = self.state.write();
            if !state.is_playing() {
                return;
            }
            state.generation += 1;
            state.status = PlaybackStatus::Paused;
            (state.current.clone().unwrap_or_default(), state.generation)
        };

        self.cancel_timer();
        self.sink.stop();
        tracing::debug!(preview_ref = %preview_ref, "Playback paused");
        let _ = self.events.send(PlaybackEvent::Paused {
            preview_ref,
            generation,
        });
    }

    /// Pause if playing, otherwise (re)start `preview_ref`.
    ///
    /// Returns whether audio is sounding afterwards.
    pub fn toggle(&mut self, preview_ref: &str) -> Result<bool, PlaybackError> {
        if self.is_playing() {
            self.pause();
            Ok(false)
        } else {
            self.play(preview_ref)?;
            Ok(true)
        }
    }

    /// Silence the sink without emitting an event.
    pub fn stop(&mut self) {
        self.cancel_timer();
        let mut state = self.state.write();
        if state.status != PlaybackStatus::Stopped {
            state.generation += 1;
            state.status = PlaybackStatus::Stopped;
            self.sink.stop();
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> PlaybackState {
        self.state.read().clone()
    }

    pub fn is_playing(&self) -> bool {
        self.state.read().is_playing()
    }

    /// Whether `event` reflects the latest play/pause/stop.
    ///
    /// Events emitted before a newer command are stale and should be dropped.
    pub fn is_current(&self, event: &PlaybackEvent) -> bool {
        event.generation() == self.state.read().generation
    }

    /// Configured snippet length.
    pub fn snippet(&self) -> Duration {
        self.snippet
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

/// Stop the sink once the snippet has run, unless playback moved on.
async fn auto_stop(
    sink: Arc<dyn AudioSink>,
    state: Arc<RwLock<PlaybackState>>,
    events: mpsc::UnboundedSender<PlaybackEvent>,
    generation: u64,
    snippet: Duration,
) {
    tokio::time::sleep(snippet).await;

    let preview_ref = {
        let mut state = state.write();
        if state.generation != generation {
            return;
        }
        state.status = PlaybackStatus::Stopped;
        state.current.clone().unwrap_or_default()
    };

    sink.stop();
    tracing::debug!(preview_ref = %preview_ref, "Snippet finished");
    let _ = events.send(PlaybackEvent::Finished {
        preview_ref,
        generation,
    });
}

/// Playback errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaybackError {
    #[error("Audio output failed: {0}")]
    Sink(String),

    #[error("Track has no preview to play")]
    EmptyReference,

    #[error("Playback needs a running async runtime")]
    NoRuntime,
}


#[cfg(test)]
mod tests {
    use super::mocks::RecordingSink;
    use super::*;
    use tokio::sync::mpsc::error::TryRecvError;

    fn controller() -> (
        PlaybackController,
        mpsc::UnboundedReceiver<PlaybackEvent>,
        Arc<RecordingSink>,
    ) {
        let sink = Arc::new(RecordingSink::default());
        let (controller, rx) = PlaybackController::new(sink.clone(), DEFAULT_SNIPPET);
        (controller, rx, sink)
    }

    #[tokio::test(start_paused = true)]
    async fn test_snippet_auto_stops() {
        let (mut controller, mut rx, sink) = controller();

        controller.play("https://cdn/a.mp3").unwrap();
        assert!(controller.is_playing());
        assert!(sink.is_sounding());

        let event = rx.recv().await.unwrap();

        assert!(matches!(event, PlaybackEvent::Finished { .. }));
        assert_eq!(event.preview_ref(), "https://cdn/a.mp3");
        assert!(controller.is_current(&event));
        assert!(!controller.is_playing());
        assert!(!sink.is_sounding());
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_finished_before_snippet_ends() {
        let (mut controller, mut rx, _sink) = controller();

        controller.play("a").unwrap();
        tokio::time::sleep(Duration::from_secs(9)).await;

        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
        assert!(controller.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_cancels_auto_stop() {
        let (mut controller, mut rx, sink) = controller();

        controller.play("a").unwrap();
        tokio::time::sleep(Duration::from_secs(3)).await;
        controller.pause();

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, PlaybackEvent::Paused { .. }));
        assert_eq!(event.preview_ref(), "a");
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
        assert_eq!(controller.state().status, PlaybackStatus::Paused);
        assert!(!sink.is_sounding());
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_restarts_timer() {
        let (mut controller, mut rx, _sink) = controller();

        controller.play("a").unwrap();
        tokio::time::sleep(Duration::from_secs(6)).await;
        controller.play("b").unwrap();
        tokio::time::sleep(Duration::from_secs(6)).await;

        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        tokio::time::sleep(Duration::from_secs(5)).await;
        let event = rx.try_recv().unwrap();
        assert!(matches!(event, PlaybackEvent::Finished { .. }));
        assert_eq!(event.preview_ref(), "b");
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_event_is_stale_after_replay() {
        let (mut controller, mut rx, _sink) = controller();

        controller.play("a").unwrap();
        controller.pause();
        controller.play("a").unwrap();

        let paused = rx.recv().await.unwrap();
        assert!(matches!(paused, PlaybackEvent::Paused { .. }));
        assert!(!controller.is_current(&paused));
        assert!(controller.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle() {
        let (mut controller, mut rx, _sink) = controller();

        assert!(controller.toggle("a").unwrap());
        assert!(!controller.toggle("a").unwrap());
        assert!(matches!(rx.recv().await, Some(PlaybackEvent::Paused { .. })));
        assert!(controller.toggle("a").unwrap());
        assert!(controller.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_silent() {
        let (mut controller, mut rx, sink) = controller();

        controller.play("a").unwrap();
        controller.stop();
        tokio::time::sleep(Duration::from_secs(20)).await;

        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
        assert_eq!(controller.state().status, PlaybackStatus::Stopped);
        assert!(!sink.is_sounding());
    }

    #[tokio::test]
    async fn test_empty_reference_rejected() {
        let (mut controller, _rx, sink) = controller();
        assert_eq!(controller.play("  "), Err(PlaybackError::EmptyReference));
        assert!(sink.calls().is_empty());
    }

    #[tokio::test]
    async fn test_sink_failure_leaves_state_stopped() {
        let sink = Arc::new(RecordingSink::failing());
        let (mut controller, _rx) = PlaybackController::new(sink, DEFAULT_SNIPPET);

        assert!(matches!(controller.play("a"), Err(PlaybackError::Sink(_))));
        assert!(!controller.is_playing());
    }

    #[test]
    fn test_play_without_runtime() {
        let sink = Arc::new(RecordingSink::default());
        let (mut controller, _rx) = PlaybackController::new(sink.clone(), DEFAULT_SNIPPET);

        assert_eq!(controller.play("a"), Err(PlaybackError::NoRuntime));
        assert!(sink.calls().is_empty());
    }
}
