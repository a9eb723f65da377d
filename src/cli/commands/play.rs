//! Interactive quiz session.
//!
//! Keyboard input arrives from a blocking stdin thread over a channel and
//! is multiplexed with playback events, so a snippet can finish while the
//! player is still thinking.

use std::io::{BufRead, Write};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use super::pool::fetch_pool;
use crate::catalog::ProviderKind;
use crate::cli::ConsoleSink;
use crate::config::Config;
use crate::error::Error;
use crate::game::{
    Advance, AnswerOutcome, EngineConfig, Round, RoundEngine, RoundPhase, Session, SessionSummary,
};
use crate::model::{Category, Difficulty};
use crate::playback::{PlaybackController, PlaybackEvent, format_duration};
use crate::store::{FileStatsStore, StatsStore};

/// Resolved settings for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayOptions {
    pub difficulty: Difficulty,
    pub category: Category,
    pub source: ProviderKind,
    pub auto_play: bool,
    pub refresh: bool,
}

impl PlayOptions {
    /// Defaults from the config file.
    pub fn from_config(config: &Config) -> Self {
        Self {
            difficulty: config.game.difficulty,
            category: config.game.category,
            source: config.catalog.source,
            auto_play: config.game.auto_play_next_round,
            refresh: false,
        }
    }
}

/// A line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    /// 0-based option index
    Answer(usize),
    TogglePlay,
    Next,
    Quit,
    Unknown,
}

fn parse_input(line: &str) -> Input {
    match line.trim().to_lowercase().as_str() {
        "" | "n" | "next" => Input::Next,
        "p" | "play" | "pause" => Input::TogglePlay,
        "q" | "quit" | "exit" => Input::Quit,
        other => match other.parse::<usize>() {
            Ok(n) if n >= 1 => Input::Answer(n - 1),
            _ => Input::Unknown,
        },
    }
}

/// Whether the loop should keep going.
enum Flow {
    Continue,
    Done,
}

/// Play a full session
pub fn cmd_play(rt: &Runtime, config: &Config, options: PlayOptions) -> anyhow::Result<()> {
    let pool = Arc::new(fetch_pool(
        rt,
        config,
        options.category,
        options.source,
        options.refresh,
    )?);

    let store = FileStatsStore::default_location().map_err(Error::from)?;
    let engine_config = EngineConfig {
        auto_play_next_round: options.auto_play,
    };
    let mut engine = RoundEngine::new(engine_config, store);

    println!(
        "{} songs ready. {} rounds ({}). Answer 1-4, p to play/pause, q to quit.",
        pool.len(),
        options.difficulty.max_rounds(),
        options.difficulty
    );

    engine.start(pool, options.difficulty).map_err(Error::from)?;

    rt.block_on(run_session(&mut engine, config))
}

async fn run_session<S: StatsStore>(
    engine: &mut RoundEngine<S>,
    config: &Config,
) -> anyhow::Result<()> {
    let (mut player, mut events) =
        PlaybackController::new(Arc::new(ConsoleSink), config.game.snippet());
    let mut input = spawn_stdin_reader();

    begin_round(engine, &mut player);

    loop {
        let flow = tokio::select! {
            line = input.recv() => match line {
                Some(line) => handle_input(engine, &mut player, parse_input(&line))?,
                None => Flow::Done,
            },
            Some(event) = events.recv() => {
                handle_playback(engine, &player, event);
                Flow::Continue
            }
            _ = tokio::signal::ctrl_c() => Flow::Done,
        };

        if let Flow::Done = flow {
            break;
        }
    }

    player.stop();
    if engine.session().phase().is_some() {
        println!("Session abandoned; it won't count towards statistics.");
        engine.reset();
    }
    Ok(())
}

/// Read stdin lines on a dedicated thread.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Show the current round and start its snippet if the engine says so.
fn begin_round<S: StatsStore>(engine: &mut RoundEngine<S>, player: &mut PlaybackController) {
    let session = engine.session();
    let Some(round) = session.round() else {
        return;
    };

    println!();
    print!("{}", render_round(session, round));
    if session.is_playing {
        start_snippet(engine, player);
    } else {
        println!("  (p to play the {} snippet)", format_duration(player.snippet()));
    }
    prompt("> ");
}

/// Play the current round's preview. A broken preview only skips the audio.
fn start_snippet<S: StatsStore>(engine: &mut RoundEngine<S>, player: &mut PlaybackController) {
    let Some(preview_ref) = engine
        .current_round()
        .map(|r| r.correct_track().preview_ref.clone())
    else {
        return;
    };

    if let Err(e) = player.play(&preview_ref) {
        tracing::warn!(preview_ref = %preview_ref, "Playback failed: {}", e);
        engine.set_playing(false);
        println!("  (can't play this snippet: {})", e);
    }
}

fn handle_input<S: StatsStore>(
    engine: &mut RoundEngine<S>,
    player: &mut PlaybackController,
    input: Input,
) -> anyhow::Result<Flow> {
    let Some(phase) = engine.session().phase() else {
        return Ok(Flow::Done);
    };

    match (phase, input) {
        (_, Input::Quit) => return Ok(Flow::Done),
        (RoundPhase::AwaitingAnswer, Input::TogglePlay) => {
            if engine.toggle_play().map_err(Error::from)? {
                start_snippet(engine, player);
            } else {
                player.pause();
            }
        }
        (RoundPhase::AwaitingAnswer, Input::Answer(index)) => {
            let Some(id) = engine
                .current_round()
                .and_then(|r| r.options().get(index))
                .map(|t| t.id.clone())
            else {
                println!("Pick a number between 1 and {}.", crate::game::OPTIONS_PER_ROUND);
                prompt("> ");
                return Ok(Flow::Continue);
            };

            player.stop();
            let outcome = engine.record_answer(&id).map_err(Error::from)?;
            if let Some(round) = engine.current_round() {
                println!("{}", render_outcome(round, &outcome));
            }
            prompt("Enter for the next round > ");
        }
        (RoundPhase::Answered, Input::Next) => match engine.advance_round().map_err(Error::from)? {
            Advance::NextRound { .. } => begin_round(engine, player),
            Advance::Finished(summary) => {
                println!();
                println!("{}", render_summary(&summary));
                return Ok(Flow::Done);
            }
        },
        (RoundPhase::Answered, Input::TogglePlay) => {
            // Replay the revealed song
            if player.is_playing() {
                player.pause();
            } else if let Some(round) = engine.current_round() {
                if let Err(e) = player.play(&round.correct_track().preview_ref) {
                    println!("  (can't play this snippet: {})", e);
                }
            }
        }
        (RoundPhase::AwaitingAnswer, Input::Next) | (_, Input::Unknown) | (_, Input::Answer(_)) => {
            println!("Answer 1-4, p to play/pause, q to quit.");
            prompt("> ");
        }
    }
    Ok(Flow::Continue)
}

fn handle_playback<S: StatsStore>(
    engine: &mut RoundEngine<S>,
    player: &PlaybackController,
    event: PlaybackEvent,
) {
    if !player.is_current(&event) {
        tracing::debug!(generation = event.generation(), "Dropping stale playback event");
        return;
    }

    match event {
        PlaybackEvent::Finished { .. } => {
            engine.set_playing(false);
            if engine.session().phase() == Some(RoundPhase::AwaitingAnswer) {
                println!("  (snippet over, p to hear it again)");
                prompt("> ");
            }
        }
        PlaybackEvent::Paused { .. } => engine.set_playing(false),
    }
}

fn prompt(text: &str) {
    print!("{}", text);
    let _ = std::io::stdout().flush();
}

fn render_round(session: &Session, round: &Round) -> String {
    let mut out = format!(
        "Round {}/{}  ·  score {}\n",
        session.round_index, session.max_rounds, session.score
    );
    for (i, track) in round.options().iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, track.display_label()));
    }
    out
}

/// Verdict for an answered round, with the full preview link now that
/// it can no longer give the answer away.
fn render_outcome(round: &Round, outcome: &AnswerOutcome) -> String {
    let correct = round.correct_track();
    let verdict = if outcome.correct {
        format!("  ✓ Correct! {}  (score {})", correct.display_label(), outcome.score)
    } else {
        format!(
            "  ✗ It was {}  (score {})",
            correct.display_label(),
            outcome.score
        )
    };
    format!("{}\n    listen: {}", verdict, correct.preview_ref)
}

fn render_summary(summary: &SessionSummary) -> String {
    let mut out = format!(
        "Game over: {}/{} correct.\n{}",
        summary.final_score,
        summary.max_rounds,
        super::stats::format_statistics(&summary.statistics)
    );
    if !summary.persisted {
        out.push_str("\n(statistics could not be saved)");
    }
    out
}
