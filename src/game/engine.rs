//! Session state machine.
//!
//! ```text
//! NotStarted ──start──▶ InProgress ──advance (last round)──▶ Finished
//!      ▲                 │  AwaitingAnswer ──answer──▶ Answered
//!      │                 │        ▲                       │
//!      │                 │        └──────advance──────────┘
//!      └─────reset───────┴──────────────────────────────────────┘
//! ```
//!
//! Every operation is synchronous. The engine never owns timers: the
//! playback controller reports play/pause through [`RoundEngine::set_playing`].

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;

use super::round::Round;
use super::stats::{Statistics, record_session_result};
use super::GameError;
use crate::model::Difficulty;
use crate::pool::{MIN_POOL_SIZE, TrackPool};
use crate::store::StatsStore;

/// Engine policy knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Start the next snippet as soon as a round advances
    pub auto_play_next_round: bool,
}

/// Top-level session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    NotStarted,
    InProgress,
    Finished,
}

/// Per-round sub-state while a session is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    AwaitingAnswer,
    Answered,
}

/// The current game run.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Session status
    pub status: SessionStatus,
    /// Difficulty chosen at start
    pub difficulty: Option<Difficulty>,
    /// 1-based round number (0 before start)
    pub round_index: u32,
    /// Rounds in this session
    pub max_rounds: u32,
    /// Correct answers so far
    pub score: u32,
    /// Whether the snippet is sounding
    pub is_playing: bool,
    round: Option<Round>,
}

impl Session {
    /// The round being played, if any.
    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// Sub-state of the current round; `None` outside a session.
    pub fn phase(&self) -> Option<RoundPhase> {
        if self.status != SessionStatus::InProgress {
            return None;
        }
        self.round.as_ref().map(|r| {
            if r.is_revealed() {
                RoundPhase::Answered
            } else {
                RoundPhase::AwaitingAnswer
            }
        })
    }

    /// Whether the current round is the session's last.
    pub fn is_last_round(&self) -> bool {
        self.round_index >= self.max_rounds
    }
}

/// Result of recording an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    /// Whether the pick matched the correct track id
    pub correct: bool,
    /// Id of the correct track, for revealing it
    pub correct_track_id: String,
    /// Score after this answer
    pub score: u32,
}

/// A finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub final_score: u32,
    pub max_rounds: u32,
    /// Statistics including this session
    pub statistics: Statistics,
    /// False if the store refused the update; in-memory stats are still current
    pub persisted: bool,
}

/// What [`RoundEngine::advance_round`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// A new round is ready
    NextRound { round_index: u32 },
    /// The last round was played
    Finished(SessionSummary),
}

/// Runs quiz sessions over a track pool and keeps statistics.
pub struct RoundEngine<S: StatsStore> {
    config: EngineConfig,
    store: S,
    stats: Statistics,
    pool: Option<Arc<TrackPool>>,
    session: Session,
    rng: StdRng,
}

impl<S: StatsStore> RoundEngine<S> {
    /// Create an engine, loading statistics from the store.
    pub fn new(config: EngineConfig, store: S) -> Self {
        Self::with_rng(config, store, StdRng::from_os_rng())
    }

    /// Create an engine with a specific random source.
    pub fn with_rng(config: EngineConfig, store: S, rng: StdRng) -> Self {
        let stats = store.load();
        Self {
            config,
            store,
            stats,
            pool: None,
            session: Session::default(),
            rng,
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Current session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Statistics as of the last finished session.
    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// The round being played, if any.
    pub fn current_round(&self) -> Option<&Round> {
        self.session.round()
    }

    /// Start a new session, abandoning any current one.
    ///
    /// Abandoned sessions are not counted in statistics.
    pub fn start(
        &mut self,
        pool: Arc<TrackPool>,
        difficulty: Difficulty,
    ) -> Result<&Round, GameError> {
        if pool.len() < MIN_POOL_SIZE {
            return Err(GameError::InsufficientTracks {
                available: pool.len(),
                required: MIN_POOL_SIZE,
            });
        }

        if self.session.status == SessionStatus::InProgress {
            tracing::info!(
                round = self.session.round_index,
                "Abandoning session in progress"
            );
        }

        let round = Round::generate(&pool, &mut self.rng)?;

        self.session = Session {
            status: SessionStatus::InProgress,
            difficulty: Some(difficulty),
            round_index: 1,
            max_rounds: difficulty.max_rounds(),
            score: 0,
            is_playing: true,
            round: Some(round),
        };
        self.pool = Some(pool);

        tracing::info!(
            %difficulty,
            max_rounds = self.session.max_rounds,
            "Session started"
        );

        self.current_round().ok_or(GameError::NotInProgress)
    }

    /// Record the player's pick for the current round.
    ///
    /// A second answer in the same round fails with `AlreadyAnswered` and
    /// leaves the score untouched.
    pub fn record_answer(&mut self, track_id: &str) -> Result<AnswerOutcome, GameError> {
        if self.session.status != SessionStatus::InProgress {
            return Err(GameError::NotInProgress);
        }
        let round = self.session.round.as_mut().ok_or(GameError::NotInProgress)?;

        if round.is_revealed() {
            tracing::debug!(track_id, "Ignoring repeated answer");
            return Err(GameError::AlreadyAnswered);
        }
        if round.option_index(track_id).is_none() {
            return Err(GameError::UnknownOption(track_id.to_string()));
        }

        round.answer(track_id);
        let correct = round.is_correct(track_id);
        let correct_track_id = round.correct_track().id.clone();

        if correct {
            self.session.score += 1;
        }
        self.session.is_playing = false;

        tracing::debug!(
            round = self.session.round_index,
            correct,
            score = self.session.score,
            "Answer recorded"
        );

        Ok(AnswerOutcome {
            correct,
            correct_track_id,
            score: self.session.score,
        })
    }

    /// Move to the next round, or finish the session after the last one.
    ///
    /// Finishing folds the score into statistics and saves them exactly once;
    /// further calls fail with `NotInProgress`.
    pub fn advance_round(&mut self) -> Result<Advance, GameError> {
        match self.session.phase() {
            None => return Err(GameError::NotInProgress),
            Some(RoundPhase::AwaitingAnswer) => {
                tracing::warn!(
                    round = self.session.round_index,
                    "Advance requested before the round was answered"
                );
                return Err(GameError::NotYetAnswered);
            }
            Some(RoundPhase::Answered) => {}
        }

        if self.session.is_last_round() {
            return Ok(Advance::Finished(self.finish()));
        }

        let pool = self.pool.as_ref().ok_or(GameError::NotInProgress)?;
        let round = Round::generate(pool, &mut self.rng)?;

        self.session.round_index += 1;
        self.session.round = Some(round);
        self.session.is_playing = self.config.auto_play_next_round;

        Ok(Advance::NextRound {
            round_index: self.session.round_index,
        })
    }

    fn finish(&mut self) -> SessionSummary {
        let final_score = self.session.score;
        let max_rounds = self.session.max_rounds;

        self.stats = record_session_result(&self.stats, final_score, max_rounds);
        let persisted = match self.store.save(&self.stats) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to save statistics: {}", e);
                false
            }
        };

        self.session.status = SessionStatus::Finished;
        self.session.round = None;
        self.session.is_playing = false;

        tracing::info!(final_score, max_rounds, "Session finished");

        SessionSummary {
            final_score,
            max_rounds,
            statistics: self.stats,
            persisted,
        }
    }

    /// Drop the session and return to `NotStarted`. Always succeeds.
    pub fn reset(&mut self) {
        self.session = Session::default();
        self.pool = None;
    }

    /// Flip the playing flag. Returns the new value.
    pub fn toggle_play(&mut self) -> Result<bool, GameError> {
        if self.session.status != SessionStatus::InProgress {
            return Err(GameError::NotInProgress);
        }
        self.session.is_playing = !self.session.is_playing;
        Ok(self.session.is_playing)
    }

    /// Playback controller callback: the snippet started or stopped.
    ///
    /// Ignored outside a session.
    pub fn set_playing(&mut self, playing: bool) {
        if self.session.status == SessionStatus::InProgress {
            self.session.is_playing = playing;
        }
    }

    /// Replace statistics with the zero record and persist it.
    pub fn reset_statistics(&mut self) -> Result<(), crate::store::StoreError> {
        self.stats = Statistics::default();
        self.store.save(&self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStatsStore;
    use crate::test_utils::{pool_of, seeded_rng};

    fn engine(store: MemoryStatsStore) -> RoundEngine<MemoryStatsStore> {
        RoundEngine::with_rng(EngineConfig::default(), store, seeded_rng(99))
    }

    fn correct_id(engine: &RoundEngine<MemoryStatsStore>) -> String {
        engine.current_round().unwrap().correct_track().id.clone()
    }

    fn wrong_id(engine: &RoundEngine<MemoryStatsStore>) -> String {
        let round = engine.current_round().unwrap();
        round
            .options()
            .iter()
            .find(|t| !round.is_correct(&t.id))
            .unwrap()
            .id
            .clone()
    }

    #[test]
    fn test_start_initializes_session() {
        let mut engine = engine(MemoryStatsStore::new());
        engine.start(pool_of(8), Difficulty::Medium).unwrap();

        let session = engine.session();
        assert_eq!(session.status, SessionStatus::InProgress);
        assert_eq!(session.round_index, 1);
        assert_eq!(session.max_rounds, 10);
        assert_eq!(session.score, 0);
        assert!(session.is_playing);
        assert_eq!(session.phase(), Some(RoundPhase::AwaitingAnswer));
    }

    #[test]
    fn test_start_rejects_small_pool() {
        let mut engine = engine(MemoryStatsStore::new());
        let pool = crate::test_utils::undersized_pool(3);
        let err = engine.start(pool, Difficulty::Easy).unwrap_err();
        assert_eq!(
            err,
            GameError::InsufficientTracks {
                available: 3,
                required: 4
            }
        );
        assert_eq!(engine.session().status, SessionStatus::NotStarted);
    }

    #[test]
    fn test_correct_answer_scores() {
        let mut engine = engine(MemoryStatsStore::new());
        engine.start(pool_of(8), Difficulty::Easy).unwrap();
        let id = correct_id(&engine);

        let outcome = engine.record_answer(&id).unwrap();

        assert!(outcome.correct);
        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.correct_track_id, id);
        assert!(!engine.session().is_playing);
        assert_eq!(engine.session().phase(), Some(RoundPhase::Answered));
        let round = engine.current_round().unwrap();
        assert!(round.is_revealed());
        assert_eq!(round.selected_answer_id(), Some(id.as_str()));
    }

    #[test]
    fn test_wrong_answer_does_not_score() {
        let mut engine = engine(MemoryStatsStore::new());
        engine.start(pool_of(8), Difficulty::Easy).unwrap();
        let id = wrong_id(&engine);

        let outcome = engine.record_answer(&id).unwrap();
        assert!(!outcome.correct);
        assert_eq!(engine.session().score, 0);
    }

    #[test]
    fn test_second_answer_is_rejected_without_double_count() {
        let mut engine = engine(MemoryStatsStore::new());
        engine.start(pool_of(8), Difficulty::Easy).unwrap();
        let id = correct_id(&engine);

        engine.record_answer(&id).unwrap();
        assert_eq!(engine.record_answer(&id), Err(GameError::AlreadyAnswered));
        assert_eq!(engine.session().score, 1);
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let mut engine = engine(MemoryStatsStore::new());
        engine.start(pool_of(8), Difficulty::Easy).unwrap();

        let err = engine.record_answer("not-an-option").unwrap_err();
        assert_eq!(err, GameError::UnknownOption("not-an-option".to_string()));
        assert_eq!(engine.session().phase(), Some(RoundPhase::AwaitingAnswer));
    }

    #[test]
    fn test_advance_before_answer_is_rejected() {
        let mut engine = engine(MemoryStatsStore::new());
        engine.start(pool_of(8), Difficulty::Easy).unwrap();

        assert_eq!(engine.advance_round(), Err(GameError::NotYetAnswered));
        assert_eq!(engine.session().round_index, 1);
    }

    #[test]
    fn test_operations_require_session() {
        let mut engine = engine(MemoryStatsStore::new());
        assert_eq!(engine.record_answer("x"), Err(GameError::NotInProgress));
        assert_eq!(engine.advance_round(), Err(GameError::NotInProgress));
        assert_eq!(engine.toggle_play(), Err(GameError::NotInProgress));
    }

    #[test]
    fn test_advance_resets_round_state() {
        let mut engine = engine(MemoryStatsStore::new());
        engine.start(pool_of(8), Difficulty::Easy).unwrap();
        let id = correct_id(&engine);
        engine.record_answer(&id).unwrap();

        let advance = engine.advance_round().unwrap();

        assert_eq!(advance, Advance::NextRound { round_index: 2 });
        let session = engine.session();
        assert_eq!(session.phase(), Some(RoundPhase::AwaitingAnswer));
        assert!(!session.is_playing);
        let round = session.round().unwrap();
        assert_eq!(round.selected_answer_id(), None);
        assert!(!round.is_revealed());
    }

    #[test]
    fn test_auto_play_next_round() {
        let config = EngineConfig {
            auto_play_next_round: true,
        };
        let mut engine = RoundEngine::with_rng(config, MemoryStatsStore::new(), seeded_rng(1));
        engine.start(pool_of(8), Difficulty::Easy).unwrap();
        let id = correct_id(&engine);
        engine.record_answer(&id).unwrap();
        assert!(!engine.session().is_playing);

        engine.advance_round().unwrap();
        assert!(engine.session().is_playing);
    }

    #[test]
    fn test_perfect_easy_session_updates_statistics() {
        let store = MemoryStatsStore::new();
        let mut engine = engine(store.clone());
        engine.start(pool_of(10), Difficulty::Easy).unwrap();

        let mut last = None;
        for _ in 0..5 {
            let id = correct_id(&engine);
            engine.record_answer(&id).unwrap();
            last = Some(engine.advance_round().unwrap());
        }

        let expected = Statistics {
            total_games: 1,
            best_score: 5,
            average_score: 5,
            correct_answers: 5,
            total_answers: 5,
        };
        match last {
            Some(Advance::Finished(summary)) => {
                assert_eq!(summary.final_score, 5);
                assert_eq!(summary.max_rounds, 5);
                assert_eq!(summary.statistics, expected);
                assert!(summary.persisted);
            }
            other => panic!("expected finished session, got {:?}", other),
        }
        assert_eq!(engine.session().status, SessionStatus::Finished);
        assert_eq!(engine.session().score, 5);
        assert_eq!(store.record(), Some(expected));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_repeated_advance_after_finish_does_not_double_count() {
        let store = MemoryStatsStore::new();
        let mut engine = engine(store.clone());
        engine.start(pool_of(6), Difficulty::Easy).unwrap();
        for _ in 0..5 {
            let id = wrong_id(&engine);
            engine.record_answer(&id).unwrap();
            engine.advance_round().unwrap();
        }

        assert_eq!(engine.advance_round(), Err(GameError::NotInProgress));
        assert_eq!(engine.advance_round(), Err(GameError::NotInProgress));
        assert_eq!(store.save_count(), 1);
        assert_eq!(engine.statistics().total_games, 1);
    }

    #[test]
    fn test_statistics_accumulate_across_sessions() {
        let store = MemoryStatsStore::with_record(Statistics {
            total_games: 1,
            best_score: 5,
            average_score: 5,
            correct_answers: 5,
            total_answers: 5,
        });
        let mut engine = engine(store.clone());
        engine.start(pool_of(10), Difficulty::Medium).unwrap();

        for round in 0..10 {
            let id = if round < 2 {
                correct_id(&engine)
            } else {
                wrong_id(&engine)
            };
            engine.record_answer(&id).unwrap();
            engine.advance_round().unwrap();
        }

        assert_eq!(
            store.record(),
            Some(Statistics {
                total_games: 2,
                best_score: 5,
                average_score: 4,
                correct_answers: 7,
                total_answers: 15,
            })
        );
    }

    #[test]
    fn test_failed_save_still_finishes() {
        let store = MemoryStatsStore::new();
        store.fail_saves(true);
        let mut engine = engine(store.clone());
        engine.start(pool_of(6), Difficulty::Easy).unwrap();
        for _ in 0..5 {
            let id = correct_id(&engine);
            engine.record_answer(&id).unwrap();
            if let Advance::Finished(summary) = engine.advance_round().unwrap() {
                assert!(!summary.persisted);
                assert_eq!(summary.statistics.total_games, 1);
            }
        }
        assert_eq!(engine.session().status, SessionStatus::Finished);
        assert_eq!(engine.statistics().total_games, 1);
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut engine = engine(MemoryStatsStore::new());
        engine.reset();
        assert_eq!(engine.session().status, SessionStatus::NotStarted);

        engine.start(pool_of(6), Difficulty::Hard).unwrap();
        let id = correct_id(&engine);
        engine.record_answer(&id).unwrap();
        engine.reset();

        let session = engine.session();
        assert_eq!(session.status, SessionStatus::NotStarted);
        assert_eq!(session.score, 0);
        assert_eq!(session.round_index, 0);
        assert!(session.round().is_none());
        assert!(!session.is_playing);
        assert_eq!(engine.advance_round(), Err(GameError::NotInProgress));
    }

    #[test]
    fn test_restart_after_finish() {
        let mut engine = engine(MemoryStatsStore::new());
        engine.start(pool_of(6), Difficulty::Easy).unwrap();
        for _ in 0..5 {
            let id = correct_id(&engine);
            engine.record_answer(&id).unwrap();
            engine.advance_round().unwrap();
        }

        engine.start(pool_of(6), Difficulty::Hard).unwrap();
        assert_eq!(engine.session().status, SessionStatus::InProgress);
        assert_eq!(engine.session().max_rounds, 15);
        assert_eq!(engine.session().score, 0);
    }

    #[test]
    fn test_toggle_and_set_playing() {
        let mut engine = engine(MemoryStatsStore::new());
        engine.set_playing(true);
        assert!(!engine.session().is_playing);

        engine.start(pool_of(6), Difficulty::Easy).unwrap();
        assert_eq!(engine.toggle_play(), Ok(false));
        assert_eq!(engine.toggle_play(), Ok(true));

        engine.set_playing(false);
        assert!(!engine.session().is_playing);
    }

    #[test]
    fn test_reset_statistics() {
        let store = MemoryStatsStore::with_record(Statistics {
            total_games: 3,
            ..Default::default()
        });
        let mut engine = engine(store.clone());
        assert_eq!(engine.statistics().total_games, 3);

        engine.reset_statistics().unwrap();
        assert_eq!(store.record(), Some(Statistics::default()));
    }
}
