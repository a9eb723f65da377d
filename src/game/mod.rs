//! The quiz core: round generation, the session state machine and
//! statistics aggregation.
//!
//! # Usage
//!
//! ```ignore
//! use music_guess::game::{EngineConfig, RoundEngine};
//! use music_guess::store::FileStatsStore;
//!
//! let mut engine = RoundEngine::new(EngineConfig::default(), FileStatsStore::default_location()?);
//! let round = engine.start(Arc::new(pool), Difficulty::Easy)?;
//! let pick = round.options()[0].id.clone();
//! engine.record_answer(&pick)?;
//! engine.advance_round()?;
//! ```

mod engine;
mod error;
mod round;
mod stats;

pub use engine::{
    Advance, AnswerOutcome, EngineConfig, RoundEngine, RoundPhase, Session, SessionStatus,
    SessionSummary,
};
pub use error::GameError;
pub use round::{OPTIONS_PER_ROUND, Round};
pub use stats::{Statistics, record_session_result};
