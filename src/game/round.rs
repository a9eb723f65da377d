//! Round generation.

use rand::Rng;
use rand::seq::{SliceRandom, index};

use super::GameError;
use crate::model::Track;
use crate::pool::{MIN_POOL_SIZE, TrackPool};

/// Options shown per round: the correct track plus three distractors.
pub const OPTIONS_PER_ROUND: usize = 4;

/// One question: a track to identify and the options to pick from.
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    correct_track: Track,
    options: Vec<Track>,
    selected_answer_id: Option<String>,
    revealed: bool,
}

impl Round {
    /// Draw a new round from the pool.
    ///
    /// The correct track is picked uniformly, three distinct distractors are
    /// sampled from the rest, and the four options are shuffled so the
    /// position never gives the answer away.
    pub fn generate<R>(pool: &TrackPool, rng: &mut R) -> Result<Self, GameError>
    where
        R: Rng + ?Sized,
    {
        let len = pool.len();
        if len < MIN_POOL_SIZE {
            return Err(GameError::InsufficientTracks {
                available: len,
                required: MIN_POOL_SIZE,
            });
        }

        let correct_index = rng.random_range(0..len);

        // Sample from the pool with the correct track removed, then map
        // indices back past the gap.
        let mut options: Vec<Track> = index::sample(rng, len - 1, OPTIONS_PER_ROUND - 1)
            .into_iter()
            .map(|i| if i >= correct_index { i + 1 } else { i })
            .map(|i| pool.at(i).clone())
            .collect();

        let correct_track = pool.at(correct_index).clone();
        options.push(correct_track.clone());
        options.shuffle(rng);

        Ok(Self {
            correct_track,
            options,
            selected_answer_id: None,
            revealed: false,
        })
    }

    /// The track the player must identify.
    pub fn correct_track(&self) -> &Track {
        &self.correct_track
    }

    /// The four options in display order.
    pub fn options(&self) -> &[Track] {
        &self.options
    }

    /// Id of the option the player picked.
    pub fn selected_answer_id(&self) -> Option<&str> {
        self.selected_answer_id.as_deref()
    }

    /// Whether the correct answer has been shown.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Whether `track_id` is the right answer. Compared by id only.
    pub fn is_correct(&self, track_id: &str) -> bool {
        self.correct_track.id == track_id
    }

    /// `Some(true)` if answered correctly, `None` while unanswered.
    pub fn answered_correctly(&self) -> Option<bool> {
        self.selected_answer_id.as_deref().map(|id| self.is_correct(id))
    }

    /// Position of an option in display order.
    pub fn option_index(&self, track_id: &str) -> Option<usize> {
        self.options.iter().position(|t| t.id == track_id)
    }

    /// Record the player's pick and reveal the answer.
    pub(crate) fn answer(&mut self, track_id: &str) {
        self.selected_answer_id = Some(track_id.to_string());
        self.revealed = true;
    }
}
