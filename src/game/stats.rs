//! Cross-session statistics.

use serde::{Deserialize, Serialize};

/// Aggregate record of finished sessions.
///
/// Serialized with camelCase keys under the `musicguess-stats` record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Statistics {
    /// Finished sessions
    pub total_games: u32,
    /// Highest single-session score
    pub best_score: u32,
    /// Rounded running mean of session scores
    pub average_score: u32,
    /// Sum of session scores
    pub correct_answers: u32,
    /// Sum of rounds played across finished sessions
    pub total_answers: u32,
}

impl Statistics {
    /// Share of answers that were correct, as a rounded percentage.
    pub fn accuracy_percent(&self) -> u32 {
        if self.total_answers == 0 {
            return 0;
        }
        (f64::from(self.correct_answers) / f64::from(self.total_answers) * 100.0).round() as u32
    }
}

/// Fold a finished session into the statistics.
///
/// Pure: the caller persists the result.
pub fn record_session_result(stats: &Statistics, final_score: u32, max_rounds: u32) -> Statistics {
    let total_games = stats.total_games.saturating_add(1);
    let average = (f64::from(stats.average_score) * f64::from(stats.total_games)
        + f64::from(final_score))
        / f64::from(total_games);

    Statistics {
        total_games,
        best_score: stats.best_score.max(final_score),
        average_score: average.round() as u32,
        correct_answers: stats.correct_answers.saturating_add(final_score),
        total_answers: stats.total_answers.saturating_add(max_rounds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_perfect_easy_session() {
        let stats = record_session_result(&Statistics::default(), 5, 5);
        assert_eq!(
            stats,
            Statistics {
                total_games: 1,
                best_score: 5,
                average_score: 5,
                correct_answers: 5,
                total_answers: 5,
            }
        );
    }

    #[test]
    fn test_second_session_averages_and_keeps_best() {
        let first = record_session_result(&Statistics::default(), 5, 5);
        let second = record_session_result(&first, 2, 10);
        assert_eq!(
            second,
            Statistics {
                total_games: 2,
                best_score: 5,
                average_score: 4,
                correct_answers: 7,
                total_answers: 15,
            }
        );
    }

    #[test]
    fn test_average_rounds_half_up() {
        let stats = Statistics {
            total_games: 1,
            best_score: 3,
            average_score: 3,
            correct_answers: 3,
            total_answers: 5,
        };
        // (3 + 4) / 2 = 3.5
        assert_eq!(record_session_result(&stats, 4, 5).average_score, 4);
    }

    #[test]
    fn test_accuracy_percent() {
        assert_eq!(Statistics::default().accuracy_percent(), 0);
        let stats = Statistics {
            correct_answers: 7,
            total_answers: 15,
            ..Default::default()
        };
        assert_eq!(stats.accuracy_percent(), 47);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_string(&record_session_result(&Statistics::default(), 5, 5))
            .unwrap();
        assert!(json.contains("\"totalGames\":1"));
        assert!(json.contains("\"averageScore\":5"));
    }

    #[test]
    fn test_partial_record_uses_defaults() {
        let stats: Statistics = serde_json::from_str(r#"{"bestScore": 9}"#).unwrap();
        assert_eq!(stats.best_score, 9);
        assert_eq!(stats.total_games, 0);
    }
}
