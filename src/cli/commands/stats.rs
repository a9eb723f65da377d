//! Statistics commands.

use crate::error::ResultExt;
use crate::game::{EngineConfig, RoundEngine, Statistics};
use crate::store::{FileStatsStore, StatsStore};

/// Human-readable statistics block.
pub(super) fn format_statistics(stats: &Statistics) -> String {
    if stats.total_games == 0 {
        return "No games played yet.".to_string();
    }
    format!(
        "Games played:   {}\n\
         Best score:     {}\n\
         Average score:  {}\n\
         Correct:        {}/{} ({}%)",
        stats.total_games,
        stats.best_score,
        stats.average_score,
        stats.correct_answers,
        stats.total_answers,
        stats.accuracy_percent()
    )
}

/// Print persisted statistics
pub fn cmd_stats() -> anyhow::Result<()> {
    let store = FileStatsStore::default_location()?;
    println!("{}", format_statistics(&store.load()));
    Ok(())
}

/// Overwrite statistics with the zero record
pub fn cmd_reset_stats() -> anyhow::Result<()> {
    let store = FileStatsStore::default_location()?;
    let mut engine = RoundEngine::new(EngineConfig::default(), store);
    engine
        .reset_statistics()
        .with_context("resetting statistics")?;
    println!("Statistics reset.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::record_session_result;

    #[test]
    fn test_format_empty() {
        assert_eq!(format_statistics(&Statistics::default()), "No games played yet.");
    }

    #[test]
    fn test_format_includes_accuracy() {
        let stats = record_session_result(&record_session_result(&Statistics::default(), 5, 5), 2, 10);
        let text = format_statistics(&stats);
        assert!(text.contains("Games played:   2"));
        assert!(text.contains("Correct:        7/15 (47%)"));
    }
}
