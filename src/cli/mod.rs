//! Command-line interface for music-guess.
//!
//! This module provides the interactive quiz and the statistics and cache
//! maintenance commands.

mod commands;
mod sink;

pub use commands::{Cli, Commands, run_command};
pub use sink::ConsoleSink;
