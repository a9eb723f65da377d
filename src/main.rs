//! Music Guess - a terminal music quiz.
//!
//! Builds a pool of songs with playable previews from an online catalog,
//! plays a short snippet each round and asks which of four songs it was.
//! Scores are folded into persistent statistics.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod game;
pub mod model;
pub mod playback;
pub mod pool;
pub mod store;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("music_guess=info".parse()?))
        .init();

    if let Err(e) = cli::run_command(&args) {
        if let Some(message) = e
            .downcast_ref::<error::Error>()
            .and_then(error::Error::user_message)
        {
            eprintln!("{}", message);
        }
        return Err(e);
    }
    Ok(())
}
