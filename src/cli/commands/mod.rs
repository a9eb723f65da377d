//! CLI command definitions and dispatch.
//!
//! This module provides the command-line interface for Music Guess.
//! Each subcommand is implemented in its own submodule:
//! - `play`: the interactive quiz
//! - `pool`: pool building diagnostics and cache maintenance
//! - `stats`: statistics display and reset

mod play;
mod pool;
mod stats;

use clap::{Args, Parser, Subcommand};
use tokio::runtime::Runtime;

use crate::catalog::ProviderKind;
use crate::config::{self, Config};
use crate::model::{Category, Difficulty};

pub use play::{PlayOptions, cmd_play};
pub use pool::{cmd_clear_cache, cmd_pool};
pub use stats::{cmd_reset_stats, cmd_stats};

/// Music Guess CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub credentials: CredentialArgs,
}

/// Catalog credentials; each overrides the config file.
#[derive(Args, Debug, Default)]
pub struct CredentialArgs {
    /// Spotify app client id
    #[arg(long, global = true, env = "SPOTIFY_CLIENT_ID", hide_env_values = true)]
    pub spotify_client_id: Option<String>,
    /// Spotify app client secret
    #[arg(long, global = true, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    pub spotify_client_secret: Option<String>,
    /// YouTube Data API key
    #[arg(long, global = true, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    pub youtube_api_key: Option<String>,
    /// Last.fm API key
    #[arg(long, global = true, env = "LASTFM_API_KEY", hide_env_values = true)]
    pub lastfm_api_key: Option<String>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Play a quiz session (the default)
    Play {
        /// Number of rounds: easy 5, medium 10, hard 15
        #[arg(short, long)]
        difficulty: Option<Difficulty>,
        /// Music category to draw songs from
        #[arg(short, long)]
        category: Option<Category>,
        /// Catalog to search
        #[arg(short, long)]
        source: Option<ProviderKind>,
        /// Start each snippet automatically when a round begins
        #[arg(long)]
        auto_play: bool,
        /// Ignore the cached pool and search the catalog again
        #[arg(long)]
        refresh: bool,
    },
    /// Build a track pool and list it
    Pool {
        /// Music category to draw songs from
        #[arg(short, long)]
        category: Option<Category>,
        /// Catalog to search
        #[arg(short, long)]
        source: Option<ProviderKind>,
        /// Ignore the cached pool and search the catalog again
        #[arg(long)]
        refresh: bool,
    },
    /// Show statistics across finished sessions
    Stats,
    /// Reset statistics to zero
    ResetStats,
    /// Remove cached track pools
    ClearCache,
}

/// Run the specified CLI command.
///
/// Without a subcommand a session starts with the configured defaults.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let mut config = config::load();
    apply_credentials(&mut config, &cli.credentials);

    match &cli.command {
        None => {
            let rt = Runtime::new()?;
            cmd_play(&rt, &config, PlayOptions::from_config(&config))
        }
        Some(Commands::Play {
            difficulty,
            category,
            source,
            auto_play,
            refresh,
        }) => {
            let rt = Runtime::new()?;
            let defaults = PlayOptions::from_config(&config);
            let options = PlayOptions {
                difficulty: difficulty.unwrap_or(defaults.difficulty),
                category: category.unwrap_or(defaults.category),
                source: source.unwrap_or(defaults.source),
                auto_play: *auto_play || defaults.auto_play,
                refresh: *refresh,
            };
            cmd_play(&rt, &config, options)
        }
        Some(Commands::Pool {
            category,
            source,
            refresh,
        }) => {
            let rt = Runtime::new()?;
            cmd_pool(
                &rt,
                &config,
                category.unwrap_or(config.game.category),
                source.unwrap_or(config.catalog.source),
                *refresh,
            )
        }
        Some(Commands::Stats) => cmd_stats(),
        Some(Commands::ResetStats) => cmd_reset_stats(),
        Some(Commands::ClearCache) => cmd_clear_cache(),
    }
}

/// Command-line and environment credentials win over the config file.
fn apply_credentials(config: &mut Config, args: &CredentialArgs) {
    let creds = &mut config.credentials;
    let overrides = [
        (&mut creds.spotify_client_id, &args.spotify_client_id),
        (&mut creds.spotify_client_secret, &args.spotify_client_secret),
        (&mut creds.youtube_api_key, &args.youtube_api_key),
        (&mut creds.lastfm_api_key, &args.lastfm_api_key),
    ];
    for (slot, value) in overrides {
        if value.is_some() {
            slot.clone_from(value);
        }
    }
}
