//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\music-guess\config.toml
//! - macOS: ~/Library/Application Support/music-guess/config.toml
//! - Linux: ~/.config/music-guess/config.toml
//!
//! The config file is human-readable and editable. Command-line flags and
//! environment variables override what it contains.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::ProviderKind;
use crate::model::{Category, Difficulty};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials (keep separate for potential future encryption)
    pub credentials: Credentials,

    /// Session defaults
    pub game: GameConfig,

    /// Track sourcing
    pub catalog: CatalogConfig,
}

/// API credentials
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Spotify client-credentials app id
    pub spotify_client_id: Option<String>,

    /// Spotify client-credentials app secret
    pub spotify_client_secret: Option<String>,

    /// YouTube Data API key
    pub youtube_api_key: Option<String>,

    /// Last.fm API key
    pub lastfm_api_key: Option<String>,
}

/// Session defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub difficulty: Difficulty,

    pub category: Category,

    /// Start the next snippet automatically after advancing a round
    pub auto_play_next_round: bool,

    /// Seconds of audio played per round
    pub snippet_secs: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            category: Category::default(),
            auto_play_next_round: false,
            snippet_secs: 10,
        }
    }
}

impl GameConfig {
    /// Snippet length, never zero.
    pub fn snippet(&self) -> Duration {
        Duration::from_secs(self.snippet_secs.max(1))
    }
}

/// Track sourcing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Which catalog backend builds the pool
    pub source: ProviderKind,

    /// Results requested per query
    pub per_query_limit: u32,

    /// Queries in flight at once
    pub concurrency: usize,

    /// Searched after the built-in category queries
    pub extra_queries: Vec<String>,

    /// How long a cached pool stays usable (0 disables the cache)
    pub cache_ttl_hours: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: ProviderKind::default(),
            per_query_limit: 10,
            concurrency: 4,
            extra_queries: Vec::new(),
            cache_ttl_hours: 24,
        }
    }
}

impl CatalogConfig {
    /// Cache lifetime as a `chrono` delta.
    pub fn cache_ttl(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.cache_ttl_hours))
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("music-guess"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from a specific file
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the default location
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)
}

/// Save configuration to a specific file
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    // Serialize to pretty TOML
    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
