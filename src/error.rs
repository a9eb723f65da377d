//! Application-wide error types.
//!
//! This module provides a unified error hierarchy for the application.
//! Library modules use specific error types via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - Module-specific errors (e.g., [`GameError`], [`CatalogError`]) for detailed handling
//! - All errors implement `std::error::Error` for compatibility
//!
//! # Example
//!
//! ```ignore
//! use music_guess::error::{Result, ResultExt};
//!
//! fn clear(cache: &PoolCache) -> Result<usize> {
//!     cache.clear().with_context("clearing pool cache")
//! }
//! ```

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::game::GameError;
use crate::playback::PlaybackError;
use crate::store::StoreError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
///
/// Aggregates errors from all subsystems for unified handling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Session rule violation or unusable pool
    #[error(transparent)]
    Game(#[from] GameError),

    /// Catalog lookup error
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Statistics persistence error
    #[error("Statistics error: {0}")]
    Store(#[from] StoreError),

    /// Audio playback error
    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }

    /// Message suitable for showing to the player, if this is one of the
    /// failures they can act on.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Error::Game(e) if e.is_user_facing() => {
                Some("Not enough songs with previews. Pick another source or category.")
            }
            Error::Catalog(_) => Some("Couldn't load songs. Try again."),
            Error::WithContext { source, .. } => source.user_message(),
            _ => None,
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, GameError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Game(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, StoreError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Store(e).context(ctx))
    }
}
