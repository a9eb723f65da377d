//! Statistics persistence.
//!
//! The round engine only sees the [`StatsStore`] trait. Production code uses
//! [`FileStatsStore`], a JSON file in the OS data directory named after a
//! fixed storage key; tests use [`MemoryStatsStore`].
//!
//! Loading never fails: a missing or corrupt record means "no games yet".

use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

use crate::game::Statistics;

/// Storage key of the statistics record.
pub const STATS_KEY: &str = "musicguess-stats";

/// Key-value style persistence for the statistics record.
pub trait StatsStore {
    /// Read the record, defaulting to all zeros if absent or unreadable.
    fn load(&self) -> Statistics;

    /// Persist the record, replacing any previous one.
    fn save(&self, stats: &Statistics) -> Result<(), StoreError>;
}

impl<T: StatsStore + ?Sized> StatsStore for Box<T> {
    fn load(&self) -> Statistics {
        (**self).load()
    }

    fn save(&self, stats: &Statistics) -> Result<(), StoreError> {
        (**self).save(stats)
    }
}

/// Statistics stored as a JSON file.
#[derive(Debug, Clone)]
pub struct FileStatsStore {
    path: PathBuf,
}

impl FileStatsStore {
    /// Store under `dir`, in a file named after [`STATS_KEY`].
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(format!("{}.json", STATS_KEY)),
        }
    }

    /// Store in the default location (user data directory).
    pub fn default_location() -> Result<Self, StoreError> {
        let dir = dirs::data_dir()
            .ok_or(StoreError::NoDataDir)?
            .join("music-guess");
        Ok(Self::new(dir))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl StatsStore for FileStatsStore {
    fn load(&self) -> Statistics {
        if !self.path.exists() {
            tracing::debug!("No statistics at {:?}, starting fresh", self.path);
            return Statistics::default();
        }

        match std::fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(stats) => stats,
                Err(e) => {
                    tracing::warn!("Corrupt statistics file {:?}: {}", self.path, e);
                    Statistics::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read statistics {:?}: {}", self.path, e);
                Statistics::default()
            }
        }
    }

    fn save(&self, stats: &Statistics) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| StoreError::Write(dir.to_path_buf(), e))?;
        }

        let contents = serde_json::to_string_pretty(stats).map_err(StoreError::Serialize)?;

        // Write atomically (write to temp, then rename)
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, contents)
            .map_err(|e| StoreError::Write(temp_path.clone(), e))?;
        std::fs::rename(&temp_path, &self.path)
            .map_err(|e| StoreError::Write(self.path.clone(), e))?;

        tracing::debug!("Saved statistics to {:?}", self.path);
        Ok(())
    }
}

/// In-memory store. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct MemoryStatsStore {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    record: Option<Statistics>,
    saves: usize,
    fail_saves: bool,
}

impl MemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a record.
    pub fn with_record(stats: Statistics) -> Self {
        let store = Self::default();
        store.inner.lock().record = Some(stats);
        store
    }

    /// Make every subsequent save fail.
    pub fn fail_saves(&self, fail: bool) {
        self.inner.lock().fail_saves = fail;
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.inner.lock().saves
    }

    /// Last saved record.
    pub fn record(&self) -> Option<Statistics> {
        self.inner.lock().record
    }
}

impl StatsStore for MemoryStatsStore {
    fn load(&self) -> Statistics {
        self.inner.lock().record.unwrap_or_default()
    }

    fn save(&self, stats: &Statistics) -> Result<(), StoreError> {
        let mut state = self.inner.lock();
        if state.fail_saves {
            return Err(StoreError::Unavailable("save disabled".to_string()));
        }
        state.record = Some(*stats);
        state.saves += 1;
        Ok(())
    }
}

/// Statistics persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Could not determine data directory")]
    NoDataDir,

    #[error("Failed to write {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to serialize statistics: {0}")]
    Serialize(serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
