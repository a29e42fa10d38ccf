use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Directory under the platform data dir holding all game files.
pub const APP_DIR_NAME: &str = "classic-snake";
const SCORE_FILE_NAME: &str = "scores.json";

/// Key under which the high score is stored.
pub const HIGH_SCORE_KEY: &str = "highScore";

/// Failures at the high-score persistence boundary.
#[derive(Debug, Error)]
pub enum ScoreStoreError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("{} is not a valid score file: {source}", path.display())]
    Format {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("stored high score {value:?} is not a non-negative integer")]
    InvalidValue { value: String },
    #[error("score storage unavailable: {0}")]
    Unavailable(&'static str),
}

/// Durable home of the single high-score value.
pub trait HighScoreStore {
    /// Returns the stored high score, or `None` when nothing was saved yet.
    fn load(&mut self) -> Result<Option<u32>, ScoreStoreError>;

    /// Replaces the stored high score.
    fn save(&mut self, score: u32) -> Result<(), ScoreStoreError>;
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for Box<S> {
    fn load(&mut self) -> Result<Option<u32>, ScoreStoreError> {
        (**self).load()
    }

    fn save(&mut self, score: u32) -> Result<(), ScoreStoreError> {
        (**self).save(score)
    }
}

/// Returns the platform-correct score file path.
#[must_use]
pub fn scores_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(SCORE_FILE_NAME);
    base
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ScoreFile {
    #[serde(rename = "highScore", default, skip_serializing_if = "Option::is_none")]
    high_score: Option<String>,
    #[serde(flatten)]
    other: BTreeMap<String, serde_json::Value>,
}

/// JSON key-value file; the high score is decimal text under `highScore`.
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform default location.
    #[must_use]
    pub fn at_default_location() -> Self {
        Self::new(scores_path())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<Option<ScoreFile>, ScoreStoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ScoreStoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| ScoreStoreError::Format {
                path: self.path.clone(),
                source,
            })
    }
}

impl HighScoreStore for FileScoreStore {
    fn load(&mut self) -> Result<Option<u32>, ScoreStoreError> {
        let Some(file) = self.read_file()? else {
            return Ok(None);
        };

        file.high_score
            .map(|value| {
                value
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| ScoreStoreError::InvalidValue { value: value.clone() })
            })
            .transpose()
    }

    fn save(&mut self, score: u32) -> Result<(), ScoreStoreError> {
        // Keep whatever else lives in the file; a corrupt file is replaced.
        let mut file = self.read_file().ok().flatten().unwrap_or_default();
        file.high_score = Some(score.to_string());

        let write_error = |source| ScoreStoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }

        let json = serde_json::to_string_pretty(&file).map_err(|source| {
            ScoreStoreError::Format {
                path: self.path.clone(),
                source,
            }
        })?;

        fs::write(&self.path, json).map_err(write_error)
    }
}

/// In-memory store for tests and sessions that opt out of persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    value: Option<u32>,
    fail_reads: bool,
    fail_writes: bool,
    saves: usize,
    save_attempts: usize,
}

impl MemoryScoreStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds `score`.
    #[must_use]
    pub fn with_score(score: u32) -> Self {
        Self {
            value: Some(score),
            ..Self::default()
        }
    }

    /// Store whose every read and write fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_reads: true,
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Store that holds `score` and can be read, but rejects every write.
    #[must_use]
    pub fn failing_writes(score: u32) -> Self {
        Self {
            value: Some(score),
            fail_writes: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn stored(&self) -> Option<u32> {
        self.value
    }

    /// Number of successful saves.
    #[must_use]
    pub fn saves(&self) -> usize {
        self.saves
    }

    /// Number of calls to `save`, failed ones included.
    #[must_use]
    pub fn save_attempts(&self) -> usize {
        self.save_attempts
    }
}

impl HighScoreStore for MemoryScoreStore {
    fn load(&mut self) -> Result<Option<u32>, ScoreStoreError> {
        if self.fail_reads {
            return Err(ScoreStoreError::Unavailable("memory store set to fail reads"));
        }
        Ok(self.value)
    }

    fn save(&mut self, score: u32) -> Result<(), ScoreStoreError> {
        self.save_attempts += 1;
        if self.fail_writes {
            return Err(ScoreStoreError::Unavailable("memory store set to fail writes"));
        }
        self.value = Some(score);
        self.saves += 1;
        Ok(())
    }
}

/// Session-wide best score backed by a store.
///
/// Storage failures never surface to the game: after the first one the
/// tracker keeps the value in memory only for the rest of the session.
#[derive(Debug)]
pub struct HighScoreTracker<S> {
    best: u32,
    store: S,
    persistent: bool,
}

impl<S: HighScoreStore> HighScoreTracker<S> {
    /// Reads the stored value once; unreadable storage counts as zero.
    pub fn load(mut store: S) -> Self {
        let (best, persistent) = match store.load() {
            Ok(value) => (value.unwrap_or(0), true),
            Err(error) => {
                warn!("high score unavailable, keeping it in memory only: {error}");
                (0, false)
            }
        };

        Self {
            best,
            store,
            persistent,
        }
    }

    #[must_use]
    pub fn best(&self) -> u32 {
        self.best
    }

    /// False once storage has failed during this session.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Records a finished game's score. Returns true on a new high score.
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }

        info!("new high score {score} (previous {})", self.best);
        self.best = score;

        if self.persistent {
            if let Err(error) = self.store.save(score) {
                warn!("failed to save high score, keeping it in memory only: {error}");
                self.persistent = false;
            }
        }

        true
    }
}
