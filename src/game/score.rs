//! Score tracking and high-score persistence
//!
//! The engine reads and writes the best score through the [`ScoreStore`]
//! trait so tests can use [`MemoryStore`] and the terminal binary can use
//! [`JsonFileStore`].

use log::{info, warn};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Store slot holding the best score
pub const HIGH_SCORE_KEY: &str = "snake.high_score";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access score file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("score file {path:?} is not a valid score map")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("score store unavailable: {0}")]
    Unavailable(String),
}

/// Integer key-value storage for persisted scores
pub trait ScoreStore {
    /// Read a slot; `Ok(None)` when nothing was ever written
    fn get(&self, key: &str) -> Result<Option<u32>, StoreError>;

    /// Write a slot synchronously
    fn set(&mut self, key: &str, value: u32) -> Result<(), StoreError>;
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<u32>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: u32) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// In-memory store; nothing survives the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds a high score
    pub fn with_high_score(score: u32) -> Self {
        let mut store = Self::new();
        store.values.insert(HIGH_SCORE_KEY.to_string(), score);
        store
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<u32>, StoreError> {
        Ok(self.values.get(key).copied())
    }

    fn set(&mut self, key: &str, value: u32) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// JSON object of slot name to score, rewritten on every `set`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, u32>, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&text).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }
}

impl ScoreStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<u32>, StoreError> {
        Ok(self.read_all()?.get(key).copied())
    }

    fn set(&mut self, key: &str, value: u32) -> Result<(), StoreError> {
        // An unreadable file gets replaced rather than blocking the write.
        let mut values = self.read_all().unwrap_or_default();
        values.insert(key.to_string(), value);

        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let json = serde_json::to_string_pretty(&values).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, json).map_err(io_err)
    }
}

/// Current score plus the persisted best
pub struct ScoreKeeper<S> {
    store: S,
    score: u32,
    high_score: u32,
}

impl<S: ScoreStore> ScoreKeeper<S> {
    /// Load the high score once; an unreadable store counts as 0
    pub fn new(store: S) -> Self {
        let high_score = match store.get(HIGH_SCORE_KEY) {
            Ok(value) => value.unwrap_or(0),
            Err(e) => {
                warn!("could not read high score, starting from 0: {e}");
                0
            }
        };

        Self {
            store,
            score: 0,
            high_score,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn on_food_consumed(&mut self) {
        self.score += 1;
    }

    /// Record a finished game.
    ///
    /// Returns `Ok(true)` when the score beat the high score. A failed write
    /// is returned to the caller; the in-memory high score is updated anyway.
    pub fn on_game_over(&mut self) -> Result<bool, StoreError> {
        if self.score <= self.high_score {
            return Ok(false);
        }

        info!("new high score {} (was {})", self.score, self.high_score);
        self.high_score = self.score;
        self.store.set(HIGH_SCORE_KEY, self.score)?;
        Ok(true)
    }

    pub fn reset(&mut self) {
        self.score = 0;
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
