//! High score persistence, one integer per supported board size.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HighScoreError {
    #[error("high score io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("high score file is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the best controlled score for each board size lives.
pub trait HighScoreStore: Send + Sync {
    /// Stored score for `grid_size`, zero when nothing was recorded.
    fn load(&self, grid_size: u32) -> Result<u32, HighScoreError>;
    fn save(&mut self, grid_size: u32, score: u32) -> Result<(), HighScoreError>;
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreTable {
    scores: BTreeMap<u32, u32>,
}

impl HighScoreTable {
    pub fn get(&self, grid_size: u32) -> u32 {
        self.scores.get(&grid_size).copied().unwrap_or(0)
    }

    pub fn set(&mut self, grid_size: u32, score: u32) {
        self.scores.insert(grid_size, score);
    }
}

/// Keeps the table as pretty-printed JSON at `path`.
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

    fn read_table(&self) -> Result<HighScoreTable, HighScoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HighScoreTable::default()),
            Err(e) => Err(e.into()),
        }
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&self, grid_size: u32) -> Result<u32, HighScoreError> {
        Ok(self.read_table()?.get(grid_size))
    }

    fn save(&mut self, grid_size: u32, score: u32) -> Result<(), HighScoreError> {
        let mut table = self.read_table()?;
        table.set(grid_size, score);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&table)?)?;

        tracing::debug!("High score {} saved for size {} to {}", score, grid_size, self.path.display());
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    table: HighScoreTable,
}

impl HighScoreStore for MemoryStore {
    fn load(&self, grid_size: u32) -> Result<u32, HighScoreError> {
        Ok(self.table.get(grid_size))
    }

    fn save(&mut self, grid_size: u32, score: u32) -> Result<(), HighScoreError> {
        self.table.set(grid_size, score);
        Ok(())
    }
}
