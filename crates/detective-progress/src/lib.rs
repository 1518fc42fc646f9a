//! Persisted player progress: unlocked levels, solved levels and query counters.

use detective_core::level::ALWAYS_UNLOCKED;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const APP_DIR: &str = "cypher-detective";
pub const PROGRESS_FILE: &str = "progress.json";

#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("Progress file I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Progress file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressState {
    pub highest_level_unlocked: u32,
    pub levels_completed: Vec<u32>,
    pub total_queries_attempted: u64,
    pub total_queries_correct: u64,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            highest_level_unlocked: 1,
            levels_completed: Vec::new(),
            total_queries_attempted: 0,
            total_queries_correct: 0,
        }
    }
}

impl ProgressState {
    /// Build a state from whatever JSON was on disk, field by field.
    ///
    /// Missing or mistyped fields keep their default; the rest survive.
    pub fn from_value(value: serde_json::Value) -> Self {
        let defaults = Self::default();
        let serde_json::Value::Object(map) = value else {
            tracing::warn!("Progress file does not hold an object, using defaults");
            return defaults;
        };

        let mut levels_completed = level_list(&map, "levels_completed");
        dedup_in_order(&mut levels_completed);

        Self {
            highest_level_unlocked: field(
                &map,
                "highest_level_unlocked",
                defaults.highest_level_unlocked,
            ),
            levels_completed,
            total_queries_attempted: field(
                &map,
                "total_queries_attempted",
                defaults.total_queries_attempted,
            ),
            total_queries_correct: field(
                &map,
                "total_queries_correct",
                defaults.total_queries_correct,
            ),
        }
    }

    pub fn is_unlocked(&self, level: u32) -> bool {
        ALWAYS_UNLOCKED.contains(&level) || level <= self.highest_level_unlocked
    }

    pub fn is_completed(&self, level: u32) -> bool {
        self.levels_completed.contains(&level)
    }

    /// Mark `level` solved and unlock the one after it.
    ///
    /// Returns true when the level was not already completed.
    pub fn complete_level(&mut self, level: u32) -> bool {
        let newly = !self.is_completed(level);
        if newly {
            self.levels_completed.push(level);
        }
        if level >= self.highest_level_unlocked {
            self.highest_level_unlocked = level + 1;
        }
        newly
    }

    pub fn record_attempt(&mut self, correct: bool) {
        self.total_queries_attempted += 1;
        if correct {
            self.total_queries_correct += 1;
        }
    }
}

fn field<T: DeserializeOwned>(
    map: &serde_json::Map<String, serde_json::Value>,
    key: &str,
    default: T,
) -> T {
    let Some(raw) = map.get(key) else {
        tracing::warn!(field = key, "Progress field missing, using default");
        return default;
    };
    match serde_json::from_value(raw.clone()) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(field = key, "Progress field unreadable ({}), using default", e);
            default
        }
    }
}

/// Like [`field`] for a list of levels, but a bad entry only drops itself.
fn level_list(map: &serde_json::Map<String, serde_json::Value>, key: &str) -> Vec<u32> {
    let entries: Vec<serde_json::Value> = field(map, key, Vec::new());
    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<u32>(entry.clone()) {
            Ok(level) => Some(level),
            Err(_) => {
                tracing::warn!(field = key, "Skipping unreadable entry {}", entry);
                None
            }
        })
        .collect()
}

fn dedup_in_order(levels: &mut Vec<u32>) {
    let mut seen = Vec::with_capacity(levels.len());
    levels.retain(|level| {
        if seen.contains(level) {
            false
        } else {
            seen.push(*level);
            true
        }
    });
}

/// Progress plus the file it lives in.
///
/// Every mutation is written through immediately. Without a path (no data
/// directory on this platform) the store works purely in memory.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: Option<PathBuf>,
    state: ProgressState,
}

impl ProgressStore {
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join(APP_DIR).join(PROGRESS_FILE))
    }

    /// Open the default location, or `path` when given.
    pub fn open(path: Option<PathBuf>) -> Self {
        match path.or_else(Self::default_path) {
            Some(path) => Self::load(path),
            None => {
                tracing::warn!("No data directory available, progress will not be saved");
                Self::in_memory()
            }
        }
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: ProgressState::default(),
        }
    }

    /// Never fails: an absent or broken file means a fresh start.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = if path.exists() {
            match Self::try_load(&path) {
                Ok(state) => {
                    tracing::info!("Progress loaded from {:?}", path);
                    state
                }
                Err(e) => {
                    tracing::error!("Failed to load progress: {}", e);
                    ProgressState::default()
                }
            }
        } else {
            tracing::info!("Progress file not found, starting fresh");
            ProgressState::default()
        };
        Self {
            path: Some(path),
            state,
        }
    }

    pub fn try_load(path: &Path) -> Result<ProgressState, ProgressError> {
        let content = std::fs::read_to_string(path).map_err(|source| ProgressError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        Ok(ProgressState::from_value(value))
    }

    pub fn save(&self) -> Result<(), ProgressError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |source| ProgressError::Io {
            path: path.clone(),
            source,
        };
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(&self.state)?;
        std::fs::write(path, content).map_err(io_err)?;
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn is_unlocked(&self, level: u32) -> bool {
        self.state.is_unlocked(level)
    }

    pub fn is_completed(&self, level: u32) -> bool {
        self.state.is_completed(level)
    }

    pub fn complete_level(&mut self, level: u32) -> Result<bool, ProgressError> {
        let newly = self.state.complete_level(level);
        tracing::info!(
            level,
            highest = self.state.highest_level_unlocked,
            "Level completed"
        );
        self.save()?;
        Ok(newly)
    }

    pub fn record_attempt(&mut self, correct: bool) -> Result<(), ProgressError> {
        self.state.record_attempt(correct);
        self.save()
    }

    pub fn reset(&mut self) -> Result<(), ProgressError> {
        self.state = ProgressState::default();
        self.save()
    }
}
