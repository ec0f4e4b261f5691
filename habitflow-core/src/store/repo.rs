//! Habit repositories
//!
//! Persistence behind a two-call interface: load every habit, save every
//! habit. The store layers the mutation flows on top.

use crate::error::Result;
use crate::types::Habit;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Loads and saves the full habit list.
pub trait HabitRepository {
    /// Load all habits. A repository with nothing saved yet returns an empty list.
    fn load(&self) -> Result<Vec<Habit>>;

    /// Replace the saved habit list.
    fn save(&self, habits: &[Habit]) -> Result<()>;
}

impl<R: HabitRepository + ?Sized> HabitRepository for &R {
    fn load(&self) -> Result<Vec<Habit>> {
        (**self).load()
    }

    fn save(&self, habits: &[Habit]) -> Result<()> {
        (**self).save(habits)
    }
}

/// Habit list stored as a JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "habits.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl HabitRepository for JsonFileRepository {
    fn load(&self) -> Result<Vec<Habit>> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no habit file yet");
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let habits: Vec<Habit> = serde_json::from_str(&content)?;
        tracing::debug!(path = %self.path.display(), count = habits.len(), "loaded habits");
        Ok(habits)
    }

    fn save(&self, habits: &[Habit]) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Write then rename so readers never see a partial file
        let temp = self.temp_path();
        let json = serde_json::to_string_pretty(habits)?;
        std::fs::write(&temp, json)?;
        std::fs::rename(&temp, &self.path)?;

        tracing::debug!(path = %self.path.display(), count = habits.len(), "saved habits");
        Ok(())
    }
}

/// In-memory repository (for testing and embedding)
#[derive(Debug, Default)]
pub struct MemoryRepository {
    habits: Mutex<Vec<Habit>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-seeded with `habits`.
    pub fn with_habits(habits: Vec<Habit>) -> Self {
        Self {
            habits: Mutex::new(habits),
        }
    }
}

impl HabitRepository for MemoryRepository {
    fn load(&self) -> Result<Vec<Habit>> {
        let habits = self.habits.lock().unwrap_or_else(|e| e.into_inner());
        Ok(habits.clone())
    }

    fn save(&self, habits: &[Habit]) -> Result<()> {
        let mut stored = self.habits.lock().unwrap_or_else(|e| e.into_inner());
        *stored = habits.to_vec();
        Ok(())
    }
}
