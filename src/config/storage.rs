//! Snapshot persistence
//!
//! The engine only defines the snapshot shape; this is the host-side layer
//! that writes it to disk and reads it back for rehydration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::Config;
use crate::progress::{PartialSnapshot, ProgressSnapshot};

/// A learner's progress file on disk
#[derive(Debug, Clone)]
pub struct ProgressFile {
    path: PathBuf,
}

impl ProgressFile {
    /// Progress file in the default data directory
    pub fn default_location() -> Result<Self> {
        Ok(Self::at(Config::data_dir()?.join("progress.json")))
    }

    /// Progress file at an explicit path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a saved learner exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load saved values, or `None` if nothing has been saved yet
    pub fn load(&self) -> Result<Option<PartialSnapshot>> {
        if !self.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read progress from {:?}", self.path))?;
        let partial =
            serde_json::from_str(&contents).with_context(|| "Failed to parse progress.json")?;
        Ok(Some(partial))
    }

    /// Save a snapshot to disk
    pub fn save(&self, snapshot: &ProgressSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(snapshot)
            .with_context(|| "Failed to serialize progress")?;

        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write progress to {:?}", self.path))?;

        tracing::debug!("Saved progress to {:?}", self.path);
        Ok(())
    }
}
