//! Player progress persistence
//!
//! Level unlock flags and the endless-mode high score, stored as a flat JSON
//! record. A missing or corrupt save degrades to defaults and logs why; it
//! never takes the game down with it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::consts::LEVEL_COUNT;

/// Persistent player progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Unlock flag per level, index 0 = level 1
    pub levels_unlocked: Vec<bool>,
    /// Best endless-mode correct-call count
    pub highscore: u32,
}

impl Default for Progress {
    fn default() -> Self {
        let mut levels_unlocked = vec![false; LEVEL_COUNT];
        levels_unlocked[0] = true;
        Self {
            levels_unlocked,
            highscore: 0,
        }
    }
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Is the 0-based level index playable?
    pub fn is_unlocked(&self, level: usize) -> bool {
        self.levels_unlocked.get(level).copied().unwrap_or(false)
    }

    /// Unlock a 0-based level index. Out-of-range indices are ignored.
    pub fn unlock_level(&mut self, level: usize) {
        if let Some(flag) = self.levels_unlocked.get_mut(level) {
            *flag = true;
        }
    }

    /// Record an endless-mode score; returns true if it beat the best
    pub fn record_score(&mut self, score: u32) -> bool {
        if score > self.highscore {
            self.highscore = score;
            true
        } else {
            false
        }
    }

    /// Load progress from `path`, degrading to defaults on a missing or
    /// corrupt file. The reason is logged; defaults are never silent loss.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("no save at {}, starting fresh", path.display());
                return Self::default();
            }
            Err(err) => {
                log::warn!("could not read save {}: {err}; using defaults", path.display());
                return Self::default();
            }
        };

        match serde_json::from_str::<Progress>(&text) {
            Ok(mut progress) => {
                // Tolerate saves written against a different level count.
                progress.levels_unlocked.resize(LEVEL_COUNT, false);
                if let Some(first) = progress.levels_unlocked.first_mut() {
                    *first = true;
                }
                log::info!(
                    "loaded progress: {} levels unlocked, highscore {}",
                    progress.levels_unlocked.iter().filter(|&&u| u).count(),
                    progress.highscore
                );
                progress
            }
            Err(err) => {
                log::warn!("corrupt save {}: {err}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write progress to `path` as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)?;
        log::info!("progress saved to {}", path.display());
        Ok(())
    }
}
