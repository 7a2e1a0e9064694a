//! Persisted player data: coin balance and the high-score table.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::GameState;

/// Entries kept in the high-score table.
pub const MAX_HIGH_SCORES: usize = 7;

const SAVE_FILE: &str = "save.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub score: u32,
    pub level: u32,
    pub ships_destroyed: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    #[serde(default)]
    pub coins: u32,
    #[serde(default)]
    pub high_scores: Vec<HighScore>,
    #[serde(default)]
    pub games_played: u32,
}

impl SaveData {
    pub fn best_score(&self) -> u32 {
        self.high_scores.first().map(|h| h.score).unwrap_or(0)
    }

    /// Offer a finished game to the table.  Returns true when it beat every
    /// previous score.
    pub fn record(&mut self, state: &GameState) -> bool {
        let new_record = state.score() > self.best_score();
        self.games_played += 1;
        self.high_scores.push(HighScore {
            score: state.score(),
            level: state.level(),
            ships_destroyed: state.ships_destroyed(),
        });
        self.high_scores.sort_by(|a, b| b.score.cmp(&a.score));
        self.high_scores.truncate(MAX_HIGH_SCORES);
        new_record
    }
}

/// Reads and writes `SaveData` under one directory.
#[derive(Clone, Debug)]
pub struct FileManager {
    dir: PathBuf,
}

impl FileManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn save_path(&self) -> PathBuf {
        self.dir.join(SAVE_FILE)
    }

    /// A missing save file is an empty save.
    pub fn load(&self) -> Result<SaveData> {
        match fs::read(self.save_path()) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(SaveData::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn store(&self, data: &SaveData) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let text = serde_json::to_string_pretty(data)?;
        fs::write(self.save_path(), text)?;
        Ok(())
    }
}
