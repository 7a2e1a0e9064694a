//! Game configuration, loaded from an optional TOML file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::compute::min_field_size;
use crate::error::Result;
use crate::screen::game::{INPUT_DELAY_MS, SCREEN_CHANGE_MS};
use crate::screen::Dimensions;
use crate::settings::{Difficulty, GameSettings, MAX_FORMATION_HEIGHT, MAX_FORMATION_WIDTH};

/// Width of the play field in cells.
pub const WIDTH: u16 = 40;
/// Height of the play field in cells.
pub const HEIGHT: u16 = 24;
/// Max fps of a screen.
pub const FPS: u32 = 30;
/// Max lives.
pub const MAX_LIVES: u32 = 3;
/// Levels between extra lives.
pub const EXTRA_LIFE_FREQUENCY: u32 = 3;
/// Total number of levels in two-player mode.
pub const NUM_LEVELS: u32 = 7;
/// Difficulty the driver levels settings with unless the player picks another.
pub const DIFFICULTY: Difficulty = Difficulty::Hard;

/// Progression rules shared by the driver and two-player mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameRules {
    pub max_lives: u32,
    pub extra_life_frequency: u32,
    pub num_levels: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            max_lives: MAX_LIVES,
            extra_life_frequency: EXTRA_LIFE_FREQUENCY,
            num_levels: NUM_LEVELS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub width: u16,
    pub height: u16,
    pub fps: u32,
    pub max_lives: u32,
    pub extra_life_frequency: u32,
    pub num_levels: u32,
    pub difficulty: Difficulty,
    /// Template the settings of every level are derived from.
    pub first_level: GameSettings,
    pub input_delay_ms: u64,
    pub screen_change_ms: u64,
    /// Where save data lives; defaults to `~/.space_invaders`.
    pub save_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            fps: FPS,
            max_lives: MAX_LIVES,
            extra_life_frequency: EXTRA_LIFE_FREQUENCY,
            num_levels: NUM_LEVELS,
            difficulty: DIFFICULTY,
            first_level: GameSettings::default(),
            input_delay_ms: INPUT_DELAY_MS,
            screen_change_ms: SCREEN_CHANGE_MS,
            save_dir: None,
        }
    }
}

impl Config {
    /// Read `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        Ok(config.sanitized())
    }

    /// Clamp values the game cannot run with.  The field always fits the
    /// largest formation level scaling can build.
    pub fn sanitized(mut self) -> Self {
        let (min_width, min_height) = min_field_size(MAX_FORMATION_WIDTH, MAX_FORMATION_HEIGHT);
        self.width = self.width.max(min_width);
        self.height = self.height.max(min_height);
        self.fps = self.fps.clamp(1, 240);
        self.max_lives = self.max_lives.max(1);
        self.num_levels = self.num_levels.max(1);
        self.first_level = self.first_level.clamped();
        self
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height, self.fps)
    }

    pub fn rules(&self) -> GameRules {
        GameRules {
            max_lives: self.max_lives,
            extra_life_frequency: self.extra_life_frequency,
            num_levels: self.num_levels,
        }
    }

    pub fn save_dir(&self) -> PathBuf {
        self.save_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".space_invaders")
        })
    }
}
