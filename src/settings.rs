//! Per-level difficulty parameters and the level-scaling rules.

use serde::{Deserialize, Serialize};

// ── Scaling limits ───────────────────────────────────────────────────────────

pub const MAX_FORMATION_WIDTH: u32 = 8;
pub const MAX_FORMATION_HEIGHT: u32 = 5;
const MIN_BASE_SPEED: u32 = 10;
const MIN_SHOOTING_FREQUENCY: u32 = 500;
/// Slowest formation a template may ask for, in reference frames per step.
pub const MAX_BASE_SPEED: u32 = 600;
/// Longest enemy shooting cooldown a template may ask for, in milliseconds.
pub const MAX_SHOOTING_FREQUENCY: u32 = 60_000;

/// Frames shaved off the formation step interval per level, per difficulty point.
const SPEED_STEP: u32 = 4;
/// Milliseconds shaved off the enemy shooting cooldown per level, per difficulty point.
const SHOOTING_STEP: u32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    /// Numeric weight used by the scaling formulas (1..=3).
    pub fn weight(self) -> u32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Normal => 2,
            Difficulty::Hard => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Normal => "NORMAL",
            Difficulty::Hard => "HARD",
        }
    }

    pub fn harder(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Normal,
            _ => Difficulty::Hard,
        }
    }

    pub fn easier(self) -> Self {
        match self {
            Difficulty::Hard => Difficulty::Normal,
            _ => Difficulty::Easy,
        }
    }
}

/// Difficulty parameters of a single level.
///
/// `base_speed` is the number of frames (at the 60 fps reference rate) between
/// formation steps and `shooting_frequency` the enemy shooting cooldown in
/// milliseconds, so smaller values make a harder level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    pub formation_width: u32,
    pub formation_height: u32,
    pub base_speed: u32,
    pub shooting_frequency: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::new(4, 4, 60, 2500)
    }
}

impl GameSettings {
    /// Every field is kept positive.
    pub fn new(
        formation_width: u32,
        formation_height: u32,
        base_speed: u32,
        shooting_frequency: u32,
    ) -> Self {
        Self {
            formation_width: formation_width.max(1),
            formation_height: formation_height.max(1),
            base_speed: base_speed.max(1),
            shooting_frequency: shooting_frequency.max(1),
        }
    }

    /// This template pulled inside the bounds a level can be played with.
    pub fn clamped(&self) -> GameSettings {
        GameSettings::new(
            self.formation_width.min(MAX_FORMATION_WIDTH),
            self.formation_height.min(MAX_FORMATION_HEIGHT),
            self.base_speed.min(MAX_BASE_SPEED),
            self.shooting_frequency.min(MAX_SHOOTING_FREQUENCY),
        )
    }

    /// Settings for `level` derived from this template. The template itself
    /// is left untouched, and for a fixed difficulty every field moves only
    /// towards a harder game as `level` grows.
    pub fn leveled(&self, level: u32, difficulty: Difficulty) -> GameSettings {
        let steps = level.saturating_sub(1);
        let weight = difficulty.weight();

        let formation_width = self
            .formation_width
            .saturating_add(steps / 2)
            .min(MAX_FORMATION_WIDTH.max(self.formation_width));
        let formation_height = self
            .formation_height
            .saturating_add(steps / 3)
            .min(MAX_FORMATION_HEIGHT.max(self.formation_height));

        let base_speed = self
            .base_speed
            .saturating_sub(steps.saturating_mul(SPEED_STEP * weight))
            .max(MIN_BASE_SPEED.min(self.base_speed));
        let shooting_frequency = self
            .shooting_frequency
            .saturating_sub(steps.saturating_mul(SHOOTING_STEP * weight))
            .max(MIN_SHOOTING_FREQUENCY.min(self.shooting_frequency));

        GameSettings::new(formation_width, formation_height, base_speed, shooting_frequency)
    }

    /// Leveled settings for levels `1..=levels`, indexed by `level - 1`.
    pub fn campaign(&self, levels: u32, difficulty: Difficulty) -> Vec<GameSettings> {
        (1..=levels).map(|level| self.leveled(level, difficulty)).collect()
    }
}
