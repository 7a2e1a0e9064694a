//! Progress carried between levels.
//!
//! A `GameState` is never edited in place by the driver: each level transition
//! builds a fresh value through [`GameState::next_level`].

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    level: u32,
    score: u32,
    lives_remaining: u32,
    bullets_shot: u32,
    ships_destroyed: u32,
    /// Milliseconds of play, summed over every level so far.
    elapsed_time: u64,
    /// Banner announcing a special ship, if one is on screen.
    alert_message: Option<String>,
    /// Consecutive kills without a missed shot.
    combo: u32,
}

impl GameState {
    /// Start-of-game state: level 1, no score, `lives` lives.
    pub fn new(lives: u32) -> Self {
        Self {
            level: 1,
            score: 0,
            lives_remaining: lives,
            bullets_shot: 0,
            ships_destroyed: 0,
            elapsed_time: 0,
            alert_message: None,
            combo: 0,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn with_progress(
        level: u32,
        score: u32,
        lives_remaining: u32,
        bullets_shot: u32,
        ships_destroyed: u32,
        elapsed_time: u64,
        alert_message: Option<String>,
        combo: u32,
    ) -> Self {
        Self {
            level: level.max(1),
            score,
            lives_remaining,
            bullets_shot,
            ships_destroyed,
            elapsed_time,
            alert_message,
            combo,
        }
    }

    /// The state the following level starts from. Counters carry over, the
    /// alert is dropped since it belongs to the finished level.
    pub fn next_level(&self) -> Self {
        Self {
            level: self.level + 1,
            alert_message: None,
            ..self.clone()
        }
    }

    /// One extra life every `frequency` levels, never above `max_lives`.
    pub fn bonus_life_eligible(&self, frequency: u32, max_lives: u32) -> bool {
        frequency > 0 && self.level % frequency == 0 && self.lives_remaining < max_lives
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives_remaining(&self) -> u32 {
        self.lives_remaining
    }

    pub fn bullets_shot(&self) -> u32 {
        self.bullets_shot
    }

    pub fn ships_destroyed(&self) -> u32 {
        self.ships_destroyed
    }

    pub fn elapsed_time(&self) -> u64 {
        self.elapsed_time
    }

    pub fn alert_message(&self) -> Option<&str> {
        self.alert_message.as_deref()
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// Share of shots that destroyed a ship, in percent.
    pub fn accuracy(&self) -> f32 {
        if self.bullets_shot == 0 {
            0.0
        } else {
            self.ships_destroyed as f32 * 100.0 / self.bullets_shot as f32
        }
    }
}
