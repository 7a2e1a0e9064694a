//! Battlefield entity types. Plain data, no logic.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    /// Bottom rows, 10 points.
    Spacecraft,
    /// Middle rows, 20 points.
    Crab,
    /// Top row, 30 points.
    Octopus,
    /// The bonus ship crossing the top of the field.
    Special,
}

impl EnemyKind {
    pub fn points(self) -> u32 {
        match self {
            EnemyKind::Spacecraft => 10,
            EnemyKind::Crab => 20,
            EnemyKind::Octopus => 30,
            EnemyKind::Special => 100,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    /// Every formation ship destroyed.
    Cleared,
    /// No lives left.
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn dx(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    Enemy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: i32,
    pub y: i32,
    pub owner: BulletOwner,
}

// ── Ships ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: i32,
    pub y: i32,
    pub lives: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: i32,
    pub y: i32,
    pub kind: EnemyKind,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpecialShip {
    pub x: i32,
    pub y: i32,
    pub direction: Direction,
}

// ── Level state ───────────────────────────────────────────────────────────────

/// Everything one level's simulation needs.  Cloneable so the pure update
/// functions in `compute` can return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct Battlefield {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub special: Option<SpecialShip>,
    /// Marching direction of the formation.
    pub direction: Direction,
    /// Formation size at the start of the level.
    pub formation_total: usize,
    /// Frames since the formation last stepped.
    pub step_counter: u32,
    /// Frames between formation steps with a full formation.
    pub move_interval: u32,
    /// Frames between enemy shots, before variance.
    pub shot_interval: u32,
    /// Frames until the next enemy shot.
    pub shot_countdown: u32,

    pub level: u32,
    pub score: u32,
    pub bullets_shot: u32,
    pub ships_destroyed: u32,
    pub combo: u32,
    /// Play time carried in from earlier levels, in milliseconds.
    pub carried_time: u64,
    pub alert_message: Option<String>,

    pub status: GameStatus,
    pub frame: u64,
    pub fps: u32,
    pub width: u16,
    pub height: u16,
}
