//! Pure battlefield logic.
//!
//! Every public function takes an immutable reference to the current
//! `Battlefield` (and, where needed, an RNG handle) and returns a brand-new
//! `Battlefield`.  Side effects are limited to the injected RNG.

use rand::Rng;

use crate::entities::{
    Battlefield, Bullet, BulletOwner, Direction, Enemy, EnemyKind, GameStatus, Player,
    SpecialShip,
};
use crate::settings::GameSettings;
use crate::state::GameState;

// ── Tuning ───────────────────────────────────────────────────────────────────

/// Frame rate the `base_speed` setting is expressed in.
const REFERENCE_FPS: u32 = 60;
/// Columns between neighbouring formation ships.
const FORMATION_SPACING_X: i32 = 4;
/// Rows between neighbouring formation ships.
const FORMATION_SPACING_Y: i32 = 2;
/// Row of the top formation line at the start of a level.
const FORMATION_TOP: i32 = 4;
/// Row the special ship flies along.
const SPECIAL_ROW: i32 = 2;
/// One chance in this many, per frame, for the special ship to appear.
const SPECIAL_SHIP_CHANCE: u32 = 600;
/// The special ship moves one column every this many frames.
const SPECIAL_SHIP_INTERVAL: u64 = 2;
/// Enemy bullets fall one row every this many frames.
const ENEMY_BULLET_INTERVAL: u64 = 2;
/// Extra points per kill for each ship already in the current combo.
const COMBO_BONUS: u32 = 5;
/// Most player bullets allowed on screen at once.
pub const MAX_PLAYER_BULLETS: usize = 3;
/// Percentage of random variation applied to the enemy shooting interval.
const SHOT_VARIANCE_PERCENT: u32 = 10;

pub const SPECIAL_ALERT: &str = "!! SPECIAL SHIP !!";

/// Columns the formation can march before its first turn, on each side.
const MARCH_ROOM: u16 = 2;
/// Empty rows between a fresh formation and the player.
const DESCENT_ROOM: u16 = 4;

/// Smallest field a `columns` x `rows` formation fits in, with room to march
/// sideways and to step down before it reaches the player.
pub fn min_field_size(columns: u32, rows: u32) -> (u16, u16) {
    let span = (columns.max(1) - 1) as u16 * FORMATION_SPACING_X as u16;
    // Two wall cells on the left, three on the right.
    let width = span + 2 + 3 + 2 * MARCH_ROOM;
    let bottom = FORMATION_TOP as u16 + (rows.max(1) - 1) as u16 * FORMATION_SPACING_Y as u16;
    // The player sits four rows above the bottom edge.
    let height = bottom + 1 + DESCENT_ROOM + 4;
    (width, height)
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the battlefield of the level described by `state` and `settings`.
pub fn init_battlefield(
    state: &GameState,
    settings: &GameSettings,
    bonus_life: bool,
    width: u16,
    height: u16,
    fps: u32,
) -> Battlefield {
    let fps = fps.max(1);
    let lives = if bonus_life {
        state.lives_remaining() + 1
    } else {
        state.lives_remaining()
    };

    let columns = settings.formation_width as i32;
    let rows = settings.formation_height as i32;
    let span = (columns - 1) * FORMATION_SPACING_X;
    let left = ((width as i32 - span) / 2).max(2);

    let mut enemies = Vec::with_capacity((columns * rows) as usize);
    for row in 0..rows {
        let kind = if row == 0 {
            EnemyKind::Octopus
        } else if row < (rows + 1) / 2 {
            EnemyKind::Crab
        } else {
            EnemyKind::Spacecraft
        };
        for col in 0..columns {
            enemies.push(Enemy {
                x: left + col * FORMATION_SPACING_X,
                y: FORMATION_TOP + row * FORMATION_SPACING_Y,
                kind,
            });
        }
    }

    let move_interval = (settings.base_speed.saturating_mul(fps) / REFERENCE_FPS).max(1);
    let shot_interval = (settings.shooting_frequency.saturating_mul(fps) / 1000).max(1);

    Battlefield {
        player: Player {
            x: (width / 2) as i32,
            y: height as i32 - 4,
            lives,
        },
        formation_total: enemies.len(),
        enemies,
        bullets: Vec::new(),
        special: None,
        direction: Direction::Right,
        step_counter: 0,
        move_interval,
        shot_interval,
        shot_countdown: shot_interval,
        level: state.level(),
        score: state.score(),
        bullets_shot: state.bullets_shot(),
        ships_destroyed: state.ships_destroyed(),
        combo: state.combo(),
        carried_time: state.elapsed_time(),
        alert_message: None,
        status: if lives == 0 {
            GameStatus::GameOver
        } else {
            GameStatus::Playing
        },
        frame: 0,
        fps,
        width,
        height,
    }
}

/// Progress after the frames played so far, ready to hand to the next level.
pub fn snapshot_state(field: &Battlefield) -> GameState {
    let played = field.frame * 1000 / field.fps.max(1) as u64;
    GameState::with_progress(
        field.level,
        field.score,
        field.player.lives,
        field.bullets_shot,
        field.ships_destroyed,
        field.carried_time + played,
        field.alert_message.clone(),
        field.combo,
    )
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

pub fn move_player_left(field: &Battlefield) -> Battlefield {
    let new_x = (field.player.x - 2).max(2);
    Battlefield {
        player: Player {
            x: new_x,
            ..field.player.clone()
        },
        ..field.clone()
    }
}

pub fn move_player_right(field: &Battlefield) -> Battlefield {
    let new_x = (field.player.x + 2).min(field.width as i32 - 3);
    Battlefield {
        player: Player {
            x: new_x,
            ..field.player.clone()
        },
        ..field.clone()
    }
}

/// Fire a bullet from the player, at most `MAX_PLAYER_BULLETS` on screen.
pub fn player_shoot(field: &Battlefield) -> Battlefield {
    let active = field
        .bullets
        .iter()
        .filter(|b| b.owner == BulletOwner::Player)
        .count();
    if active >= MAX_PLAYER_BULLETS || field.status != GameStatus::Playing {
        return field.clone();
    }
    let mut bullets = field.bullets.clone();
    bullets.push(Bullet {
        x: field.player.x,
        y: field.player.y - 1,
        owner: BulletOwner::Player,
    });
    Battlefield {
        bullets,
        bullets_shot: field.bullets_shot + 1,
        ..field.clone()
    }
}

// ── Per-frame tick (the RNG is injected) ────────────────────────────────────

/// Advance the simulation by one frame.  A finished level is returned as is.
pub fn tick(field: &Battlefield, rng: &mut impl Rng) -> Battlefield {
    if field.status != GameStatus::Playing {
        return field.clone();
    }
    let frame = field.frame + 1;
    let mut combo = field.combo;

    // ── 1. Move bullets ──────────────────────────────────────────────────────
    let mut bullets: Vec<Bullet> = Vec::with_capacity(field.bullets.len());
    for b in &field.bullets {
        match b.owner {
            BulletOwner::Player => {
                let new_y = b.y - 1;
                if new_y < 2 {
                    // A shot that leaves the field breaks the combo.
                    combo = 0;
                } else {
                    bullets.push(Bullet { y: new_y, ..b.clone() });
                }
            }
            BulletOwner::Enemy => {
                let new_y = if frame % ENEMY_BULLET_INTERVAL == 0 { b.y + 1 } else { b.y };
                if new_y <= field.height as i32 - 3 {
                    bullets.push(Bullet { y: new_y, ..b.clone() });
                }
            }
        }
    }

    // ── 2. March the formation ───────────────────────────────────────────────
    let (mut enemies, direction, step_counter, descended) = march(field);

    // ── 3. Special ship ──────────────────────────────────────────────────────
    let mut special = match &field.special {
        Some(ship) if frame % SPECIAL_SHIP_INTERVAL == 0 => {
            let x = ship.x + ship.direction.dx();
            if x < 2 || x > field.width as i32 - 3 {
                None
            } else {
                Some(SpecialShip { x, ..ship.clone() })
            }
        }
        other => other.clone(),
    };
    if special.is_none() && field.special.is_none() && rng.gen_ratio(1, SPECIAL_SHIP_CHANCE) {
        special = Some(if rng.gen_bool(0.5) {
            SpecialShip { x: 2, y: SPECIAL_ROW, direction: Direction::Right }
        } else {
            SpecialShip {
                x: field.width as i32 - 3,
                y: SPECIAL_ROW,
                direction: Direction::Left,
            }
        });
    }

    // ── 4. Enemy fire ────────────────────────────────────────────────────────
    let mut shot_countdown = field.shot_countdown.saturating_sub(1);
    if shot_countdown == 0 {
        if !enemies.is_empty() {
            let pick = &enemies[rng.gen_range(0..enemies.len())];
            // Only the lowest ship of a column can fire.
            let shooter = enemies
                .iter()
                .filter(|e| e.x == pick.x)
                .max_by_key(|e| e.y)
                .unwrap_or(pick);
            bullets.push(Bullet {
                x: shooter.x,
                y: shooter.y + 1,
                owner: BulletOwner::Enemy,
            });
        }
        let variance = field.shot_interval * SHOT_VARIANCE_PERCENT / 100;
        shot_countdown = rng
            .gen_range(field.shot_interval - variance..=field.shot_interval + variance)
            .max(1);
    }

    // ── 5. Collision: player bullets ↔ ships ─────────────────────────────────
    let mut score = field.score;
    let mut ships_destroyed = field.ships_destroyed;
    let mut used_bullets: Vec<usize> = Vec::new();

    for (bi, bullet) in bullets.iter().enumerate() {
        if bullet.owner != BulletOwner::Player {
            continue;
        }
        let hit_special = special
            .as_ref()
            .is_some_and(|s| (bullet.x - s.x).abs() <= 1 && bullet.y == s.y);
        if hit_special {
            special = None;
            score += EnemyKind::Special.points() + COMBO_BONUS * combo;
            combo += 1;
            ships_destroyed += 1;
            used_bullets.push(bi);
            continue;
        }
        // A ship stepping down into the row the bullet just left was crossed.
        if let Some(ei) = enemies.iter().position(|e| {
            (bullet.x - e.x).abs() <= 1
                && (bullet.y == e.y || (descended && bullet.y + 1 == e.y))
        }) {
            let enemy = enemies.remove(ei);
            score += enemy.kind.points() + COMBO_BONUS * combo;
            combo += 1;
            ships_destroyed += 1;
            used_bullets.push(bi);
        }
    }

    let bullets: Vec<Bullet> = bullets
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !used_bullets.contains(i))
        .map(|(_, b)| b)
        .collect();

    // ── 6. Collision: enemy bullets ↔ player ─────────────────────────────────
    let player = &field.player;
    let mut hits = 0;
    let bullets: Vec<Bullet> = bullets
        .into_iter()
        .filter(|b| {
            let hit = b.owner == BulletOwner::Enemy
                && (b.x - player.x).abs() <= 1
                && (b.y == player.y || b.y == player.y + 1);
            if hit {
                hits += 1;
            }
            !hit
        })
        .collect();

    let mut lives = player.lives.saturating_sub(hits);

    // A formation that reaches the player's row ends the game outright.
    if enemies.iter().any(|e| e.y >= player.y) {
        lives = 0;
    }

    // ── 7. Status ────────────────────────────────────────────────────────────
    let status = if lives == 0 {
        GameStatus::GameOver
    } else if enemies.is_empty() {
        GameStatus::Cleared
    } else {
        GameStatus::Playing
    };

    let alert_message = special.as_ref().map(|_| SPECIAL_ALERT.to_string());

    Battlefield {
        player: Player {
            lives,
            ..player.clone()
        },
        enemies,
        bullets,
        special,
        direction,
        step_counter,
        shot_countdown,
        score,
        ships_destroyed,
        combo,
        alert_message,
        status,
        frame,
        ..field.clone()
    }
}

/// Frames between formation steps; the formation speeds up as it thins out.
pub fn effective_move_interval(field: &Battlefield) -> u32 {
    if field.formation_total == 0 {
        return field.move_interval;
    }
    let alive = field.enemies.len() as u32;
    (field.move_interval.saturating_mul(alive) / field.formation_total as u32).max(1)
}

/// Step the formation sideways, or down and reversed when it meets a wall.
/// The last field tells whether the formation stepped down.
fn march(field: &Battlefield) -> (Vec<Enemy>, Direction, u32, bool) {
    let counter = field.step_counter + 1;
    if counter < effective_move_interval(field) || field.enemies.is_empty() {
        return (field.enemies.clone(), field.direction, counter, false);
    }

    let dx = field.direction.dx();
    let min_x = field.enemies.iter().map(|e| e.x).min().unwrap_or(0);
    let max_x = field.enemies.iter().map(|e| e.x).max().unwrap_or(0);
    let hits_wall = min_x + dx < 2 || max_x + dx > field.width as i32 - 3;

    if hits_wall {
        let enemies = field
            .enemies
            .iter()
            .map(|e| Enemy { y: e.y + 1, ..e.clone() })
            .collect();
        (enemies, field.direction.reversed(), 0, true)
    } else {
        let enemies = field
            .enemies
            .iter()
            .map(|e| Enemy { x: e.x + dx, ..e.clone() })
            .collect();
        (enemies, field.direction, 0, false)
    }
}
