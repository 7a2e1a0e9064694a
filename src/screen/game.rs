//! The screen where a level is played.

use std::time::Instant;

use crossterm::event::KeyCode;
use crossterm::style::Color;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::compute::{
    init_battlefield, move_player_left, move_player_right, player_shoot, snapshot_state, tick,
};
use crate::cooldown::Cooldown;
use crate::draw::{DrawManager, FrameBuffer};
use crate::entities::{Battlefield, Bullet, BulletOwner, Enemy, EnemyKind, GameStatus};
use crate::error::Result;
use crate::input::{Controls, InputManager};
use crate::settings::GameSettings;
use crate::state::GameState;

use super::{Dimensions, ReturnCode, Screen, ScreenCore};

/// Milliseconds before the level starts and accepts input.
pub const INPUT_DELAY_MS: u64 = 3000;
/// Milliseconds the finished level stays on screen.
pub const SCREEN_CHANGE_MS: u64 = 1500;
/// Milliseconds between player shots.
const SHOOTING_INTERVAL_MS: u64 = 750;
/// Milliseconds between player steps while a direction key is held.
const MOVE_INTERVAL_MS: u64 = 100;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LEVEL: Color = Color::Cyan;
const C_HUD_LIVES: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_ENEMY_SPACECRAFT: Color = Color::Green;
const C_ENEMY_CRAB: Color = Color::Cyan;
const C_ENEMY_OCTOPUS: Color = Color::Magenta;
const C_SPECIAL: Color = Color::Red;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_ALERT: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

pub struct GameScreen {
    core: ScreenCore,
    field: Battlefield,
    controls: Controls,
    rng: StdRng,
    /// Index of the player in two-player mode.
    player: Option<usize>,
    input_delay_ms: u64,
    shooting: Cooldown,
    movement: Cooldown,
    screen_finished: Cooldown,
    finish_armed: bool,
}

impl GameScreen {
    pub fn new(
        state: &GameState,
        settings: &GameSettings,
        bonus_life: bool,
        dims: Dimensions,
        input: InputManager,
    ) -> Self {
        let field =
            init_battlefield(state, settings, bonus_life, dims.width, dims.height, dims.fps);
        Self {
            core: ScreenCore::new(dims, input, ReturnCode::Game),
            field,
            controls: Controls::single(),
            rng: StdRng::from_entropy(),
            player: None,
            input_delay_ms: INPUT_DELAY_MS,
            shooting: Cooldown::new(SHOOTING_INTERVAL_MS),
            movement: Cooldown::new(MOVE_INTERVAL_MS),
            screen_finished: Cooldown::new(SCREEN_CHANGE_MS),
            finish_armed: false,
        }
    }

    /// Play as `player` of a two-player match, with that player's keys.
    pub fn with_player(mut self, player: usize) -> Self {
        self.player = Some(player);
        self.controls = Controls::for_player(player);
        self
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_timing(mut self, input_delay_ms: u64, screen_change_ms: u64) -> Self {
        self.input_delay_ms = input_delay_ms;
        self.screen_finished = Cooldown::new(screen_change_ms);
        self
    }

    /// Progress so far; after the screen stops this is the level's outcome.
    pub fn game_state(&self) -> GameState {
        snapshot_state(&self.field)
    }

    pub fn battlefield(&self) -> &Battlefield {
        &self.field
    }

    pub fn battlefield_mut(&mut self) -> &mut Battlefield {
        &mut self.field
    }

    fn handle_input(&mut self) {
        let input = &self.core.input;
        if self.movement.check() {
            if input.any_held(&self.controls.left) {
                self.field = move_player_left(&self.field);
                self.movement.reset();
            } else if input.any_held(&self.controls.right) {
                self.field = move_player_right(&self.field);
                self.movement.reset();
            }
        }
        if self.shooting.check() && input.any_held(&self.controls.shoot) {
            let before = self.field.bullets_shot;
            self.field = player_shoot(&self.field);
            if self.field.bullets_shot > before {
                self.shooting.reset();
            }
        }
    }
}

impl Screen for GameScreen {
    fn initialize(&mut self) {
        // Special input delay / countdown.
        self.core.arm_input_delay(self.input_delay_ms);
        tracing::debug!(
            level = self.field.level,
            lives = self.field.player.lives,
            formation = self.field.enemies.len(),
            player = ?self.player,
            "level initialized"
        );
    }

    fn update(&mut self) -> Result<()> {
        if self.core.honour_quit() {
            return Ok(());
        }

        if self.field.status == GameStatus::Playing {
            if self.core.accepting_input() {
                self.handle_input();
                let before = self.field.alert_message.is_some();
                self.field = tick(&self.field, &mut self.rng);
                if !before && self.field.alert_message.is_some() {
                    tracing::debug!(level = self.field.level, "special ship appeared");
                }
            }
        } else if !self.finish_armed {
            tracing::info!(
                level = self.field.level,
                status = ?self.field.status,
                score = self.field.score,
                lives = self.field.player.lives,
                player = ?self.player,
                "level finished"
            );
            self.screen_finished.reset();
            self.finish_armed = true;
        }

        if self.finish_armed && self.screen_finished.check() {
            self.core.finish(ReturnCode::Game);
        }
        Ok(())
    }

    fn draw(&self, draw: &mut DrawManager) -> Result<()> {
        let canvas = draw.canvas();
        draw_border(canvas, &self.field);
        draw_hud(canvas, &self.field, self.player);

        for enemy in &self.field.enemies {
            draw_enemy(canvas, enemy);
        }
        if let Some(special) = &self.field.special {
            canvas.put_str(special.x - 1, special.y, "<@>", C_SPECIAL);
        }
        for bullet in &self.field.bullets {
            draw_bullet(canvas, bullet);
        }
        draw_player(canvas, &self.field);
        draw_controls_hint(canvas, &self.field, &self.controls);

        if !self.core.accepting_input() {
            let secs = self.core.input_delay.remaining_at(Instant::now()).as_secs() + 1;
            let banner = format!("LEVEL {}   {}", self.field.level, secs);
            canvas.put_centered(self.field.height as i32 / 2, &banner, C_ALERT);
        }
        match self.field.status {
            GameStatus::Cleared => {
                canvas.put_centered(self.field.height as i32 / 2, "LEVEL CLEARED", Color::Green)
            }
            GameStatus::GameOver => {
                canvas.put_centered(self.field.height as i32 / 2, "GAME  OVER", Color::Red)
            }
            GameStatus::Playing => {}
        }
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.core.is_running()
    }

    fn return_code(&self) -> ReturnCode {
        self.core.return_code()
    }

    fn dimensions(&self) -> Dimensions {
        self.core.dims
    }

    fn name(&self) -> &'static str {
        "game"
    }
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border(canvas: &mut FrameBuffer, field: &Battlefield) {
    let w = field.width as usize;
    let h = field.height as i32;

    // Row 1: top bar
    canvas.put_str(0, 1, &format!("┌{}┐", "─".repeat(w.saturating_sub(2))), C_BORDER);
    // Row h-2: bottom bar
    canvas.put_str(0, h - 2, &format!("└{}┘", "─".repeat(w.saturating_sub(2))), C_BORDER);

    // Side walls
    for row in 2..h - 2 {
        canvas.put_str(0, row, "│", C_BORDER);
        canvas.put_str(w as i32 - 1, row, "│", C_BORDER);
    }

    if let Some(alert) = &field.alert_message {
        canvas.put_centered(1, alert, C_ALERT);
    }
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud(canvas: &mut FrameBuffer, field: &Battlefield, player: Option<usize>) {
    let score = match player {
        Some(p) => format!("P{} {:>5}", p + 1, field.score),
        None => format!("Score:{:>6}", field.score),
    };
    canvas.put_str(1, 0, &score, C_HUD_SCORE);

    let level = format!("LV {}", field.level);
    canvas.put_centered(0, &level, C_HUD_LEVEL);

    let lives = "♥".repeat(field.player.lives as usize);
    let x = field.width as i32 - lives.chars().count() as i32 - 1;
    canvas.put_str(x, 0, &lives, C_HUD_LIVES);
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player(canvas: &mut FrameBuffer, field: &Battlefield) {
    // Sprite (2 rows, 3 cols):
    //   ▲       ← row y      (tip)
    //  /█\      ← row y+1    (fuselage + wings)
    let p = &field.player;
    canvas.put_str(p.x, p.y, "▲", C_PLAYER);
    if p.y + 1 < field.height as i32 - 2 {
        canvas.put_str(p.x - 1, p.y + 1, "/█\\", C_PLAYER);
    }
}

fn draw_enemy(canvas: &mut FrameBuffer, enemy: &Enemy) {
    let (sprite, color) = match enemy.kind {
        EnemyKind::Spacecraft => ("«▼»", C_ENEMY_SPACECRAFT),
        EnemyKind::Crab => ("╚═╝", C_ENEMY_CRAB),
        EnemyKind::Octopus => ("(◎)", C_ENEMY_OCTOPUS),
        EnemyKind::Special => ("<@>", C_SPECIAL),
    };
    canvas.put_str(enemy.x - 1, enemy.y, sprite, color);
}

fn draw_bullet(canvas: &mut FrameBuffer, bullet: &Bullet) {
    match bullet.owner {
        BulletOwner::Player => canvas.put_str(bullet.x, bullet.y, "║", C_BULLET_PLAYER),
        BulletOwner::Enemy => canvas.put_str(bullet.x, bullet.y, "↓", C_BULLET_ENEMY),
    }
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint(canvas: &mut FrameBuffer, field: &Battlefield, controls: &Controls) {
    let hint = if controls.shoot.contains(&KeyCode::Enter) {
        "← → : Move   ENTER : Shoot"
    } else if controls.left.contains(&KeyCode::Left) {
        "← → / A D : Move   SPACE : Shoot"
    } else {
        "A D : Move   SPACE : Shoot"
    };
    canvas.put_str(1, field.height as i32 - 1, hint, C_HINT);
}
