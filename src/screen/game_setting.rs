use crossterm::event::KeyCode;
use crossterm::style::Color;

use crate::draw::DrawManager;
use crate::error::Result;
use crate::input::InputManager;
use crate::settings::Difficulty;

use super::title::MENU_INPUT_DELAY_MS;
use super::{Dimensions, ReturnCode, Screen, ScreenCore};

/// Choices that shape the next game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionOptions {
    pub difficulty: Difficulty,
    pub two_player: bool,
}

impl SessionOptions {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            two_player: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Row {
    Difficulty,
    Players,
}

pub struct GameSettingScreen {
    core: ScreenCore,
    options: SessionOptions,
    row: Row,
}

impl GameSettingScreen {
    pub fn new(dims: Dimensions, input: InputManager, options: SessionOptions) -> Self {
        Self {
            core: ScreenCore::new(dims, input, ReturnCode::Title),
            options,
            row: Row::Difficulty,
        }
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }
}

impl Screen for GameSettingScreen {
    fn initialize(&mut self) {
        self.core.arm_input_delay(MENU_INPUT_DELAY_MS);
    }

    fn update(&mut self) -> Result<()> {
        if self.core.honour_quit() || !self.core.accepting_input() {
            return Ok(());
        }
        let input = &self.core.input;

        if input.take_any_press(&[KeyCode::Up, KeyCode::Down]) {
            self.row = match self.row {
                Row::Difficulty => Row::Players,
                Row::Players => Row::Difficulty,
            };
        }
        let left = input.take_press(KeyCode::Left);
        let right = input.take_press(KeyCode::Right);
        match self.row {
            Row::Difficulty if left => self.options.difficulty = self.options.difficulty.easier(),
            Row::Difficulty if right => self.options.difficulty = self.options.difficulty.harder(),
            Row::Players if left || right => self.options.two_player = !self.options.two_player,
            _ => {}
        }

        if input.take_any_press(&[KeyCode::Char(' '), KeyCode::Enter]) {
            tracing::info!(
                difficulty = ?self.options.difficulty,
                two_player = self.options.two_player,
                "game settings confirmed"
            );
            self.core.finish(ReturnCode::Game);
        } else if input.take_press(KeyCode::Esc) {
            self.core.finish(ReturnCode::Title);
        }
        Ok(())
    }

    fn draw(&self, draw: &mut DrawManager) -> Result<()> {
        let canvas = draw.canvas();
        let cy = self.core.dims.height as i32 / 2;
        canvas.put_centered(cy - 4, "GAME SETTINGS", Color::Cyan);

        let players = if self.options.two_player { "2 PLAYERS" } else { "1 PLAYER" };
        let rows = [
            (Row::Difficulty, format!("Difficulty  < {} >", self.options.difficulty.label())),
            (Row::Players, format!("Mode  < {} >", players)),
        ];
        for (i, (row, text)) in rows.iter().enumerate() {
            let color = if *row == self.row { Color::Green } else { Color::White };
            canvas.put_centered(cy - 1 + i as i32 * 2, text, color);
        }

        canvas.put_centered(
            self.core.dims.height as i32 - 2,
            "↑ ↓ ← → : Change   SPACE : Start   ESC : Back",
            Color::DarkGrey,
        );
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
        "game setting"
    }
}
