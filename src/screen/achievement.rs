use crossterm::event::KeyCode;
use crossterm::style::Color;

use crate::draw::DrawManager;
use crate::error::Result;
use crate::files::SaveData;
use crate::input::InputManager;

use super::title::MENU_INPUT_DELAY_MS;
use super::{Dimensions, ReturnCode, Screen, ScreenCore};

/// High-score table and lifetime totals.
pub struct AchievementScreen {
    core: ScreenCore,
    save: SaveData,
}

impl AchievementScreen {
    pub fn new(dims: Dimensions, input: InputManager, save: SaveData) -> Self {
        Self {
            core: ScreenCore::new(dims, input, ReturnCode::Title),
            save,
        }
    }
}

impl Screen for AchievementScreen {
    fn initialize(&mut self) {
        self.core.arm_input_delay(MENU_INPUT_DELAY_MS);
    }

    fn update(&mut self) -> Result<()> {
        if self.core.honour_quit() || !self.core.accepting_input() {
            return Ok(());
        }
        if self.core.input.take_any_press(&[KeyCode::Esc, KeyCode::Char(' ')]) {
            self.core.finish(ReturnCode::Title);
        }
        Ok(())
    }

    fn draw(&self, draw: &mut DrawManager) -> Result<()> {
        let canvas = draw.canvas();
        let top = 3;
        canvas.put_centered(top, "ACHIEVEMENTS", Color::Cyan);
        canvas.put_centered(
            top + 2,
            &format!("Games played: {}", self.save.games_played),
            Color::White,
        );

        if self.save.high_scores.is_empty() {
            canvas.put_centered(top + 4, "No scores yet", Color::DarkGrey);
        }
        for (i, entry) in self.save.high_scores.iter().enumerate() {
            let line = format!(
                "{}. {:>6}  LV {:>2}  {:>3} ships",
                i + 1,
                entry.score,
                entry.level,
                entry.ships_destroyed
            );
            canvas.put_centered(top + 4 + i as i32, &line, Color::Yellow);
        }

        canvas.put_centered(self.core.dims.height as i32 - 2, "ESC : Back", Color::DarkGrey);
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
        "achievement"
    }
}
