use crossterm::event::KeyCode;
use crossterm::style::Color;

use crate::draw::DrawManager;
use crate::error::Result;
use crate::input::InputManager;

use super::title::MENU_INPUT_DELAY_MS;
use super::{Dimensions, ReturnCode, Screen, ScreenCore};

/// Shows the coin balance. Nothing is for sale yet.
pub struct ShopScreen {
    core: ScreenCore,
    coins: u32,
}

impl ShopScreen {
    pub fn new(dims: Dimensions, input: InputManager, coins: u32) -> Self {
        Self {
            core: ScreenCore::new(dims, input, ReturnCode::Title),
            coins,
        }
    }
}

impl Screen for ShopScreen {
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
        let cy = self.core.dims.height as i32 / 2;
        canvas.put_centered(cy - 3, "SHOP", Color::Cyan);
        canvas.put_centered(cy - 1, &format!("Balance: {} coins", self.coins), Color::Yellow);
        canvas.put_centered(cy + 1, "No items in stock", Color::DarkGrey);
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
        "shop"
    }
}
