use crossterm::event::KeyCode;
use crossterm::style::Color;

use crate::cooldown::Cooldown;
use crate::draw::DrawManager;
use crate::error::Result;
use crate::input::InputManager;

use super::{Dimensions, ReturnCode, Screen, ScreenCore};

/// Milliseconds before the menu reacts, so a key held from the previous
/// screen does not pick an entry.
pub const MENU_INPUT_DELAY_MS: u64 = 300;
/// Milliseconds between two selection steps while Up or Down is held.
pub const SELECTION_COOLDOWN_MS: u64 = 200;

const UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];

const MENU: &[(&str, ReturnCode)] = &[
    ("Play", ReturnCode::Game),
    ("Game settings", ReturnCode::GameSettings),
    ("Shop", ReturnCode::Shop),
    ("Achievements", ReturnCode::Achievements),
    ("Settings", ReturnCode::Settings),
    ("Exit", ReturnCode::Exit),
];

pub struct TitleScreen {
    core: ScreenCore,
    selected: usize,
    selection: Cooldown,
    coins: u32,
}

impl TitleScreen {
    pub fn new(dims: Dimensions, input: InputManager, coins: u32) -> Self {
        Self {
            core: ScreenCore::new(dims, input, ReturnCode::Exit),
            selected: 0,
            selection: Cooldown::new(SELECTION_COOLDOWN_MS),
            coins,
        }
    }

    pub fn selected(&self) -> ReturnCode {
        MENU[self.selected].1
    }
}

impl Screen for TitleScreen {
    fn initialize(&mut self) {
        self.core.arm_input_delay(MENU_INPUT_DELAY_MS);
    }

    fn update(&mut self) -> Result<()> {
        if self.core.honour_quit() || !self.core.accepting_input() {
            return Ok(());
        }
        let input = &self.core.input;
        let up = input.take_any_press(UP) || input.any_held(UP);
        let down = input.take_any_press(DOWN) || input.any_held(DOWN);
        if (up || down) && self.selection.check() {
            if up {
                self.selected = (self.selected + MENU.len() - 1) % MENU.len();
            } else {
                self.selected = (self.selected + 1) % MENU.len();
            }
            self.selection.reset();
        }
        if input.take_any_press(&[KeyCode::Char(' '), KeyCode::Enter]) {
            let code = self.selected();
            self.core.finish(code);
        } else if input.take_any_press(&[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')]) {
            self.core.finish(ReturnCode::Exit);
        }
        Ok(())
    }

    fn draw(&self, draw: &mut DrawManager) -> Result<()> {
        let canvas = draw.canvas();
        let cy = self.core.dims.height as i32 / 2;

        canvas.put_centered(cy - 7, "★  SPACE  INVADERS  ★", Color::Cyan);
        canvas.put_centered(cy - 5, &format!("Coins: {}", self.coins), Color::Yellow);

        for (i, (label, _)) in MENU.iter().enumerate() {
            let (text, color) = if i == self.selected {
                (format!("> {label} <"), Color::Green)
            } else {
                (label.to_string(), Color::White)
            };
            canvas.put_centered(cy - 3 + i as i32, &text, color);
        }

        canvas.put_centered(
            self.core.dims.height as i32 - 2,
            "↑ ↓ : Select   SPACE : Confirm   ESC : Quit",
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
        "title"
    }
}
