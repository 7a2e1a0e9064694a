use crossterm::event::KeyCode;
use crossterm::style::Color;

use crate::draw::DrawManager;
use crate::error::Result;
use crate::input::InputManager;
use crate::state::GameState;

use super::title::MENU_INPUT_DELAY_MS;
use super::{Dimensions, ReturnCode, Screen, ScreenCore};

/// What the driver settled before showing the score.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScoreSummary {
    pub coins_earned: u32,
    pub balance: u32,
    pub new_record: bool,
    /// Winning player (0-based) of a two-player match.
    pub winner: Option<usize>,
}

/// End-of-game results.
pub struct ScoreScreen {
    core: ScreenCore,
    state: GameState,
    summary: ScoreSummary,
}

impl ScoreScreen {
    pub fn new(dims: Dimensions, input: InputManager, state: GameState, summary: ScoreSummary) -> Self {
        Self {
            core: ScreenCore::new(dims, input, ReturnCode::Title),
            state,
            summary,
        }
    }

    pub fn game_state(&self) -> &GameState {
        &self.state
    }

    pub fn summary(&self) -> &ScoreSummary {
        &self.summary
    }
}

impl Screen for ScoreScreen {
    fn initialize(&mut self) {
        self.core.arm_input_delay(MENU_INPUT_DELAY_MS);
    }

    fn update(&mut self) -> Result<()> {
        if self.core.honour_quit() || !self.core.accepting_input() {
            return Ok(());
        }
        let input = &self.core.input;
        if input.take_press(KeyCode::Char(' ')) {
            self.core.finish(ReturnCode::Game);
        } else if input.take_any_press(&[KeyCode::Esc, KeyCode::Enter]) {
            self.core.finish(ReturnCode::Title);
        }
        Ok(())
    }

    fn draw(&self, draw: &mut DrawManager) -> Result<()> {
        let canvas = draw.canvas();
        let cy = self.core.dims.height as i32 / 2;
        let s = &self.state;

        let title = match self.summary.winner {
            Some(player) => format!("PLAYER {} WINS", player + 1),
            None => "GAME  OVER".to_string(),
        };
        canvas.put_centered(cy - 7, &title, Color::Red);
        canvas.put_centered(cy - 5, &format!("Score: {:>6}", s.score()), Color::Yellow);
        if self.summary.new_record {
            canvas.put_centered(cy - 4, "★ NEW RECORD ★", Color::Yellow);
        }

        let lines = [
            format!("Level reached   {:>6}", s.level()),
            format!("Lives remaining {:>6}", s.lives_remaining()),
            format!("Bullets shot    {:>6}", s.bullets_shot()),
            format!("Ships destroyed {:>6}", s.ships_destroyed()),
            format!("Accuracy        {:>5.1}%", s.accuracy()),
            format!("Play time       {:>5}s", s.elapsed_time() / 1000),
            format!("Coins earned    {:>6}", self.summary.coins_earned),
            format!("Balance         {:>6}", self.summary.balance),
        ];
        for (i, line) in lines.iter().enumerate() {
            canvas.put_centered(cy - 2 + i as i32, line, Color::White);
        }

        canvas.put_centered(
            self.core.dims.height as i32 - 2,
            "SPACE : Play Again   ESC : Title",
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
        "score"
    }
}
