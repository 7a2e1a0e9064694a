//! Screens and the contract the driver runs them through.
//!
//! Every screen implements [`Screen`]; the driver picks which one to build
//! from the [`ReturnCode`] the previous screen finished with, and hands it to
//! a [`Frame`] wrapped in the [`AnyScreen`] union.

pub mod achievement;
pub mod game;
pub mod game_setting;
pub mod score;
pub mod shop;
pub mod title;
pub mod two_player;

use std::thread;
use std::time::{Duration, Instant};

use crate::cooldown::Cooldown;
use crate::draw::{DrawManager, FrameSink};
use crate::error::{GameError, Result};
use crate::input::InputManager;

pub use achievement::AchievementScreen;
pub use game::GameScreen;
pub use game_setting::{GameSettingScreen, SessionOptions};
pub use score::ScoreScreen;
pub use shop::ShopScreen;
pub use title::TitleScreen;
pub use two_player::TwoPlayerScreen;

/// Which screen the driver should show next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReturnCode {
    Exit,
    Title,
    Game,
    Shop,
    Achievements,
    /// Reserved; the settings screen does not exist yet.
    Settings,
    GameSettings,
}

impl ReturnCode {
    pub fn code(self) -> i32 {
        match self {
            ReturnCode::Exit => 0,
            ReturnCode::Title => 1,
            ReturnCode::Game => 2,
            ReturnCode::Shop => 3,
            ReturnCode::Achievements => 4,
            ReturnCode::Settings => 5,
            ReturnCode::GameSettings => 6,
        }
    }
}

impl TryFrom<i32> for ReturnCode {
    type Error = GameError;

    fn try_from(code: i32) -> Result<Self> {
        Ok(match code {
            0 => ReturnCode::Exit,
            1 => ReturnCode::Title,
            2 => ReturnCode::Game,
            3 => ReturnCode::Shop,
            4 => ReturnCode::Achievements,
            5 => ReturnCode::Settings,
            6 => ReturnCode::GameSettings,
            other => return Err(GameError::InvalidReturnCode(other)),
        })
    }
}

/// Size and frame rate of a screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u16,
    pub height: u16,
    pub fps: u32,
}

impl Dimensions {
    pub fn new(width: u16, height: u16, fps: u32) -> Self {
        Self {
            width,
            height,
            fps: fps.max(1),
        }
    }

    pub fn frame_period(&self) -> Duration {
        Duration::from_secs(1) / self.fps
    }
}

/// State every screen carries: its size, the running flag, the code it will
/// return, and the delay before it starts listening to the keyboard.
pub struct ScreenCore {
    pub dims: Dimensions,
    pub input: InputManager,
    pub input_delay: Cooldown,
    running: bool,
    return_code: ReturnCode,
}

impl ScreenCore {
    pub fn new(dims: Dimensions, input: InputManager, return_code: ReturnCode) -> Self {
        Self {
            dims,
            input,
            input_delay: Cooldown::new(0),
            running: true,
            return_code,
        }
    }

    /// Arm the input delay; keys pressed before now are forgotten.
    pub fn arm_input_delay(&mut self, milliseconds: u64) {
        self.input_delay = Cooldown::new(milliseconds);
        self.input_delay.reset();
        self.input.clear_presses();
    }

    pub fn accepting_input(&self) -> bool {
        self.input_delay.check()
    }

    pub fn finish(&mut self, code: ReturnCode) {
        self.return_code = code;
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn return_code(&self) -> ReturnCode {
        self.return_code
    }

    /// Stop with `Exit` when Ctrl-C was pressed. Returns whether it did.
    pub fn honour_quit(&mut self) -> bool {
        if self.input.quit_requested() {
            self.finish(ReturnCode::Exit);
            true
        } else {
            false
        }
    }
}

pub trait Screen {
    /// One-time set-up before the first frame.
    fn initialize(&mut self) {}

    /// Advance one frame of logic.
    fn update(&mut self) -> Result<()>;

    /// Paint the current frame; called between `init_drawing` and
    /// `complete_drawing`.
    fn draw(&self, draw: &mut DrawManager) -> Result<()>;

    fn is_running(&self) -> bool;

    fn return_code(&self) -> ReturnCode;

    fn dimensions(&self) -> Dimensions;

    fn name(&self) -> &'static str;

    /// Frame-limited loop: update and draw until the running flag clears.
    fn run(&mut self, sink: &mut dyn FrameSink) -> Result<ReturnCode> {
        let dims = self.dimensions();
        let period = dims.frame_period();
        let mut draw = DrawManager::new();

        while self.is_running() {
            let frame_start = Instant::now();

            self.update()?;

            draw.init_drawing(dims.width, dims.height)?;
            self.draw(&mut draw)?;
            draw.complete_drawing(sink)?;

            let elapsed = frame_start.elapsed();
            if elapsed < period {
                thread::sleep(period - elapsed);
            }
        }
        Ok(self.return_code())
    }
}

/// Every kind of screen the driver can show.
pub enum AnyScreen {
    Title(TitleScreen),
    Game(Box<GameScreen>),
    Score(ScoreScreen),
    Shop(ShopScreen),
    Achievement(AchievementScreen),
    GameSetting(GameSettingScreen),
    TwoPlayer(Box<TwoPlayerScreen>),
}

impl AnyScreen {
    fn inner(&self) -> &dyn Screen {
        match self {
            AnyScreen::Title(s) => s,
            AnyScreen::Game(s) => s.as_ref(),
            AnyScreen::Score(s) => s,
            AnyScreen::Shop(s) => s,
            AnyScreen::Achievement(s) => s,
            AnyScreen::GameSetting(s) => s,
            AnyScreen::TwoPlayer(s) => s.as_ref(),
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Screen {
        match self {
            AnyScreen::Title(s) => s,
            AnyScreen::Game(s) => s.as_mut(),
            AnyScreen::Score(s) => s,
            AnyScreen::Shop(s) => s,
            AnyScreen::Achievement(s) => s,
            AnyScreen::GameSetting(s) => s,
            AnyScreen::TwoPlayer(s) => s.as_mut(),
        }
    }
}

impl Screen for AnyScreen {
    fn initialize(&mut self) {
        self.inner_mut().initialize()
    }

    fn update(&mut self) -> Result<()> {
        self.inner_mut().update()
    }

    fn draw(&self, draw: &mut DrawManager) -> Result<()> {
        self.inner().draw(draw)
    }

    fn is_running(&self) -> bool {
        self.inner().is_running()
    }

    fn return_code(&self) -> ReturnCode {
        self.inner().return_code()
    }

    fn dimensions(&self) -> Dimensions {
        self.inner().dimensions()
    }

    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn run(&mut self, sink: &mut dyn FrameSink) -> Result<ReturnCode> {
        self.inner_mut().run(sink)
    }
}

/// The window screens are shown in.
pub trait Frame {
    /// Initialize and run `screen` to completion, returning its code.
    fn show(&mut self, screen: &mut AnyScreen) -> Result<ReturnCode>;
}

/// A frame backed by any sink, normally the crossterm terminal.
pub struct SinkFrame<S: FrameSink> {
    sink: S,
}

impl<S: FrameSink> SinkFrame<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }
}

impl<S: FrameSink> Frame for SinkFrame<S> {
    fn show(&mut self, screen: &mut AnyScreen) -> Result<ReturnCode> {
        screen.initialize();
        screen.run(&mut self.sink)
    }
}
