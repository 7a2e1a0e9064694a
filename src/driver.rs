//! The top-level screen state machine.
//!
//! `Core` holds the return code of the last screen and keeps building and
//! showing the screen that code names until a screen answers `Exit`.  The
//! game code plays levels back to back, carrying a `GameState` from one to
//! the next, until the player runs out of lives.

use std::sync::Arc;

use crate::config::Config;
use crate::files::{FileManager, SaveData};
use crate::input::InputManager;
use crate::screen::score::ScoreSummary;
use crate::screen::two_player::{LevelRunner, ScreenLevelRunner};
use crate::screen::{
    AchievementScreen, AnyScreen, Frame, GameScreen, GameSettingScreen, ReturnCode, Screen,
    ScoreScreen, SessionOptions, ShopScreen, TitleScreen, TwoPlayerScreen,
};
use crate::state::GameState;
use crate::wallet::Wallet;

pub struct Core<F: Frame> {
    frame: F,
    config: Config,
    input: InputManager,
    files: FileManager,
    save: SaveData,
    wallet: Wallet,
    options: SessionOptions,
    level_runner: Option<Arc<dyn LevelRunner>>,
}

impl<F: Frame> Core<F> {
    /// Loads the save data under `files`; a corrupt save is replaced by an
    /// empty one.
    pub fn new(frame: F, config: Config, input: InputManager, files: FileManager) -> Self {
        let save = files.load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, dir = %files.dir().display(), "could not read save data, starting fresh");
            SaveData::default()
        });
        let wallet = Wallet::new(save.coins);
        let options = SessionOptions::new(config.difficulty);
        Self {
            frame,
            config,
            input,
            files,
            save,
            wallet,
            options,
            level_runner: None,
        }
    }

    /// Play two-player levels with `runner` instead of terminal game screens.
    pub fn with_level_runner(mut self, runner: Arc<dyn LevelRunner>) -> Self {
        self.level_runner = Some(runner);
        self
    }

    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn frame(&self) -> &F {
        &self.frame
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn save_data(&self) -> &SaveData {
        &self.save
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    /// Run from the title screen until the player exits.
    pub fn run(&mut self) {
        self.run_from(ReturnCode::Title);
    }

    pub fn run_from(&mut self, start: ReturnCode) -> ReturnCode {
        let mut code = start;
        while code != ReturnCode::Exit {
            code = self.step(code);
        }
        tracing::info!("exiting");
        code
    }

    /// Show the screen `code` names and return the code it finished with.
    pub fn step(&mut self, code: ReturnCode) -> ReturnCode {
        let dims = self.config.dimensions();
        match code {
            ReturnCode::Exit => ReturnCode::Exit,
            ReturnCode::Title => {
                let screen = TitleScreen::new(dims, self.input.clone(), self.wallet.balance());
                self.show_or(AnyScreen::Title(screen), ReturnCode::Exit).0
            }
            ReturnCode::Game => {
                if self.options.two_player {
                    self.play_two_player()
                } else {
                    self.play_campaign(GameState::new(self.config.max_lives))
                }
            }
            ReturnCode::Shop => {
                let screen = ShopScreen::new(dims, self.input.clone(), self.wallet.balance());
                self.show_or(AnyScreen::Shop(screen), ReturnCode::Title).0
            }
            ReturnCode::Achievements => {
                let screen = AchievementScreen::new(dims, self.input.clone(), self.save.clone());
                self.show_or(AnyScreen::Achievement(screen), ReturnCode::Title).0
            }
            ReturnCode::Settings => {
                tracing::warn!("settings screen is not implemented yet, returning to title");
                ReturnCode::Title
            }
            ReturnCode::GameSettings => {
                let screen = GameSettingScreen::new(dims, self.input.clone(), self.options);
                let (next, screen) = self.show_or(AnyScreen::GameSetting(screen), ReturnCode::Title);
                if let AnyScreen::GameSetting(screen) = screen {
                    self.options = screen.options();
                }
                next
            }
        }
    }

    /// Play levels from `state` until no lives remain, then show the score.
    pub fn play_campaign(&mut self, mut state: GameState) -> ReturnCode {
        let rules = self.config.rules();
        let dims = self.config.dimensions();

        while state.lives_remaining() > 0 {
            // One extra life every few levels.
            let bonus_life = state.bonus_life_eligible(rules.extra_life_frequency, rules.max_lives);
            let settings = self
                .config
                .first_level
                .leveled(state.level(), self.options.difficulty);

            let screen = GameScreen::new(&state, &settings, bonus_life, dims, self.input.clone())
                .with_timing(self.config.input_delay_ms, self.config.screen_change_ms);
            tracing::debug!(level = state.level(), bonus_life, ?settings, "starting level");

            let (code, screen) = self.show_or(AnyScreen::Game(Box::new(screen)), ReturnCode::Title);
            let AnyScreen::Game(screen) = screen else {
                return ReturnCode::Title;
            };
            match code {
                ReturnCode::Exit => return ReturnCode::Exit,
                ReturnCode::Game => {}
                // The level aborted.
                _ => return ReturnCode::Title,
            }

            state = screen.game_state().next_level();
        }

        self.show_score(state, None)
    }

    fn play_two_player(&mut self) -> ReturnCode {
        let rules = self.config.rules();
        let lane_dims = self.config.dimensions();
        let settings = self
            .config
            .first_level
            .campaign(rules.num_levels, self.options.difficulty);
        let runner: Arc<dyn LevelRunner> = match &self.level_runner {
            Some(runner) => Arc::clone(runner),
            None => Arc::new(ScreenLevelRunner::new(
                lane_dims,
                self.input.clone(),
                self.config.input_delay_ms,
                self.config.screen_change_ms,
            )),
        };

        let screen = match TwoPlayerScreen::new(
            &GameState::new(rules.max_lives),
            settings,
            lane_dims,
            self.input.clone(),
            rules,
            runner,
        ) {
            Ok(screen) => screen,
            Err(err) => {
                tracing::error!(error = %err, "could not start two-player mode");
                return ReturnCode::Title;
            }
        };

        let (code, screen) = self.show_or(AnyScreen::TwoPlayer(Box::new(screen)), ReturnCode::Title);
        if code == ReturnCode::Exit {
            return ReturnCode::Exit;
        }
        let AnyScreen::TwoPlayer(screen) = screen else {
            return ReturnCode::Title;
        };
        if !(screen.is_finished(0) && screen.is_finished(1)) {
            return code;
        }
        let winner = screen.winner_number();
        let state = screen.winner_game_state().clone();
        self.show_score(state, Some(winner - 1))
    }

    /// Pay out coins, record the score, then show the score screen.
    fn show_score(&mut self, state: GameState, winner: Option<usize>) -> ReturnCode {
        let coins_earned = Wallet::coins_for_score(state.score());
        let balance = self.wallet.deposit(coins_earned);
        self.save.coins = balance;
        let new_record = self.save.record(&state);
        if let Err(err) = self.files.store(&self.save) {
            tracing::warn!(error = %err, "could not write save data");
        }

        tracing::info!(
            score = state.score(),
            lives = state.lives_remaining(),
            bullets_shot = state.bullets_shot(),
            ships_destroyed = state.ships_destroyed(),
            coins_earned,
            "game over"
        );

        let summary = ScoreSummary {
            coins_earned,
            balance,
            new_record,
            winner,
        };
        let screen = ScoreScreen::new(self.config.dimensions(), self.input.clone(), state, summary);
        self.show_or(AnyScreen::Score(screen), ReturnCode::Title).0
    }

    /// Show `screen`; a screen that fails is logged and answers `fallback`.
    /// The screen is handed back so callers can read its results.
    fn show_or(&mut self, mut screen: AnyScreen, fallback: ReturnCode) -> (ReturnCode, AnyScreen) {
        let dims = screen.dimensions();
        let name = screen.name();
        tracing::info!(
            width = dims.width,
            height = dims.height,
            fps = dims.fps,
            "starting {name} screen"
        );
        let code = match self.frame.show(&mut screen) {
            Ok(code) => code,
            Err(err) => {
                tracing::error!(error = %err, "{name} screen failed");
                fallback
            }
        };
        tracing::info!(next = ?code, "closing {name} screen");
        (code, screen)
    }
}
