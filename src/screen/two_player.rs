//! Two-player mode: two independent lanes of levels played side by side.
//!
//! Each player's levels run to completion on that player's own worker thread.
//! The screen itself only polls: once per frame it checks, without waiting,
//! whether a lane's level is done, queues that lane's next level, and merges
//! the lanes' latest frames into one picture.  The lanes are not kept in step,
//! so one player can be several levels ahead of the other.

use std::sync::Arc;

use crossterm::style::Color;

use crate::config::GameRules;
use crate::draw::{DrawManager, SharedFrame};
use crate::error::Result;
use crate::input::InputManager;
use crate::lane::LaneWorker;
use crate::settings::GameSettings;
use crate::state::GameState;

use super::{Dimensions, GameScreen, ReturnCode, Screen, ScreenCore};

pub const PLAYER_COUNT: usize = 2;

/// Everything needed to play one level of one lane.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelRequest {
    pub player: usize,
    pub state: GameState,
    pub settings: GameSettings,
    pub bonus_life: bool,
}

/// Plays a whole level and reports the resulting state.  Called on a lane
/// thread; `frame` is that lane's private picture.
pub trait LevelRunner: Send + Sync {
    fn play_level(&self, request: LevelRequest, frame: SharedFrame) -> Result<GameState>;
}

/// Runs each level as a `GameScreen` at the lane's size and frame rate.
pub struct ScreenLevelRunner {
    dims: Dimensions,
    input: InputManager,
    input_delay_ms: u64,
    screen_change_ms: u64,
}

impl ScreenLevelRunner {
    pub fn new(dims: Dimensions, input: InputManager, input_delay_ms: u64, screen_change_ms: u64) -> Self {
        Self {
            dims,
            input,
            input_delay_ms,
            screen_change_ms,
        }
    }
}

impl LevelRunner for ScreenLevelRunner {
    fn play_level(&self, request: LevelRequest, mut frame: SharedFrame) -> Result<GameState> {
        let mut screen = GameScreen::new(
            &request.state,
            &request.settings,
            request.bonus_life,
            self.dims,
            self.input.clone(),
        )
        .with_player(request.player)
        .with_timing(self.input_delay_ms, self.screen_change_ms);

        screen.initialize();
        screen.run(&mut frame)?;
        Ok(screen.game_state())
    }
}

struct Lane {
    state: GameState,
    worker: LaneWorker,
    frame: SharedFrame,
    finished: bool,
    submitted_level: Option<u32>,
}

pub struct TwoPlayerScreen {
    core: ScreenCore,
    rules: GameRules,
    /// Leveled settings per player, indexed by `level - 1`.
    settings: [Vec<GameSettings>; PLAYER_COUNT],
    lanes: [Lane; PLAYER_COUNT],
    runner: Arc<dyn LevelRunner>,
    lane_width: u16,
    workers_joined: bool,
}

impl TwoPlayerScreen {
    /// Both players start from copies of `state`.  `lane_dims` is the size and
    /// frame rate of one player's half; the screen spans both halves and polls
    /// at twice the lane frame rate.
    pub fn new(
        state: &GameState,
        settings: Vec<GameSettings>,
        lane_dims: Dimensions,
        input: InputManager,
        rules: GameRules,
        runner: Arc<dyn LevelRunner>,
    ) -> Result<Self> {
        let dims = Dimensions::new(lane_dims.width * 2, lane_dims.height, lane_dims.fps * 2);
        let lane = |player: usize| -> Result<Lane> {
            Ok(Lane {
                state: state.clone(),
                worker: LaneWorker::spawn(player)?,
                frame: SharedFrame::new(lane_dims.width, lane_dims.height),
                finished: false,
                submitted_level: None,
            })
        };

        Ok(Self {
            core: ScreenCore::new(dims, input, ReturnCode::Title),
            rules,
            settings: [settings.clone(), settings],
            lanes: [lane(0)?, lane(1)?],
            runner,
            lane_width: lane_dims.width,
            workers_joined: false,
        })
    }

    /// Submit both players' first levels.
    pub fn start(&mut self) {
        for player in 0..PLAYER_COUNT {
            self.submit_level(player);
        }
    }

    /// One non-blocking look at both lanes.
    pub fn poll(&mut self) {
        for player in 0..PLAYER_COUNT {
            self.poll_lane(player);
        }

        if self.lanes.iter().all(|lane| lane.finished) && self.core.is_running() {
            tracing::info!(
                p1_score = self.lanes[0].state.score(),
                p2_score = self.lanes[1].state.score(),
                winner = self.winner_number(),
                "two-player match finished"
            );
            self.core.finish(ReturnCode::Title);
            self.shutdown();
        }
    }

    fn poll_lane(&mut self, player: usize) {
        let lane = &mut self.lanes[player];
        if lane.finished {
            return;
        }
        match lane.worker.try_result() {
            None => {}
            Some(Ok(finished)) => {
                lane.state = finished.next_level();
                self.submit_level(player);
            }
            Some(Err(err)) => {
                tracing::error!(player = player + 1, error = %err, "lane failed, ending its game");
                lane.finished = true;
            }
        }
    }

    /// Queue the lane's next level, or mark the lane finished when the player
    /// is out of lives or past the last level.
    fn submit_level(&mut self, player: usize) {
        let quit = self.core.input.quit_requested();
        let lane = &mut self.lanes[player];
        let state = lane.state.clone();

        if quit || state.lives_remaining() == 0 || state.level() > self.rules.num_levels {
            tracing::info!(
                player = player + 1,
                level = state.level(),
                score = state.score(),
                lives = state.lives_remaining(),
                "lane finished"
            );
            lane.finished = true;
            return;
        }

        let Some(settings) = self.settings[player].get(state.level() as usize - 1).copied() else {
            lane.finished = true;
            return;
        };
        let request = LevelRequest {
            player,
            bonus_life: state
                .bonus_life_eligible(self.rules.extra_life_frequency, self.rules.max_lives),
            state,
            settings,
        };
        let level = request.state.level();
        let runner = Arc::clone(&self.runner);
        let frame = lane.frame.clone();

        match lane
            .worker
            .submit(Box::new(move || runner.play_level(request, frame)))
        {
            Ok(()) => {
                tracing::debug!(player = player + 1, level, "level submitted");
                lane.submitted_level = Some(level);
            }
            Err(err) => {
                tracing::error!(player = player + 1, error = %err, "could not submit level");
                lane.finished = true;
            }
        }
    }

    fn shutdown(&mut self) {
        if self.workers_joined {
            return;
        }
        for lane in &mut self.lanes {
            if let Err(err) = lane.worker.shutdown() {
                tracing::warn!(lane = lane.worker.index() + 1, error = %err, "lane shutdown failed");
            }
        }
        self.workers_joined = true;
    }

    /// Level most recently handed to `player`'s lane.
    pub fn submitted_level(&self, player: usize) -> Option<u32> {
        self.lanes[player].submitted_level
    }

    pub fn is_finished(&self, player: usize) -> bool {
        self.lanes[player].finished
    }

    pub fn game_state(&self, player: usize) -> &GameState {
        &self.lanes[player].state
    }

    /// 1 or 2; a tie goes to player 1.
    pub fn winner_number(&self) -> usize {
        if self.lanes[0].state.score() >= self.lanes[1].state.score() {
            1
        } else {
            2
        }
    }

    pub fn winner_game_state(&self) -> &GameState {
        &self.lanes[self.winner_number() - 1].state
    }
}

impl Screen for TwoPlayerScreen {
    fn initialize(&mut self) {
        self.start();
    }

    fn update(&mut self) -> Result<()> {
        if self.core.honour_quit() {
            return Ok(());
        }
        self.poll();
        Ok(())
    }

    fn draw(&self, draw: &mut DrawManager) -> Result<()> {
        for (player, lane) in self.lanes.iter().enumerate() {
            let x_offset = self.lane_width * player as u16;
            draw.merge_drawing(&lane.frame.snapshot(), x_offset)?;
            if lane.finished {
                let text = format!("PLAYER {} DONE", player + 1);
                let x = x_offset as i32 + (self.lane_width as i32 - text.len() as i32) / 2;
                draw.canvas()
                    .put_str(x, self.core.dims.height as i32 / 2 + 2, &text, Color::Yellow);
            }
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
        "two-player"
    }
}
