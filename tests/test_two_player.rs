use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::style::Color;
use parking_lot::Mutex;

use space_invaders::config::GameRules;
use space_invaders::draw::{DrawManager, FrameBuffer, FrameSink, SharedFrame};
use space_invaders::error::{GameError, Result};
use space_invaders::input::InputManager;
use space_invaders::screen::two_player::{LevelRequest, LevelRunner};
use space_invaders::screen::{Dimensions, ReturnCode, Screen, TwoPlayerScreen};
use space_invaders::settings::{Difficulty, GameSettings};
use space_invaders::state::GameState;

const LANE_WIDTH: u16 = 20;

fn lane_dims() -> Dimensions {
    Dimensions::new(LANE_WIDTH, 16, 30)
}

fn rules(num_levels: u32) -> GameRules {
    GameRules {
        max_lives: 3,
        extra_life_frequency: 3,
        num_levels,
    }
}

/// Paints the lane's name, then scores the level and optionally costs a life.
fn finish_level(request: &LevelRequest, mut frame: SharedFrame, points: u32, lives_lost: u32) -> Result<GameState> {
    let mut buf = FrameBuffer::new(LANE_WIDTH, 16);
    buf.put_str(0, 0, &format!("LANE {}", request.player + 1), Color::White);
    frame.present(&buf)?;

    let s = &request.state;
    let lives = (s.lives_remaining() + u32::from(request.bonus_life)).saturating_sub(lives_lost);
    Ok(GameState::with_progress(
        s.level(),
        s.score() + points,
        lives,
        s.bullets_shot() + 1,
        s.ships_destroyed() + 1,
        s.elapsed_time() + 1_000,
        None,
        0,
    ))
}

/// Each level finishes immediately with fixed points per player.
struct InstantRunner {
    points: [u32; 2],
    lives_lost: u32,
    requests: Mutex<Vec<LevelRequest>>,
}

impl InstantRunner {
    fn new(points: [u32; 2]) -> Self {
        Self {
            points,
            lives_lost: 0,
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl LevelRunner for InstantRunner {
    fn play_level(&self, request: LevelRequest, frame: SharedFrame) -> Result<GameState> {
        self.requests.lock().push(request.clone());
        finish_level(&request, frame, self.points[request.player], self.lives_lost)
    }
}

/// Player 1 plays instantly; each of player 2's levels waits for a release.
struct GatedRunner {
    gate: Mutex<Receiver<()>>,
}

impl LevelRunner for GatedRunner {
    fn play_level(&self, request: LevelRequest, frame: SharedFrame) -> Result<GameState> {
        if request.player == 1 {
            self.gate
                .lock()
                .recv()
                .map_err(|_| GameError::LaneDisconnected(1))?;
            finish_level(&request, frame, 250, 0)
        } else {
            finish_level(&request, frame, 100, 0)
        }
    }
}

/// Fails every level of player 2.
struct FailingRunner;

impl LevelRunner for FailingRunner {
    fn play_level(&self, request: LevelRequest, frame: SharedFrame) -> Result<GameState> {
        if request.player == 1 {
            Err(GameError::DrawOrder("lane broke"))
        } else {
            finish_level(&request, frame, 10, 0)
        }
    }
}

fn screen(runner: Arc<dyn LevelRunner>, num_levels: u32, input: &InputManager) -> TwoPlayerScreen {
    let settings = GameSettings::default().campaign(num_levels, Difficulty::Hard);
    TwoPlayerScreen::new(
        &GameState::new(3),
        settings,
        lane_dims(),
        input.clone(),
        rules(num_levels),
        runner,
    )
    .unwrap()
}

fn poll_until(screen: &mut TwoPlayerScreen, done: impl Fn(&TwoPlayerScreen) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !done(screen) {
        assert!(Instant::now() < deadline, "two-player screen stalled");
        screen.poll();
        thread::sleep(Duration::from_millis(1));
    }
}

#[derive(Default)]
struct Capture {
    frames: Vec<FrameBuffer>,
}

impl FrameSink for Capture {
    fn present(&mut self, frame: &FrameBuffer) -> Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

#[test]
fn screen_spans_both_lanes_at_double_rate() {
    let input = InputManager::new();
    let s = screen(Arc::new(InstantRunner::new([0, 0])), 1, &input);
    assert_eq!(s.dimensions(), Dimensions::new(2 * LANE_WIDTH, 16, 60));
    assert_eq!(s.submitted_level(0), None);
}

#[test]
fn lanes_progress_independently() {
    let input = InputManager::new();
    let (release, gate) = mpsc::channel();
    let runner = Arc::new(GatedRunner { gate: Mutex::new(gate) });
    let mut s = screen(runner, 3, &input);

    s.initialize();
    assert_eq!(s.submitted_level(0), Some(1));
    assert_eq!(s.submitted_level(1), Some(1));

    poll_until(&mut s, |s| s.submitted_level(0) == Some(2));
    assert_eq!(s.submitted_level(1), Some(1));
    assert!(!s.is_finished(1));

    poll_until(&mut s, |s| s.is_finished(0));
    assert_eq!(s.game_state(0).score(), 300);
    assert_eq!(s.game_state(0).level(), 4);
    assert_eq!(s.submitted_level(1), Some(1));
    assert!(s.is_running());

    for _ in 0..3 {
        release.send(()).unwrap();
    }
    poll_until(&mut s, |s| !s.is_running());

    assert_eq!(s.return_code(), ReturnCode::Title);
    assert_eq!(s.game_state(1).score(), 750);
    assert_eq!(s.winner_number(), 2);
    assert_eq!(s.winner_game_state(), s.game_state(1));
}

#[test]
fn higher_score_wins() {
    let input = InputManager::new();
    let mut s = screen(Arc::new(InstantRunner::new([100, 250])), 1, &input);
    s.initialize();
    poll_until(&mut s, |s| !s.is_running());
    assert_eq!(s.winner_number(), 2);
    assert_eq!(s.winner_game_state().score(), 250);
}

#[test]
fn tie_goes_to_player_one() {
    let input = InputManager::new();
    let mut s = screen(Arc::new(InstantRunner::new([100, 100])), 1, &input);
    s.initialize();
    poll_until(&mut s, |s| !s.is_running());
    assert_eq!(s.winner_number(), 1);
}

#[test]
fn lane_gets_bonus_life_and_stops_without_lives() {
    let input = InputManager::new();
    let runner = Arc::new(InstantRunner {
        lives_lost: 1,
        ..InstantRunner::new([10, 10])
    });
    let mut s = screen(runner.clone(), 7, &input);
    s.initialize();
    poll_until(&mut s, |s| !s.is_running());

    let bonuses: Vec<(u32, bool)> = runner
        .requests
        .lock()
        .iter()
        .filter(|r| r.player == 0)
        .map(|r| (r.state.level(), r.bonus_life))
        .collect();
    assert_eq!(bonuses, vec![(1, false), (2, false), (3, true), (4, false)]);
    assert_eq!(s.game_state(0).lives_remaining(), 0);
    assert_eq!(s.game_state(0).level(), 5);
}

#[test]
fn lanes_use_leveled_settings() {
    let input = InputManager::new();
    let runner = Arc::new(InstantRunner::new([1, 1]));
    let mut s = screen(runner.clone(), 3, &input);
    s.initialize();
    poll_until(&mut s, |s| !s.is_running());

    for request in runner.requests.lock().iter() {
        let expected = GameSettings::default().leveled(request.state.level(), Difficulty::Hard);
        assert_eq!(request.settings, expected);
    }
}

#[test]
fn failed_lane_finishes_with_last_state() {
    let input = InputManager::new();
    let mut s = screen(Arc::new(FailingRunner), 2, &input);
    s.initialize();
    poll_until(&mut s, |s| !s.is_running());

    assert_eq!(s.game_state(1), &GameState::new(3));
    assert_eq!(s.game_state(0).score(), 20);
    assert_eq!(s.winner_number(), 1);
}

#[test]
fn draw_merges_lane_frames_side_by_side() {
    let input = InputManager::new();
    let mut s = screen(Arc::new(InstantRunner::new([5, 5])), 1, &input);
    s.initialize();
    poll_until(&mut s, |s| !s.is_running());

    let mut draw = DrawManager::new();
    draw.init_drawing(2 * LANE_WIDTH, 16).unwrap();
    s.draw(&mut draw).unwrap();
    let mut sink = Capture::default();
    draw.complete_drawing(&mut sink).unwrap();

    let top: Vec<char> = sink.frames[0].row_text(0).chars().collect();
    let left: String = top[..LANE_WIDTH as usize].iter().collect();
    let right: String = top[LANE_WIDTH as usize..].iter().collect();
    assert!(left.starts_with("LANE 1"));
    assert!(right.starts_with("LANE 2"));
    assert!(sink.frames[0].contains_text("PLAYER 1 DONE"));
}

#[test]
fn quit_stops_the_match() {
    let input = InputManager::new();
    let mut s = screen(Arc::new(InstantRunner::new([0, 0])), 3, &input);
    input.request_quit();
    s.initialize();
    s.update().unwrap();
    assert!(!s.is_running());
    assert_eq!(s.return_code(), ReturnCode::Exit);
    assert!(s.is_finished(0) && s.is_finished(1));
}
