use std::collections::VecDeque;
use std::sync::Arc;

use crossterm::event::KeyCode;

use space_invaders::config::Config;
use space_invaders::draw::SharedFrame;
use space_invaders::driver::Core;
use space_invaders::error::{GameError, Result};
use space_invaders::files::FileManager;
use space_invaders::input::InputManager;
use space_invaders::screen::two_player::{LevelRequest, LevelRunner};
use space_invaders::screen::{AnyScreen, Frame, ReturnCode, Screen, SessionOptions};
use space_invaders::settings::Difficulty;
use space_invaders::state::GameState;

/// Answers every screen from a script instead of running it.
struct ScriptedFrame {
    input: InputManager,
    shown: Vec<&'static str>,
    title_answers: VecDeque<ReturnCode>,
    score_answer: ReturnCode,
    /// Levels end with no lives from this level on.
    last_level: u32,
    /// Lives each level costs.
    lives_lost: u32,
    /// (level, lives) every game screen started with.
    levels: Vec<(u32, u32)>,
    scores: Vec<GameState>,
    fail_on: Option<&'static str>,
}

impl ScriptedFrame {
    fn new(input: &InputManager) -> Self {
        Self {
            input: input.clone(),
            shown: Vec::new(),
            title_answers: VecDeque::new(),
            score_answer: ReturnCode::Title,
            last_level: 1,
            lives_lost: 0,
            levels: Vec::new(),
            scores: Vec::new(),
            fail_on: None,
        }
    }
}

impl Frame for ScriptedFrame {
    fn show(&mut self, screen: &mut AnyScreen) -> Result<ReturnCode> {
        self.shown.push(screen.name());
        if self.fail_on == Some(screen.name()) {
            return Err(GameError::DrawOrder("scripted failure"));
        }
        match screen {
            AnyScreen::Title(_) => Ok(self.title_answers.pop_front().unwrap_or(ReturnCode::Exit)),
            AnyScreen::Game(game) => {
                let field = game.battlefield_mut();
                self.levels.push((field.level, field.player.lives));
                field.score += 100;
                field.player.lives = field.player.lives.saturating_sub(self.lives_lost);
                if field.level >= self.last_level {
                    field.player.lives = 0;
                }
                Ok(ReturnCode::Game)
            }
            AnyScreen::Score(score) => {
                self.scores.push(score.game_state().clone());
                Ok(self.score_answer)
            }
            AnyScreen::GameSetting(setting) => {
                // Drive the real screen: Left lowers the difficulty, Space starts.
                setting.update()?;
                self.input.press(KeyCode::Left);
                setting.update()?;
                self.input.press(KeyCode::Char(' '));
                setting.update()?;
                Ok(setting.return_code())
            }
            AnyScreen::TwoPlayer(two) => {
                two.initialize();
                while two.is_running() {
                    two.update()?;
                    std::thread::sleep(std::time::Duration::from_millis(1));
                }
                Ok(two.return_code())
            }
            other => Ok(if other.name() == "shop" {
                ReturnCode::Achievements
            } else {
                ReturnCode::Title
            }),
        }
    }
}

fn make_core(frame: ScriptedFrame, input: &InputManager, dir: &tempfile::TempDir) -> Core<ScriptedFrame> {
    Core::new(frame, Config::default(), input.clone(), FileManager::new(dir.path()))
}

#[test]
fn title_to_game_to_score_to_exit() {
    let dir = tempfile::tempdir().unwrap();
    let input = InputManager::new();
    let mut frame = ScriptedFrame::new(&input);
    frame.title_answers = VecDeque::from([ReturnCode::Game, ReturnCode::Exit]);
    frame.last_level = 2;

    let mut core = make_core(frame, &input, &dir);
    assert_eq!(core.run_from(ReturnCode::Title), ReturnCode::Exit);

    let frame = core.frame();
    assert_eq!(frame.shown, vec!["title", "game", "game", "score", "title"]);
    assert_eq!(frame.levels, vec![(1, 3), (2, 3)]);

    let final_state = &frame.scores[0];
    assert_eq!(final_state.score(), 200);
    assert_eq!(final_state.lives_remaining(), 0);
    assert_eq!(final_state.level(), 3);
}

#[test]
fn score_pays_coins_and_saves() {
    let dir = tempfile::tempdir().unwrap();
    let input = InputManager::new();
    let mut frame = ScriptedFrame::new(&input);
    frame.last_level = 3;

    let mut core = make_core(frame, &input, &dir);
    assert_eq!(core.step(ReturnCode::Game), ReturnCode::Title);
    assert_eq!(core.wallet().balance(), 30);

    let saved = FileManager::new(dir.path()).load().unwrap();
    assert_eq!(saved.coins, 30);
    assert_eq!(saved.games_played, 1);
    assert_eq!(saved.best_score(), 300);
    assert_eq!(core.save_data(), &saved);
}

#[test]
fn coins_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let input = InputManager::new();
    let mut first = make_core(ScriptedFrame::new(&input), &input, &dir);
    first.step(ReturnCode::Game);
    assert_eq!(first.wallet().balance(), 10);

    let second = make_core(ScriptedFrame::new(&input), &input, &dir);
    assert_eq!(second.wallet().balance(), 10);
}

#[test]
fn bonus_life_every_third_level() {
    let dir = tempfile::tempdir().unwrap();
    let input = InputManager::new();
    let mut frame = ScriptedFrame::new(&input);
    frame.last_level = 4;
    frame.lives_lost = 1;

    let mut core = make_core(frame, &input, &dir);
    core.step(ReturnCode::Game);
    assert_eq!(core.frame().levels, vec![(1, 3), (2, 2), (3, 2), (4, 1)]);
}

#[test]
fn no_lives_goes_straight_to_score() {
    let dir = tempfile::tempdir().unwrap();
    let input = InputManager::new();
    let mut core = make_core(ScriptedFrame::new(&input), &input, &dir);

    let state = GameState::with_progress(3, 500, 0, 20, 5, 0, None, 0);
    assert_eq!(core.play_campaign(state.clone()), ReturnCode::Title);

    let frame = core.frame();
    assert_eq!(frame.shown, vec!["score"]);
    assert_eq!(frame.scores, vec![state]);
    assert_eq!(core.wallet().balance(), 50);
}

#[test]
fn score_can_start_another_game() {
    let dir = tempfile::tempdir().unwrap();
    let input = InputManager::new();
    let mut frame = ScriptedFrame::new(&input);
    frame.score_answer = ReturnCode::Game;

    let mut core = make_core(frame, &input, &dir);
    assert_eq!(core.step(ReturnCode::Game), ReturnCode::Game);
    assert_eq!(core.step(ReturnCode::Game), ReturnCode::Game);
    assert_eq!(core.frame().scores.len(), 2);
    assert_eq!(core.save_data().games_played, 2);
}

#[test]
fn settings_falls_back_to_title() {
    let dir = tempfile::tempdir().unwrap();
    let input = InputManager::new();
    let mut core = make_core(ScriptedFrame::new(&input), &input, &dir);
    assert_eq!(core.step(ReturnCode::Settings), ReturnCode::Title);
    assert!(core.frame().shown.is_empty());
}

#[test]
fn menu_screens_chain() {
    let dir = tempfile::tempdir().unwrap();
    let input = InputManager::new();
    let mut frame = ScriptedFrame::new(&input);
    frame.title_answers = VecDeque::from([ReturnCode::Shop, ReturnCode::Exit]);

    let mut core = make_core(frame, &input, &dir);
    core.run();
    assert_eq!(core.frame().shown, vec!["title", "shop", "achievement", "title"]);
}

#[test]
fn title_failure_exits() {
    let dir = tempfile::tempdir().unwrap();
    let input = InputManager::new();
    let mut frame = ScriptedFrame::new(&input);
    frame.fail_on = Some("title");
    let mut core = make_core(frame, &input, &dir);
    assert_eq!(core.step(ReturnCode::Title), ReturnCode::Exit);
}

#[test]
fn other_failures_return_to_title() {
    let dir = tempfile::tempdir().unwrap();
    let input = InputManager::new();
    let mut frame = ScriptedFrame::new(&input);
    frame.fail_on = Some("shop");
    let mut core = make_core(frame, &input, &dir);
    assert_eq!(core.step(ReturnCode::Shop), ReturnCode::Title);

    let mut frame = ScriptedFrame::new(&input);
    frame.fail_on = Some("game");
    let mut core = make_core(frame, &input, &dir);
    assert_eq!(core.step(ReturnCode::Game), ReturnCode::Title);
    assert!(core.frame().scores.is_empty());
}

#[test]
fn quit_during_a_level_exits() {
    let dir = tempfile::tempdir().unwrap();
    let input = InputManager::new();

    struct QuitFrame;
    impl Frame for QuitFrame {
        fn show(&mut self, screen: &mut AnyScreen) -> Result<ReturnCode> {
            match screen {
                AnyScreen::Game(_) => Ok(ReturnCode::Exit),
                _ => Ok(ReturnCode::Title),
            }
        }
    }

    let mut core = Core::new(QuitFrame, Config::default(), input.clone(), FileManager::new(dir.path()));
    assert_eq!(core.step(ReturnCode::Game), ReturnCode::Exit);
    assert_eq!(core.save_data().games_played, 0);
}

#[test]
fn game_settings_choose_difficulty() {
    let dir = tempfile::tempdir().unwrap();
    let input = InputManager::new();
    let mut core = make_core(ScriptedFrame::new(&input), &input, &dir);
    assert_eq!(core.options(), SessionOptions::new(Difficulty::Hard));

    assert_eq!(core.step(ReturnCode::GameSettings), ReturnCode::Game);
    assert_eq!(core.options().difficulty, Difficulty::Normal);
    assert!(!core.options().two_player);
}

/// Every level ends at once with points depending on the player.
struct FixedRunner;

impl LevelRunner for FixedRunner {
    fn play_level(&self, request: LevelRequest, _frame: SharedFrame) -> Result<GameState> {
        let s = &request.state;
        let points = if request.player == 0 { 100 } else { 250 };
        Ok(GameState::with_progress(
            s.level(),
            s.score() + points,
            s.lives_remaining(),
            0,
            0,
            0,
            None,
            0,
        ))
    }
}

#[test]
fn two_player_match_scores_the_winner() {
    let dir = tempfile::tempdir().unwrap();
    let input = InputManager::new();
    let options = SessionOptions {
        difficulty: Difficulty::Easy,
        two_player: true,
    };
    let mut core = make_core(ScriptedFrame::new(&input), &input, &dir)
        .with_options(options)
        .with_level_runner(Arc::new(FixedRunner));

    assert_eq!(core.step(ReturnCode::Game), ReturnCode::Title);

    let frame = core.frame();
    assert_eq!(frame.shown, vec!["two-player", "score"]);
    // Seven levels at 250 points for player 2.
    assert_eq!(frame.scores[0].score(), 1750);
    assert_eq!(core.wallet().balance(), 175);
}
