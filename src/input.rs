//! Keyboard state shared between the terminal event thread and the screens.
//!
//! Instead of acting on each key event individually, the tracker records when
//! every key was last pressed or repeated.  A key counts as held while that
//! timestamp is fresher than `HOLD_WINDOW`, which covers terminals that never
//! send release events.  Keyboard-enhanced terminals release keys immediately.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use parking_lot::Mutex;

/// A key is considered "held" if its last press/repeat event arrived within
/// this window.  The OS key-repeat rate is ≥ 15 Hz, so the window is always
/// refreshed before it expires while the key is down.
const HOLD_WINDOW: Duration = Duration::from_millis(133);

#[derive(Default)]
struct KeyTracker {
    last_seen: HashMap<KeyCode, Instant>,
    /// Presses not yet consumed by `take_press`.
    pressed: HashSet<KeyCode>,
    quit: bool,
}

/// Cloneable handle; every clone sees the same keyboard.
#[derive(Clone, Default)]
pub struct InputManager {
    inner: Arc<Mutex<KeyTracker>>,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dedicate a thread to blocking event reads so no screen ever blocks on I/O.
    pub fn spawn_reader(&self) -> std::io::Result<JoinHandle<()>> {
        let input = self.clone();
        thread::Builder::new()
            .name("input".into())
            .spawn(move || loop {
                match event::read() {
                    Ok(ev) => input.handle_event(ev),
                    Err(err) => {
                        tracing::warn!(error = %err, "terminal event stream closed");
                        break;
                    }
                }
            })
    }

    pub fn handle_event(&self, ev: Event) {
        let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
            return;
        };
        match kind {
            KeyEventKind::Press => {
                if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                    self.inner.lock().quit = true;
                    return;
                }
                self.press(code);
            }
            KeyEventKind::Repeat => {
                self.inner.lock().last_seen.insert(code, Instant::now());
            }
            KeyEventKind::Release => self.release(code),
        }
    }

    pub fn press(&self, code: KeyCode) {
        let mut tracker = self.inner.lock();
        tracker.last_seen.insert(code, Instant::now());
        tracker.pressed.insert(code);
    }

    pub fn release(&self, code: KeyCode) {
        self.inner.lock().last_seen.remove(&code);
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.inner
            .lock()
            .last_seen
            .get(&code)
            .is_some_and(|last| last.elapsed() <= HOLD_WINDOW)
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|&code| self.is_held(code))
    }

    /// Consume a pending press of `code`.
    pub fn take_press(&self, code: KeyCode) -> bool {
        self.inner.lock().pressed.remove(&code)
    }

    pub fn take_any_press(&self, codes: &[KeyCode]) -> bool {
        let mut tracker = self.inner.lock();
        codes.iter().fold(false, |hit, code| tracker.pressed.remove(code) || hit)
    }

    /// Drop pending presses, e.g. when a new screen opens.
    pub fn clear_presses(&self) {
        self.inner.lock().pressed.clear();
    }

    /// Ctrl-C was pressed somewhere.
    pub fn quit_requested(&self) -> bool {
        self.inner.lock().quit
    }

    pub fn request_quit(&self) {
        self.inner.lock().quit = true;
    }
}

/// Keys steering one ship.
#[derive(Clone, Debug, PartialEq)]
pub struct Controls {
    pub left: Vec<KeyCode>,
    pub right: Vec<KeyCode>,
    pub shoot: Vec<KeyCode>,
}

impl Controls {
    /// Single-player: arrows or A/D to move, Space to shoot.
    pub fn single() -> Self {
        Self {
            left: vec![KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
            right: vec![KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
            shoot: vec![KeyCode::Char(' ')],
        }
    }

    /// Two-player split: player 0 on A/D/Space, player 1 on arrows/Enter.
    pub fn for_player(player: usize) -> Self {
        if player == 0 {
            Self {
                left: vec![KeyCode::Char('a'), KeyCode::Char('A')],
                right: vec![KeyCode::Char('d'), KeyCode::Char('D')],
                shoot: vec![KeyCode::Char(' ')],
            }
        } else {
            Self {
                left: vec![KeyCode::Left],
                right: vec![KeyCode::Right],
                shoot: vec![KeyCode::Enter],
            }
        }
    }
}
