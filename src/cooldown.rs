use std::time::{Duration, Instant};

/// A resettable timer used for input delays and firing cadence.
///
/// A fresh cooldown is already expired; call [`Cooldown::reset`] to arm it.
#[derive(Clone, Debug)]
pub struct Cooldown {
    duration: Duration,
    started: Option<Instant>,
}

impl Cooldown {
    pub fn new(milliseconds: u64) -> Self {
        Self {
            duration: Duration::from_millis(milliseconds),
            started: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn check(&self) -> bool {
        self.check_at(Instant::now())
    }

    /// True once the armed period has passed at `now`.
    pub fn check_at(&self, now: Instant) -> bool {
        match self.started {
            None => true,
            Some(start) => now.saturating_duration_since(start) >= self.duration,
        }
    }

    pub fn reset(&mut self) {
        self.reset_at(Instant::now());
    }

    pub fn reset_at(&mut self, now: Instant) {
        self.started = Some(now);
    }

    /// Time left before expiry, zero when already expired.
    pub fn remaining_at(&self, now: Instant) -> Duration {
        match self.started {
            None => Duration::ZERO,
            Some(start) => self
                .duration
                .saturating_sub(now.saturating_duration_since(start)),
        }
    }
}
