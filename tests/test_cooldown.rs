use std::time::{Duration, Instant};

use space_invaders::cooldown::Cooldown;

#[test]
fn fresh_cooldown_is_expired() {
    let c = Cooldown::new(500);
    assert!(c.check());
    assert_eq!(c.remaining_at(Instant::now()), Duration::ZERO);
}

#[test]
fn reset_arms_for_duration() {
    let mut c = Cooldown::new(500);
    let now = Instant::now();
    c.reset_at(now);
    assert!(!c.check_at(now));
    assert!(!c.check_at(now + Duration::from_millis(499)));
    assert!(c.check_at(now + Duration::from_millis(500)));
    assert_eq!(c.remaining_at(now + Duration::from_millis(200)), Duration::from_millis(300));
}

#[test]
fn zero_cooldown_expires_immediately() {
    let mut c = Cooldown::new(0);
    c.reset();
    assert!(c.check());
}

#[test]
fn reset_rearms_an_expired_cooldown() {
    let mut c = Cooldown::new(100);
    assert_eq!(c.duration(), Duration::from_millis(100));
    let start = Instant::now();
    c.reset_at(start);
    assert!(c.check_at(start + Duration::from_millis(150)));

    let later = start + Duration::from_millis(150);
    c.reset_at(later);
    assert!(!c.check_at(later + Duration::from_millis(99)));
    assert!(c.check_at(later + Duration::from_millis(100)));
}
