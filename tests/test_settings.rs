use space_invaders::settings::{Difficulty, GameSettings};

const DIFFICULTIES: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

fn template() -> GameSettings {
    GameSettings::new(4, 4, 60, 2500)
}

#[test]
fn default_is_first_level_template() {
    assert_eq!(GameSettings::default(), template());
}

#[test]
fn new_keeps_fields_positive() {
    let s = GameSettings::new(0, 0, 0, 0);
    assert_eq!(s, GameSettings::new(1, 1, 1, 1));
}

#[test]
fn level_one_is_the_template() {
    for difficulty in DIFFICULTIES {
        assert_eq!(template().leveled(1, difficulty), template());
    }
}

#[test]
fn leveled_values_on_hard() {
    let s = template().leveled(4, Difficulty::Hard);
    assert_eq!(s, GameSettings::new(5, 5, 24, 1600));
}

#[test]
fn leveling_never_gets_easier() {
    for difficulty in DIFFICULTIES {
        let mut previous = template().leveled(1, difficulty);
        for level in 2..=30 {
            let next = template().leveled(level, difficulty);
            assert!(next.formation_width >= previous.formation_width, "level {level}");
            assert!(next.formation_height >= previous.formation_height, "level {level}");
            assert!(next.base_speed <= previous.base_speed, "level {level}");
            assert!(next.shooting_frequency <= previous.shooting_frequency, "level {level}");
            previous = next;
        }
    }
}

#[test]
fn leveling_is_bounded() {
    let s = template().leveled(100, Difficulty::Hard);
    assert_eq!(s, GameSettings::new(8, 5, 10, 500));
}

#[test]
fn very_high_levels_stay_at_the_floor() {
    for difficulty in DIFFICULTIES {
        for level in [400_000_000, u32::MAX] {
            assert_eq!(
                template().leveled(level, difficulty),
                GameSettings::new(8, 5, 10, 500),
                "level {level}"
            );
        }
    }
}

#[test]
fn oversized_template_is_clamped() {
    let big = GameSettings::new(u32::MAX, u32::MAX, u32::MAX, u32::MAX);
    assert_eq!(big.clamped(), GameSettings::new(8, 5, 600, 60_000));
    // A template inside the bounds is left alone.
    assert_eq!(template().clamped(), template());
}

#[test]
fn template_below_floor_is_kept() {
    let fast = GameSettings::new(2, 2, 5, 300);
    assert_eq!(fast.leveled(10, Difficulty::Hard).base_speed, 5);
    assert_eq!(fast.leveled(10, Difficulty::Hard).shooting_frequency, 300);
}

#[test]
fn harder_difficulty_is_never_easier() {
    for level in 1..=20 {
        let easy = template().leveled(level, Difficulty::Easy);
        let hard = template().leveled(level, Difficulty::Hard);
        assert!(hard.base_speed <= easy.base_speed);
        assert!(hard.shooting_frequency <= easy.shooting_frequency);
    }
}

#[test]
fn leveling_leaves_template_untouched() {
    let t = template();
    let _ = t.leveled(5, Difficulty::Hard);
    let _ = t.campaign(7, Difficulty::Hard);
    assert_eq!(t, template());
}

#[test]
fn campaign_is_indexed_by_level() {
    let campaign = template().campaign(7, Difficulty::Normal);
    assert_eq!(campaign.len(), 7);
    for (i, settings) in campaign.iter().enumerate() {
        assert_eq!(*settings, template().leveled(i as u32 + 1, Difficulty::Normal));
    }
}

#[test]
fn difficulty_steps() {
    assert_eq!(Difficulty::Easy.harder(), Difficulty::Normal);
    assert_eq!(Difficulty::Hard.harder(), Difficulty::Hard);
    assert_eq!(Difficulty::Normal.easier(), Difficulty::Easy);
    assert_eq!(Difficulty::Easy.easier(), Difficulty::Easy);
    assert!(Difficulty::Easy.weight() < Difficulty::Hard.weight());
}
