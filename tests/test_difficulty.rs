use space_invaders::constants::MIN_STEP_INTERVAL_MS;
use space_invaders::difficulty::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

// ── Presets ──────────────────────────────────────────────────────────────────

#[test]
fn preset_base_values() {
    assert_eq!(Preset::Easy.base_step_interval_ms(), 800);
    assert_eq!(Preset::Normal.base_step_interval_ms(), 600);
    assert_eq!(Preset::Hard.base_step_interval_ms(), 400);
    assert!(close(Preset::Easy.base_fire_chance(), 0.0015));
    assert!(close(Preset::Normal.base_fire_chance(), 0.002));
    assert!(close(Preset::Hard.base_fire_chance(), 0.003));
    assert_eq!(Preset::default(), Preset::Normal);
}

#[test]
fn preset_parses_case_insensitively() {
    assert_eq!("hard".parse::<Preset>(), Ok(Preset::Hard));
    assert_eq!(" Easy ".parse::<Preset>(), Ok(Preset::Easy));
    assert_eq!("NORMAL".parse::<Preset>(), Ok(Preset::Normal));
}

#[test]
fn unknown_preset_is_an_error_or_normal() {
    let err = "Nightmare".parse::<Preset>().unwrap_err();
    assert_eq!(
        err,
        ParsePresetError::Unknown {
            name: "Nightmare".to_string()
        }
    );
    assert_eq!(err.to_string(), "unknown difficulty preset: \"Nightmare\"");
    assert_eq!(Preset::from_name_or_default("Nightmare"), Preset::Normal);
    assert_eq!(Preset::from_name_or_default(""), Preset::Normal);
    assert_eq!(Preset::from_name_or_default("Hard"), Preset::Hard);
}

#[test]
fn preset_display_round_trips_through_parse() {
    for preset in Preset::ALL {
        assert_eq!(preset.to_string().parse::<Preset>(), Ok(preset));
    }
}

// ── Level scaling ────────────────────────────────────────────────────────────

#[test]
fn level_one_uses_preset_base() {
    let p = DifficultyParams::for_level(Preset::Normal, 1);
    assert_eq!(p.step_interval_ms, 600);
    assert!(close(p.fire_chance, 0.002));
}

#[test]
fn level_zero_is_treated_as_level_one() {
    assert_eq!(
        DifficultyParams::for_level(Preset::Hard, 0),
        DifficultyParams::for_level(Preset::Hard, 1)
    );
}

#[test]
fn interval_decays_and_is_floored() {
    assert_eq!(DifficultyParams::for_level(Preset::Normal, 2).step_interval_ms, 564);
    assert_eq!(DifficultyParams::for_level(Preset::Normal, 3).step_interval_ms, 530);
    assert_eq!(DifficultyParams::for_level(Preset::Easy, 10).step_interval_ms, 458);
    // 600 · 0.94^29 ≈ 99.7 drops below the floor
    assert_eq!(
        DifficultyParams::for_level(Preset::Normal, 30).step_interval_ms,
        MIN_STEP_INTERVAL_MS
    );
    assert_eq!(
        DifficultyParams::for_level(Preset::Hard, 200).step_interval_ms,
        MIN_STEP_INTERVAL_MS
    );
}

#[test]
fn interval_never_increases_with_level() {
    for preset in Preset::ALL {
        let mut prev = u64::MAX;
        for level in 1..100 {
            let interval = DifficultyParams::for_level(preset, level).step_interval_ms;
            assert!(interval <= prev);
            assert!(interval >= MIN_STEP_INTERVAL_MS);
            prev = interval;
        }
    }
}

#[test]
fn fire_chance_grows_without_cap() {
    let p2 = DifficultyParams::for_level(Preset::Normal, 2);
    assert!(close(p2.fire_chance, 0.002 * 1.06));

    let mut prev = 0.0;
    for level in 1..60 {
        let chance = DifficultyParams::for_level(Preset::Easy, level).fire_chance;
        assert!(chance > prev);
        prev = chance;
    }
}

#[test]
fn fire_chance_past_one_clamps_as_probability() {
    // 0.003 · 1.06^100 ≈ 1.02
    let late = DifficultyParams::for_level(Preset::Hard, 101);
    assert!(late.fire_chance > 1.0);
    assert_eq!(late.fire_probability(), 1.0);

    let early = DifficultyParams::for_level(Preset::Hard, 1);
    assert!(close(early.fire_probability(), early.fire_chance));
}
