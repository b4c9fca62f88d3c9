use rand::rngs::StdRng;
use rand::SeedableRng;

use space_invaders::constants::*;
use space_invaders::difficulty::DifficultyParams;
use space_invaders::entities::*;
use space_invaders::formation::*;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// A wave that never shoots unless a test asks it to.
fn quiet_formation() -> EnemyFormation {
    EnemyFormation::spawn(DifficultyParams {
        step_interval_ms: 600,
        fire_chance: 0.0,
    })
}

fn shift_all(f: &mut EnemyFormation, dx: i32) {
    for e in &mut f.enemies {
        e.rect.x += dx;
    }
}

// ── spawn ────────────────────────────────────────────────────────────────────

#[test]
fn spawn_builds_full_grid() {
    let f = quiet_formation();
    assert_eq!(f.enemies.len(), ENEMY_ROWS * ENEMY_COLS);
    assert_eq!(f.alive_count(), ENEMY_ROWS * ENEMY_COLS);
    assert!(!f.all_dead());
    assert_eq!(f.direction, 1);
    assert_eq!(f.enemies[0].rect.x, 60);
    assert_eq!(f.enemies[0].rect.y, 60);
    assert_eq!(f.enemies[ENEMY_COLS - 1].rect.x, 600);
    assert_eq!(f.enemies[ENEMY_ROWS * ENEMY_COLS - 1].rect.y, 60 + 4 * ENEMY_Y_PADDING);
    assert_eq!(f.alive_extent(), Some((60, 636)));
}

// ── step ─────────────────────────────────────────────────────────────────────

#[test]
fn step_shifts_alive_enemies_in_direction() {
    let mut f = quiet_formation();
    assert_eq!(f.step(), StepOutcome::Moved);
    assert_eq!(f.enemies[0].rect.x, 60 + ENEMY_HMOVE);
    assert_eq!(f.enemies[0].rect.y, 60);
    assert_eq!(f.direction, 1);
}

#[test]
fn step_does_not_move_dead_enemies() {
    let mut f = quiet_formation();
    f.enemies[0].alive = false;
    f.step();
    assert_eq!(f.enemies[0].rect.x, 60);
    assert_eq!(f.enemies[1].rect.x, 120 + ENEMY_HMOVE);
}

#[test]
fn reversal_at_right_edge_descends_without_sideways_move() {
    let mut f = quiet_formation();
    // Rightmost edge at 780: 780 + 10 reaches 800 - 10
    shift_all(&mut f, 144);
    let before: Vec<Rect> = f.enemies.iter().map(|e| e.rect).collect();

    assert_eq!(f.step(), StepOutcome::Descended);
    assert_eq!(f.direction, -1);
    for (e, old) in f.enemies.iter().zip(&before) {
        assert_eq!(e.rect.x, old.x);
        assert_eq!(e.rect.y, old.y + ENEMY_VMOVE);
    }
}

#[test]
fn no_reversal_one_pixel_short_of_right_edge() {
    let mut f = quiet_formation();
    shift_all(&mut f, 143); // rightmost edge 779
    assert_eq!(f.step(), StepOutcome::Moved);
    assert_eq!(f.direction, 1);
}

#[test]
fn reversal_at_left_edge() {
    let mut f = quiet_formation();
    f.direction = -1;
    shift_all(&mut f, -40); // leftmost edge 20: 20 - 10 reaches the margin
    assert_eq!(f.step(), StepOutcome::Descended);
    assert_eq!(f.direction, 1);
    assert_eq!(f.enemies[0].rect.x, 20);
    assert_eq!(f.enemies[0].rect.y, 60 + ENEMY_VMOVE);
}

#[test]
fn no_reversal_one_pixel_short_of_left_edge() {
    let mut f = quiet_formation();
    f.direction = -1;
    shift_all(&mut f, -39); // leftmost edge 21
    assert_eq!(f.step(), StepOutcome::Moved);
    assert_eq!(f.enemies[0].rect.x, 21 - ENEMY_HMOVE);
}

#[test]
fn extent_ignores_dead_enemies() {
    let mut f = quiet_formation();
    for row in 0..ENEMY_ROWS {
        f.enemies[row * ENEMY_COLS + ENEMY_COLS - 1].alive = false;
    }
    // Dead right column would sit at 786, alive edge is at 726
    shift_all(&mut f, 150);
    assert_eq!(f.alive_extent(), Some((210, 726)));
    assert_eq!(f.step(), StepOutcome::Moved);
}

#[test]
fn dead_enemies_do_not_descend() {
    let mut f = quiet_formation();
    f.enemies[3].alive = false;
    shift_all(&mut f, 144);
    f.step();
    assert_eq!(f.enemies[3].rect.y, 60);
    assert_eq!(f.enemies[4].rect.y, 60 + ENEMY_VMOVE);
}

#[test]
fn step_with_everyone_dead_is_idle() {
    let mut f = quiet_formation();
    for e in &mut f.enemies {
        e.alive = false;
    }
    assert_eq!(f.step(), StepOutcome::Idle);
    assert_eq!(f.direction, 1);
    assert_eq!(f.enemies[0].rect.x, 60);
}

#[test]
fn direction_stays_unit_over_a_long_sweep() {
    let mut f = quiet_formation();
    for _ in 0..200 {
        let before: Vec<Rect> = f.enemies.iter().map(|e| e.rect).collect();
        let dir = f.direction;
        match f.step() {
            StepOutcome::Descended => {
                assert_eq!(f.direction, -dir);
                for (e, old) in f.enemies.iter().zip(&before) {
                    assert_eq!((e.rect.x, e.rect.y), (old.x, old.y + ENEMY_VMOVE));
                }
            }
            StepOutcome::Moved => assert_eq!(f.direction, dir),
            StepOutcome::Idle => unreachable!(),
        }
        assert!(f.direction == 1 || f.direction == -1);
    }
}

// ── update (timer) ───────────────────────────────────────────────────────────

#[test]
fn update_waits_for_step_interval() {
    let mut f = quiet_formation();
    let mut bullets = Vec::new();
    let mut rng = seeded_rng();

    f.update(599, &mut bullets, &mut rng);
    assert_eq!(f.enemies[0].rect.x, 60);

    f.update(600, &mut bullets, &mut rng);
    assert_eq!(f.enemies[0].rect.x, 70);
    assert_eq!(f.last_step, 600);

    f.update(1199, &mut bullets, &mut rng);
    assert_eq!(f.enemies[0].rect.x, 70);
    f.update(1200, &mut bullets, &mut rng);
    assert_eq!(f.enemies[0].rect.x, 80);
    assert!(bullets.is_empty());
}

// ── shooting ─────────────────────────────────────────────────────────────────

#[test]
fn shooters_are_bottom_row_of_full_grid() {
    let f = quiet_formation();
    let shooters = f.shooters();
    assert_eq!(shooters.len(), ENEMY_COLS);
    let bottom_row = (ENEMY_ROWS - 1) * ENEMY_COLS;
    let expected: Vec<usize> = (bottom_row..bottom_row + ENEMY_COLS).collect();
    assert_eq!(shooters.into_values().collect::<Vec<_>>(), expected);
}

#[test]
fn shooter_moves_up_when_bottom_enemy_dies() {
    let mut f = quiet_formation();
    f.enemies[40].alive = false;
    assert_eq!(f.shooters().values().next(), Some(&30));
}

#[test]
fn shooter_tie_goes_to_later_enemy() {
    let mut f = quiet_formation();
    f.enemies[40].alive = false;
    // Lift row 3 of column 0 level with row 1
    f.enemies[10].rect.y = f.enemies[30].rect.y;
    assert_eq!(f.shooters().values().next(), Some(&30));
    f.enemies[30].rect.y = f.enemies[10].rect.y + 1;
    assert_eq!(f.shooters().values().next(), Some(&30));
    f.enemies[10].rect.y += 2;
    assert_eq!(f.shooters().values().next(), Some(&10));
}

#[test]
fn empty_column_has_no_shooter() {
    let mut f = quiet_formation();
    for row in 0..ENEMY_ROWS {
        f.enemies[row * ENEMY_COLS].alive = false;
    }
    assert_eq!(f.shooters().len(), ENEMY_COLS - 1);
}

#[test]
fn certain_fire_chance_shoots_once_per_column() {
    let mut f = quiet_formation();
    f.fire_chance = 1.0;
    let mut bullets = Vec::new();
    f.shoot(&mut bullets, &mut seeded_rng());

    assert_eq!(bullets.len(), ENEMY_COLS);
    for (c, b) in bullets.iter().enumerate() {
        // Anchored at the bottom-centre of the row-4 enemy in column c
        let cx = 60 + 60 * c as i32 + ENEMY_WIDTH / 2;
        assert_eq!(b.rect, Rect::from_midtop(cx, 260, BULLET_WIDTH, BULLET_HEIGHT));
        assert_eq!(b.vy, ENEMY_BULLET_SPEED);
        assert_eq!(b.owner, BulletOwner::Enemy);
    }
}

#[test]
fn zero_fire_chance_never_shoots() {
    let f = quiet_formation();
    let mut bullets = Vec::new();
    let mut rng = seeded_rng();
    for _ in 0..500 {
        f.shoot(&mut bullets, &mut rng);
    }
    assert!(bullets.is_empty());
}

#[test]
fn fire_chance_above_one_is_clamped() {
    // Late levels push the scaled chance past 1.0: every shooter fires
    let mut f = quiet_formation();
    f.fire_chance = 2.5;
    assert_eq!(f.fire_probability(), 1.0);
    let mut bullets = Vec::new();
    f.shoot(&mut bullets, &mut seeded_rng());
    assert_eq!(bullets.len(), ENEMY_COLS);
}

#[test]
fn shooting_is_deterministic_for_a_seed() {
    let mut f = quiet_formation();
    f.fire_chance = 0.3;
    let mut a = Vec::new();
    let mut b = Vec::new();
    let (mut rng_a, mut rng_b) = (seeded_rng(), seeded_rng());
    for _ in 0..20 {
        f.shoot(&mut a, &mut rng_a);
        f.shoot(&mut b, &mut rng_b);
    }
    assert_eq!(a, b);
}

// ── collisions ───────────────────────────────────────────────────────────────

fn player_bullet(rect: Rect) -> Bullet {
    Bullet::new(rect, BULLET_SPEED, BulletOwner::Player)
}

#[test]
fn bullet_on_enemy_kills_both_and_scores() {
    let mut f = quiet_formation();
    let mut bullets = vec![player_bullet(f.enemies[0].rect)];
    let mut cues = Vec::new();

    let gained = f.resolve_player_bullets(&mut bullets, &mut cues);
    assert_eq!(gained, SCORE_PER_KILL);
    assert!(!f.enemies[0].alive);
    assert!(!bullets[0].alive);
    assert_eq!(f.alive_count(), ENEMY_ROWS * ENEMY_COLS - 1);
    assert_eq!(cues, vec![Cue::Hit]);
}

#[test]
fn resolving_twice_scores_once() {
    let mut f = quiet_formation();
    let mut bullets = vec![player_bullet(f.enemies[5].rect)];
    let mut cues = Vec::new();
    assert_eq!(f.resolve_player_bullets(&mut bullets, &mut cues), SCORE_PER_KILL);
    assert_eq!(f.resolve_player_bullets(&mut bullets, &mut cues), 0);
    assert_eq!(cues.len(), 1);
}

#[test]
fn enemy_bullets_do_not_hurt_enemies() {
    let mut f = quiet_formation();
    let mut bullets = vec![Bullet::new(
        f.enemies[0].rect,
        ENEMY_BULLET_SPEED,
        BulletOwner::Enemy,
    )];
    assert_eq!(f.resolve_player_bullets(&mut bullets, &mut Vec::new()), 0);
    assert!(f.enemies[0].alive);
    assert!(bullets[0].alive);
}

#[test]
fn one_bullet_kills_at_most_one_enemy() {
    let mut f = quiet_formation();
    // Wide enough to touch the first two enemies of row 0
    let mut bullets = vec![player_bullet(Rect::new(60, 60, 100, 10))];
    let gained = f.resolve_player_bullets(&mut bullets, &mut Vec::new());
    assert_eq!(gained, SCORE_PER_KILL);
    assert!(!f.enemies[0].alive);
    assert!(f.enemies[1].alive);
}

#[test]
fn one_enemy_absorbs_at_most_one_bullet() {
    let mut f = quiet_formation();
    let rect = f.enemies[0].rect;
    let mut bullets = vec![player_bullet(rect), player_bullet(rect)];
    let gained = f.resolve_player_bullets(&mut bullets, &mut Vec::new());
    assert_eq!(gained, SCORE_PER_KILL);
    assert!(!bullets[0].alive);
    assert!(bullets[1].alive);
}

#[test]
fn edge_contact_is_not_a_hit() {
    let mut f = quiet_formation();
    // Enemy 0 spans x 60..96
    let mut bullets = vec![player_bullet(Rect::new(96, 60, 4, 12))];
    assert_eq!(f.resolve_player_bullets(&mut bullets, &mut Vec::new()), 0);
    assert!(f.enemies[0].alive);
}

#[test]
fn no_bullets_is_a_no_op() {
    let mut f = quiet_formation();
    assert_eq!(f.resolve_player_bullets(&mut [], &mut Vec::new()), 0);
    assert_eq!(f.alive_count(), ENEMY_ROWS * ENEMY_COLS);
}

// ── bottom & wave state ──────────────────────────────────────────────────────

#[test]
fn reaching_bottom_threshold() {
    let mut f = quiet_formation();
    assert!(!f.any_reached_bottom());

    f.enemies[49].rect.y = ENEMY_BOTTOM_THRESHOLD - ENEMY_HEIGHT - 1;
    assert!(!f.any_reached_bottom());

    f.enemies[49].rect.y = ENEMY_BOTTOM_THRESHOLD - ENEMY_HEIGHT;
    assert!(f.any_reached_bottom());
}

#[test]
fn dead_enemy_at_bottom_is_harmless() {
    let mut f = quiet_formation();
    f.enemies[49].rect.y = SCREEN_HEIGHT;
    f.enemies[49].alive = false;
    assert!(!f.any_reached_bottom());
}

#[test]
fn all_dead_only_when_every_enemy_is_dead() {
    let mut f = quiet_formation();
    for e in f.enemies.iter_mut().skip(1) {
        e.alive = false;
    }
    assert!(!f.all_dead());
    f.enemies[0].alive = false;
    assert!(f.all_dead());
    assert_eq!(f.alive_extent(), None);
}
