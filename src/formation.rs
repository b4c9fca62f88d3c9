//! The enemy grid: timed sweep, edge reversal with descent, and column
//! shooters.

use std::collections::BTreeMap;

use rand::Rng;
use tracing::{debug, trace};

use crate::constants::{
    BULLET_HEIGHT, BULLET_WIDTH, ENEMY_BOTTOM_THRESHOLD, ENEMY_BULLET_SPEED, ENEMY_COLS,
    ENEMY_HMOVE, ENEMY_ROWS, ENEMY_START_Y, ENEMY_VMOVE, ENEMY_X_PADDING, ENEMY_Y_PADDING,
    FORMATION_MARGIN, SCORE_PER_KILL, SCREEN_WIDTH,
};
use crate::difficulty::DifficultyParams;
use crate::entities::{Bullet, BulletOwner, Cue, Enemy, Rect};

/// What a formation step did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Every alive enemy shifted one step in the current direction.
    Moved,
    /// Every alive enemy dropped and the direction flipped; no sideways move.
    Descended,
    /// Nobody is alive.
    Idle,
}

#[derive(Clone, Debug)]
pub struct EnemyFormation {
    /// Grid members in row-major spawn order. Dead enemies stay in place so
    /// indices remain stable.
    pub enemies: Vec<Enemy>,
    /// `1` sweeps right, `-1` sweeps left.
    pub direction: i32,
    pub last_step: u64,
    pub step_interval_ms: u64,
    pub fire_chance: f64,
}

impl EnemyFormation {
    /// A full `ENEMY_ROWS × ENEMY_COLS` wave moving right.
    pub fn spawn(params: DifficultyParams) -> Self {
        let enemies = (0..ENEMY_ROWS)
            .flat_map(|row| {
                (0..ENEMY_COLS).map(move |col| {
                    Enemy::new(
                        ENEMY_X_PADDING + col as i32 * ENEMY_X_PADDING,
                        ENEMY_START_Y + row as i32 * ENEMY_Y_PADDING,
                    )
                })
            })
            .collect();
        debug!(
            rows = ENEMY_ROWS,
            cols = ENEMY_COLS,
            step_interval_ms = params.step_interval_ms,
            "spawned wave"
        );
        EnemyFormation {
            enemies,
            direction: 1,
            last_step: 0,
            step_interval_ms: params.step_interval_ms,
            fire_chance: params.fire_chance,
        }
    }

    pub fn apply_params(&mut self, params: DifficultyParams) {
        self.step_interval_ms = params.step_interval_ms;
        self.fire_chance = params.fire_chance;
    }

    pub fn alive(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.alive)
    }

    pub fn alive_count(&self) -> usize {
        self.alive().count()
    }

    /// Leftmost and rightmost edges over alive enemies only.
    pub fn alive_extent(&self) -> Option<(i32, i32)> {
        let min_left = self.alive().map(|e| e.rect.left()).min()?;
        let max_right = self.alive().map(|e| e.rect.right()).max()?;
        Some((min_left, max_right))
    }

    /// Run the step timer, then give every column shooter its chance to fire.
    pub fn update(&mut self, now: u64, bullets: &mut Vec<Bullet>, rng: &mut impl Rng) {
        if now.saturating_sub(self.last_step) >= self.step_interval_ms {
            self.last_step = now;
            self.step();
        }
        self.shoot(bullets, rng);
    }

    /// One discrete move of the whole alive set, ignoring the timer.
    pub fn step(&mut self) -> StepOutcome {
        let Some((min_left, max_right)) = self.alive_extent() else {
            return StepOutcome::Idle;
        };

        let hits_right =
            self.direction > 0 && max_right + ENEMY_HMOVE >= SCREEN_WIDTH - FORMATION_MARGIN;
        let hits_left = self.direction < 0 && min_left - ENEMY_HMOVE <= FORMATION_MARGIN;

        if hits_right || hits_left {
            for enemy in self.enemies.iter_mut().filter(|e| e.alive) {
                enemy.rect.y += ENEMY_VMOVE;
            }
            self.direction = -self.direction;
            trace!(direction = self.direction, "formation reversed");
            StepOutcome::Descended
        } else {
            let dx = ENEMY_HMOVE * self.direction;
            for enemy in self.enemies.iter_mut().filter(|e| e.alive) {
                enemy.rect.x += dx;
            }
            StepOutcome::Moved
        }
    }

    /// Index of the designated shooter in each occupied column, keyed by
    /// column. The lowest enemy (greatest `top`) wins; on a tie the one
    /// later in spawn order wins.
    pub fn shooters(&self) -> BTreeMap<i32, usize> {
        let mut best: BTreeMap<i32, usize> = BTreeMap::new();
        for (i, enemy) in self.enemies.iter().enumerate() {
            if !enemy.alive {
                continue;
            }
            let col = enemy.rect.x.div_euclid(ENEMY_X_PADDING);
            let keep_current = best
                .get(&col)
                .is_some_and(|&j| self.enemies[j].rect.top() > enemy.rect.top());
            if !keep_current {
                best.insert(col, i);
            }
        }
        best
    }

    /// One Bernoulli trial per column shooter, in ascending column order.
    pub fn shoot(&self, bullets: &mut Vec<Bullet>, rng: &mut impl Rng) {
        let p = self.fire_probability();
        for i in self.shooters().into_values() {
            if rng.gen_bool(p) {
                let (cx, bottom) = self.enemies[i].rect.midbottom();
                bullets.push(Bullet::new(
                    Rect::from_midtop(cx, bottom, BULLET_WIDTH, BULLET_HEIGHT),
                    ENEMY_BULLET_SPEED,
                    BulletOwner::Enemy,
                ));
            }
        }
    }

    pub fn fire_probability(&self) -> f64 {
        self.fire_chance.clamp(0.0, 1.0)
    }

    /// Kill each alive enemy touched by an alive player bullet. An enemy
    /// takes at most one bullet and a bullet kills at most one enemy.
    /// Returns the score earned.
    pub fn resolve_player_bullets(&mut self, bullets: &mut [Bullet], cues: &mut Vec<Cue>) -> u32 {
        let mut gained = 0;
        for enemy in self.enemies.iter_mut().filter(|e| e.alive) {
            let hit = bullets.iter_mut().find(|b| {
                b.alive && b.owner == BulletOwner::Player && b.rect.overlaps(&enemy.rect)
            });
            if let Some(bullet) = hit {
                bullet.alive = false;
                enemy.alive = false;
                gained += SCORE_PER_KILL;
                cues.push(Cue::Hit);
            }
        }
        gained
    }

    pub fn any_reached_bottom(&self) -> bool {
        self.alive().any(|e| e.rect.bottom() >= ENEMY_BOTTOM_THRESHOLD)
    }

    pub fn all_dead(&self) -> bool {
        self.enemies.iter().all(|e| !e.alive)
    }
}
