//! The per-frame driver.
//!
//! A `Session` owns every entity in play and advances them one tick at a
//! time. Front ends feed it a monotonic millisecond clock plus the held
//! controls, read state back through the accessors, and drain queued audio
//! cues. All randomness comes from the session's own seeded RNG so a fixed
//! seed and input sequence always replays the same game.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, trace};

use crate::difficulty::{DifficultyParams, Preset};
use crate::effects::Explosion;
use crate::entities::{Bullet, BulletOwner, Control, Controls, Cue, GameStatus, Player};
use crate::formation::EnemyFormation;

pub const DEFAULT_VOLUME: f32 = 0.7;

/// Discrete requests from the menu/settings layer.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    StartGame,
    SetDifficulty(String),
    SetVolume(f32),
    Restart,
}

#[derive(Debug)]
pub struct Session {
    player: Player,
    formation: EnemyFormation,
    bullets: Vec<Bullet>,
    effects: Vec<Explosion>,
    score: u32,
    level: u32,
    status: GameStatus,
    preset: Preset,
    params: DifficultyParams,
    volume: f32,
    cues: Vec<Cue>,
    rng: StdRng,
}

impl Session {
    pub fn new(preset: Preset) -> Self {
        Self::with_rng(preset, StdRng::from_entropy())
    }

    /// Deterministic session for replays and tests.
    pub fn with_seed(preset: Preset, seed: u64) -> Self {
        Self::with_rng(preset, StdRng::seed_from_u64(seed))
    }

    fn with_rng(preset: Preset, rng: StdRng) -> Self {
        let params = DifficultyParams::for_level(preset, 1);
        Session {
            player: Player::new(),
            formation: EnemyFormation::spawn(params),
            bullets: Vec::new(),
            effects: Vec::new(),
            score: 0,
            level: 1,
            status: GameStatus::Playing,
            preset,
            params,
            volume: DEFAULT_VOLUME,
            cues: Vec::new(),
            rng,
        }
    }

    /// Back to a fresh first wave. Preset and volume carry over.
    pub fn reset(&mut self) {
        self.level = 1;
        self.params = DifficultyParams::for_level(self.preset, self.level);
        self.player = Player::new();
        self.formation = EnemyFormation::spawn(self.params);
        self.bullets.clear();
        self.effects.clear();
        self.score = 0;
        self.status = GameStatus::Playing;
        info!(preset = self.preset.name(), "session reset");
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::StartGame | Command::Restart => self.reset(),
            Command::SetDifficulty(name) => self.set_difficulty(&name),
            Command::SetVolume(value) => self.set_volume(value),
        }
    }

    /// Switch preset by name (unknown names mean `Normal`) and retune the
    /// wave in play for the current level.
    pub fn set_difficulty(&mut self, name: &str) {
        self.set_preset(Preset::from_name_or_default(name));
    }

    pub fn set_preset(&mut self, preset: Preset) {
        self.preset = preset;
        self.params = DifficultyParams::for_level(preset, self.level);
        self.formation.apply_params(self.params);
        self.cues.push(Cue::Hit);
    }

    /// Stored for the audio collaborator only.
    pub fn set_volume(&mut self, value: f32) {
        self.volume = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    }

    /// Advance one tick. Does nothing once the game is over.
    pub fn update(&mut self, now: u64, controls: Controls) {
        if self.status != GameStatus::Playing {
            return;
        }

        // ── 1. Player ────────────────────────────────────────────────────────
        self.player.apply_input(controls);
        if controls.contains(Control::Fire) {
            self.player.try_fire(now, &mut self.bullets, &mut self.cues);
        }

        // ── 2. Formation step & shots ────────────────────────────────────────
        self.formation.update(now, &mut self.bullets, &mut self.rng);

        // ── 3. Bullets ───────────────────────────────────────────────────────
        for bullet in &mut self.bullets {
            bullet.advance();
        }
        self.bullets.retain(|b| b.alive);

        // ── 4. Player bullets ↔ enemies ──────────────────────────────────────
        let gained = self
            .formation
            .resolve_player_bullets(&mut self.bullets, &mut self.cues);
        if gained > 0 {
            self.score += gained;
            for bullet in &self.bullets {
                if !bullet.alive && bullet.owner == BulletOwner::Player {
                    self.effects.push(Explosion::burst(bullet.rect.center(), now));
                }
            }
        }

        // ── 5. Enemy bullets ↔ player ────────────────────────────────────────
        let player_rect = self.player.rect;
        let hit = self.bullets.iter_mut().find(|b| {
            b.alive && b.owner == BulletOwner::Enemy && b.rect.overlaps(&player_rect)
        });
        let player_killed = match hit {
            Some(bullet) => {
                bullet.alive = false;
                self.effects.push(Explosion::burst(player_rect.center(), now));
                self.end_game("shot down");
                true
            }
            None => false,
        };
        self.bullets.retain(|b| b.alive);

        // ── 6. Invasion ──────────────────────────────────────────────────────
        if !player_killed && self.formation.any_reached_bottom() {
            self.end_game("invaders reached the bottom");
        }

        // ── 7. Wave clear ────────────────────────────────────────────────────
        if self.formation.all_dead() {
            self.level += 1;
            self.params = DifficultyParams::for_level(self.preset, self.level);
            self.formation = EnemyFormation::spawn(self.params);
            info!(level = self.level, score = self.score, "wave cleared");
        }

        // ── 8. Effects ───────────────────────────────────────────────────────
        for effect in &mut self.effects {
            effect.advance(now);
        }
        self.effects.retain(|e| e.is_alive());
    }

    fn end_game(&mut self, reason: &str) {
        self.player.alive = false;
        self.status = GameStatus::GameOver;
        self.cues.push(Cue::GameOver);
        info!(reason, score = self.score, level = self.level, "game over");
    }

    /// Hand queued cues to the audio collaborator.
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        let cues = std::mem::take(&mut self.cues);
        for cue in &cues {
            trace!(?cue, "cue");
        }
        cues
    }

    // ── Read-only view ───────────────────────────────────────────────────────

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn formation(&self) -> &EnemyFormation {
        &self.formation
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn effects(&self) -> &[Explosion] {
        &self.effects
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    pub fn preset(&self) -> Preset {
        self.preset
    }

    pub fn params(&self) -> DifficultyParams {
        self.params
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    // ── Scripted setups ──────────────────────────────────────────────────────

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn formation_mut(&mut self) -> &mut EnemyFormation {
        &mut self.formation
    }

    pub fn bullets_mut(&mut self) -> &mut Vec<Bullet> {
        &mut self.bullets
    }
}
