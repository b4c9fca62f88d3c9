//! Game entity types and their per-entity lifecycle rules.
//!
//! Everything here is plain data plus small self-contained mutations
//! (a bullet advancing, the ship clamping itself to the playfield).
//! Coordination between entities lives in `formation` and `session`.

use tracing::trace;

use crate::constants::{
    BULLET_HEIGHT, BULLET_SPEED, BULLET_WIDTH, ENEMY_HEIGHT, ENEMY_WIDTH, PLAYER_BOTTOM_GAP,
    PLAYER_HEIGHT, PLAYER_SHOOT_COOLDOWN_MS, PLAYER_SPEED, PLAYER_WIDTH, SCREEN_HEIGHT,
    SCREEN_WIDTH,
};

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in world pixels. `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    /// The whole playfield.
    pub const fn screen() -> Self {
        Rect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    /// Rectangle whose bottom edge is centred on `(cx, bottom)`.
    pub fn from_midbottom(cx: i32, bottom: i32, w: i32, h: i32) -> Self {
        Rect::new(cx - w / 2, bottom - h, w, h)
    }

    /// Rectangle whose top edge is centred on `(cx, top)`.
    pub fn from_midtop(cx: i32, top: i32, w: i32, h: i32) -> Self {
        Rect::new(cx - w / 2, top, w, h)
    }

    pub fn from_center(cx: i32, cy: i32, w: i32, h: i32) -> Self {
        Rect::new(cx - w / 2, cy - h / 2, w, h)
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }

    pub fn midtop(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y)
    }

    pub fn midbottom(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.bottom())
    }

    /// Strict overlap: rectangles that merely share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Shift the rectangle so it lies fully inside `bounds`. A rectangle
    /// larger than `bounds` is pinned to its top-left corner.
    pub fn clamp_within(&mut self, bounds: &Rect) {
        self.x = self.x.min(bounds.right() - self.w).max(bounds.left());
        self.y = self.y.min(bounds.bottom() - self.h).max(bounds.top());
    }
}

// ── Controls ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    MoveLeft,
    MoveRight,
    Fire,
}

impl Control {
    fn bit(self) -> u8 {
        match self {
            Control::MoveLeft => 0b001,
            Control::MoveRight => 0b010,
            Control::Fire => 0b100,
        }
    }
}

/// The set of controls held during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls(u8);

impl Controls {
    pub fn empty() -> Self {
        Controls(0)
    }

    pub fn insert(&mut self, control: Control) {
        self.0 |= control.bit();
    }

    pub fn with(mut self, control: Control) -> Self {
        self.insert(control);
        self
    }

    pub fn contains(&self, control: Control) -> bool {
        self.0 & control.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Control> for Controls {
    fn from_iter<I: IntoIterator<Item = Control>>(iter: I) -> Self {
        let mut set = Controls::empty();
        for control in iter {
            set.insert(control);
        }
        set
    }
}

// ── Status & cues ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// Fire-and-forget audio signal for the sound collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Shoot,
    Hit,
    GameOver,
}

// ── Projectiles ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    Enemy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub rect: Rect,
    /// Signed vertical speed per tick; negative travels up.
    pub vy: i32,
    pub owner: BulletOwner,
    pub alive: bool,
}

impl Bullet {
    pub fn new(rect: Rect, vy: i32, owner: BulletOwner) -> Self {
        Bullet {
            rect,
            vy,
            owner,
            alive: true,
        }
    }

    /// Move one tick along the vertical axis and expire once the bullet has
    /// fully left the playfield.
    pub fn advance(&mut self) {
        self.rect.y += self.vy;
        if self.rect.bottom() < 0 || self.rect.top() > SCREEN_HEIGHT {
            self.alive = false;
        }
    }
}

// ── Player & enemy ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub rect: Rect,
    pub cooldown_ms: u64,
    /// `None` until the first shot, so the opening shot is never throttled.
    pub last_shot: Option<u64>,
    pub alive: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// A fresh ship, mid-bottom of the playfield.
    pub fn new() -> Self {
        Player {
            rect: Rect::from_midbottom(
                SCREEN_WIDTH / 2,
                SCREEN_HEIGHT - PLAYER_BOTTOM_GAP,
                PLAYER_WIDTH,
                PLAYER_HEIGHT,
            ),
            cooldown_ms: PLAYER_SHOOT_COOLDOWN_MS,
            last_shot: None,
            alive: true,
        }
    }

    /// Left and right each contribute one step, so holding both cancels out.
    pub fn apply_input(&mut self, controls: Controls) {
        if controls.contains(Control::MoveLeft) {
            self.rect.x -= PLAYER_SPEED;
        }
        if controls.contains(Control::MoveRight) {
            self.rect.x += PLAYER_SPEED;
        }
        self.rect.clamp_within(&Rect::screen());
    }

    pub fn can_fire(&self, now: u64) -> bool {
        self.alive
            && self
                .last_shot
                .map_or(true, |last| now.saturating_sub(last) >= self.cooldown_ms)
    }

    /// Spawn at most one bullet at the ship's nose. Returns whether a shot
    /// was fired.
    pub fn try_fire(&mut self, now: u64, bullets: &mut Vec<Bullet>, cues: &mut Vec<Cue>) -> bool {
        if !self.can_fire(now) {
            return false;
        }
        self.last_shot = Some(now);
        let (cx, top) = self.rect.midtop();
        bullets.push(Bullet::new(
            Rect::from_midbottom(cx, top, BULLET_WIDTH, BULLET_HEIGHT),
            BULLET_SPEED,
            BulletOwner::Player,
        ));
        cues.push(Cue::Shoot);
        trace!(now, x = cx, "player fired");
        true
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub rect: Rect,
    pub alive: bool,
}

impl Enemy {
    pub fn new(x: i32, y: i32) -> Self {
        Enemy {
            rect: Rect::new(x, y, ENEMY_WIDTH, ENEMY_HEIGHT),
            alive: true,
        }
    }
}
