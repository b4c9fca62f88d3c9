//! Gameplay constants.
//!
//! The world is an abstract 800×600 playfield measured in integer pixels,
//! origin top-left, y growing downward. Front ends scale it onto whatever
//! surface they draw to.

// ── Playfield ────────────────────────────────────────────────────────────────

pub const SCREEN_WIDTH: i32 = 800;
pub const SCREEN_HEIGHT: i32 = 600;

// ── Player ───────────────────────────────────────────────────────────────────

pub const PLAYER_WIDTH: i32 = 44;
pub const PLAYER_HEIGHT: i32 = 26;
/// Gap between the ship's bottom edge and the bottom of the playfield.
pub const PLAYER_BOTTOM_GAP: i32 = 20;
pub const PLAYER_SPEED: i32 = 5;
pub const PLAYER_SHOOT_COOLDOWN_MS: u64 = 300;

// ── Bullets ──────────────────────────────────────────────────────────────────

pub const BULLET_WIDTH: i32 = 4;
pub const BULLET_HEIGHT: i32 = 12;
/// Negative: player bullets travel up.
pub const BULLET_SPEED: i32 = -10;
pub const ENEMY_BULLET_SPEED: i32 = 5;

// ── Enemy grid ───────────────────────────────────────────────────────────────

pub const ENEMY_WIDTH: i32 = 36;
pub const ENEMY_HEIGHT: i32 = 24;
pub const ENEMY_ROWS: usize = 5;
pub const ENEMY_COLS: usize = 10;
/// Horizontal grid pitch. Also the cell width used to bucket enemies into
/// shooting columns.
pub const ENEMY_X_PADDING: i32 = 60;
pub const ENEMY_Y_PADDING: i32 = 44;
pub const ENEMY_START_Y: i32 = 60;
/// Horizontal distance covered by one formation step.
pub const ENEMY_HMOVE: i32 = 10;
/// Vertical drop applied on a reversal step.
pub const ENEMY_VMOVE: i32 = 20;
pub const FORMATION_MARGIN: i32 = 10;
/// An alive enemy whose bottom edge reaches this line ends the game.
pub const ENEMY_BOTTOM_THRESHOLD: i32 = SCREEN_HEIGHT - 60;

// ── Scoring & effects ────────────────────────────────────────────────────────

pub const SCORE_PER_KILL: u32 = 100;
pub const EXPLOSION_FRAME_MS: u64 = 60;
pub const EXPLOSION_SIZE: i32 = 28;

// ── Difficulty scaling ───────────────────────────────────────────────────────

pub const MIN_STEP_INTERVAL_MS: u64 = 100;
pub const LEVEL_INTERVAL_FACTOR: f64 = 0.94;
pub const LEVEL_FIRE_FACTOR: f64 = 1.06;
