//! Space Invaders game core: a grid of invaders sweeps and descends while
//! the player's ship shoots upward from the bottom of the playfield.
//!
//! The crate is pure game logic. Drawing, input polling, audio playback and
//! frame timing belong to the front end (see `src/main.rs`), which talks to
//! a [`Session`] through `update`, [`Command`]s and read-only accessors.

pub mod constants;
pub mod difficulty;
pub mod effects;
pub mod entities;
pub mod formation;
pub mod session;

pub use difficulty::{DifficultyParams, ParsePresetError, Preset};
pub use effects::{Explosion, FrameHandle};
pub use entities::{Bullet, BulletOwner, Control, Controls, Cue, Enemy, GameStatus, Player, Rect};
pub use formation::{EnemyFormation, StepOutcome};
pub use session::{Command, Session};
