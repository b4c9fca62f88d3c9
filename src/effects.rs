//! Short-lived visual effects.

use crate::constants::{EXPLOSION_FRAME_MS, EXPLOSION_SIZE};
use crate::entities::Rect;

/// Opaque reference to a frame image owned by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub usize);

/// The two-frame burst shown where a ship or invader dies.
pub const EXPLOSION_FRAMES: [FrameHandle; 2] = [FrameHandle(0), FrameHandle(1)];

/// A one-shot frame animation. Frames advance on a fixed cadence and the
/// effect expires after its last frame; it never loops.
#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub rect: Rect,
    frames: Vec<FrameHandle>,
    index: usize,
    frame_ms: u64,
    frame_since: u64,
    alive: bool,
}

impl Explosion {
    pub fn new(frames: Vec<FrameHandle>, center: (i32, i32), now: u64) -> Self {
        let alive = !frames.is_empty();
        Explosion {
            rect: Rect::from_center(center.0, center.1, EXPLOSION_SIZE, EXPLOSION_SIZE),
            frames,
            index: 0,
            frame_ms: EXPLOSION_FRAME_MS,
            frame_since: now,
            alive,
        }
    }

    /// The standard explosion at `center`.
    pub fn burst(center: (i32, i32), now: u64) -> Self {
        Explosion::new(EXPLOSION_FRAMES.to_vec(), center, now)
    }

    pub fn advance(&mut self, now: u64) {
        if !self.alive || now.saturating_sub(self.frame_since) < self.frame_ms {
            return;
        }
        self.frame_since = now;
        self.index += 1;
        if self.index >= self.frames.len() {
            self.alive = false;
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn frame_index(&self) -> usize {
        self.index
    }

    /// `None` once the animation has run out.
    pub fn current_frame(&self) -> Option<FrameHandle> {
        if self.alive {
            self.frames.get(self.index).copied()
        } else {
            None
        }
    }

    pub fn center(&self) -> (i32, i32) {
        self.rect.center()
    }
}
