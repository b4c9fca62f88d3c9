//! Difficulty presets and per-level scaling.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::constants::{LEVEL_FIRE_FACTOR, LEVEL_INTERVAL_FACTOR, MIN_STEP_INTERVAL_MS};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Preset {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Easy, Preset::Normal, Preset::Hard];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Easy => "Easy",
            Preset::Normal => "Normal",
            Preset::Hard => "Hard",
        }
    }

    /// Milliseconds between formation steps at level 1.
    pub fn base_step_interval_ms(&self) -> u64 {
        match self {
            Preset::Easy => 800,
            Preset::Normal => 600,
            Preset::Hard => 400,
        }
    }

    /// Per-tick fire probability of each column's shooter at level 1.
    pub fn base_fire_chance(&self) -> f64 {
        match self {
            Preset::Easy => 0.0015,
            Preset::Normal => 0.002,
            Preset::Hard => 0.003,
        }
    }

    /// Unknown names fall back to `Normal`.
    pub fn from_name_or_default(name: &str) -> Preset {
        name.parse().unwrap_or_else(|err: ParsePresetError| {
            debug!("{err}; falling back to {}", Preset::Normal.name());
            Preset::Normal
        })
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsePresetError {
    Unknown { name: String },
}

impl fmt::Display for ParsePresetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown { name } => write!(f, "unknown difficulty preset: {name:?}"),
        }
    }
}

impl std::error::Error for ParsePresetError {}

impl FromStr for Preset {
    type Err = ParsePresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParsePresetError::Unknown {
                name: s.to_string(),
            })
    }
}

/// Formation tuning in force for the current wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyParams {
    pub step_interval_ms: u64,
    /// Raw scaled chance. Can exceed 1.0 on late levels; consumers clamp
    /// it with [`DifficultyParams::fire_probability`].
    pub fire_chance: f64,
}

impl DifficultyParams {
    /// Preset base values scaled for `level` (1-based): the step interval
    /// shrinks by 0.94 per level down to a floor, the fire chance grows by
    /// 1.06 per level without a cap.
    pub fn for_level(preset: Preset, level: u32) -> Self {
        let ups = level.saturating_sub(1) as i32;
        let interval = preset.base_step_interval_ms() as f64 * LEVEL_INTERVAL_FACTOR.powi(ups);
        let params = DifficultyParams {
            step_interval_ms: (interval.floor() as u64).max(MIN_STEP_INTERVAL_MS),
            fire_chance: preset.base_fire_chance() * LEVEL_FIRE_FACTOR.powi(ups),
        };
        debug!(
            preset = preset.name(),
            level,
            step_interval_ms = params.step_interval_ms,
            fire_chance = params.fire_chance,
            "derived difficulty"
        );
        params
    }

    pub fn fire_probability(&self) -> f64 {
        self.fire_chance.clamp(0.0, 1.0)
    }
}
