//! Game and audio configuration.
//!
//! A single [`GameConfig`] is the source of truth for tuning. It deserializes
//! from JSON with every field optional (missing fields take the defaults from
//! `constants.rs`) and is validated before use.

use crate::constants::*;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Which loop engine strategy renders the proximity level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineMode {
    /// Six always-playing loops, one gain bus per level.
    Continuous,
    /// Two alternating voices fed one segment per loop boundary.
    #[default]
    Scheduled,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayAreaConfig {
    /// px margin from viewport edges
    pub margin: f32,
    /// px extra gap below the HUD
    pub hud_padding: f32,
}

impl Default for PlayAreaConfig {
    fn default() -> Self {
        Self {
            margin: DEFAULT_PLAY_MARGIN,
            hud_padding: DEFAULT_HUD_PADDING,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub mode: EngineMode,
    pub master_gain: f32,
    pub crossfade_sec: f64,
    pub floor_gain: f32,
    pub start_delay_sec: f64,
    pub scheduler_tick_ms: u32,
    pub schedule_horizon_sec: f64,
    /// One loop file per level, quietest level first.
    pub asset_paths: Vec<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            mode: EngineMode::default(),
            master_gain: MASTER_HEADROOM_GAIN,
            crossfade_sec: CROSSFADE_SEC,
            floor_gain: FLOOR_GAIN,
            start_delay_sec: START_DELAY_SEC,
            scheduler_tick_ms: SCHEDULER_TICK_MS,
            schedule_horizon_sec: SCHEDULE_HORIZON_SEC,
            asset_paths: (1..=LEVEL_COUNT)
                .map(|i| format!("audio/noy{i}.ogg"))
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Level mapping uses closeness = 1 - dist / (factor * viewport diagonal).
    pub max_distance_factor: f32,
    /// Boundaries between levels 0-1, 1-2, ..., 4-5 on the closeness axis.
    pub level_breakpoints: [f32; BREAKPOINT_COUNT],
    /// Audible gain per level.
    pub volumes: [f32; LEVEL_COUNT],
    /// px; the target becomes clickable inside this radius.
    pub reveal_radius: f32,
    pub target_size: f32,
    pub play_area: PlayAreaConfig,
    pub keyboard_step: f32,
    pub keyboard_step_fast: f32,
    pub audio: AudioConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_distance_factor: DEFAULT_MAX_DISTANCE_FACTOR,
            level_breakpoints: DEFAULT_LEVEL_BREAKPOINTS,
            volumes: DEFAULT_VOLUMES,
            reveal_radius: DEFAULT_REVEAL_RADIUS,
            target_size: DEFAULT_TARGET_SIZE,
            play_area: PlayAreaConfig::default(),
            keyboard_step: KEYBOARD_STEP,
            keyboard_step_fast: KEYBOARD_STEP_FAST,
            audio: AudioConfig::default(),
        }
    }
}

impl GameConfig {
    /// Evenly spaced breakpoints at 1/6 .. 5/6.
    pub fn even_breakpoints() -> [f32; BREAKPOINT_COUNT] {
        let mut bp = [0.0; BREAKPOINT_COUNT];
        for (i, v) in bp.iter_mut().enumerate() {
            *v = (i + 1) as f32 / LEVEL_COUNT as f32;
        }
        bp
    }

    /// Parse and validate a JSON document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive(self.max_distance_factor as f64, "max_distance_factor")?;
        validate_breakpoints(&self.level_breakpoints)?;

        positive(self.audio.floor_gain as f64, "audio.floor_gain")?;
        for (index, &value) in self.volumes.iter().enumerate() {
            if !(value >= self.audio.floor_gain && value <= 1.0) {
                return Err(ConfigError::VolumeOutOfRange { index, value });
            }
        }

        if !(self.reveal_radius >= 0.0) {
            return Err(ConfigError::NonPositive {
                field: "reveal_radius",
            });
        }
        positive(self.target_size as f64, "target_size")?;
        positive(self.keyboard_step as f64, "keyboard_step")?;
        positive(self.keyboard_step_fast as f64, "keyboard_step_fast")?;

        let audio = &self.audio;
        positive(audio.master_gain as f64, "audio.master_gain")?;
        positive(audio.crossfade_sec, "audio.crossfade_sec")?;
        positive(audio.scheduler_tick_ms as f64, "audio.scheduler_tick_ms")?;
        positive(audio.schedule_horizon_sec, "audio.schedule_horizon_sec")?;
        if !(audio.start_delay_sec >= 0.0) {
            return Err(ConfigError::NonPositive {
                field: "audio.start_delay_sec",
            });
        }
        if audio.schedule_horizon_sec * 1000.0 <= audio.scheduler_tick_ms as f64 {
            return Err(ConfigError::HorizonTooShort);
        }
        if audio.asset_paths.len() != LEVEL_COUNT {
            return Err(ConfigError::AssetPathCount {
                expected: LEVEL_COUNT,
                actual: audio.asset_paths.len(),
            });
        }
        Ok(())
    }
}

/// Every breakpoint in (0, 1), strictly ascending.
pub(crate) fn validate_breakpoints(bp: &[f32; BREAKPOINT_COUNT]) -> Result<(), ConfigError> {
    for (index, &value) in bp.iter().enumerate() {
        if !(value > 0.0 && value < 1.0) {
            return Err(ConfigError::BreakpointOutOfRange { index, value });
        }
        if index > 0 && value <= bp[index - 1] {
            return Err(ConfigError::BreakpointsNotAscending { index });
        }
    }
    Ok(())
}

fn positive(value: f64, field: &'static str) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field })
    }
}
