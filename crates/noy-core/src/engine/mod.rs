//! Loop audio engines.
//!
//! Both strategies render exactly one audible level out of six
//! equal-duration loops and switch between levels with short linear
//! crossfades:
//!
//! - [`ContinuousEngine`] keeps all six loops playing in phase, each through
//!   its own gain bus, and ramps the buses.
//! - [`ScheduledEngine`] runs a lookahead scheduler that programs one segment
//!   per loop boundary onto two alternating voices.
//!
//! [`LoopEngine`] picks one at runtime from [`EngineMode`].

mod continuous;
mod scheduled;

pub use continuous::ContinuousEngine;
pub use scheduled::{ScheduledEngine, ScheduledSegment};

use crate::backend::AudioBackend;
use crate::config::{EngineMode, GameConfig};
use crate::constants::LEVEL_COUNT;
use crate::error::{EngineError, EngineResult};
use crate::proximity::Level;

/// Contract shared by both engine strategies.
pub trait ProximityEngine {
    type Buffer;

    /// Create the master bus and per-engine gain stages. Idempotent.
    fn initialize(&mut self) -> EngineResult<()>;

    /// Install the six decoded loops, quietest level first. Idempotent once
    /// a bank is installed.
    fn load_assets(&mut self, buffers: Vec<Self::Buffer>) -> EngineResult<()>;

    fn has_assets(&self) -> bool;

    /// Begin (or restart) playback with every level silent.
    fn start(&mut self) -> EngineResult<()>;

    /// Make `level` the audible one. Returns `false` when nothing changed,
    /// including for a level outside the six-level scale.
    fn set_active_level(&mut self, level: Level) -> bool;

    /// Fade everything to the floor and suspend the device.
    fn stop(&mut self);

    /// Periodic wake-up; only the scheduled strategy has work to do.
    fn tick(&mut self) {}

    /// Last level accepted by `set_active_level`, `None` after start or stop.
    ///
    /// The continuous strategy is ramping towards this level. The scheduled
    /// strategy applies it from the next boundary it programs, so a segment
    /// already inside the horizon may still play the previous level.
    fn current_level(&self) -> Option<Level>;

    fn is_playing(&self) -> bool;
}

/// Audio tuning extracted from [`GameConfig`].
#[derive(Clone, Debug, PartialEq)]
pub struct EngineParams {
    pub volumes: [f32; LEVEL_COUNT],
    pub master_gain: f32,
    pub crossfade_sec: f64,
    pub floor_gain: f32,
    pub start_delay_sec: f64,
    pub schedule_horizon_sec: f64,
}

impl EngineParams {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            volumes: config.volumes,
            master_gain: config.audio.master_gain,
            crossfade_sec: config.audio.crossfade_sec,
            floor_gain: config.audio.floor_gain,
            start_delay_sec: config.audio.start_delay_sec,
            schedule_horizon_sec: config.audio.schedule_horizon_sec,
        }
    }

    #[inline]
    pub(crate) fn volume(&self, level: Level) -> f32 {
        self.volumes[level.min(LEVEL_COUNT - 1)]
    }
}

impl Default for EngineParams {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

/// The six loop buffers and their shared loop length.
pub(crate) struct LoopBank<T> {
    pub buffers: Vec<T>,
    /// Shortest buffer duration; every loop wraps here to stay phase-aligned.
    pub loop_sec: f64,
}

impl<T> LoopBank<T> {
    pub fn new<B>(backend: &B, buffers: Vec<T>, crossfade_sec: f64) -> EngineResult<Self>
    where
        B: AudioBackend<Buffer = T>,
    {
        if buffers.len() != LEVEL_COUNT {
            return Err(EngineError::AssetCount {
                expected: LEVEL_COUNT,
                actual: buffers.len(),
            });
        }
        let loop_sec = buffers
            .iter()
            .map(|b| backend.buffer_duration(b))
            .fold(f64::INFINITY, f64::min);
        if !(loop_sec > 2.0 * crossfade_sec) {
            return Err(EngineError::LoopTooShort {
                loop_sec,
                crossfade_sec,
            });
        }
        Ok(Self { buffers, loop_sec })
    }
}

/// Cancel pending automation, pin the current value, then ramp linearly.
///
/// The value is read before cancelling: cancelling a half-finished ramp
/// would otherwise make the parameter jump back to its last surviving event.
pub(crate) fn ramp_gain<B: AudioBackend>(
    backend: &mut B,
    gain: &B::Gain,
    target: f32,
    now: f64,
    duration: f64,
) {
    let current = backend.gain_value(gain);
    backend.cancel_scheduled_values(gain, now);
    backend.set_value_at_time(gain, current, now);
    backend.linear_ramp_to_value_at_time(gain, target, now + duration);
}

/// Either engine strategy, chosen from configuration.
pub enum LoopEngine<B: AudioBackend> {
    Continuous(ContinuousEngine<B>),
    Scheduled(ScheduledEngine<B>),
}

impl<B: AudioBackend> LoopEngine<B> {
    pub fn from_config(backend: B, config: &GameConfig) -> Self {
        let params = EngineParams::from_config(config);
        match config.audio.mode {
            EngineMode::Continuous => Self::Continuous(ContinuousEngine::new(backend, params)),
            EngineMode::Scheduled => Self::Scheduled(ScheduledEngine::new(backend, params)),
        }
    }

    pub fn mode(&self) -> EngineMode {
        match self {
            Self::Continuous(_) => EngineMode::Continuous,
            Self::Scheduled(_) => EngineMode::Scheduled,
        }
    }

    pub fn backend(&self) -> &B {
        match self {
            Self::Continuous(e) => e.backend(),
            Self::Scheduled(e) => e.backend(),
        }
    }

    pub fn backend_mut(&mut self) -> &mut B {
        match self {
            Self::Continuous(e) => e.backend_mut(),
            Self::Scheduled(e) => e.backend_mut(),
        }
    }
}

impl<B: AudioBackend> ProximityEngine for LoopEngine<B> {
    type Buffer = B::Buffer;

    fn initialize(&mut self) -> EngineResult<()> {
        match self {
            Self::Continuous(e) => e.initialize(),
            Self::Scheduled(e) => e.initialize(),
        }
    }

    fn load_assets(&mut self, buffers: Vec<B::Buffer>) -> EngineResult<()> {
        match self {
            Self::Continuous(e) => e.load_assets(buffers),
            Self::Scheduled(e) => e.load_assets(buffers),
        }
    }

    fn has_assets(&self) -> bool {
        match self {
            Self::Continuous(e) => e.has_assets(),
            Self::Scheduled(e) => e.has_assets(),
        }
    }

    fn start(&mut self) -> EngineResult<()> {
        match self {
            Self::Continuous(e) => e.start(),
            Self::Scheduled(e) => e.start(),
        }
    }

    fn set_active_level(&mut self, level: Level) -> bool {
        match self {
            Self::Continuous(e) => e.set_active_level(level),
            Self::Scheduled(e) => e.set_active_level(level),
        }
    }

    fn stop(&mut self) {
        match self {
            Self::Continuous(e) => e.stop(),
            Self::Scheduled(e) => e.stop(),
        }
    }

    fn tick(&mut self) {
        match self {
            Self::Continuous(e) => e.tick(),
            Self::Scheduled(e) => e.tick(),
        }
    }

    fn current_level(&self) -> Option<Level> {
        match self {
            Self::Continuous(e) => e.current_level(),
            Self::Scheduled(e) => e.current_level(),
        }
    }

    fn is_playing(&self) -> bool {
        match self {
            Self::Continuous(e) => e.is_playing(),
            Self::Scheduled(e) => e.is_playing(),
        }
    }
}
