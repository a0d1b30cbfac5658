use super::{ramp_gain, EngineParams, LoopBank, ProximityEngine};
use crate::backend::{AudioBackend, PlaySpec};
use crate::constants::LEVEL_COUNT;
use crate::error::{EngineError, EngineResult};
use crate::proximity::Level;

/// Six phase-aligned loops playing forever, one gain bus each.
///
/// Only the gain envelopes change after `start`. Every level switch ramps all
/// six buses at once: the selected one towards its volume, the rest towards
/// the floor.
pub struct ContinuousEngine<B: AudioBackend> {
    backend: B,
    params: EngineParams,
    bank: Option<LoopBank<B::Buffer>>,
    level_gains: Vec<B::Gain>,
    level_sources: Vec<B::Source>,
    current_level: Option<Level>,
    playing: bool,
}

impl<B: AudioBackend> ContinuousEngine<B> {
    pub fn new(backend: B, params: EngineParams) -> Self {
        Self {
            backend,
            params,
            bank: None,
            level_gains: Vec::new(),
            level_sources: Vec::new(),
            current_level: None,
            playing: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn level_gain(&self, level: Level) -> Option<&B::Gain> {
        self.level_gains.get(level)
    }

    pub fn loop_duration(&self) -> Option<f64> {
        self.bank.as_ref().map(|b| b.loop_sec)
    }

    fn stop_sources(&mut self, at: f64) {
        for src in self.level_sources.drain(..) {
            self.backend.stop_source(&src, at);
        }
    }
}

impl<B: AudioBackend> ProximityEngine for ContinuousEngine<B> {
    type Buffer = B::Buffer;

    fn initialize(&mut self) -> EngineResult<()> {
        if self.level_gains.len() == LEVEL_COUNT {
            return Ok(());
        }
        self.backend.init_master(self.params.master_gain)?;
        let mut gains = Vec::with_capacity(LEVEL_COUNT);
        for _ in 0..LEVEL_COUNT {
            gains.push(self.backend.create_gain(self.params.floor_gain)?);
        }
        self.level_gains = gains;
        Ok(())
    }

    fn load_assets(&mut self, buffers: Vec<B::Buffer>) -> EngineResult<()> {
        if self.bank.is_some() {
            return Ok(());
        }
        let bank = LoopBank::new(&self.backend, buffers, self.params.crossfade_sec)?;
        log::info!("[audio] loop bank ready, loop={:.3}s", bank.loop_sec);
        self.bank = Some(bank);
        Ok(())
    }

    fn has_assets(&self) -> bool {
        self.bank.is_some()
    }

    fn start(&mut self) -> EngineResult<()> {
        self.initialize()?;
        let Some(bank) = &self.bank else {
            return Err(EngineError::AssetsMissing);
        };
        let loop_sec = bank.loop_sec;
        let buffers = bank.buffers.clone();
        self.backend.resume()?;

        // Old sources must be gone before the new set starts.
        let now = self.backend.current_time();
        self.stop_sources(now);
        for g in &self.level_gains {
            self.backend.cancel_scheduled_values(g, now);
            self.backend.set_value_at_time(g, self.params.floor_gain, now);
        }

        let start_t = now + self.params.start_delay_sec;
        for (buffer, gain) in buffers.iter().zip(&self.level_gains) {
            let src = self.backend.play_buffer(
                buffer,
                gain,
                PlaySpec {
                    when: start_t,
                    offset: 0.0,
                    loop_end: Some(loop_sec),
                },
            )?;
            self.level_sources.push(src);
        }
        self.current_level = None;
        self.playing = true;
        log::info!("[audio] continuous loops start at t={start_t:.3}");
        Ok(())
    }

    fn set_active_level(&mut self, level: Level) -> bool {
        if level >= LEVEL_COUNT {
            log::warn!("[audio] ignoring out-of-range level {level}");
            return false;
        }
        if !self.playing || self.current_level == Some(level) {
            return false;
        }
        let now = self.backend.current_time();
        for (i, g) in self.level_gains.iter().enumerate() {
            let target = if i == level {
                self.params.volume(i)
            } else {
                self.params.floor_gain
            };
            ramp_gain(&mut self.backend, g, target, now, self.params.crossfade_sec);
        }
        log::debug!("[audio] level {:?} -> {}", self.current_level, level);
        self.current_level = Some(level);
        true
    }

    fn stop(&mut self) {
        if self.level_gains.is_empty() {
            return;
        }
        let now = self.backend.current_time();
        let fade_end = now + self.params.crossfade_sec;
        for g in &self.level_gains {
            ramp_gain(
                &mut self.backend,
                g,
                self.params.floor_gain,
                now,
                self.params.crossfade_sec,
            );
        }
        self.stop_sources(fade_end);
        self.current_level = None;
        self.playing = false;
        self.backend.suspend();
        log::info!("[audio] continuous loops stopped");
    }

    fn current_level(&self) -> Option<Level> {
        self.current_level
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}
