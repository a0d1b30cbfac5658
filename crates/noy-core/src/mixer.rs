//! Offline software audio graph.
//!
//! [`Mixer`] implements [`AudioBackend`] entirely in Rust: gain stages are
//! [`ParamTimeline`]s, sources are (optionally looping) mono clips, and the
//! clock only moves when output is rendered (or when a test calls
//! [`Mixer::advance`]). The native front-end renders it from the cpal
//! callback through [`SharedMixer`]; tests drive it directly.

use crate::automation::ParamTimeline;
use crate::backend::{AudioBackend, PlaySpec};
use crate::error::{EngineError, EngineResult};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const WINDOW_HISTORY_LEN: usize = 256;

/// Mono sample data with its sample rate.
#[derive(Clone, Debug)]
pub struct LoopClip {
    samples: Arc<[f32]>,
    sample_rate: u32,
}

impl LoopClip {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples: samples.into(),
            sample_rate: sample_rate.max(1),
        }
    }

    /// Average interleaved channels down to mono.
    pub fn from_interleaved(data: &[f32], channels: usize, sample_rate: u32) -> Self {
        let channels = channels.max(1);
        let mono = data
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect();
        Self::new(mono, sample_rate)
    }

    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Linearly interpolated sample at `pos` seconds; wraps for the
    /// interpolation partner so loop seams stay continuous.
    fn sample_at(&self, pos: f64) -> f32 {
        let len = self.samples.len();
        if len == 0 || pos < 0.0 {
            return 0.0;
        }
        let idx = pos * self.sample_rate as f64;
        let i0 = idx.floor() as usize;
        if i0 >= len {
            return 0.0;
        }
        let frac = (idx - i0 as f64) as f32;
        let s0 = self.samples[i0];
        let s1 = self.samples[(i0 + 1) % len];
        s0 + (s1 - s0) * frac
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GainId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceId(u64);

/// Time window during which a source may sound.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceWindow {
    pub id: SourceId,
    pub gain: GainId,
    pub start: f64,
    pub stop: Option<f64>,
}

struct ActiveSource {
    id: SourceId,
    clip: LoopClip,
    gain: GainId,
    spec: PlaySpec,
    stop_at: Option<f64>,
}

impl ActiveSource {
    fn sample(&self, t: f64) -> f32 {
        if t < self.spec.when || self.stop_at.is_some_and(|s| t >= s) {
            return 0.0;
        }
        let mut pos = self.spec.offset + (t - self.spec.when);
        match self.spec.loop_end {
            Some(end) if end > 0.0 => {
                if pos >= end {
                    pos %= end;
                }
            }
            _ => {
                if pos >= self.clip.duration() {
                    return 0.0;
                }
            }
        }
        self.clip.sample_at(pos)
    }

    fn finished(&self, now: f64) -> bool {
        if self.stop_at.is_some_and(|s| s <= now) {
            return true;
        }
        self.spec.loop_end.is_none()
            && now >= self.spec.when + self.clip.duration() - self.spec.offset
    }
}

pub struct Mixer {
    sample_rate: u32,
    frames: u64,
    suspended: bool,
    master: Option<ParamTimeline>,
    gains: Vec<ParamTimeline>,
    sources: Vec<ActiveSource>,
    next_source: u64,
    windows: Vec<SourceWindow>,
    automation_calls: usize,
}

impl Mixer {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate.max(1),
            frames: 0,
            suspended: false,
            master: None,
            gains: Vec::new(),
            sources: Vec::new(),
            next_source: 0,
            windows: Vec::new(),
            automation_calls: 0,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Gain value at an arbitrary clock time.
    pub fn gain_at(&self, gain: GainId, t: f64) -> f32 {
        self.gains.get(gain.0).map_or(0.0, |p| p.value_at(t))
    }

    /// Count of set/ramp/cancel instructions received so far.
    pub fn automation_calls(&self) -> usize {
        self.automation_calls
    }

    pub fn active_sources(&self) -> usize {
        self.sources.len()
    }

    /// Recent source windows, oldest first.
    pub fn windows(&self) -> &[SourceWindow] {
        &self.windows
    }

    /// Move the clock forward without producing output.
    pub fn advance(&mut self, secs: f64) {
        if self.suspended || secs <= 0.0 {
            return;
        }
        self.frames += (secs * self.sample_rate as f64).round() as u64;
        self.housekeep();
    }

    /// Mix into interleaved `out`, duplicating the mono mix to every channel.
    pub fn render(&mut self, out: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        if self.suspended {
            out.fill(0.0);
            return;
        }
        let sr = self.sample_rate as f64;
        let n_frames = out.len() / channels;
        for (f, frame) in out.chunks_mut(channels).enumerate() {
            let t = (self.frames + f as u64) as f64 / sr;
            let mut acc = 0.0f32;
            for src in &self.sources {
                let s = src.sample(t);
                if s != 0.0 {
                    acc += s * self.gain_at(src.gain, t);
                }
            }
            let master = self.master.as_ref().map_or(0.0, |m| m.value_at(t));
            frame.fill(acc * master);
        }
        self.frames += n_frames as u64;
        self.housekeep();
    }

    fn housekeep(&mut self) {
        let now = self.current_time();
        self.sources.retain(|s| !s.finished(now));
        for g in &mut self.gains {
            g.prune_before(now);
        }
        if let Some(m) = &mut self.master {
            m.prune_before(now);
        }
    }

    fn timeline(&mut self, gain: &GainId) -> Option<&mut ParamTimeline> {
        self.automation_calls += 1;
        self.gains.get_mut(gain.0)
    }
}

impl AudioBackend for Mixer {
    type Gain = GainId;
    type Source = SourceId;
    type Buffer = LoopClip;

    fn current_time(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }

    fn init_master(&mut self, gain: f32) -> EngineResult<()> {
        if self.master.is_none() {
            self.master = Some(ParamTimeline::new(gain));
        }
        Ok(())
    }

    fn create_gain(&mut self, initial: f32) -> EngineResult<GainId> {
        if self.master.is_none() {
            return Err(EngineError::audio("master bus not initialised"));
        }
        let mut p = ParamTimeline::new(initial);
        p.set_value(initial, self.current_time());
        self.gains.push(p);
        Ok(GainId(self.gains.len() - 1))
    }

    fn gain_value(&self, gain: &GainId) -> f32 {
        self.gain_at(*gain, self.current_time())
    }

    fn cancel_scheduled_values(&mut self, gain: &GainId, from: f64) {
        if let Some(p) = self.timeline(gain) {
            p.cancel_scheduled_values(from);
        }
    }

    fn set_value_at_time(&mut self, gain: &GainId, value: f32, at: f64) {
        if let Some(p) = self.timeline(gain) {
            p.set_value_at_time(value, at);
        }
    }

    fn linear_ramp_to_value_at_time(&mut self, gain: &GainId, value: f32, at: f64) {
        if let Some(p) = self.timeline(gain) {
            p.linear_ramp_to_value_at_time(value, at);
        }
    }

    fn buffer_duration(&self, buffer: &LoopClip) -> f64 {
        buffer.duration()
    }

    fn play_buffer(
        &mut self,
        buffer: &LoopClip,
        gain: &GainId,
        spec: PlaySpec,
    ) -> EngineResult<SourceId> {
        if gain.0 >= self.gains.len() {
            return Err(EngineError::audio("unknown gain stage"));
        }
        let id = SourceId(self.next_source);
        self.next_source += 1;
        self.sources.push(ActiveSource {
            id,
            clip: buffer.clone(),
            gain: *gain,
            spec,
            stop_at: None,
        });
        if self.windows.len() == WINDOW_HISTORY_LEN {
            self.windows.remove(0);
        }
        self.windows.push(SourceWindow {
            id,
            gain: *gain,
            start: spec.when,
            stop: None,
        });
        Ok(id)
    }

    fn stop_source(&mut self, source: &SourceId, at: f64) {
        if let Some(s) = self.sources.iter_mut().find(|s| s.id == *source) {
            s.stop_at = Some(s.stop_at.map_or(at, |prev| prev.min(at)));
        }
        if let Some(w) = self.windows.iter_mut().rev().find(|w| w.id == *source) {
            w.stop = Some(w.stop.map_or(at, |prev| prev.min(at)));
        }
    }

    fn resume(&mut self) -> EngineResult<()> {
        self.suspended = false;
        Ok(())
    }

    fn suspend(&mut self) {
        self.suspended = true;
    }
}

/// A [`Mixer`] shared between the control thread and the audio callback.
#[derive(Clone)]
pub struct SharedMixer(Arc<Mutex<Mixer>>);

impl SharedMixer {
    pub fn new(mixer: Mixer) -> Self {
        Self(Arc::new(Mutex::new(mixer)))
    }

    pub fn lock(&self) -> MutexGuard<'_, Mixer> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn render(&self, out: &mut [f32], channels: usize) {
        self.lock().render(out, channels);
    }
}

impl AudioBackend for SharedMixer {
    type Gain = GainId;
    type Source = SourceId;
    type Buffer = LoopClip;

    fn current_time(&self) -> f64 {
        self.lock().current_time()
    }

    fn init_master(&mut self, gain: f32) -> EngineResult<()> {
        self.lock().init_master(gain)
    }

    fn create_gain(&mut self, initial: f32) -> EngineResult<GainId> {
        self.lock().create_gain(initial)
    }

    fn gain_value(&self, gain: &GainId) -> f32 {
        self.lock().gain_value(gain)
    }

    fn cancel_scheduled_values(&mut self, gain: &GainId, from: f64) {
        self.lock().cancel_scheduled_values(gain, from)
    }

    fn set_value_at_time(&mut self, gain: &GainId, value: f32, at: f64) {
        self.lock().set_value_at_time(gain, value, at)
    }

    fn linear_ramp_to_value_at_time(&mut self, gain: &GainId, value: f32, at: f64) {
        self.lock().linear_ramp_to_value_at_time(gain, value, at)
    }

    fn buffer_duration(&self, buffer: &LoopClip) -> f64 {
        buffer.duration()
    }

    fn play_buffer(
        &mut self,
        buffer: &LoopClip,
        gain: &GainId,
        spec: PlaySpec,
    ) -> EngineResult<SourceId> {
        self.lock().play_buffer(buffer, gain, spec)
    }

    fn stop_source(&mut self, source: &SourceId, at: f64) {
        self.lock().stop_source(source, at)
    }

    fn resume(&mut self) -> EngineResult<()> {
        self.lock().resume()
    }

    fn suspend(&mut self) {
        self.lock().suspend()
    }
}
