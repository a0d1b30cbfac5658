use super::{ramp_gain, EngineParams, LoopBank, ProximityEngine};
use crate::backend::{AudioBackend, PlaySpec};
use crate::constants::{LEVEL_COUNT, SCHEDULED_VOICES, SEGMENT_HISTORY_LEN};
use crate::error::{EngineError, EngineResult};
use crate::proximity::Level;
use std::collections::VecDeque;

/// One loop iteration programmed onto a voice.
///
/// The source starts one crossfade before `boundary`, reading the tail of the
/// loop so that it wraps to offset 0 exactly on the boundary. The envelope
/// fades in over `[start, boundary]`, sustains, and fades out over
/// `[fade_out_at, stop]`, where `stop` is the next boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduledSegment {
    pub level: Level,
    pub voice: usize,
    pub start: f64,
    pub boundary: f64,
    pub fade_out_at: f64,
    pub stop: f64,
}

struct Voice<B: AudioBackend> {
    gain: B::Gain,
    /// Sources not yet past their stop time, with that time.
    pending: VecDeque<(B::Source, f64)>,
}

/// Lookahead scheduler over two alternating voices.
///
/// `tick` is expected every few tens of milliseconds. Each call fills the
/// horizon with any segments whose fade-in begins before `now + horizon`,
/// using the level desired at that moment. Consecutive segments overlap by
/// exactly one crossfade; segments on the same voice never overlap as long
/// as the loop is longer than two crossfades, which `load_assets` enforces.
pub struct ScheduledEngine<B: AudioBackend> {
    backend: B,
    params: EngineParams,
    bank: Option<LoopBank<B::Buffer>>,
    voices: Vec<Voice<B>>,
    next_voice: usize,
    next_boundary: Option<f64>,
    desired_level: Option<Level>,
    history: VecDeque<ScheduledSegment>,
    playing: bool,
}

impl<B: AudioBackend> ScheduledEngine<B> {
    pub fn new(backend: B, params: EngineParams) -> Self {
        Self {
            backend,
            params,
            bank: None,
            voices: Vec::new(),
            next_voice: 0,
            next_boundary: None,
            desired_level: None,
            history: VecDeque::with_capacity(SEGMENT_HISTORY_LEN),
            playing: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn voice_gain(&self, voice: usize) -> Option<&B::Gain> {
        self.voices.get(voice).map(|v| &v.gain)
    }

    pub fn loop_duration(&self) -> Option<f64> {
        self.bank.as_ref().map(|b| b.loop_sec)
    }

    pub fn next_boundary(&self) -> Option<f64> {
        self.next_boundary
    }

    /// Most recent segments, oldest first.
    pub fn segments(&self) -> impl Iterator<Item = &ScheduledSegment> {
        self.history.iter()
    }

    /// Fill the horizon ahead of `now`. Returns how many segments were added.
    pub fn schedule_if_needed(&mut self, now: f64) -> usize {
        if !self.playing || self.desired_level.is_none() {
            return 0;
        }
        let (Some(mut boundary), Some(loop_sec)) = (self.next_boundary, self.loop_duration())
        else {
            return 0;
        };
        let xfade = self.params.crossfade_sec;

        for v in &mut self.voices {
            while v.pending.front().is_some_and(|(_, stop)| *stop <= now) {
                v.pending.pop_front();
            }
        }

        // A starved timer (background tab) must not schedule into the past;
        // skip whole loops so the boundary grid stays intact.
        if boundary - xfade < now {
            let behind = ((now - (boundary - xfade)) / loop_sec).ceil();
            boundary += behind * loop_sec;
            log::warn!("[audio] scheduler fell behind, skipped {behind} loop(s)");
        }

        let mut added = 0;
        while boundary - xfade <= now + self.params.schedule_horizon_sec {
            self.schedule_segment(boundary, loop_sec);
            boundary += loop_sec;
            added += 1;
        }
        self.next_boundary = Some(boundary);
        added
    }

    fn schedule_segment(&mut self, boundary: f64, loop_sec: f64) {
        let voice_idx = self.next_voice;
        self.next_voice = (self.next_voice + 1) % SCHEDULED_VOICES;
        let Some(level) = self.desired_level else {
            return;
        };
        let Some(buffer) = self.bank.as_ref().map(|b| b.buffers[level].clone()) else {
            return;
        };

        let xfade = self.params.crossfade_sec;
        let floor = self.params.floor_gain;
        let volume = self.params.volume(level);
        let segment = ScheduledSegment {
            level,
            voice: voice_idx,
            start: boundary - xfade,
            boundary,
            fade_out_at: boundary + loop_sec - xfade,
            stop: boundary + loop_sec,
        };

        let voice = &mut self.voices[voice_idx];
        let gain = &voice.gain;
        self.backend.set_value_at_time(gain, floor, segment.start);
        self.backend
            .linear_ramp_to_value_at_time(gain, volume, segment.boundary);
        self.backend
            .set_value_at_time(gain, volume, segment.fade_out_at);
        self.backend
            .linear_ramp_to_value_at_time(gain, floor, segment.stop);

        let played = self.backend.play_buffer(
            &buffer,
            gain,
            PlaySpec {
                when: segment.start,
                offset: loop_sec - xfade,
                loop_end: Some(loop_sec),
            },
        );
        match played {
            Ok(src) => {
                self.backend.stop_source(&src, segment.stop);
                voice.pending.push_back((src, segment.stop));
            }
            Err(e) => {
                log::warn!("[audio] segment at t={boundary:.3} not scheduled: {e}");
                return;
            }
        }

        log::debug!(
            "[audio] segment level={} voice={} boundary={:.3}",
            level,
            voice_idx,
            boundary
        );
        if self.history.len() == SEGMENT_HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(segment);
    }

    /// Stop every pending source at `at` and pin the voices to the floor.
    fn release_voices(&mut self, now: f64, at: f64) {
        for v in &mut self.voices {
            ramp_gain(
                &mut self.backend,
                &v.gain,
                self.params.floor_gain,
                now,
                at - now,
            );
            for (src, _) in v.pending.drain(..) {
                self.backend.stop_source(&src, at);
            }
        }
    }
}

impl<B: AudioBackend> ProximityEngine for ScheduledEngine<B> {
    type Buffer = B::Buffer;

    fn initialize(&mut self) -> EngineResult<()> {
        if self.voices.len() == SCHEDULED_VOICES {
            return Ok(());
        }
        self.backend.init_master(self.params.master_gain)?;
        let mut voices = Vec::with_capacity(SCHEDULED_VOICES);
        for _ in 0..SCHEDULED_VOICES {
            voices.push(Voice {
                gain: self.backend.create_gain(self.params.floor_gain)?,
                pending: VecDeque::new(),
            });
        }
        self.voices = voices;
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
        if self.bank.is_none() {
            return Err(EngineError::AssetsMissing);
        }
        self.backend.resume()?;

        // Cut the previous stream before the new one is established.
        let now = self.backend.current_time();
        for v in &mut self.voices {
            for (src, _) in v.pending.drain(..) {
                self.backend.stop_source(&src, now);
            }
            self.backend.cancel_scheduled_values(&v.gain, now);
            self.backend
                .set_value_at_time(&v.gain, self.params.floor_gain, now);
        }
        self.history.clear();
        self.next_voice = 0;
        self.desired_level = None;
        let first = now + self.params.start_delay_sec + self.params.crossfade_sec;
        self.next_boundary = Some(first);
        self.playing = true;
        log::info!("[audio] scheduler start, first boundary at t={first:.3}");
        Ok(())
    }

    fn set_active_level(&mut self, level: Level) -> bool {
        if level >= LEVEL_COUNT {
            log::warn!("[audio] ignoring out-of-range level {level}");
            return false;
        }
        if !self.playing || self.desired_level == Some(level) {
            return false;
        }
        log::debug!("[audio] desired level {:?} -> {}", self.desired_level, level);
        self.desired_level = Some(level);
        true
    }

    fn stop(&mut self) {
        if self.voices.is_empty() {
            return;
        }
        let now = self.backend.current_time();
        self.release_voices(now, now + self.params.crossfade_sec);
        self.playing = false;
        self.desired_level = None;
        self.next_boundary = None;
        self.backend.suspend();
        log::info!("[audio] scheduler stopped");
    }

    fn tick(&mut self) {
        let now = self.backend.current_time();
        self.schedule_if_needed(now);
    }

    /// The level the next unscheduled segment will be programmed with.
    /// Segments already inside the horizon keep the level they were given.
    fn current_level(&self) -> Option<Level> {
        self.desired_level
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}
