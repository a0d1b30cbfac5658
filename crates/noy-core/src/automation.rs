//! Automation timeline for a single audio parameter.
//!
//! Mirrors the audio-param model used by the browser: time-stamped "set" and
//! "linear ramp" events on the audio clock. A ramp interpolates from the
//! previous event (or the anchor) to its own value, and
//! `cancel_scheduled_values(t)` drops every event at or after `t`, including a
//! ramp that is only partly done. Callers that want to continue from the
//! current level must read `value_at(now)` before cancelling.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Set,
    LinearRamp,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AutomationEvent {
    pub time: f64,
    pub value: f32,
    pub kind: EventKind,
}

#[derive(Clone, Debug)]
pub struct ParamTimeline {
    anchor_time: f64,
    anchor_value: f32,
    events: Vec<AutomationEvent>,
}

impl ParamTimeline {
    pub fn new(initial: f32) -> Self {
        Self {
            anchor_time: 0.0,
            anchor_value: initial,
            events: Vec::new(),
        }
    }

    /// Immediate assignment; discards all pending automation.
    pub fn set_value(&mut self, value: f32, now: f64) {
        self.events.clear();
        self.anchor_time = now;
        self.anchor_value = value;
    }

    pub fn set_value_at_time(&mut self, value: f32, time: f64) {
        self.insert(AutomationEvent {
            time,
            value,
            kind: EventKind::Set,
        });
    }

    pub fn linear_ramp_to_value_at_time(&mut self, value: f32, time: f64) {
        self.insert(AutomationEvent {
            time,
            value,
            kind: EventKind::LinearRamp,
        });
    }

    pub fn cancel_scheduled_values(&mut self, from: f64) {
        self.events.retain(|e| e.time < from);
    }

    pub fn value_at(&self, t: f64) -> f32 {
        let mut prev = (self.anchor_time, self.anchor_value);
        for ev in &self.events {
            if ev.time <= t {
                prev = (ev.time, ev.value);
                continue;
            }
            return match ev.kind {
                EventKind::Set => prev.1,
                EventKind::LinearRamp => {
                    let span = ev.time - prev.0;
                    if t <= prev.0 || span <= 0.0 {
                        prev.1
                    } else {
                        let frac = ((t - prev.0) / span) as f32;
                        prev.1 + (ev.value - prev.1) * frac
                    }
                }
            };
        }
        prev.1
    }

    /// Fold every event at or before `t` into the anchor.
    pub fn prune_before(&mut self, t: f64) {
        if let Some(i) = self.events.iter().rposition(|e| e.time <= t) {
            self.anchor_time = self.events[i].time;
            self.anchor_value = self.events[i].value;
            self.events.drain(..=i);
        }
    }

    pub fn events(&self) -> &[AutomationEvent] {
        &self.events
    }

    fn insert(&mut self, ev: AutomationEvent) {
        let at = self
            .events
            .iter()
            .position(|e| e.time > ev.time)
            .unwrap_or(self.events.len());
        self.events.insert(at, ev);
    }
}
