//! The seam between the loop engines and a concrete audio graph.
//!
//! Every call that touches sound is a time-stamped instruction on the
//! backend's own clock (`current_time`, seconds). Nothing here blocks or
//! sleeps; engines compute absolute times and hand them over, so jitter on
//! the calling thread never reaches the output.

use crate::error::EngineResult;

/// How to play one buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaySpec {
    /// Audio-clock start time.
    pub when: f64,
    /// Offset into the buffer at `when`, seconds.
    pub offset: f64,
    /// Loop over `[0, loop_end)` when set.
    pub loop_end: Option<f64>,
}

pub trait AudioBackend {
    /// Handle to a gain stage feeding the master bus.
    type Gain: Clone;
    /// Handle to a playing (or scheduled) buffer source.
    type Source;
    /// Decoded, immutable audio data.
    type Buffer: Clone;

    fn current_time(&self) -> f64;

    /// Create the master bus once; later calls are no-ops.
    fn init_master(&mut self, gain: f32) -> EngineResult<()>;

    /// New gain stage connected to the master bus.
    fn create_gain(&mut self, initial: f32) -> EngineResult<Self::Gain>;

    /// Value the gain is producing right now.
    fn gain_value(&self, gain: &Self::Gain) -> f32;

    fn cancel_scheduled_values(&mut self, gain: &Self::Gain, from: f64);
    fn set_value_at_time(&mut self, gain: &Self::Gain, value: f32, at: f64);
    fn linear_ramp_to_value_at_time(&mut self, gain: &Self::Gain, value: f32, at: f64);

    fn buffer_duration(&self, buffer: &Self::Buffer) -> f64;

    fn play_buffer(
        &mut self,
        buffer: &Self::Buffer,
        gain: &Self::Gain,
        spec: PlaySpec,
    ) -> EngineResult<Self::Source>;

    fn stop_source(&mut self, source: &Self::Source, at: f64);

    fn resume(&mut self) -> EngineResult<()>;
    fn suspend(&mut self);
}
