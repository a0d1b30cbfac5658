//! Error taxonomy for the engine and its configuration.
//!
//! None of these are shown to the player. Audio and asset failures degrade the
//! game to visual-only play; configuration errors are rejected at load time.

/// Errors raised by the audio engines and their backends.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("audio unavailable: {message}")]
    AudioUnavailable { message: String },

    #[error("failed to load loop asset {path}: {message}")]
    AssetLoad { path: String, message: String },

    #[error("loop assets not loaded")]
    AssetsMissing,

    #[error("expected {expected} loop buffers, got {actual}")]
    AssetCount { expected: usize, actual: usize },

    #[error("loop of {loop_sec:.3}s is too short for a {crossfade_sec:.3}s crossfade")]
    LoopTooShort { loop_sec: f64, crossfade_sec: f64 },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Configuration defects, detected by `GameConfig::validate`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("breakpoint {index} = {value} is outside (0, 1)")]
    BreakpointOutOfRange { index: usize, value: f32 },

    #[error("breakpoints must be strictly ascending (index {index})")]
    BreakpointsNotAscending { index: usize },

    #[error("volume {index} = {value} is outside [floor, 1]")]
    VolumeOutOfRange { index: usize, value: f32 },

    #[error("{field} must be positive")]
    NonPositive { field: &'static str },

    #[error("expected {expected} asset paths, got {actual}")]
    AssetPathCount { expected: usize, actual: usize },

    #[error("schedule horizon must exceed the scheduler tick interval")]
    HorizonTooShort,

    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    pub fn audio(msg: impl Into<String>) -> Self {
        Self::AudioUnavailable {
            message: msg.into(),
        }
    }

    pub fn asset(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::AssetLoad {
            path: path.into(),
            message: msg.into(),
        }
    }
}
