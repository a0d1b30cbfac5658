//! Platform-free core of the find-noy game.
//!
//! Everything here runs on the host as well as in the browser: the proximity
//! classifier, the playfield geometry, the loop audio engines (written against
//! the [`AudioBackend`] seam) and the [`GameSession`] that ties them together.
//! Front-ends supply a backend (Web Audio in the browser, the offline
//! [`Mixer`] natively and in tests) and feed pointer events in.

pub mod automation;
pub mod backend;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod mixer;
pub mod proximity;
pub mod session;

pub use automation::ParamTimeline;
pub use backend::{AudioBackend, PlaySpec};
pub use config::{AudioConfig, EngineMode, GameConfig, PlayAreaConfig};
pub use constants::*;
pub use engine::{
    ContinuousEngine, EngineParams, LoopEngine, ProximityEngine, ScheduledEngine,
    ScheduledSegment,
};
pub use error::{ConfigError, EngineError, EngineResult};
pub use geometry::{PlayArea, Viewport};
pub use mixer::{LoopClip, Mixer, SharedMixer};
pub use proximity::{classify, is_near, Breakpoints, Classifier, Level, RingGeometry};
pub use session::{GameSession, PointerState, StartPrime};
