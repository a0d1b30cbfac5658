//! Distance to discrete loudness level.
//!
//! Distances are normalised against a fraction of the viewport diagonal into a
//! "closeness" value in [0, 1], which five ascending breakpoints cut into six
//! levels. Level 5 is closest. The same classifier feeds the audio engine and
//! any overlay that draws the level rings, so both always agree.

use crate::config::{validate_breakpoints, GameConfig};
use crate::constants::{BREAKPOINT_COUNT, LEVEL_COUNT};
use crate::error::ConfigError;
use crate::geometry::Viewport;

/// Discrete proximity bucket, 0 (far) ..= 5 (closest).
pub type Level = usize;

/// Strictly ascending level boundaries in (0, 1).
#[derive(Clone, Debug, PartialEq)]
pub struct Breakpoints([f32; BREAKPOINT_COUNT]);

impl Breakpoints {
    pub fn new(values: [f32; BREAKPOINT_COUNT]) -> Result<Self, ConfigError> {
        validate_breakpoints(&values)?;
        Ok(Self(values))
    }

    pub fn even() -> Self {
        Self(GameConfig::even_breakpoints())
    }

    pub fn values(&self) -> &[f32; BREAKPOINT_COUNT] {
        &self.0
    }
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self::even()
    }
}

/// Normalised inverse distance, 1 at the target and 0 at or beyond `max_distance`.
#[inline]
pub fn closeness(distance: f32, max_distance: f32) -> f32 {
    if max_distance <= 0.0 {
        return if distance <= 0.0 { 1.0 } else { 0.0 };
    }
    (1.0 - distance / max_distance).clamp(0.0, 1.0)
}

/// Level for `distance` given the viewport diagonal and distance factor.
pub fn classify(
    distance: f32,
    viewport_diagonal: f32,
    distance_factor: f32,
    breakpoints: &Breakpoints,
) -> Level {
    if distance.is_nan() {
        return 0;
    }
    let c = closeness(distance.max(0.0), viewport_diagonal * distance_factor);
    breakpoints
        .0
        .iter()
        .position(|&bp| c < bp)
        .unwrap_or(LEVEL_COUNT - 1)
}

/// Reveal gate, independent of the level scale.
#[inline]
pub fn is_near(distance: f32, reveal_radius: f32) -> bool {
    distance <= reveal_radius
}

/// Ring radii around the target, in px.
#[derive(Clone, Debug, PartialEq)]
pub struct RingGeometry {
    /// Level boundaries, outermost first; sub-pixel rings are dropped.
    pub boundaries: Vec<f32>,
    /// Distance at which closeness reaches 0.
    pub outer: f32,
    pub reveal: f32,
}

#[derive(Clone, Debug)]
pub struct Classifier {
    breakpoints: Breakpoints,
    distance_factor: f32,
    reveal_radius: f32,
}

impl Classifier {
    pub fn new(breakpoints: Breakpoints, distance_factor: f32, reveal_radius: f32) -> Self {
        Self {
            breakpoints,
            distance_factor,
            reveal_radius,
        }
    }

    pub fn from_config(config: &GameConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            Breakpoints::new(config.level_breakpoints)?,
            config.max_distance_factor,
            config.reveal_radius,
        ))
    }

    pub fn breakpoints(&self) -> &Breakpoints {
        &self.breakpoints
    }

    pub fn max_distance(&self, viewport: Viewport) -> f32 {
        viewport.diagonal() * self.distance_factor
    }

    pub fn classify(&self, distance: f32, viewport: Viewport) -> Level {
        classify(
            distance,
            viewport.diagonal(),
            self.distance_factor,
            &self.breakpoints,
        )
    }

    pub fn is_near(&self, distance: f32) -> bool {
        is_near(distance, self.reveal_radius)
    }

    pub fn ring_radii(&self, viewport: Viewport) -> RingGeometry {
        let outer = self.max_distance(viewport);
        let boundaries = self
            .breakpoints
            .0
            .iter()
            .map(|bp| (1.0 - bp) * outer)
            .filter(|r| *r > 0.5)
            .collect();
        RingGeometry {
            boundaries,
            outer,
            reveal: self.reveal_radius,
        }
    }
}
