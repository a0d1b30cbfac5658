//! Playfield geometry: viewport, playable rectangle, target placement and
//! pointer nudging. All coordinates are CSS pixels.

use crate::config::GameConfig;
use crate::constants::TARGET_EDGE_GAP;
use glam::Vec2;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn diagonal(&self) -> f32 {
        self.width.hypot(self.height)
    }

    /// Rounded center, the stand-in pointer before any interaction.
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new((self.width / 2.0).round(), (self.height / 2.0).round())
    }

    /// Clamp a point into `[0, width] x [0, height]`.
    #[inline]
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(0.0, self.width.max(0.0)),
            p.y.clamp(0.0, self.height.max(0.0)),
        )
    }
}

/// Rectangle in which a target may be placed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayArea {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl PlayArea {
    /// Viewport minus margins and target padding, pushed below the HUD when
    /// its bottom edge is known.
    pub fn compute(viewport: Viewport, config: &GameConfig, hud_bottom: Option<f32>) -> Self {
        let m = config.play_area.margin;
        let target_pad = TARGET_EDGE_GAP + config.target_size / 2.0;
        let x0 = m + target_pad;
        let mut y0 = m + target_pad;
        let x1 = viewport.width - m - target_pad;
        let y1 = viewport.height - m - target_pad;
        if let Some(bottom) = hud_bottom {
            y0 = y0.max(bottom + config.play_area.hud_padding + target_pad);
        }
        Self {
            x: x0,
            y: y0,
            w: (x1 - x0).max(0.0),
            h: (y1 - y0).max(0.0),
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.x, self.x + self.w),
            p.y.clamp(self.y, self.y + self.h),
        )
    }

    /// Uniform point in the area; a collapsed area still spreads over 1 px.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let u: f32 = rng.gen();
        let v: f32 = rng.gen();
        Vec2::new(u * self.w.max(1.0) + self.x, v * self.h.max(1.0) + self.y)
    }
}

/// Move `pointer` by `delta`, staying inside the viewport.
#[inline]
pub fn nudge(pointer: Vec2, delta: Vec2, viewport: Viewport) -> Vec2 {
    viewport.clamp(pointer + delta)
}
