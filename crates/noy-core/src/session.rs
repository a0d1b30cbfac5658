//! One game: target, pointer, running flag and the engine they drive.
//!
//! Front-ends own a [`GameSession`] and forward input to it. Every pointer
//! update recomputes the level from scratch; the level is only handed to the
//! engine while a round is running.

use crate::config::GameConfig;
use crate::engine::ProximityEngine;
use crate::error::{ConfigError, EngineError};
use crate::geometry::{nudge, PlayArea, Viewport};
use crate::proximity::{Classifier, Level};
use glam::Vec2;
use rand::Rng;

/// Where the pointer starts when a round begins.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum StartPrime {
    /// Keep the current pointer, or the viewport center if there is none.
    #[default]
    Keep,
    At(Vec2),
}

impl StartPrime {
    /// Synthetic clicks (keyboard activation) report `(0, 0)`; ignore those.
    pub fn from_click(x: f32, y: f32) -> Self {
        if x != 0.0 || y != 0.0 {
            Self::At(Vec2::new(x, y))
        } else {
            Self::Keep
        }
    }
}

/// What the pointer currently sees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    pub level: Level,
    pub distance: f32,
    /// Inside the reveal radius.
    pub near: bool,
}

pub struct GameSession<E: ProximityEngine> {
    config: GameConfig,
    classifier: Classifier,
    viewport: Viewport,
    hud_bottom: Option<f32>,
    target: Vec2,
    pointer: Option<Vec2>,
    running: bool,
    found: bool,
    engine: Option<E>,
}

impl<E: ProximityEngine> GameSession<E> {
    pub fn new(config: GameConfig, viewport: Viewport) -> Result<Self, ConfigError> {
        config.validate()?;
        let classifier = Classifier::from_config(&config)?;
        let target = viewport.center();
        Ok(Self {
            config,
            classifier,
            viewport,
            hud_bottom: None,
            target,
            pointer: None,
            running: false,
            found: false,
            engine: None,
        })
    }

    /// Install the audio engine. Without one the game plays silently.
    pub fn attach_engine(&mut self, engine: E) {
        self.engine = Some(engine);
    }

    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> Option<&mut E> {
        self.engine.as_mut()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    /// Last known pointer, `None` before any interaction.
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Pointer used for distance, falling back to the viewport center.
    pub fn effective_pointer(&self) -> Vec2 {
        self.pointer.unwrap_or_else(|| self.viewport.center())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_found(&self) -> bool {
        self.found
    }

    pub fn play_area(&self) -> PlayArea {
        PlayArea::compute(self.viewport, &self.config, self.hud_bottom)
    }

    pub fn set_hud_bottom(&mut self, bottom: Option<f32>) {
        self.hud_bottom = bottom;
    }

    pub fn pointer_state(&self) -> PointerState {
        let distance = self.effective_pointer().distance(self.target);
        PointerState {
            level: self.classifier.classify(distance, self.viewport),
            distance,
            near: self.classifier.is_near(distance),
        }
    }

    /// Start a round: seed the pointer, (re)start the engine, hide a new
    /// target and make the first level audible.
    pub fn begin_round<R: Rng + ?Sized>(&mut self, rng: &mut R, prime: StartPrime) -> PointerState {
        match prime {
            StartPrime::At(p) => self.pointer = Some(p),
            StartPrime::Keep => {
                if self.pointer.is_none() {
                    self.pointer = Some(self.viewport.center());
                }
            }
        }

        if let Some(engine) = self.engine.as_mut() {
            match engine.start() {
                Ok(()) => {}
                Err(EngineError::AssetsMissing) => {
                    log::warn!("[session] no loops loaded, playing silently");
                }
                Err(e) => log::warn!("[session] audio start failed, playing silently: {e}"),
            }
        }

        self.target = self.play_area().random_point(rng);
        self.running = true;
        self.found = false;
        log::info!(
            "[session] round started, target at ({:.0}, {:.0})",
            self.target.x,
            self.target.y
        );
        self.sync_level()
    }

    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) -> PointerState {
        self.begin_round(rng, StartPrime::Keep)
    }

    pub fn on_pointer_move(&mut self, p: Vec2) -> PointerState {
        self.pointer = Some(p);
        self.sync_level()
    }

    /// Arrow-key movement; ignored outside a round.
    pub fn on_keyboard_nudge(&mut self, delta: Vec2) -> Option<PointerState> {
        if !self.running {
            return None;
        }
        self.pointer = Some(nudge(self.effective_pointer(), delta, self.viewport));
        Some(self.sync_level())
    }

    pub fn on_target_placed(&mut self, p: Vec2) -> PointerState {
        self.target = p;
        self.sync_level()
    }

    /// New viewport size. The target is pulled back inside the play area.
    pub fn on_resize(&mut self, viewport: Viewport, hud_bottom: Option<f32>) -> PointerState {
        self.viewport = viewport;
        self.hud_bottom = hud_bottom;
        self.target = self.play_area().clamp(self.target);
        self.sync_level()
    }

    /// Click while running: wins when the pointer is inside the reveal radius.
    pub fn try_reveal(&mut self) -> bool {
        if !self.running || !self.pointer_state().near {
            return false;
        }
        self.running = false;
        self.found = true;
        if let Some(engine) = self.engine.as_mut() {
            engine.stop();
        }
        log::info!("[session] found");
        true
    }

    /// End the round without a win.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        if let Some(engine) = self.engine.as_mut() {
            engine.stop();
        }
    }

    /// Scheduler wake-up, forwarded while running.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.tick();
        }
    }

    fn sync_level(&mut self) -> PointerState {
        let state = self.pointer_state();
        if self.running {
            if let Some(engine) = self.engine.as_mut() {
                engine.set_active_level(state.level);
                // Fill the horizon right away so the first segment after a
                // start does not wait for the timer.
                engine.tick();
            }
        }
        state
    }
}
