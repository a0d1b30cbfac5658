use crate::audio::{self, WebAudioBackend};
use crate::constants::{FIELD_ID, HUD_ID, MSG_FOUND, MSG_SEEK, RESTART_BUTTON_ID, START_BUTTON_ID};
use crate::dom;
use crate::input;
use crate::overlay;
use crate::scheduler::SchedulerTimer;
use glam::Vec2;
use noy_core::{
    EngineMode, GameConfig, GameSession, LoopEngine, PointerState, ProximityEngine, StartPrime,
    Viewport,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use web_sys as web;

type Session = GameSession<LoopEngine<WebAudioBackend>>;

/// Page-level state shared by every event handler.
pub struct App {
    pub document: web::Document,
    session: RefCell<Session>,
    timer: RefCell<SchedulerTimer>,
    rng: RefCell<StdRng>,
    starting: Cell<bool>,
}

impl App {
    pub fn new(document: web::Document, config: GameConfig) -> anyhow::Result<Rc<Self>> {
        let (w, h) = dom::viewport_size().ok_or_else(|| anyhow::anyhow!("no viewport size"))?;
        let mut session = GameSession::new(config, Viewport::new(w, h))?;
        session.set_hud_bottom(dom::bottom_of(&document, HUD_ID));
        Ok(Rc::new(Self {
            document,
            session: RefCell::new(session),
            timer: RefCell::new(SchedulerTimer::default()),
            rng: RefCell::new(StdRng::from_entropy()),
            starting: Cell::new(false),
        }))
    }

    /// Create the audio graph on first use and make sure the loops are
    /// loaded. Every failure leaves the game playable without sound.
    async fn ensure_audio(&self) {
        if self.session.borrow().engine().is_none() {
            let backend = match WebAudioBackend::new() {
                Ok(b) => b,
                Err(e) => {
                    log::warn!("[audio] {e}; playing silently");
                    return;
                }
            };
            let mut engine = LoopEngine::from_config(backend, self.session.borrow().config());
            if let Err(e) = engine.initialize() {
                log::warn!("[audio] {e}; playing silently");
                return;
            }
            log::info!("[audio] engine ready, mode={:?}", engine.mode());
            self.session.borrow_mut().attach_engine(engine);
        }

        let (ctx, has_assets, paths) = {
            let s = self.session.borrow();
            let Some(engine) = s.engine() else {
                return;
            };
            (
                engine.backend().context().clone(),
                engine.has_assets(),
                s.config().audio.asset_paths.clone(),
            )
        };
        audio::resume_context(&ctx).await;
        if has_assets {
            return;
        }
        match audio::load_loop_bank(&ctx, &paths).await {
            Ok(buffers) => {
                let mut s = self.session.borrow_mut();
                if let Some(engine) = s.engine_mut() {
                    if let Err(e) = engine.load_assets(buffers) {
                        log::warn!("[audio] {e}; playing silently");
                    }
                }
            }
            Err(e) => log::warn!("[audio] loop load failed (serve files via http(s)): {e}"),
        }
    }

    pub async fn start_round(self: Rc<Self>, prime: StartPrime) {
        if self.starting.replace(true) {
            return;
        }
        self.ensure_audio().await;
        let state = {
            let mut rng = self.rng.borrow_mut();
            self.session.borrow_mut().begin_round(&mut *rng, prime)
        };
        self.starting.set(false);

        let (target, size) = {
            let s = self.session.borrow();
            (s.target(), s.config().target_size)
        };
        overlay::place_target(&self.document, target, size);
        overlay::reset_target(&self.document);
        overlay::set_message(&self.document, MSG_SEEK);
        overlay::hide(&self.document, START_BUTTON_ID);
        overlay::hide(&self.document, RESTART_BUTTON_ID);
        self.show_pointer_state(state);
        self.start_timer();
    }

    fn start_timer(self: &Rc<Self>) {
        let (mode, tick_ms, has_engine) = {
            let s = self.session.borrow();
            let audio = &s.config().audio;
            (audio.mode, audio.scheduler_tick_ms, s.engine().is_some())
        };
        let mut timer = self.timer.borrow_mut();
        if mode != EngineMode::Scheduled || !has_engine {
            timer.stop();
            return;
        }
        let app = Rc::downgrade(self);
        timer.start(tick_ms, move || {
            let Some(app) = app.upgrade() else {
                return;
            };
            if let Ok(mut s) = app.session.try_borrow_mut() {
                s.tick();
            }
        });
    }

    pub fn on_pointer(&self, p: Vec2) {
        let state = self.session.borrow_mut().on_pointer_move(p);
        self.show_pointer_state(state);
    }

    pub fn on_key(&self, ev: &web::KeyboardEvent) {
        let (step, fast) = {
            let s = self.session.borrow();
            (s.config().keyboard_step, s.config().keyboard_step_fast)
        };
        let Some(delta) = input::nudge_for_key(&ev.key(), ev.shift_key(), step, fast) else {
            return;
        };
        let nudged = self.session.borrow_mut().on_keyboard_nudge(delta);
        if let Some(state) = nudged {
            self.show_pointer_state(state);
            ev.prevent_default();
        }
    }

    pub fn on_reveal_click(&self) {
        if !self.session.borrow_mut().try_reveal() {
            return;
        }
        self.timer.borrow_mut().stop();
        overlay::reveal_target(&self.document);
        overlay::set_near(&self.document, FIELD_ID, false);
        overlay::set_message(&self.document, MSG_FOUND);
        overlay::show(&self.document, RESTART_BUTTON_ID);
        log::info!("[click] found");
    }

    pub fn on_resize(&self) {
        let Some((w, h)) = dom::viewport_size() else {
            return;
        };
        let hud = dom::bottom_of(&self.document, HUD_ID);
        let (state, target, size, found) = {
            let mut s = self.session.borrow_mut();
            let state = s.on_resize(Viewport::new(w, h), hud);
            (state, s.target(), s.config().target_size, s.is_found())
        };
        if !found {
            overlay::place_target(&self.document, target, size);
        }
        self.show_pointer_state(state);
    }

    fn show_pointer_state(&self, state: PointerState) {
        let running = self.session.borrow().is_running();
        overlay::set_near(&self.document, FIELD_ID, running && state.near);
    }
}
