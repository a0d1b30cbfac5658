// Game session flow with a recording engine and with the real engines.

use glam::Vec2;
use noy_core::{
    EngineError, EngineMode, EngineResult, GameConfig, GameSession, Level, LoopClip, LoopEngine,
    Mixer, ProximityEngine, StartPrime, Viewport, LEVEL_COUNT,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Default)]
struct Recorder {
    assets: bool,
    playing: bool,
    current: Option<Level>,
    starts: usize,
    stops: usize,
    ticks: usize,
    levels: Vec<Level>,
}

impl ProximityEngine for Recorder {
    type Buffer = ();

    fn initialize(&mut self) -> EngineResult<()> {
        Ok(())
    }

    fn load_assets(&mut self, buffers: Vec<()>) -> EngineResult<()> {
        self.assets = buffers.len() == LEVEL_COUNT;
        Ok(())
    }

    fn has_assets(&self) -> bool {
        self.assets
    }

    fn start(&mut self) -> EngineResult<()> {
        if !self.assets {
            return Err(EngineError::AssetsMissing);
        }
        self.starts += 1;
        self.playing = true;
        self.current = None;
        Ok(())
    }

    fn set_active_level(&mut self, level: Level) -> bool {
        if !self.playing || self.current == Some(level) {
            return false;
        }
        self.current = Some(level);
        self.levels.push(level);
        true
    }

    fn stop(&mut self) {
        self.stops += 1;
        self.playing = false;
        self.current = None;
    }

    fn tick(&mut self) {
        self.ticks += 1;
    }

    fn current_level(&self) -> Option<Level> {
        self.current
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

fn session() -> GameSession<Recorder> {
    let mut s = GameSession::new(GameConfig::default(), Viewport::new(1000.0, 800.0)).unwrap();
    let mut engine = Recorder::default();
    engine.load_assets(vec![(); LEVEL_COUNT]).unwrap();
    s.attach_engine(engine);
    s
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

#[test]
fn pointer_falls_back_to_viewport_center() {
    let s = session();
    assert_eq!(s.pointer(), None);
    assert_eq!(s.effective_pointer(), Vec2::new(500.0, 400.0));
}

#[test]
fn begin_round_places_target_inside_play_area() {
    let mut s = session();
    let mut rng = rng();
    for _ in 0..50 {
        s.begin_round(&mut rng, StartPrime::Keep);
        let area = s.play_area();
        assert!(area.contains(s.target()), "{:?} outside {:?}", s.target(), area);
    }
}

#[test]
fn begin_round_primes_pointer_and_sets_first_level() {
    let mut s = session();
    let state = s.begin_round(&mut rng(), StartPrime::from_click(120.0, 90.0));
    assert!(s.is_running());
    assert_eq!(s.pointer(), Some(Vec2::new(120.0, 90.0)));
    let engine = s.engine().unwrap();
    assert_eq!(engine.starts, 1);
    assert_eq!(engine.levels, vec![state.level]);
}

#[test]
fn synthetic_click_keeps_existing_pointer() {
    let mut s = session();
    s.on_pointer_move(Vec2::new(10.0, 20.0));
    s.begin_round(&mut rng(), StartPrime::from_click(0.0, 0.0));
    assert_eq!(s.pointer(), Some(Vec2::new(10.0, 20.0)));

    let mut fresh = session();
    fresh.begin_round(&mut rng(), StartPrime::from_click(0.0, 0.0));
    assert_eq!(fresh.pointer(), Some(Vec2::new(500.0, 400.0)));
}

#[test]
fn levels_reach_the_engine_only_while_running() {
    let mut s = session();
    s.on_target_placed(Vec2::new(300.0, 300.0));
    s.on_pointer_move(Vec2::new(300.0, 300.0));
    assert!(s.engine().unwrap().levels.is_empty());

    s.begin_round(&mut rng(), StartPrime::Keep);
    s.on_target_placed(Vec2::new(300.0, 300.0));
    let state = s.on_pointer_move(Vec2::new(300.0, 300.0));
    assert_eq!(state.level, 5);
    assert_eq!(state.distance, 0.0);
    assert!(state.near);
    assert_eq!(s.engine().unwrap().current, Some(5));
}

#[test]
fn keyboard_nudge_moves_and_clamps() {
    let mut s = session();
    assert!(s.on_keyboard_nudge(Vec2::new(6.0, 0.0)).is_none());

    s.begin_round(&mut rng(), StartPrime::At(Vec2::new(995.0, 4.0)));
    s.on_keyboard_nudge(Vec2::new(12.0, -12.0)).unwrap();
    assert_eq!(s.pointer(), Some(Vec2::new(1000.0, 0.0)));
    s.on_keyboard_nudge(Vec2::new(-6.0, 6.0)).unwrap();
    assert_eq!(s.pointer(), Some(Vec2::new(994.0, 6.0)));
}

#[test]
fn reveal_requires_the_reveal_radius() {
    let mut s = session();
    s.begin_round(&mut rng(), StartPrime::Keep);
    let t = s.target();

    s.on_pointer_move(t + Vec2::new(16.0, 0.0));
    assert!(!s.try_reveal());
    assert!(s.is_running());

    s.on_pointer_move(t + Vec2::new(8.0, 11.0));
    assert!(s.try_reveal());
    assert!(!s.is_running());
    assert!(s.is_found());
    assert_eq!(s.engine().unwrap().stops, 1);

    // a second click after the win does nothing
    assert!(!s.try_reveal());
    assert_eq!(s.engine().unwrap().stops, 1);
}

#[test]
fn restart_forces_a_new_level_ramp() {
    let mut s = session();
    let mut rng = rng();
    s.begin_round(&mut rng, StartPrime::Keep);
    let t = s.target();
    s.on_pointer_move(t);
    assert!(s.try_reveal());

    s.restart(&mut rng);
    let engine = s.engine().unwrap();
    assert_eq!(engine.starts, 2);
    assert!(engine.current.is_some());
    assert!(s.is_running());
    assert!(!s.is_found());
}

#[test]
fn resize_pulls_target_back_inside() {
    let mut s = session();
    s.begin_round(&mut rng(), StartPrime::Keep);
    s.on_target_placed(Vec2::new(900.0, 700.0));
    s.on_resize(Viewport::new(400.0, 300.0), Some(40.0));
    let area = s.play_area();
    assert!(area.contains(s.target()));
    assert_eq!(s.target().x, area.x + area.w);
    assert_eq!(s.target().y, area.y + area.h);
}

#[test]
fn silent_mode_without_engine_or_assets() {
    let mut bare: GameSession<Recorder> =
        GameSession::new(GameConfig::default(), Viewport::new(800.0, 600.0)).unwrap();
    let state = bare.begin_round(&mut rng(), StartPrime::Keep);
    assert!(bare.is_running());
    assert!(state.level <= 5);

    let mut s = GameSession::new(GameConfig::default(), Viewport::new(800.0, 600.0)).unwrap();
    s.attach_engine(Recorder::default());
    s.begin_round(&mut rng(), StartPrime::Keep);
    assert!(s.is_running());
    assert_eq!(s.engine().unwrap().starts, 0);
    assert!(s.engine().unwrap().levels.is_empty());
}

#[test]
fn ticks_only_while_running() {
    let mut s = session();
    s.tick();
    assert_eq!(s.engine().unwrap().ticks, 0);
    s.begin_round(&mut rng(), StartPrime::Keep);
    let before = s.engine().unwrap().ticks;
    s.tick();
    assert_eq!(s.engine().unwrap().ticks, before + 1);
    s.stop();
    s.tick();
    assert_eq!(s.engine().unwrap().ticks, before + 1);
}

#[test]
fn invalid_config_is_rejected() {
    let mut cfg = GameConfig::default();
    cfg.level_breakpoints = [0.5, 0.4, 0.6, 0.7, 0.8];
    assert!(GameSession::<Recorder>::new(cfg, Viewport::new(800.0, 600.0)).is_err());
}

fn mixer_bank() -> Vec<LoopClip> {
    (0..LEVEL_COUNT)
        .map(|_| LoopClip::new(vec![0.25; 4000], 8000))
        .collect()
}

#[test]
fn scheduled_engine_is_fed_on_round_start() {
    let cfg = GameConfig::default();
    assert_eq!(cfg.audio.mode, EngineMode::Scheduled);
    let mut engine = LoopEngine::from_config(Mixer::new(8000), &cfg);
    engine.load_assets(mixer_bank()).unwrap();

    let mut s = GameSession::new(cfg, Viewport::new(1000.0, 800.0)).unwrap();
    s.attach_engine(engine);
    let state = s.begin_round(&mut rng(), StartPrime::Keep);

    let LoopEngine::Scheduled(inner) = s.engine().unwrap() else {
        panic!("expected the scheduled engine");
    };
    let first = inner.segments().next().expect("first segment programmed on start");
    assert_eq!(first.level, state.level);
}

#[test]
fn continuous_engine_follows_the_pointer() {
    let mut cfg = GameConfig::default();
    cfg.audio.mode = EngineMode::Continuous;
    let mut engine = LoopEngine::from_config(Mixer::new(8000), &cfg);
    engine.load_assets(mixer_bank()).unwrap();

    let mut s = GameSession::new(cfg, Viewport::new(1000.0, 800.0)).unwrap();
    s.attach_engine(engine);
    s.begin_round(&mut rng(), StartPrime::Keep);
    let t = s.target();
    s.on_pointer_move(t);
    assert_eq!(s.engine().unwrap().current_level(), Some(5));
    assert!(s.try_reveal());
    assert_eq!(s.engine().unwrap().current_level(), None);
    assert!(s.engine().unwrap().backend().is_suspended());
}
