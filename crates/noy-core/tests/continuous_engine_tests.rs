// Continuous engine driven against the offline mixer.

use noy_core::{
    AudioBackend, ContinuousEngine, EngineError, EngineParams, LoopClip, Mixer, ProximityEngine,
    LEVEL_COUNT,
};

const SR: u32 = 8000;
const TOL: f32 = 1e-3;

fn clips(secs: f64) -> Vec<LoopClip> {
    (0..LEVEL_COUNT)
        .map(|i| LoopClip::new(vec![0.1 * (i + 1) as f32; (secs * SR as f64) as usize], SR))
        .collect()
}

fn started() -> ContinuousEngine<Mixer> {
    let mut engine = ContinuousEngine::new(Mixer::new(SR), EngineParams::default());
    engine.initialize().unwrap();
    engine.load_assets(clips(1.0)).unwrap();
    engine.start().unwrap();
    engine
}

fn gain_now(engine: &ContinuousEngine<Mixer>, level: usize) -> f32 {
    let g = engine.level_gain(level).unwrap();
    engine.backend().gain_value(g)
}

fn assert_settled(engine: &ContinuousEngine<Mixer>, active: usize) {
    let params = EngineParams::default();
    for i in 0..LEVEL_COUNT {
        let want = if i == active {
            params.volumes[i]
        } else {
            params.floor_gain
        };
        let got = gain_now(engine, i);
        assert!((got - want).abs() < TOL, "level {i}: {got} != {want}");
    }
}

#[test]
fn everything_starts_at_floor() {
    let engine = started();
    let floor = EngineParams::default().floor_gain;
    for i in 0..LEVEL_COUNT {
        assert!((gain_now(&engine, i) - floor).abs() < 1e-6);
    }
    assert_eq!(engine.current_level(), None);
    assert_eq!(engine.backend().active_sources(), LEVEL_COUNT);
}

#[test]
fn repeated_level_issues_no_new_automation() {
    let mut engine = started();
    assert!(engine.set_active_level(3));
    let calls = engine.backend().automation_calls();
    assert!(!engine.set_active_level(3));
    assert!(!engine.set_active_level(3));
    assert_eq!(engine.backend().automation_calls(), calls);
    assert_eq!(engine.current_level(), Some(3));
}

#[test]
fn gains_settle_after_one_crossfade() {
    let mut engine = started();
    engine.set_active_level(2);
    engine.backend_mut().advance(EngineParams::default().crossfade_sec + 0.01);
    assert_settled(&engine, 2);
}

#[test]
fn burst_of_changes_never_sticks() {
    let mut engine = started();
    for level in [1, 4, 0, 5, 2, 4] {
        engine.set_active_level(level);
        engine.backend_mut().advance(0.013);
    }
    engine.backend_mut().advance(0.2);
    assert_settled(&engine, 4);
}

#[test]
fn interrupted_ramp_continues_from_current_value() {
    let mut engine = started();
    engine.set_active_level(5);
    engine.backend_mut().advance(0.06);
    let mid = gain_now(&engine, 5);
    assert!(mid > 0.3 && mid < 0.7, "half-way gain was {mid}");

    engine.set_active_level(0);
    let after = gain_now(&engine, 5);
    assert!((after - mid).abs() < TOL, "jumped from {mid} to {after}");
}

#[test]
fn stop_then_start_forces_a_fresh_ramp() {
    let mut engine = started();
    engine.set_active_level(2);
    engine.stop();
    assert_eq!(engine.current_level(), None);
    assert!(!engine.is_playing());
    assert!(engine.backend().is_suspended());

    engine.start().unwrap();
    assert!(!engine.backend().is_suspended());
    let calls = engine.backend().automation_calls();
    assert!(engine.set_active_level(2));
    assert!(engine.backend().automation_calls() > calls);
}

#[test]
fn restart_replaces_sources_instead_of_stacking() {
    let mut engine = started();
    engine.backend_mut().advance(0.2);
    engine.start().unwrap();
    engine.backend_mut().advance(0.01);
    assert_eq!(engine.backend().active_sources(), LEVEL_COUNT);
}

#[test]
fn stop_fades_out_and_ends_sources() {
    let mut engine = started();
    engine.set_active_level(1);
    engine.backend_mut().advance(0.5);
    let stop_at = engine.backend().current_time();
    engine.stop();
    let windows = engine.backend().windows();
    assert_eq!(windows.len(), LEVEL_COUNT);
    for w in windows {
        let stop = w.stop.expect("source left running");
        assert!((stop - (stop_at + EngineParams::default().crossfade_sec)).abs() < 1e-9);
    }
}

#[test]
fn level_changes_ignored_when_not_playing() {
    let mut engine = ContinuousEngine::new(Mixer::new(SR), EngineParams::default());
    engine.initialize().unwrap();
    assert!(!engine.set_active_level(1));
}

#[test]
fn start_without_assets_reports_missing() {
    let mut engine = ContinuousEngine::new(Mixer::new(SR), EngineParams::default());
    assert!(matches!(engine.start(), Err(EngineError::AssetsMissing)));
}

#[test]
fn asset_bank_is_validated() {
    let mut engine = ContinuousEngine::new(Mixer::new(SR), EngineParams::default());
    engine.initialize().unwrap();

    let mut five = clips(1.0);
    five.pop();
    assert!(matches!(
        engine.load_assets(five),
        Err(EngineError::AssetCount {
            expected: 6,
            actual: 5
        })
    ));
    assert!(matches!(
        engine.load_assets(clips(0.2)),
        Err(EngineError::LoopTooShort { .. })
    ));
    assert!(!engine.has_assets());

    engine.load_assets(clips(1.0)).unwrap();
    // a second bank is ignored
    engine.load_assets(clips(2.0)).unwrap();
    assert_eq!(engine.loop_duration(), Some(1.0));
}

#[test]
fn loop_length_follows_the_shortest_buffer() {
    let mut engine = ContinuousEngine::new(Mixer::new(SR), EngineParams::default());
    let mut bank = clips(1.0);
    bank[3] = LoopClip::new(vec![0.2; (0.9 * SR as f64) as usize], SR);
    engine.load_assets(bank).unwrap();
    assert!((engine.loop_duration().unwrap() - 0.9).abs() < 1e-9);
}

#[test]
fn initialize_is_idempotent() {
    let mut engine = ContinuousEngine::new(Mixer::new(SR), EngineParams::default());
    engine.initialize().unwrap();
    let g0 = *engine.level_gain(0).unwrap();
    engine.initialize().unwrap();
    assert_eq!(*engine.level_gain(0).unwrap(), g0);
    assert!(engine.level_gain(LEVEL_COUNT).is_none());
}

#[test]
fn all_loops_start_on_one_instant() {
    let engine = started();
    let windows = engine.backend().windows();
    assert_eq!(windows.len(), LEVEL_COUNT);
    let first = windows[0].start;
    assert!((first - EngineParams::default().start_delay_sec).abs() < 1e-9);
    assert!(windows.iter().all(|w| w.start == first));
}

#[test]
fn out_of_range_level_is_rejected() {
    let mut engine = started();
    assert!(engine.set_active_level(2));
    let calls = engine.backend().automation_calls();

    assert!(!engine.set_active_level(LEVEL_COUNT));
    assert!(!engine.set_active_level(usize::MAX));
    assert_eq!(engine.backend().automation_calls(), calls);
    assert_eq!(engine.current_level(), Some(2));

    engine.backend_mut().advance(0.2);
    assert_settled(&engine, 2);
}
