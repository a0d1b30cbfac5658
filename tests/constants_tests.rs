// Host-side tests for constants and their relationships.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;
use noy_core::constants::*;
use std::collections::HashSet;

#[test]
fn element_ids_are_distinct() {
    let ids = [
        FIELD_ID,
        HUD_ID,
        TARGET_ID,
        START_BUTTON_ID,
        RESTART_BUTTON_ID,
        MSG_ID,
    ];
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
    assert!(ids.iter().all(|id| !id.is_empty() && !id.contains(' ')));
}

#[test]
fn state_classes_are_distinct() {
    let classes: HashSet<_> = [HIDDEN_CLASS, FOUND_CLASS, HOT_CLASS].into_iter().collect();
    assert_eq!(classes.len(), 3);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn default_tuning_is_consistent() {
    assert_eq!(DEFAULT_VOLUMES.len(), LEVEL_COUNT);
    assert_eq!(DEFAULT_LEVEL_BREAKPOINTS.len() + 1, LEVEL_COUNT);
    assert!(DEFAULT_LEVEL_BREAKPOINTS.windows(2).all(|w| w[0] < w[1]));
    assert!(DEFAULT_LEVEL_BREAKPOINTS.iter().all(|b| *b > 0.0 && *b < 1.0));
    assert!(DEFAULT_VOLUMES.iter().all(|v| *v > FLOOR_GAIN && *v <= 1.0));

    // A step never jumps over the reveal disc
    assert!(KEYBOARD_STEP_FAST < 2.0 * DEFAULT_REVEAL_RADIUS);
    assert!(KEYBOARD_STEP < KEYBOARD_STEP_FAST);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn scheduler_keeps_ahead_of_its_tick() {
    let tick = SCHEDULER_TICK_MS as f64 / 1000.0;
    assert!(SCHEDULE_HORIZON_SEC > tick);
    assert!(CROSSFADE_SEC > 0.0 && START_DELAY_SEC >= 0.0);
    assert!(SCHEDULED_VOICES >= 2);
}
