// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use glam::Vec2;
use input::*;
use noy_core::{KEYBOARD_STEP, KEYBOARD_STEP_FAST};

#[test]
fn arrows_map_to_screen_directions() {
    assert_eq!(arrow_direction("ArrowLeft"), Some(Vec2::new(-1.0, 0.0)));
    assert_eq!(arrow_direction("ArrowRight"), Some(Vec2::new(1.0, 0.0)));
    // y grows downwards on screen
    assert_eq!(arrow_direction("ArrowUp"), Some(Vec2::new(0.0, -1.0)));
    assert_eq!(arrow_direction("ArrowDown"), Some(Vec2::new(0.0, 1.0)));
}

#[test]
fn other_keys_do_not_nudge() {
    for key in ["a", " ", "Enter", "Escape", "Left", "arrowleft"] {
        assert_eq!(nudge_for_key(key, false, KEYBOARD_STEP, KEYBOARD_STEP_FAST), None);
    }
}

#[test]
fn shift_selects_the_fast_step() {
    let slow = nudge_for_key("ArrowRight", false, KEYBOARD_STEP, KEYBOARD_STEP_FAST).unwrap();
    let fast = nudge_for_key("ArrowRight", true, KEYBOARD_STEP, KEYBOARD_STEP_FAST).unwrap();
    assert_eq!(slow, Vec2::new(6.0, 0.0));
    assert_eq!(fast, Vec2::new(12.0, 0.0));
}
