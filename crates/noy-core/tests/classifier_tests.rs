// Distance-to-level mapping, checked against the public API only.

use noy_core::{
    classify, is_near, Breakpoints, Classifier, GameConfig, Viewport, DEFAULT_LEVEL_BREAKPOINTS,
    DEFAULT_MAX_DISTANCE_FACTOR,
};
use proptest::prelude::*;

fn tuned() -> Breakpoints {
    Breakpoints::new(DEFAULT_LEVEL_BREAKPOINTS).unwrap()
}

#[test]
fn scenario_levels_on_1000_by_800() {
    let vp = Viewport::new(1000.0, 800.0);
    let diag = vp.diagonal();
    assert!((diag - 1280.62).abs() < 0.01);
    let max = diag * DEFAULT_MAX_DISTANCE_FACTOR;

    assert_eq!(classify(0.0, diag, DEFAULT_MAX_DISTANCE_FACTOR, &tuned()), 5);
    assert_eq!(classify(max, diag, DEFAULT_MAX_DISTANCE_FACTOR, &tuned()), 0);
    assert_eq!(classify(960.0, diag, DEFAULT_MAX_DISTANCE_FACTOR, &tuned()), 0);
    // closeness ~0.5 sits between 1/6 and 3.4/6
    assert_eq!(classify(480.0, diag, DEFAULT_MAX_DISTANCE_FACTOR, &tuned()), 1);
}

#[test]
fn even_breakpoints_split_closeness_into_sixths() {
    let bp = Breakpoints::even();
    let diag = 1000.0;
    let max = diag * 0.75;
    // closeness 0.1, 0.25, 0.4, 0.6, 0.75, 0.9
    let expected = [0, 1, 2, 3, 4, 5];
    for (c, want) in [0.1f32, 0.25, 0.4, 0.6, 0.75, 0.9].iter().zip(expected) {
        let d = (1.0 - c) * max;
        assert_eq!(classify(d, diag, 0.75, &bp), want, "closeness {c}");
    }
}

#[test]
fn beyond_max_distance_clamps_to_level_zero() {
    let bp = Breakpoints::even();
    assert_eq!(classify(1e9, 1000.0, 0.75, &bp), 0);
    assert_eq!(classify(f32::INFINITY, 1000.0, 0.75, &bp), 0);
}

#[test]
fn near_is_independent_of_level_scale() {
    assert!(is_near(15.0, 15.0));
    assert!(!is_near(15.01, 15.0));

    // Level 5 can be reached well outside the reveal radius.
    let c = Classifier::from_config(&GameConfig::default()).unwrap();
    let vp = Viewport::new(1920.0, 1080.0);
    let d = 40.0;
    assert_eq!(c.classify(d, vp), 5);
    assert!(!c.is_near(d));
}

#[test]
fn rejects_descending_breakpoints() {
    assert!(Breakpoints::new([0.1, 0.3, 0.2, 0.6, 0.9]).is_err());
    assert!(Breakpoints::new([0.1, 0.1, 0.2, 0.6, 0.9]).is_err());
    assert!(Breakpoints::new([0.0, 0.2, 0.3, 0.6, 0.9]).is_err());
    assert!(Breakpoints::new([0.1, 0.2, 0.3, 0.6, 1.0]).is_err());
}

#[test]
fn ring_radii_match_classifier_boundaries() {
    let c = Classifier::new(tuned(), DEFAULT_MAX_DISTANCE_FACTOR, 15.0);
    let vp = Viewport::new(1000.0, 800.0);
    let rings = c.ring_radii(vp);
    let mut level_outside = 0;
    for r in &rings.boundaries {
        // just outside and just inside each ring differ by exactly one level
        let outside = c.classify(r + 0.01, vp);
        let inside = c.classify(r - 0.01, vp);
        assert_eq!(inside, outside + 1, "ring at {r}");
        assert_eq!(outside, level_outside);
        level_outside += 1;
    }
}

fn ascending_breakpoints() -> impl Strategy<Value = [f32; 5]> {
    prop::array::uniform5(0.01f32..0.99).prop_filter_map("need distinct values", |mut v| {
        v.sort_by(f32::total_cmp);
        v.windows(2).all(|w| w[1] - w[0] > 1e-4).then_some(v)
    })
}

proptest! {
    #[test]
    fn level_never_increases_with_distance(
        bp in ascending_breakpoints(),
        w in 100.0f32..4000.0,
        h in 100.0f32..4000.0,
        d1 in 0.0f32..5000.0,
        d2 in 0.0f32..5000.0,
    ) {
        let bp = Breakpoints::new(bp).unwrap();
        let diag = Viewport::new(w, h).diagonal();
        let (near, far) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
        prop_assert!(
            classify(near, diag, 0.75, &bp) >= classify(far, diag, 0.75, &bp)
        );
    }

    #[test]
    fn classify_is_pure(d in 0.0f32..3000.0, w in 1.0f32..3000.0, h in 1.0f32..3000.0) {
        let bp = tuned();
        let diag = Viewport::new(w, h).diagonal();
        let a = classify(d, diag, 0.75, &bp);
        let b = classify(d, diag, 0.75, &bp);
        prop_assert_eq!(a, b);
        prop_assert!(a <= 5);
    }
}
