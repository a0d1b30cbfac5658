use glam::Vec2;

/// Unit direction for an arrow key, screen coordinates (y down).
#[inline]
pub fn arrow_direction(key: &str) -> Option<Vec2> {
    match key {
        "ArrowLeft" => Some(Vec2::new(-1.0, 0.0)),
        "ArrowRight" => Some(Vec2::new(1.0, 0.0)),
        "ArrowUp" => Some(Vec2::new(0.0, -1.0)),
        "ArrowDown" => Some(Vec2::new(0.0, 1.0)),
        _ => None,
    }
}

/// Pointer offset for a keydown; shift selects the fast step.
#[inline]
pub fn nudge_for_key(key: &str, shift: bool, step: f32, fast_step: f32) -> Option<Vec2> {
    let step = if shift { fast_step } else { step };
    arrow_direction(key).map(|d| d * step)
}
