use glam::Vec2;
use rand::Rng;

/// Scripted pointer that wanders towards the target.
///
/// Each step heads for the target with a random sideways wobble, so the
/// level climbs unevenly the way a real search does.
pub struct Sweep {
    speed: f32,
    wobble: f32,
}

impl Sweep {
    /// `speed` in px per second; `wobble` in 0..1 scales the sideways drift.
    pub fn new(speed: f32, wobble: f32) -> Self {
        Self {
            speed,
            wobble: wobble.clamp(0.0, 1.0),
        }
    }

    pub fn step<R: Rng + ?Sized>(&self, rng: &mut R, pointer: Vec2, target: Vec2, dt: f32) -> Vec2 {
        let to_target = target - pointer;
        let max_step = self.speed * dt;
        let dist = to_target.length();
        if dist <= max_step {
            return target;
        }
        let dir = to_target / dist;
        let side = dir.perp() * rng.gen_range(-self.wobble..=self.wobble);
        pointer + (dir + side).normalize_or_zero() * max_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn reaches_the_target() {
        let mut rng = StdRng::seed_from_u64(3);
        let sweep = Sweep::new(400.0, 0.8);
        let target = Vec2::new(640.0, 120.0);
        let mut p = Vec2::new(10.0, 700.0);
        for _ in 0..1000 {
            p = sweep.step(&mut rng, p, target, 0.03);
        }
        assert_eq!(p, target);
    }

    #[test]
    fn never_moves_further_than_speed_allows() {
        let mut rng = StdRng::seed_from_u64(9);
        let sweep = Sweep::new(200.0, 1.0);
        let target = Vec2::new(1000.0, 1000.0);
        let mut p = Vec2::ZERO;
        for _ in 0..50 {
            let next = sweep.step(&mut rng, p, target, 0.03);
            assert!(p.distance(next) <= 6.0 + 1e-3);
            p = next;
        }
    }
}
