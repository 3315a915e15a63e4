use rand::Rng;

use crate::config::{
    FRICTION, MAX_OPACITY, MAX_RADIUS, MAX_SPAWN_SPEED, MIN_OPACITY, MIN_RADIUS,
};

/// A single particle of the field.
///
/// Positions are in physical pixels with the origin at the top-left of the
/// surface; velocities are in pixels per frame. The visual attributes
/// (radius, opacity) are rolled once at spawn and never change afterwards.
#[derive(Clone, Copy, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,

    /// Velocity in pixels per frame
    pub vx: f32,
    pub vy: f32,

    /// Disc radius in [MIN_RADIUS, MAX_RADIUS)
    pub radius: f32,

    /// Base alpha in [MIN_OPACITY, MAX_OPACITY)
    pub opacity: f32,
}

impl Particle {
    /// Spawn a particle uniformly distributed over a width x height surface
    pub fn spawn(rng: &mut impl Rng, width: f32, height: f32) -> Self {
        Self {
            x: rng.gen::<f32>() * width,
            y: rng.gen::<f32>() * height,
            vx: rng.gen_range(-MAX_SPAWN_SPEED..MAX_SPAWN_SPEED),
            vy: rng.gen_range(-MAX_SPAWN_SPEED..MAX_SPAWN_SPEED),
            radius: rng.gen_range(MIN_RADIUS..MAX_RADIUS),
            opacity: rng.gen_range(MIN_OPACITY..MAX_OPACITY),
        }
    }

    /// Advance one tick: move, apply friction, then bounce off the walls.
    ///
    /// The order is fixed. Friction decays this tick's velocity before any
    /// bounce, so a particle leaving through a wall comes back with the
    /// already-decayed speed negated. Axes bounce independently; a corner
    /// hit flips both.
    pub fn update(&mut self, width: f32, height: f32) {
        self.x += self.vx;
        self.y += self.vy;

        self.vx *= FRICTION;
        self.vy *= FRICTION;

        if self.x < 0.0 || self.x > width {
            self.vx = -self.vx;
            self.x = self.x.clamp(0.0, width);
        }
        if self.y < 0.0 || self.y > height {
            self.vy = -self.vy;
            self.y = self.y.clamp(0.0, height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drifting(x: f32, y: f32, vx: f32, vy: f32) -> Particle {
        Particle {
            x,
            y,
            vx,
            vy,
            radius: 2.0,
            opacity: 0.5,
        }
    }

    #[test]
    fn test_motion_adds_velocity_to_position() {
        let mut p = drifting(100.0, 100.0, 1.0, -2.0);
        p.update(1000.0, 1000.0);
        assert!((p.x - 101.0).abs() < 1e-6);
        assert!((p.y - 98.0).abs() < 1e-6);
    }

    #[test]
    fn test_friction_decays_speed_monotonically() {
        let mut p = drifting(500.0, 500.0, 1.0, 0.0);
        let mut prev = p.vx.abs();

        for n in 1..=60 {
            p.update(1000.0, 1000.0);
            let expected = FRICTION.powi(n);
            assert!(
                (p.vx.abs() - expected).abs() < 1e-4,
                "after {} ticks speed should be {}, got {}",
                n,
                expected,
                p.vx.abs()
            );
            assert!(p.vx.abs() < prev, "speed must strictly decrease");
            assert!(p.vx.abs() > 0.0, "speed decays but never reaches zero");
            prev = p.vx.abs();
        }
    }

    #[test]
    fn test_left_wall_bounce_clamps_and_reflects() {
        // Starting on the boundary and moving out: one tick must clamp the
        // position back to the wall and hand back this tick's decayed speed.
        let mut p = drifting(0.0, 50.0, -1.0, 0.0);
        p.update(100.0, 100.0);

        assert_eq!(p.x, 0.0);
        assert!(
            (p.vx - FRICTION).abs() < 1e-6,
            "reflected velocity should be +{}, got {}",
            FRICTION,
            p.vx
        );
        assert_eq!(p.y, 50.0);
        assert_eq!(p.vy, 0.0);
    }

    #[test]
    fn test_right_wall_bounce() {
        let mut p = drifting(99.5, 50.0, 2.0, 0.0);
        p.update(100.0, 100.0);

        assert_eq!(p.x, 100.0);
        assert!((p.vx + 2.0 * FRICTION).abs() < 1e-6);
    }

    #[test]
    fn test_corner_hit_flips_both_axes() {
        let mut p = drifting(1.0, 1.0, -5.0, -5.0);
        p.update(200.0, 200.0);

        assert_eq!((p.x, p.y), (0.0, 0.0));
        assert!(p.vx > 0.0 && p.vy > 0.0);
    }

    #[test]
    fn test_position_never_leaves_surface() {
        // Velocity far beyond the surface size still can't escape: the clamp
        // runs in the same tick as the move.
        let mut p = drifting(10.0, 10.0, 1000.0, -900.0);
        for _ in 0..100 {
            p.update(640.0, 480.0);
            assert!(p.x >= 0.0 && p.x <= 640.0, "x out of bounds: {}", p.x);
            assert!(p.y >= 0.0 && p.y <= 480.0, "y out of bounds: {}", p.y);
        }
    }

    #[test]
    fn test_spawn_attributes_within_ranges() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let p = Particle::spawn(&mut rng, 800.0, 600.0);
            assert!(p.x >= 0.0 && p.x < 800.0);
            assert!(p.y >= 0.0 && p.y < 600.0);
            assert!(p.vx >= -MAX_SPAWN_SPEED && p.vx < MAX_SPAWN_SPEED);
            assert!(p.vy >= -MAX_SPAWN_SPEED && p.vy < MAX_SPAWN_SPEED);
            assert!(p.radius >= MIN_RADIUS && p.radius < MAX_RADIUS);
            assert!(p.opacity >= MIN_OPACITY && p.opacity < MAX_OPACITY);
        }
    }
}
