use crate::config::{
    CONNECTION_ALPHA, CONNECTION_RADIUS, PIXELS_PER_PARTICLE, POINTER_IMPULSE, POINTER_RADIUS,
};
use crate::simulation::particle::Particle;

/// A line between two nearby particles, faded by their separation.
///
/// `a` and `b` index into the field's particle slice with `a < b`, so each
/// qualifying pair shows up exactly once per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    pub opacity: f32,
}

/// The particle field: the whole population plus the surface dimensions it
/// lives in. Owns the particles exclusively; everything else reads them
/// through `particles()`.
pub struct Field {
    width: u32,
    height: u32,
    particles: Vec<Particle>,
}

impl Field {
    /// Create a field sized to the surface and populate it immediately
    pub fn new(width: u32, height: u32) -> Self {
        let mut field = Self {
            width,
            height,
            particles: Vec::new(),
        };
        field.populate();
        field
    }

    /// One particle per PIXELS_PER_PARTICLE of surface area, rounded down.
    /// Recomputed only at creation and on resize; the population never
    /// drifts between those points.
    pub fn target_count(width: u32, height: u32) -> usize {
        (width as u64 * height as u64 / PIXELS_PER_PARTICLE as u64) as usize
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Adopt new surface dimensions and regenerate the whole population.
    // TODO: rescale the surviving population into the new bounds instead of
    // rerolling it, topping up or culling to the new target count.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.populate();
    }

    fn populate(&mut self) {
        let count = Self::target_count(self.width, self.height);
        let (w, h) = (self.width as f32, self.height as f32);
        let mut rng = rand::thread_rng();

        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            self.particles.push(Particle::spawn(&mut rng, w, h));
        }
    }

    /// Advance every particle one tick, in storage order
    pub fn step(&mut self) {
        let (w, h) = (self.width as f32, self.height as f32);
        for particle in &mut self.particles {
            particle.update(w, h);
        }
    }

    /// Shove every particle strictly within POINTER_RADIUS of the pointer
    /// directly away from it. The impulse lands on velocity unclamped, so
    /// repeated pointer events stack.
    pub fn apply_pointer_impulse(&mut self, px: f32, py: f32) {
        for particle in &mut self.particles {
            let dx = particle.x - px;
            let dy = particle.y - py;
            let dist = (dx * dx + dy * dy).sqrt();

            if dist < POINTER_RADIUS {
                let angle = dy.atan2(dx);
                particle.vx += angle.cos() * POINTER_IMPULSE;
                particle.vy += angle.sin() * POINTER_IMPULSE;
            }
        }
    }

    /// Collect every particle pair strictly closer than CONNECTION_RADIUS,
    /// with the line alpha already resolved. Distances are compared squared
    /// so the sqrt only runs for pairs that qualify.
    pub fn connections(&self) -> Vec<Connection> {
        let mut connections = Vec::new();
        let max_sq = CONNECTION_RADIUS * CONNECTION_RADIUS;

        for a in 0..self.particles.len() {
            for b in (a + 1)..self.particles.len() {
                let dx = self.particles[a].x - self.particles[b].x;
                let dy = self.particles[a].y - self.particles[b].y;
                let dist_sq = dx * dx + dy * dy;

                if dist_sq < max_sq {
                    let dist = dist_sq.sqrt();
                    connections.push(Connection {
                        a,
                        b,
                        opacity: (1.0 - dist / CONNECTION_RADIUS) * CONNECTION_ALPHA,
                    });
                }
            }
        }

        connections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still(x: f32, y: f32) -> Particle {
        Particle {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            radius: 2.0,
            opacity: 0.5,
        }
    }

    fn empty_field(width: u32, height: u32) -> Field {
        Field {
            width,
            height,
            particles: Vec::new(),
        }
    }

    #[test]
    fn test_population_matches_area() {
        let field = Field::new(1000, 1000);
        assert_eq!(field.particles.len(), 100);
    }

    #[test]
    fn test_population_rounds_down() {
        // 999 * 999 = 998_001 square pixels -> 99 particles, not 100
        let field = Field::new(999, 999);
        assert_eq!(field.particles.len(), 99);
    }

    #[test]
    fn test_zero_area_field_is_empty_but_total() {
        assert_eq!(Field::new(0, 600).particles.len(), 0);
        assert_eq!(Field::new(800, 0).particles.len(), 0);

        let mut field = Field::new(0, 0);
        field.step();
        field.apply_pointer_impulse(10.0, 10.0);
        assert!(field.connections().is_empty());
    }

    #[test]
    fn test_resize_regenerates_whole_population() {
        let mut field = Field::new(800, 600);
        assert_eq!(field.particles.len(), 48);

        field.resize(400, 300);
        assert_eq!(field.particles.len(), 12);
        for p in &field.particles {
            assert!(p.x >= 0.0 && p.x < 400.0, "stale particle outside new bounds");
            assert!(p.y >= 0.0 && p.y < 300.0, "stale particle outside new bounds");
        }
    }

    #[test]
    fn test_spawned_particles_inside_surface() {
        let field = Field::new(640, 480);
        assert_eq!(field.particles.len(), 30);
        for p in &field.particles {
            assert!(p.x >= 0.0 && p.x < 640.0);
            assert!(p.y >= 0.0 && p.y < 480.0);
        }
    }

    #[test]
    fn test_step_keeps_every_particle_in_bounds() {
        let mut field = Field::new(500, 400);
        // worst case: a pointer shove sends particles at the walls
        field.apply_pointer_impulse(250.0, 200.0);

        for _ in 0..50 {
            field.step();
            for p in &field.particles {
                assert!(p.x >= 0.0 && p.x <= 500.0);
                assert!(p.y >= 0.0 && p.y <= 400.0);
            }
        }
    }

    #[test]
    fn test_impulse_only_reaches_nearby_particles() {
        let mut field = empty_field(1000, 1000);
        field.particles.push(still(149.0, 500.0));
        field.particles.push(still(151.0, 500.0));

        field.apply_pointer_impulse(0.0, 500.0);

        let near = &field.particles[0];
        let far = &field.particles[1];
        assert!(
            (near.vx - POINTER_IMPULSE).abs() < 1e-6,
            "149 px away must be shoved straight along +x, got vx {}",
            near.vx
        );
        assert_eq!(near.vy, 0.0);
        assert_eq!((far.vx, far.vy), (0.0, 0.0), "151 px away must be untouched");
    }

    #[test]
    fn test_impulse_pushes_away_from_pointer() {
        let mut field = empty_field(1000, 1000);
        field.particles.push(still(500.0, 500.0));
        field.particles.push(still(400.0, 500.0));

        // pointer sits between them
        field.apply_pointer_impulse(450.0, 500.0);

        assert!(field.particles[0].vx > 0.0, "particle right of the pointer moves right");
        assert!(field.particles[1].vx < 0.0, "particle left of the pointer moves left");
    }

    #[test]
    fn test_impulses_stack_without_bound() {
        let mut field = empty_field(1000, 1000);
        field.particles.push(still(100.0, 100.0));

        for _ in 0..4 {
            field.apply_pointer_impulse(50.0, 100.0);
        }

        let p = &field.particles[0];
        assert!((p.vx - 4.0 * POINTER_IMPULSE).abs() < 1e-6);
        assert_eq!(p.vy, 0.0);
    }

    #[test]
    fn test_impulse_at_pointer_lands_along_x() {
        // atan2(0, 0) is 0, so a particle sitting exactly on the pointer is
        // shoved along +x rather than skipped
        let mut field = empty_field(1000, 1000);
        field.particles.push(still(300.0, 300.0));

        field.apply_pointer_impulse(300.0, 300.0);

        let p = &field.particles[0];
        assert!((p.vx - POINTER_IMPULSE).abs() < 1e-6);
        assert_eq!(p.vy, 0.0);
    }

    #[test]
    fn test_connections_for_known_layout() {
        let mut field = empty_field(1000, 1000);
        field.particles.push(still(0.0, 0.0));
        field.particles.push(still(100.0, 0.0));
        field.particles.push(still(500.0, 0.0));

        let connections = field.connections();
        assert_eq!(connections.len(), 1);

        let c = &connections[0];
        assert_eq!((c.a, c.b), (0, 1));
        // 100 px apart: (1 - 100/200) * 0.15 = 0.075
        assert!((c.opacity - 0.075).abs() < 1e-6);
    }

    #[test]
    fn test_connection_threshold_is_strict() {
        let mut field = empty_field(1000, 1000);
        field.particles.push(still(0.0, 0.0));
        field.particles.push(still(200.0, 0.0));

        assert!(
            field.connections().is_empty(),
            "exactly 200 px apart is not connected"
        );

        field.particles[1].x = 199.5;
        let connections = field.connections();
        assert_eq!(connections.len(), 1);
        assert!(connections[0].opacity > 0.0);
    }

    #[test]
    fn test_connections_deterministic_and_unique() {
        let mut field = empty_field(1000, 1000);
        for i in 0..6 {
            field.particles.push(still(i as f32 * 90.0, 10.0));
        }

        let first = field.connections();
        let second = field.connections();
        assert_eq!(first, second, "same state must yield the same pairs");

        for c in &first {
            assert!(c.a < c.b);
        }
        for (i, c) in first.iter().enumerate() {
            for d in &first[i + 1..] {
                assert!((c.a, c.b) != (d.a, d.b), "pair listed twice");
            }
        }
    }

    #[test]
    fn test_coincident_particles_connect_at_full_alpha() {
        let mut field = empty_field(1000, 1000);
        field.particles.push(still(300.0, 300.0));
        field.particles.push(still(300.0, 300.0));

        let connections = field.connections();
        assert_eq!(connections.len(), 1);
        assert!((connections[0].opacity - CONNECTION_ALPHA).abs() < 1e-6);
    }
}
