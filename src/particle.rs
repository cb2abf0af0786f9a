//! Particle state and the pure math of the field.

use glam::Vec2;
use rand::Rng;

/// A drifting point rendered as a small disk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, radius: f32) -> Self {
        Self {
            position,
            velocity,
            radius,
        }
    }

    /// Spawn at a uniform position inside `bounds` with each velocity
    /// component drawn independently from `[-max_speed, max_speed)`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, bounds: Vec2, max_speed: f32, radius: f32) -> Self {
        let position = Vec2::new(rng.gen::<f32>() * bounds.x, rng.gen::<f32>() * bounds.y);
        let velocity = if max_speed > 0.0 {
            Vec2::new(
                rng.gen_range(-max_speed..max_speed),
                rng.gen_range(-max_speed..max_speed),
            )
        } else {
            Vec2::ZERO
        };
        Self::new(position, velocity, radius)
    }

    /// Advance one frame and bounce off the walls of `[0, bounds]`.
    ///
    /// Each axis flips independently. The position is left where it landed,
    /// so it may sit up to one step outside until the next frame.
    pub fn step(&mut self, bounds: Vec2) {
        self.position += self.velocity;

        if self.position.x < 0.0 || self.position.x > bounds.x {
            self.velocity.x = -self.velocity.x;
        }
        if self.position.y < 0.0 || self.position.y > bounds.y {
            self.velocity.y = -self.velocity.y;
        }
    }
}

/// Number of particles for a `width` x `height` surface:
/// `floor(width * height / density)`.
///
/// Zero area or a non-positive density yields zero particles.
pub fn particle_count(width: u32, height: u32, density: f32) -> usize {
    if density <= 0.0 || !density.is_finite() {
        return 0;
    }
    let area = width as f64 * height as f64;
    (area / density as f64).floor() as usize
}

/// Opacity of the line joining two particles `distance` apart.
///
/// Fades linearly from 1 at distance 0 to 0 at `threshold`. Returns `None`
/// when no line should be drawn.
pub fn connection_alpha(distance: f32, threshold: f32) -> Option<f32> {
    if distance < threshold {
        Some((1.0 - distance / threshold).clamp(0.0, 1.0))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_particle_count_formula() {
        assert_eq!(particle_count(800, 600, 15_000.0), 32);
        assert_eq!(particle_count(1920, 1080, 15_000.0), 138);
        assert_eq!(particle_count(0, 600, 15_000.0), 0);
        assert_eq!(particle_count(100, 100, 15_000.0), 0);
        assert_eq!(particle_count(800, 600, 0.0), 0);
    }

    #[test]
    fn test_step_is_euler() {
        let mut p = Particle::new(Vec2::new(10.0, 20.0), Vec2::new(0.1, -0.2), 1.5);
        p.step(Vec2::new(100.0, 100.0));
        assert!(p.position.abs_diff_eq(Vec2::new(10.1, 19.8), 1e-5));
        assert_eq!(p.velocity, Vec2::new(0.1, -0.2));
    }

    #[test]
    fn test_bounce_flips_only_violating_axis() {
        let mut p = Particle::new(Vec2::new(99.9, 50.0), Vec2::new(0.2, 0.15), 1.5);
        p.step(Vec2::new(100.0, 100.0));

        assert_eq!(p.velocity, Vec2::new(-0.2, 0.15));
        // Not clamped back to the wall
        assert!(p.position.x > 100.0);
    }

    #[test]
    fn test_bounce_at_origin() {
        let mut p = Particle::new(Vec2::new(0.05, 0.05), Vec2::new(-0.1, -0.1), 1.5);
        p.step(Vec2::new(100.0, 100.0));
        assert_eq!(p.velocity, Vec2::new(0.1, 0.1));

        p.step(Vec2::new(100.0, 100.0));
        assert!(p.position.x >= 0.0 && p.position.y >= 0.0);
    }

    #[test]
    fn test_position_on_edge_does_not_flip() {
        let mut p = Particle::new(Vec2::new(99.0, 0.0), Vec2::new(1.0, 0.0), 1.5);
        p.step(Vec2::new(100.0, 100.0));
        assert_eq!(p.position.x, 100.0);
        assert_eq!(p.velocity.x, 1.0);
    }

    #[test]
    fn test_random_within_ranges() {
        let mut rng = StdRng::seed_from_u64(3);
        let bounds = Vec2::new(800.0, 600.0);
        for _ in 0..1000 {
            let p = Particle::random(&mut rng, bounds, 0.2, 1.5);
            assert!(p.position.x >= 0.0 && p.position.x <= bounds.x);
            assert!(p.position.y >= 0.0 && p.position.y <= bounds.y);
            assert!(p.velocity.x >= -0.2 && p.velocity.x < 0.2);
            assert!(p.velocity.y >= -0.2 && p.velocity.y < 0.2);
            assert_eq!(p.radius, 1.5);
        }
    }

    #[test]
    fn test_connection_alpha() {
        assert_eq!(connection_alpha(0.0, 120.0), Some(1.0));
        assert_eq!(connection_alpha(60.0, 120.0), Some(0.5));
        assert_eq!(connection_alpha(90.0, 120.0), Some(0.25));
        assert_eq!(connection_alpha(120.0, 120.0), None);
        assert_eq!(connection_alpha(500.0, 120.0), None);
    }

    #[test]
    fn test_connection_alpha_zero_threshold_draws_nothing() {
        assert_eq!(connection_alpha(0.0, 0.0), None);
    }
}
