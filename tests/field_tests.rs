//! Integration tests for the particle field lifecycle and frame algorithm.
//!
//! These drive a [`ParticleField`] through a recording surface and the
//! [`ManualScheduler`], so every draw call and frame request is observable.

use particle_field::prelude::*;
use particle_field::particle::particle_count;
use particle_field::{ConfigError, Particle, SurfaceError};

// ============================================================================
// Recording surface
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Draw {
    Clear { size: Vec2 },
    Disk { center: Vec2, radius: f32, color: Rgba },
    Line { a: Vec2, b: Vec2, color: Rgba, width: f32 },
}

#[derive(Default)]
struct Recorder {
    size: (u32, u32),
    draws: Vec<Draw>,
    has_context: bool,
}

impl Recorder {
    fn new() -> Self {
        Self {
            has_context: true,
            ..Default::default()
        }
    }

    fn without_context() -> Self {
        Self::default()
    }

    fn lines(&self) -> Vec<(Vec2, Vec2, f32)> {
        self.draws
            .iter()
            .filter_map(|d| match d {
                Draw::Line { a, b, color, .. } => Some((*a, *b, color.a)),
                _ => None,
            })
            .collect()
    }
}

impl DrawContext for Recorder {
    fn clear_rect(&mut self, _origin: Vec2, size: Vec2) {
        self.draws.push(Draw::Clear { size });
    }

    fn fill_disk(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.draws.push(Draw::Disk { center, radius, color });
    }

    fn stroke_line(&mut self, a: Vec2, b: Vec2, color: Rgba, width: f32) {
        self.draws.push(Draw::Line { a, b, color, width });
    }
}

impl Surface for Recorder {
    type Context = Recorder;

    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn context(&mut self) -> Result<&mut Recorder, SurfaceError> {
        if self.has_context {
            Ok(self)
        } else {
            Err(SurfaceError::ContextUnavailable)
        }
    }
}

type Field = ParticleField<Recorder, ManualScheduler>;

fn field_with(config: FieldConfig) -> Field {
    ParticleField::new(config, ManualScheduler::new())
}

fn field() -> Field {
    field_with(FieldConfig::default().with_seed(2024))
}

/// Run up to `n` scheduled frames; returns how many executed.
fn run_frames(field: &mut Field, n: usize) -> usize {
    let mut ran = 0;
    for _ in 0..n {
        let Some(request) = field.scheduler_mut().next_due() else {
            break;
        };
        if field.run_frame(request) {
            ran += 1;
        }
    }
    ran
}

// ============================================================================
// Population
// ============================================================================

#[test]
fn test_800_by_600_yields_32_particles() {
    let mut field = field();
    field.attach(Recorder::new(), 800, 600).unwrap();

    assert_eq!(field.particles().len(), 32);
    assert_eq!(field.surface().unwrap().size(), (800, 600));
    assert!(field.is_attached());
    assert!(field.is_running());
}

#[test]
fn test_count_matches_formula_for_many_sizes() {
    let mut field = field();
    field.attach(Recorder::new(), 1, 1).unwrap();

    for (w, h) in [(1920, 1080), (375, 812), (3840, 2160), (122, 123), (0, 0), (1, 15_000)] {
        field.resize(w, h);
        assert_eq!(field.particles().len(), particle_count(w, h, 15_000.0));
        assert_eq!(field.surface().unwrap().size(), (w, h));
    }
}

#[test]
fn test_resize_regenerates_everything() {
    let mut field = field();
    field.attach(Recorder::new(), 800, 600).unwrap();
    let before: Vec<Particle> = field.particles().to_vec();

    field.resize(0, 600);
    assert_eq!(field.particles().len(), 0);

    field.resize(800, 600);
    assert_eq!(field.particles().len(), 32);
    let survivors = field
        .particles()
        .iter()
        .filter(|p| before.contains(p))
        .count();
    assert_eq!(survivors, 0);
    assert_eq!(field.stats().generations, 3);
}

#[test]
fn test_same_size_resize_still_regenerates() {
    let mut field = field();
    field.attach(Recorder::new(), 800, 600).unwrap();
    let before = field.particles().to_vec();

    field.resize(800, 600);
    assert_eq!(field.particles().len(), 32);
    assert_ne!(field.particles(), before.as_slice());
}

#[test]
fn test_particles_spawn_inside_bounds_with_bounded_velocity() {
    let mut field = field();
    field.attach(Recorder::new(), 1920, 1080).unwrap();

    for p in field.particles() {
        assert!((0.0..=1920.0).contains(&p.position.x));
        assert!((0.0..=1080.0).contains(&p.position.y));
        assert!(p.velocity.x.abs() <= 0.2);
        assert!(p.velocity.y.abs() <= 0.2);
        assert_eq!(p.radius, 1.5);
    }
}

#[test]
fn test_seed_makes_population_reproducible() {
    let mut a = field_with(FieldConfig::default().with_seed(9));
    let mut b = field_with(FieldConfig::default().with_seed(9));
    a.attach(Recorder::new(), 800, 600).unwrap();
    b.attach(Recorder::new(), 800, 600).unwrap();
    assert_eq!(a.particles(), b.particles());
}

// ============================================================================
// Motion
// ============================================================================

#[test]
fn test_positions_stay_bounded_over_many_frames() {
    let config = FieldConfig::default().with_seed(5).with_max_speed(7.0);
    let mut field = field_with(config);
    field.attach(Recorder::new(), 300, 200).unwrap();
    let slack = 7.0;

    for _ in 0..2_000 {
        assert_eq!(run_frames(&mut field, 1), 1);
        for p in field.particles() {
            assert!(p.position.x >= -slack && p.position.x <= 300.0 + slack);
            assert!(p.position.y >= -slack && p.position.y <= 200.0 + slack);
        }
    }
}

#[test]
fn test_speed_is_constant_across_bounces() {
    let config = FieldConfig::default().with_seed(8).with_max_speed(5.0);
    let mut field = field_with(config);
    field.attach(Recorder::new(), 400, 400).unwrap();
    let speeds: Vec<Vec2> = field.particles().iter().map(|p| p.velocity.abs()).collect();

    run_frames(&mut field, 500);

    for (p, speed) in field.particles().iter().zip(speeds) {
        assert_eq!(p.velocity.abs(), speed);
    }
}

#[test]
fn test_zero_area_field_keeps_running_and_draws_no_particles() {
    let mut field = field();
    field.attach(Recorder::new(), 0, 600).unwrap();

    assert_eq!(run_frames(&mut field, 10), 10);
    let recorder = field.surface().unwrap();
    assert!(recorder
        .draws
        .iter()
        .all(|d| matches!(d, Draw::Clear { .. })));
    assert_eq!(recorder.draws.len(), 10);
}

// ============================================================================
// Drawing
// ============================================================================

#[test]
fn test_frame_draw_sequence() {
    let mut field = field();
    field.attach(Recorder::new(), 800, 600).unwrap();
    run_frames(&mut field, 1);

    let draws = &field.surface().unwrap().draws;
    assert_eq!(
        draws[0],
        Draw::Clear {
            size: Vec2::new(800.0, 600.0)
        }
    );

    let disks: Vec<&Draw> = draws[1..33].iter().collect();
    for (disk, particle) in disks.iter().zip(field.particles()) {
        assert_eq!(
            **disk,
            Draw::Disk {
                center: particle.position,
                radius: 1.5,
                color: Rgba::new(0, 169, 255, 0.7),
            }
        );
    }
    assert!(draws[33..].iter().all(|d| matches!(d, Draw::Line { .. })));
}

#[test]
fn test_lines_match_pairwise_distances() {
    let mut field = field();
    field.attach(Recorder::new(), 800, 600).unwrap();
    run_frames(&mut field, 1);

    let particles = field.particles().to_vec();
    let mut expected = Vec::new();
    for i in 0..particles.len() {
        for j in i + 1..particles.len() {
            let d = particles[i].position.distance(particles[j].position);
            if d < 120.0 {
                expected.push((particles[i].position, particles[j].position, 1.0 - d / 120.0));
            }
        }
    }

    let lines = field.surface().unwrap().lines();
    assert_eq!(lines.len(), expected.len());
    for ((a, b, alpha), (ea, eb, ealpha)) in lines.iter().zip(&expected) {
        assert_eq!((a, b), (ea, eb));
        assert!((alpha - ealpha).abs() < 1e-6);
        assert!((0.0..=1.0).contains(alpha));
    }
    assert_eq!(field.stats().connections_drawn, expected.len());
}

#[test]
fn test_line_style_uses_stroke_color_and_width() {
    let config = FieldConfig::default()
        .with_seed(1)
        .with_density(100.0)
        .with_stroke(Rgba::rgb(255, 0, 0))
        .with_line_width(2.0);
    let mut field = field_with(config);
    field.attach(Recorder::new(), 100, 100).unwrap();
    run_frames(&mut field, 1);

    let lines: Vec<&Draw> = field
        .surface()
        .unwrap()
        .draws
        .iter()
        .filter(|d| matches!(d, Draw::Line { .. }))
        .collect();
    assert!(!lines.is_empty());
    for line in lines {
        let Draw::Line { color, width, .. } = line else {
            unreachable!()
        };
        assert_eq!((color.r, color.g, color.b), (255, 0, 0));
        assert_eq!(*width, 2.0);
    }
}

#[test]
fn test_zero_threshold_draws_no_lines() {
    let config = FieldConfig::default()
        .with_seed(1)
        .with_density(100.0)
        .with_connection_distance(0.0);
    let mut field = field_with(config);
    field.attach(Recorder::new(), 100, 100).unwrap();
    run_frames(&mut field, 3);
    assert!(field.surface().unwrap().lines().is_empty());
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_attach_without_context_fails_and_schedules_nothing() {
    let mut field = field();
    let err = field.attach(Recorder::without_context(), 800, 600).unwrap_err();

    assert_eq!(err, AttachError::NoContext(SurfaceError::ContextUnavailable));
    assert!(!field.is_attached());
    assert!(!field.is_running());
    assert_eq!(field.scheduler().total_requested(), 0);
    assert_eq!(field.particles().len(), 0);
    assert_eq!(run_frames(&mut field, 5), 0);
}

#[test]
fn test_attach_twice_fails() {
    let mut field = field();
    field.attach(Recorder::new(), 800, 600).unwrap();
    assert_eq!(
        field.attach(Recorder::new(), 10, 10),
        Err(AttachError::AlreadyAttached)
    );
    assert_eq!(field.surface().unwrap().size(), (800, 600));
    assert_eq!(field.scheduler().pending(), 1);
}

#[test]
fn test_attach_rejects_invalid_config() {
    let mut field = field_with(FieldConfig::default().with_density(-1.0));
    assert_eq!(
        field.attach(Recorder::new(), 800, 600),
        Err(AttachError::InvalidConfig(ConfigError::Density(-1.0)))
    );
    assert_eq!(field.scheduler().total_requested(), 0);
}

#[test]
fn test_reattach_after_detach() {
    let mut field = field();
    field.attach(Recorder::new(), 800, 600).unwrap();
    let surface = field.detach().unwrap();
    assert_eq!(surface.size(), (800, 600));

    field.attach(surface, 400, 300).unwrap();
    assert_eq!(field.particles().len(), 8);
    assert_eq!(run_frames(&mut field, 3), 3);
}

#[test]
fn test_no_frame_runs_after_detach() {
    let mut field = field();
    field.attach(Recorder::new(), 800, 600).unwrap();
    run_frames(&mut field, 2);
    let request = field.pending_frame().unwrap();

    field.detach();

    assert_eq!(field.scheduler().pending(), 0);
    assert!(!field.run_frame(request));
    assert_eq!(field.stats().frames, 2);
}

#[test]
fn test_detach_is_idempotent() {
    let mut once = field();
    once.attach(Recorder::new(), 800, 600).unwrap();
    once.detach();

    let mut twice = field();
    twice.attach(Recorder::new(), 800, 600).unwrap();
    twice.detach();
    assert!(twice.detach().is_none());

    for f in [&once, &twice] {
        assert!(!f.is_attached());
        assert!(!f.is_running());
        assert!(f.particles().is_empty());
        assert_eq!(f.scheduler().pending(), 0);
        assert_eq!(f.scheduler().total_cancelled(), 1);
    }
}

#[test]
fn test_detach_without_attach_is_noop() {
    let mut field = field();
    assert!(field.detach().is_none());
    assert_eq!(field.scheduler().total_cancelled(), 0);
}

#[test]
fn test_resize_while_detached_is_ignored() {
    let mut field = field();
    field.resize(800, 600);
    assert!(field.particles().is_empty());
    assert_eq!(field.stats().generations, 0);
}

#[test]
fn test_rapid_attach_detach_cycles_leave_no_frames() {
    let mut field = field();
    let mut surface = Recorder::new();
    for _ in 0..50 {
        field.attach(surface, 800, 600).unwrap();
        surface = field.detach().unwrap();
    }
    assert_eq!(field.scheduler().pending(), 0);
    assert_eq!(field.scheduler().total_requested(), 50);
    assert_eq!(field.scheduler().total_cancelled(), 50);
    assert!(surface.draws.is_empty());
}

#[test]
fn test_each_frame_requests_exactly_one_more() {
    let mut field = field();
    field.attach(Recorder::new(), 800, 600).unwrap();
    for _ in 0..5 {
        assert_eq!(field.scheduler().pending(), 1);
        run_frames(&mut field, 1);
    }
    assert_eq!(field.scheduler().total_requested(), 6);
}
