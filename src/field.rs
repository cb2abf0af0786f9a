//! The particle field simulator.
//!
//! A [`ParticleField`] owns a population of drifting [`Particle`]s and the
//! [`Surface`] it draws them on. Each frame it:
//!
//! 1. clears the surface
//! 2. advances every particle one Euler step, bouncing off the walls
//! 3. fills a disk per particle
//! 4. strokes a line between every pair closer than the connection
//!    threshold, fading from opaque at distance 0 to invisible at the
//!    threshold
//! 5. requests the next frame from its [`FrameScheduler`]
//!
//! The population size follows the surface area (`floor(w * h / density)`)
//! and is thrown away and regenerated on every resize.
//!
//! # Lifecycle
//!
//! ```ignore
//! let mut field = ParticleField::new(FieldConfig::default(), ManualScheduler::new());
//! field.attach(Canvas::new(), 800, 600)?;   // 32 particles, first frame requested
//! field.resize(1024, 768);                  // fresh population of 52
//! let canvas = field.detach();              // pending frame cancelled
//! ```

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, trace, warn};

use crate::config::FieldConfig;
use crate::error::AttachError;
use crate::particle::{connection_alpha, particle_count, Particle};
use crate::scheduler::{FrameRequest, FrameScheduler};
use crate::surface::{DrawContext, Surface};

/// Counters describing what the field has done so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldStats {
    /// Frames executed since creation.
    pub frames: u64,
    /// Times the population was (re)generated.
    pub generations: u64,
    /// Particles drawn in the last frame.
    pub particles_drawn: usize,
    /// Connection lines drawn in the last frame.
    pub connections_drawn: usize,
}

/// Animated field of drifting, proximity-connected particles.
pub struct ParticleField<S: Surface, F: FrameScheduler> {
    config: FieldConfig,
    scheduler: F,
    rng: StdRng,
    surface: Option<S>,
    particles: Vec<Particle>,
    bounds: Vec2,
    pending: Option<FrameRequest>,
    context_lost: bool,
    stats: FieldStats,
}

impl<S: Surface, F: FrameScheduler> ParticleField<S, F> {
    /// Create a detached field.
    pub fn new(config: FieldConfig, scheduler: F) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config,
            scheduler,
            rng,
            surface: None,
            particles: Vec::new(),
            bounds: Vec2::ZERO,
            pending: None,
            context_lost: false,
            stats: FieldStats::default(),
        }
    }

    /// Bind to `surface`, size it, populate it, and request the first frame.
    ///
    /// Fails without scheduling anything if the field is already attached,
    /// the configuration is invalid, or the surface has no drawing context.
    pub fn attach(&mut self, mut surface: S, width: u32, height: u32) -> Result<(), AttachError> {
        if self.surface.is_some() {
            return Err(AttachError::AlreadyAttached);
        }
        self.config.validate()?;
        surface.context()?;

        surface.set_size(width, height);
        self.surface = Some(surface);
        self.context_lost = false;
        self.set_bounds(width, height);
        self.regenerate(width, height);
        self.pending = Some(self.scheduler.request_frame());

        info!(
            width,
            height,
            particles = self.particles.len(),
            "Particle field attached"
        );
        Ok(())
    }

    /// Resize the surface and regenerate the whole population.
    ///
    /// Degenerate sizes produce an empty field. Ignored while detached.
    pub fn resize(&mut self, width: u32, height: u32) {
        let Some(surface) = self.surface.as_mut() else {
            debug!(width, height, "Resize ignored; field is detached");
            return;
        };

        surface.set_size(width, height);
        self.set_bounds(width, height);
        self.regenerate(width, height);

        info!(
            width,
            height,
            particles = self.particles.len(),
            "Particle field resized"
        );
    }

    /// Stop animating, drop every particle, and hand the surface back.
    ///
    /// Safe to call any number of times.
    pub fn detach(&mut self) -> Option<S> {
        if let Some(request) = self.pending.take() {
            self.scheduler.cancel_frame(request);
        }
        self.particles.clear();
        self.bounds = Vec2::ZERO;

        let surface = self.surface.take();
        if surface.is_some() {
            info!(frames = self.stats.frames, "Particle field detached");
        }
        surface
    }

    /// Execute the frame `request` refers to.
    ///
    /// Returns `false` and does nothing when `request` is not the
    /// outstanding request, which covers frames firing after `detach`.
    pub fn run_frame(&mut self, request: FrameRequest) -> bool {
        if self.pending != Some(request) {
            trace!(request = request.id(), "Ignoring stale frame request");
            return false;
        }
        self.pending = None;

        for particle in &mut self.particles {
            particle.step(self.bounds);
        }
        self.draw();
        self.stats.frames += 1;

        self.pending = Some(self.scheduler.request_frame());
        true
    }

    fn draw(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        let ctx = match surface.context() {
            Ok(ctx) => {
                if self.context_lost {
                    info!("Drawing context restored");
                    self.context_lost = false;
                }
                ctx
            }
            Err(e) => {
                if !self.context_lost {
                    warn!(error = %e, "Drawing context lost; frames will draw nothing");
                    self.context_lost = true;
                }
                self.stats.particles_drawn = 0;
                self.stats.connections_drawn = 0;
                return;
            }
        };

        let (drawn, connections) = render(ctx, &self.particles, self.bounds, &self.config);
        self.stats.particles_drawn = drawn;
        self.stats.connections_drawn = connections;
        trace!(particles = drawn, connections, "Frame drawn");
    }

    fn set_bounds(&mut self, width: u32, height: u32) {
        self.bounds = Vec2::new(width as f32, height as f32);
    }

    /// Throw away every particle and spawn a fresh population.
    fn regenerate(&mut self, width: u32, height: u32) {
        let count = particle_count(width, height, self.config.density);

        self.particles.clear();
        self.particles.reserve_exact(count);
        for _ in 0..count {
            self.particles.push(Particle::random(
                &mut self.rng,
                self.bounds,
                self.config.max_speed,
                self.config.radius,
            ));
        }
        self.stats.generations += 1;
    }

    /// Whether a surface is bound.
    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    /// Whether a frame request is outstanding.
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// The outstanding frame request, if any.
    pub fn pending_frame(&self) -> Option<FrameRequest> {
        self.pending
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Surface bounds the particles bounce inside.
    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn stats(&self) -> FieldStats {
        self.stats
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }
}

impl<S: Surface, F: FrameScheduler> Drop for ParticleField<S, F> {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Draw one frame of `particles` onto `ctx`.
///
/// Returns `(particles_drawn, connections_drawn)`.
fn render<C: DrawContext>(
    ctx: &mut C,
    particles: &[Particle],
    bounds: Vec2,
    config: &FieldConfig,
) -> (usize, usize) {
    ctx.clear_rect(Vec2::ZERO, bounds);

    for particle in particles {
        ctx.fill_disk(particle.position, particle.radius, config.fill);
    }

    let threshold = config.connection_distance;
    let mut connections = 0;
    for (i, a) in particles.iter().enumerate() {
        for b in &particles[i + 1..] {
            let distance = a.position.distance(b.position);
            if let Some(alpha) = connection_alpha(distance, threshold) {
                ctx.stroke_line(
                    a.position,
                    b.position,
                    config.stroke.with_alpha(alpha),
                    config.line_width,
                );
                connections += 1;
            }
        }
    }

    (particles.len(), connections)
}
