//! Field configuration.
//!
//! All tunable constants of the particle field live here with the values
//! that produce the classic "drifting network" background. Use the `with_*`
//! methods to override them:
//!
//! ```ignore
//! use particle_field::prelude::*;
//!
//! let config = FieldConfig::default()
//!     .with_density(20_000.0)
//!     .with_connection_distance(100.0)
//!     .with_seed(7);
//! ```

use crate::error::ConfigError;
use crate::surface::Rgba;

/// Default particle radius in pixels.
pub const DEFAULT_RADIUS: f32 = 1.5;
/// Default per-axis speed limit; velocities are drawn from `[-0.2, 0.2)`.
pub const DEFAULT_MAX_SPEED: f32 = 0.2;
/// Default connection threshold in pixels.
pub const DEFAULT_CONNECTION_DISTANCE: f32 = 120.0;
/// Default surface area (square pixels) per particle.
pub const DEFAULT_DENSITY: f32 = 15_000.0;
/// Default connection stroke width in pixels.
pub const DEFAULT_LINE_WIDTH: f32 = 0.5;
/// Default particle fill.
pub const DEFAULT_FILL: Rgba = Rgba::new(0, 169, 255, 0.7);
/// Default connection stroke; opacity is replaced per line.
pub const DEFAULT_STROKE: Rgba = Rgba::rgb(0, 169, 255);

/// Tunable parameters of a [`ParticleField`](crate::field::ParticleField).
#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    /// Disk radius of every particle.
    pub radius: f32,
    /// Velocity components are sampled uniformly from `[-max_speed, max_speed)`.
    pub max_speed: f32,
    /// Pairs closer than this are connected.
    pub connection_distance: f32,
    /// Square pixels per particle.
    pub density: f32,
    /// Particle fill color.
    pub fill: Rgba,
    /// Connection stroke color (alpha ignored).
    pub stroke: Rgba,
    /// Connection stroke width.
    pub line_width: f32,
    /// RNG seed for reproducible populations. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            max_speed: DEFAULT_MAX_SPEED,
            connection_distance: DEFAULT_CONNECTION_DISTANCE,
            density: DEFAULT_DENSITY,
            fill: DEFAULT_FILL,
            stroke: DEFAULT_STROKE,
            line_width: DEFAULT_LINE_WIDTH,
            seed: None,
        }
    }
}

impl FieldConfig {
    /// Create a config with the default constants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the particle radius.
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Set the per-axis speed limit.
    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// Set the connection threshold.
    pub fn with_connection_distance(mut self, distance: f32) -> Self {
        self.connection_distance = distance;
        self
    }

    /// Set the area per particle.
    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    /// Set the particle fill color.
    pub fn with_fill(mut self, fill: Rgba) -> Self {
        self.fill = fill;
        self
    }

    /// Set the connection stroke color.
    pub fn with_stroke(mut self, stroke: Rgba) -> Self {
        self.stroke = stroke;
        self
    }

    /// Set the connection stroke width.
    pub fn with_line_width(mut self, width: f32) -> Self {
        self.line_width = width;
        self
    }

    /// Seed the particle RNG.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that every constant is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.density.is_finite() && self.density > 0.0) {
            return Err(ConfigError::Density(self.density));
        }
        if !(self.max_speed.is_finite() && self.max_speed > 0.0) {
            return Err(ConfigError::MaxSpeed(self.max_speed));
        }
        if !(self.connection_distance.is_finite() && self.connection_distance >= 0.0) {
            return Err(ConfigError::ConnectionDistance(self.connection_distance));
        }
        if !(self.radius.is_finite() && self.radius >= 0.0) {
            return Err(ConfigError::Radius(self.radius));
        }
        if !(self.line_width.is_finite() && self.line_width >= 0.0) {
            return Err(ConfigError::LineWidth(self.line_width));
        }
        Ok(())
    }
}
