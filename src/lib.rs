//! # Particle Field
//!
//! An ambient animated background: points drift across a surface, bounce off
//! its walls, and are joined by lines that fade with distance.
//!
//! The simulator ([`ParticleField`]) is independent of any windowing or GPU
//! stack. It draws through the [`Surface`] / [`DrawContext`] traits and
//! paces itself through a [`FrameScheduler`], so the same code runs in a
//! native window, offscreen, or under test.
//!
//! ## Quick Start
//!
//! ```ignore
//! use particle_field::prelude::*;
//!
//! fn main() -> Result<(), RunError> {
//!     run(FieldConfig::default(), WindowConfig::default().with_title("Background"))
//! }
//! ```
//!
//! ## Headless
//!
//! ```ignore
//! use particle_field::prelude::*;
//!
//! let mut field = ParticleField::new(FieldConfig::default().with_seed(1), ManualScheduler::new());
//! field.attach(Canvas::new(), 800, 600)?;
//! assert_eq!(field.particles().len(), 32);
//!
//! for _ in 0..120 {
//!     let request = field.scheduler_mut().next_due().unwrap();
//!     field.run_frame(request);
//! }
//! field.surface().unwrap().save_png("frame.png")?;
//! ```
//!
//! ## Core Concepts
//!
//! | Concept | Behavior |
//! |---------|----------|
//! | Population | `floor(width * height / density)` particles, regenerated on every resize |
//! | Motion | one Euler step per frame, velocity sign flips at the walls, no clamping |
//! | Connections | every pair closer than the threshold, opacity `1 - d / threshold` |
//! | Lifecycle | `attach` once, `resize` any time, `detach` idempotently |

pub mod canvas;
pub mod config;
pub mod error;
pub mod field;
mod gpu;
pub mod particle;
pub mod scheduler;
pub mod surface;
pub mod time;
pub mod window;

pub use canvas::Canvas;
pub use config::FieldConfig;
pub use error::{AttachError, ConfigError, GpuError, RunError, SnapshotError, SurfaceError};
pub use field::{FieldStats, ParticleField};
pub use glam::Vec2;
pub use particle::Particle;
pub use scheduler::{FrameRequest, FrameScheduler, ManualScheduler};
pub use surface::{DrawContext, Rgba, Surface};
pub use window::{run, RedrawScheduler, WindowConfig};

/// Everything needed to build and host a field.
pub mod prelude {
    pub use crate::canvas::Canvas;
    pub use crate::config::FieldConfig;
    pub use crate::error::{AttachError, RunError};
    pub use crate::field::ParticleField;
    pub use crate::scheduler::{FrameRequest, FrameScheduler, ManualScheduler};
    pub use crate::surface::{DrawContext, Rgba, Surface};
    pub use crate::window::{run, WindowConfig};
    pub use glam::Vec2;
}
