//! Drawing surface abstraction.
//!
//! The simulator only needs three raster primitives: clear a region, fill a
//! disk, and stroke a line segment. A [`Surface`] owns the pixel dimensions
//! and hands out a [`DrawContext`] that performs the drawing.
//!
//! The host decides where the surface lives (a window, an offscreen
//! buffer, a test recorder). The simulator never touches placement.

use glam::Vec2;

use crate::error::SurfaceError;

/// A CSS-style color: 8-bit RGB channels plus floating point opacity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `[0, 1]`.
    pub a: f32,
}

impl Rgba {
    /// Create a color. Opacity is clamped to `[0, 1]`.
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        let a = if a < 0.0 {
            0.0
        } else if a > 1.0 {
            1.0
        } else {
            a
        };
        Self { r, g, b, a }
    }

    /// Fully opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same RGB channels with a different opacity.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Channels as normalized floats `[r, g, b, a]`.
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a,
        ]
    }
}

/// Raster primitives used by the simulator each frame.
pub trait DrawContext {
    /// Clear the rectangle `[origin, origin + size)` to transparent.
    fn clear_rect(&mut self, origin: Vec2, size: Vec2);

    /// Fill a disk of `radius` centered at `center`.
    fn fill_disk(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Stroke a straight segment from `a` to `b`.
    ///
    /// The segment's opacity is carried in `color.a`.
    fn stroke_line(&mut self, a: Vec2, b: Vec2, color: Rgba, width: f32);
}

/// A resizable 2D raster the host lends to the simulator.
pub trait Surface {
    type Context: DrawContext;

    /// Set the pixel dimensions of the backing buffer.
    fn set_size(&mut self, width: u32, height: u32);

    /// Current pixel dimensions.
    fn size(&self) -> (u32, u32);

    /// Borrow the 2D drawing context.
    fn context(&mut self) -> Result<&mut Self::Context, SurfaceError>;
}
