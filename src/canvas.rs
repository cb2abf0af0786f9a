//! Software raster surface.
//!
//! [`Canvas`] is an RGBA8 pixel buffer with source-over alpha blending and
//! anti-aliased disks and lines. The window host uploads it to the GPU each
//! frame; headless callers can write it out with [`Canvas::save_png`].

use std::path::Path;

use glam::Vec2;
use image::{ImageFormat, RgbaImage};
use tracing::info;

use crate::error::{SnapshotError, SurfaceError};
use crate::surface::{DrawContext, Rgba, Surface};

/// An in-memory RGBA8 raster (straight, non-premultiplied alpha).
#[derive(Clone, Debug, Default)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl Canvas {
    /// An empty 0x0 canvas. The field sizes it on attach.
    pub fn new() -> Self {
        Self::default()
    }

    /// A transparent canvas of the given size.
    pub fn with_size(width: u32, height: u32) -> Self {
        let mut canvas = Self::new();
        canvas.set_size(width, height);
        canvas
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw pixel bytes, row-major RGBA8.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// The pixel at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    /// Whether every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| p[3] == 0)
    }

    /// Write the canvas as a PNG, creating parent directories as needed.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        if self.pixels.is_empty() {
            return Err(SnapshotError::Empty);
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let image = RgbaImage::from_raw(self.width, self.height, self.as_bytes().to_vec())
            .ok_or(SnapshotError::Empty)?;
        image.save_with_format(path, ImageFormat::Png)?;

        info!(path = %path.display(), width = self.width, height = self.height, "Snapshot written");
        Ok(())
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Clip `[min, max]` to pixel index ranges.
    fn clip(&self, min: Vec2, max: Vec2) -> Option<(u32, u32, u32, u32)> {
        let x0 = min.x.floor().max(0.0);
        let y0 = min.y.floor().max(0.0);
        let x1 = max.x.ceil().min(self.width as f32);
        let y1 = max.y.ceil().min(self.height as f32);
        if !(x0 < x1 && y0 < y1) {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    /// Source-over blend `color` into one pixel, scaled by `coverage`.
    fn blend(&mut self, x: u32, y: u32, color: Rgba, coverage: f32) {
        let alpha = color.a * coverage;
        if alpha <= 0.0 {
            return;
        }

        let idx = self.index(x, y);
        let dst = &mut self.pixels[idx];
        let dst_alpha = dst[3] as f32 / 255.0;
        let out_alpha = alpha + dst_alpha * (1.0 - alpha);
        if out_alpha <= 0.0 {
            return;
        }

        let src = [color.r, color.g, color.b];
        for c in 0..3 {
            let value = (src[c] as f32 * alpha + dst[c] as f32 * dst_alpha * (1.0 - alpha)) / out_alpha;
            dst[c] = value.round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8;
    }
}

impl DrawContext for Canvas {
    fn clear_rect(&mut self, origin: Vec2, size: Vec2) {
        let Some((x0, y0, x1, y1)) = self.clip(origin, origin + size) else {
            return;
        };
        for y in y0..y1 {
            let start = self.index(x0, y);
            let end = self.index(x1 - 1, y) + 1;
            self.pixels[start..end].fill([0; 4]);
        }
    }

    fn fill_disk(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let reach = Vec2::splat(radius + 1.0);
        let Some((x0, y0, x1, y1)) = self.clip(center - reach, center + reach) else {
            return;
        };

        for y in y0..y1 {
            for x in x0..x1 {
                let pixel_center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let coverage = (radius + 0.5 - pixel_center.distance(center)).clamp(0.0, 1.0);
                self.blend(x, y, color, coverage);
            }
        }
    }

    fn stroke_line(&mut self, a: Vec2, b: Vec2, color: Rgba, width: f32) {
        let half = width * 0.5;
        let reach = Vec2::splat(half + 1.0);
        let Some((x0, y0, x1, y1)) = self.clip(a.min(b) - reach, a.max(b) + reach) else {
            return;
        };

        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let d = distance_to_segment(p, a, b);
                // Hairlines spread their width over a one pixel falloff
                let coverage = if half < 0.5 {
                    width * (1.0 - d).max(0.0)
                } else {
                    (half + 0.5 - d).clamp(0.0, 1.0)
                };
                self.blend(x, y, color, coverage);
            }
        }
    }
}

impl Surface for Canvas {
    type Context = Canvas;

    /// Resizing discards the contents, like an HTML canvas.
    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width as usize * height as usize, [0; 4]);
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn context(&mut self) -> Result<&mut Canvas, SurfaceError> {
        Ok(self)
    }
}

/// Shortest distance from `p` to the segment `ab`.
fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
