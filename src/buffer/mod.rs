//! In-memory ARGB bitmap every operation reads from or draws into

mod color;

pub use color::Color;
pub(crate) use color::clamp_channel;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Integer canvas coordinate. May lie outside the canvas while shapes are
/// being constructed; drawing clips it away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// Row-major grid of packed `0xAARRGGBB` samples.
///
/// Filters never share a buffer: they read `&PixelBuffer` and hand back a
/// freshly allocated one, while drawing tools take `&mut PixelBuffer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<u32>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a transparent black buffer
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::filled(width, height, Color::TRANSPARENT)
    }

    /// Create a buffer with every pixel set to `color`
    pub fn filled(width: u32, height: u32, color: Color) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyBuffer { width, height });
        }
        Ok(Self::blank(width, height, color))
    }

    /// Wrap existing packed pixel data
    pub fn from_argb(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyBuffer { width, height });
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(Error::BufferLength {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Dimensions are trusted by the caller (already validated non-zero)
    pub(crate) fn blank(width: u32, height: u32, color: Color) -> Self {
        Self {
            pixels: vec![color.to_argb(); width as usize * height as usize],
            width,
            height,
        }
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel, rows in parallel.
    /// `f` must only read shared state; rows are computed out of order.
    pub(crate) fn par_from_fn<F>(width: u32, height: u32, f: F) -> Self
    where
        F: Fn(usize, usize) -> Color + Sync,
    {
        let w = width as usize;
        let mut pixels = vec![0u32; w * height as usize];
        pixels
            .par_chunks_mut(w)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, px) in row.iter_mut().enumerate() {
                    *px = f(x, y).to_argb();
                }
            });
        Self {
            pixels,
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw packed samples, row-major
    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<u32> {
        self.pixels
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width as usize + x
    }

    /// Read a pixel that is known to be in bounds.
    /// Panics on out-of-range coordinates like slice indexing does.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> Color {
        Color::from_argb(self.pixels[self.index(x, y)])
    }

    #[inline]
    pub(crate) fn put(&mut self, x: usize, y: usize, color: Color) {
        let idx = self.index(x, y);
        self.pixels[idx] = color.to_argb();
    }

    /// Read a pixel, `None` outside the canvas
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        if self.in_bounds(x, y) {
            Some(self.at(x as usize, y as usize))
        } else {
            None
        }
    }

    /// Write a pixel; coordinates outside the canvas are ignored
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if self.in_bounds(x, y) {
            self.put(x as usize, y as usize, color);
        }
    }

    /// Clear to a solid color
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color.to_argb());
    }

    /// Horizontal span, clipped
    pub fn hline(&mut self, x1: i32, x2: i32, y: i32, color: Color) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let (lo, hi) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let lo = lo.max(0);
        let hi = hi.min(self.width as i32 - 1);
        if lo > hi {
            return;
        }
        let start = self.index(lo as usize, y as usize);
        let end = self.index(hi as usize, y as usize);
        self.pixels[start..=end].fill(color.to_argb());
    }

    /// Fill a rectangle, clipped
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        let (x0, x1) = (x.max(0), span_end(x, w, self.width));
        let (y0, y1) = (y.max(0), span_end(y, h, self.height));
        if x0 >= x1 {
            return;
        }
        for row in y0..y1 {
            self.hline(x0, x1 - 1, row, color);
        }
    }

    /// Draw a filled circle using horizontal spans
    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        if radius <= 0 {
            if radius == 0 {
                self.set_pixel(cx, cy, color);
            }
            return;
        }
        let r2 = radius * radius;
        for dy in -radius..=radius {
            let half = ((r2 - dy * dy) as f32).sqrt() as i32;
            self.hline(cx - half, cx + half, cy + dy, color);
        }
    }

    /// Copy the sub-region `(x, y, w, h)`, clipped to the canvas
    pub fn crop(&self, x: i32, y: i32, w: u32, h: u32) -> Result<Self> {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = span_end(x, w, self.width);
        let y1 = span_end(y, h, self.height);
        if x1 <= x0 || y1 <= y0 {
            return Err(Error::EmptyBuffer {
                width: (x1 - x0).max(0) as u32,
                height: (y1 - y0).max(0) as u32,
            });
        }
        let cw = (x1 - x0) as usize;
        let mut pixels = Vec::with_capacity(cw * (y1 - y0) as usize);
        for row in y0..y1 {
            let start = self.index(x0 as usize, row as usize);
            pixels.extend_from_slice(&self.pixels[start..start + cw]);
        }
        Ok(Self {
            pixels,
            width: cw as u32,
            height: (y1 - y0) as u32,
        })
    }

    /// Resize the canvas, keeping the top-left overlap and painting any new
    /// area with `background`. Content is never scaled.
    pub fn resized(&self, width: u32, height: u32, background: Color) -> Result<Self> {
        let mut out = Self::filled(width, height, background)?;
        let cw = self.width.min(width) as usize;
        for y in 0..self.height.min(height) as usize {
            let src = self.index(0, y);
            let dst = out.index(0, y);
            out.pixels[dst..dst + cw].copy_from_slice(&self.pixels[src..src + cw]);
        }
        Ok(out)
    }
}

/// Exclusive end of `start..start + len`, clamped to `limit`
#[inline]
fn span_end(start: i32, len: u32, limit: u32) -> i32 {
    (start as i64 + len as i64).clamp(0, limit.min(i32::MAX as u32) as i64) as i32
}
