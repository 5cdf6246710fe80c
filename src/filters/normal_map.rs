//! Tangent-space normal map from a height field

use super::point::shade;
use crate::buffer::{Color, PixelBuffer};
use crate::error::{Error, Result};

pub const DEFAULT_NORMAL_STRENGTH: f32 = 8.0;

/// Map a signed unit component to a byte
#[inline]
fn encode(c: f32) -> u8 {
    ((c + 1.0) * 127.5).round().clamp(0.0, 255.0) as u8
}

/// Build a normal map treating the grayscale luma as height.
///
/// Neighbours wrap around the canvas edges, so tiling the output is
/// seamless. Larger `strength` exaggerates the relief.
pub fn normal_map(buffer: &PixelBuffer, strength: f32) -> Result<PixelBuffer> {
    if !(strength > 0.0 && strength.is_finite()) {
        return Err(Error::parameter(
            "normal map strength",
            format!("must be positive, got {}", strength),
        ));
    }
    let w = buffer.width() as usize;
    let h = buffer.height() as usize;
    let heights: Vec<f32> = buffer
        .pixels()
        .iter()
        .map(|&p| shade(Color::from_argb(p)) as f32 / 255.0)
        .collect();
    let height = |x: isize, y: isize| {
        let xx = x.rem_euclid(w as isize) as usize;
        let yy = y.rem_euclid(h as isize) as usize;
        heights[yy * w + xx]
    };
    let dz = 1.0 / strength;

    Ok(PixelBuffer::par_from_fn(buffer.width(), buffer.height(), |x, y| {
        let (x, y) = (x as isize, y as isize);
        let tl = height(x - 1, y - 1);
        let t = height(x, y - 1);
        let tr = height(x + 1, y - 1);
        let l = height(x - 1, y);
        let r = height(x + 1, y);
        let bl = height(x - 1, y + 1);
        let b = height(x, y + 1);
        let br = height(x + 1, y + 1);

        let dx = (tr + 2.0 * r + br) - (tl + 2.0 * l + bl);
        let dy = (bl + 2.0 * b + br) - (tl + 2.0 * t + tr);
        let norm = (dx * dx + dy * dy + dz * dz).sqrt();

        Color::rgb(encode(dx / norm), encode(dy / norm), encode(dz / norm))
    }))
}
