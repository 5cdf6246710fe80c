//! Stateless per-pixel color remaps. Alpha always passes through.

use crate::buffer::{clamp_channel, Color, PixelBuffer};
use crate::error::{Error, Result};

/// Apply `f` to every pixel, rows in parallel
pub(crate) fn map_pixels<F>(buffer: &PixelBuffer, f: F) -> PixelBuffer
where
    F: Fn(Color) -> Color + Sync,
{
    PixelBuffer::par_from_fn(buffer.width(), buffer.height(), |x, y| f(buffer.at(x, y)))
}

/// Luma `round(0.30 r + 0.59 g + 0.11 b)`.
///
/// Computed exactly in hundredths; halves round to even, so pure red
/// (76.5) gives 76 and pure green (150.45) gives 150.
#[inline]
pub fn shade(color: Color) -> u8 {
    let n = 30 * color.r as u32 + 59 * color.g as u32 + 11 * color.b as u32;
    let (q, rem) = (n / 100, n % 100);
    let q = if rem > 50 || (rem == 50 && q % 2 == 1) { q + 1 } else { q };
    q.min(255) as u8
}

pub fn grayscale(buffer: &PixelBuffer) -> PixelBuffer {
    map_pixels(buffer, |c| {
        let s = shade(c);
        c.with_rgb(s, s, s)
    })
}

pub fn inverse(buffer: &PixelBuffer) -> PixelBuffer {
    map_pixels(buffer, |c| c.map_rgb(|v| 255 - v))
}

/// `255 · (c / 255)^gamma`, rounded. Gamma below 1 brightens.
pub fn gamma(buffer: &PixelBuffer, gamma: f64) -> Result<PixelBuffer> {
    if !(gamma > 0.0 && gamma.is_finite()) {
        return Err(Error::parameter("gamma", format!("must be positive, got {}", gamma)));
    }
    let mut lut = [0u8; 256];
    for (i, v) in lut.iter_mut().enumerate() {
        *v = clamp_channel((255.0 * (i as f64 / 255.0).powf(gamma)) as f32);
    }
    Ok(map_pixels(buffer, |c| c.map_rgb(|v| lut[v as usize])))
}

/// Add `k` to every channel, saturating at 0 and 255
pub fn offset(buffer: &PixelBuffer, k: i32) -> PixelBuffer {
    map_pixels(buffer, |c| c.map_rgb(|v| (v as i32 + k).clamp(0, 255) as u8))
}

/// Channels strictly above `threshold` become 255, the rest 0
pub fn binarize(buffer: &PixelBuffer, threshold: u8) -> PixelBuffer {
    map_pixels(buffer, |c| c.map_rgb(|v| if v > threshold { 255 } else { 0 }))
}
