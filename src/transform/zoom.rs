//! Integer zoom by two passes of 1-D linear interpolation

use log::debug;

use crate::buffer::{Color, PixelBuffer};
use crate::error::{Error, Result};

/// Largest output width/height a zoom will produce; bigger results are
/// cropped around their centre
pub const DEFAULT_MAX_ZOOM_EXTENT: u32 = 8192;

#[inline]
fn lerp_channel(a: u8, b: u8, t: i32, k: i32) -> u8 {
    (a as i32 + (b as i32 - a as i32) * t / k) as u8
}

/// Step `t` of `k` from `a` toward `b`, all four channels
#[inline]
fn lerp(a: Color, b: Color, t: usize, k: usize) -> Color {
    let (t, k) = (t as i32, k as i32);
    Color::argb(
        lerp_channel(a.a, b.a, t, k),
        lerp_channel(a.r, b.r, t, k),
        lerp_channel(a.g, b.g, t, k),
        lerp_channel(a.b, b.b, t, k),
    )
}

/// Visible `(start, len)` of an axis `full` pixels long, capped at `max`
#[inline]
fn window(full: usize, max: usize) -> (usize, usize) {
    if full > max {
        ((full - max) / 2, max)
    } else {
        (0, full)
    }
}

/// Enlarge `buffer` by `factor`.
///
/// Each row is first stretched horizontally, blending every source pixel
/// toward its right neighbour over `factor` samples (the last column blends
/// with itself); the stretched rows are then blended vertically toward the
/// row below in the same way. Axes longer than `max_extent` are cropped,
/// centred, and only the visible window is ever computed.
pub fn zoom(buffer: &PixelBuffer, factor: u32, max_extent: u32) -> Result<PixelBuffer> {
    if factor == 0 {
        return Err(Error::parameter("zoom factor", "must be at least 1"));
    }
    if max_extent == 0 {
        return Err(Error::parameter("zoom extent", "must be positive"));
    }
    let k = factor as usize;
    let w = buffer.width() as usize;
    let h = buffer.height() as usize;
    let (full_w, full_h) = match (w.checked_mul(k), h.checked_mul(k)) {
        (Some(fw), Some(fh)) => (fw, fh),
        _ => return Err(Error::parameter("zoom factor", format!("{} overflows", factor))),
    };
    let (x_start, out_w) = window(full_w, max_extent as usize);
    let (y_start, out_h) = window(full_h, max_extent as usize);
    debug!(
        "zoom x{}: {}x{} -> {}x{} (window at {}, {})",
        factor, w, h, out_w, out_h, x_start, y_start
    );

    // Horizontal pass, only over the source rows the window touches
    let first_row = y_start / k;
    let last_row = ((y_start + out_h - 1) / k + 1).min(h - 1);
    let stretched = PixelBuffer::par_from_fn(out_w as u32, (last_row - first_row + 1) as u32, |ox, row| {
        let y = first_row + row;
        let fx = x_start + ox;
        let x = fx / k;
        let left = buffer.at(x, y);
        let right = if x + 1 < w { buffer.at(x + 1, y) } else { left };
        lerp(left, right, fx % k, k)
    });

    // Vertical pass
    Ok(PixelBuffer::par_from_fn(out_w as u32, out_h as u32, |ox, oy| {
        let fy = y_start + oy;
        let y = fy / k;
        let top = stretched.at(ox, y - first_row);
        let below = if y + 1 < h {
            stretched.at(ox, y + 1 - first_row)
        } else {
            top
        };
        lerp(top, below, fy % k, k)
    }))
}
