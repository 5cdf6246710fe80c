//! Arbitrary-angle rotation onto an enlarged canvas

use log::debug;

use crate::buffer::{Color, PixelBuffer};
use crate::error::{Error, Result};

/// Fill for canvas area the rotated image does not cover
pub const DEFAULT_BACKGROUND: Color = Color::WHITE;

/// Drop floating noise so right angles produce exact 0 / ±1
#[inline]
fn snap(v: f64) -> f64 {
    const EPS: f64 = 1e-12;
    if v.abs() < EPS {
        0.0
    } else if (v.abs() - 1.0).abs() < EPS {
        v.signum()
    } else {
        v
    }
}

/// Bounding extent of a rotated side, rounded up
#[inline]
fn extent(v: f64) -> u32 {
    ((v - 1e-9).ceil() as u32).max(1)
}

/// Rotate by `degrees` (clockwise on screen, y grows downward).
///
/// The canvas grows to the rotated bounding box. Every destination pixel
/// is mapped back through the inverse rotation about both canvas centres
/// and takes the nearest source pixel; positions outside the source get
/// `background`.
pub fn rotate(buffer: &PixelBuffer, degrees: f64, background: Color) -> Result<PixelBuffer> {
    if !degrees.is_finite() {
        return Err(Error::parameter("rotation angle", format!("{} is not finite", degrees)));
    }
    let theta = degrees.to_radians();
    let (sin, cos) = (snap(theta.sin()), snap(theta.cos()));
    let w = buffer.width() as f64;
    let h = buffer.height() as f64;
    let new_w = extent(w * cos.abs() + h * sin.abs());
    let new_h = extent(w * sin.abs() + h * cos.abs());
    debug!(
        "rotate {}°: {}x{} -> {}x{}",
        degrees,
        buffer.width(),
        buffer.height(),
        new_w,
        new_h
    );

    let (src_cx, src_cy) = ((w - 1.0) / 2.0, (h - 1.0) / 2.0);
    let (dst_cx, dst_cy) = ((new_w as f64 - 1.0) / 2.0, (new_h as f64 - 1.0) / 2.0);

    Ok(PixelBuffer::par_from_fn(new_w, new_h, |x, y| {
        let dx = x as f64 - dst_cx;
        let dy = y as f64 - dst_cy;
        let sx = (dx * cos + dy * sin + src_cx).round();
        let sy = (-dx * sin + dy * cos + src_cy).round();
        buffer
            .get_pixel(sx as i32, sy as i32)
            .unwrap_or(background)
    }))
}
