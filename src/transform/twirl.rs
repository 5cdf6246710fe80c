//! Twirl: a swirl that is strongest at the centre and fades to nothing at
//! the edge of the inscribed circle

use crate::buffer::PixelBuffer;
use crate::error::{Error, Result};

/// Twirl by `angle` radians at the centre.
///
/// Inside radius `R = min(w, h) / 2` a pixel at distance `d` has its polar
/// angle turned by `angle · (R - d) / R` and is sampled nearest-neighbour
/// from there; pixels outside `R` are copied.
pub fn twirl(buffer: &PixelBuffer, angle: f64) -> Result<PixelBuffer> {
    if !angle.is_finite() {
        return Err(Error::parameter("twirl angle", format!("{} is not finite", angle)));
    }
    let w = buffer.width() as usize;
    let h = buffer.height() as usize;
    let cx = w as f64 / 2.0;
    let cy = h as f64 / 2.0;
    let radius = cx.min(cy);

    Ok(PixelBuffer::par_from_fn(buffer.width(), buffer.height(), |x, y| {
        let dx = x as f64 - cx;
        let dy = y as f64 - cy;
        let d = dx.hypot(dy);
        if d >= radius {
            return buffer.at(x, y);
        }
        let a = dy.atan2(dx) + angle * (radius - d) / radius;
        let sx = (cx + d * a.cos()).round().clamp(0.0, (w - 1) as f64) as usize;
        let sy = (cy + d * a.sin()).round().clamp(0.0, (h - 1) as f64) as usize;
        buffer.at(sx, sy)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Color;

    fn sample() -> PixelBuffer {
        PixelBuffer::par_from_fn(12, 9, |x, y| Color::rgb((x * 20) as u8, (y * 25) as u8, 1))
    }

    #[test]
    fn test_zero_angle_is_identity() {
        let src = sample();
        assert_eq!(twirl(&src, 0.0).unwrap(), src);
    }

    #[test]
    fn test_outside_radius_untouched() {
        let src = sample();
        let out = twirl(&src, std::f64::consts::PI).unwrap();
        // Corners are further than 4.5 from the centre (6, 4.5)
        for (x, y) in [(0, 0), (11, 0), (0, 8), (11, 8), (1, 4)] {
            assert_eq!(out.at(x, y), src.at(x, y));
        }
    }

    #[test]
    fn test_turn_grows_toward_centre() {
        let src = sample();
        let out = twirl(&src, std::f64::consts::PI).unwrap();
        // Near the centre the turn is about 0.75 of a half turn
        assert_eq!(out.at(7, 4), src.at(6, 6));
        assert_ne!(out, src);
    }
}
