//! Windowed median ("watercolor") filter

use super::convolve::sharpen;
use crate::buffer::PixelBuffer;

pub const DEFAULT_WATERCOLOR_RADIUS: usize = 2;

/// Per-channel median over the `(2r+1)²` window. Pixels whose window leaves
/// the canvas are copied, like the convolution border.
pub fn median(buffer: &PixelBuffer, radius: usize) -> PixelBuffer {
    let w = buffer.width() as usize;
    let h = buffer.height() as usize;
    let side = 2 * radius + 1;
    let mid = side * side / 2;

    PixelBuffer::par_from_fn(buffer.width(), buffer.height(), |x, y| {
        let src = buffer.at(x, y);
        if x < radius || y < radius || x + radius >= w || y + radius >= h {
            return src;
        }
        let mut rs = Vec::with_capacity(side * side);
        let mut gs = Vec::with_capacity(side * side);
        let mut bs = Vec::with_capacity(side * side);
        for yy in y - radius..=y + radius {
            for xx in x - radius..=x + radius {
                let c = buffer.at(xx, yy);
                rs.push(c.r);
                gs.push(c.g);
                bs.push(c.b);
            }
        }
        // Each channel is ranked on its own
        let r = *rs.select_nth_unstable(mid).1;
        let g = *gs.select_nth_unstable(mid).1;
        let b = *bs.select_nth_unstable(mid).1;
        src.with_rgb(r, g, b)
    })
}

/// Median smoothing followed by one sharpen pass
pub fn watercolor(buffer: &PixelBuffer, radius: usize) -> PixelBuffer {
    sharpen(&median(buffer, radius))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Color;

    #[test]
    fn test_uniform_image_unchanged() {
        let src = PixelBuffer::filled(9, 7, Color::argb(10, 20, 30, 40)).unwrap();
        assert_eq!(median(&src, 2), src);
        assert_eq!(watercolor(&src, 2), src);
    }

    #[test]
    fn test_removes_salt_noise() {
        let mut src = PixelBuffer::filled(5, 5, Color::BLACK).unwrap();
        src.set_pixel(2, 2, Color::WHITE);
        let out = median(&src, 1);
        assert_eq!(out.at(2, 2), Color::BLACK);
    }

    #[test]
    fn test_channels_ranked_independently() {
        // Window of 9: five pixels red-heavy, four green-heavy
        let src = PixelBuffer::par_from_fn(3, 3, |x, y| {
            if (x + y) % 2 == 0 {
                Color::rgb(200, 10, 0)
            } else {
                Color::rgb(10, 200, 0)
            }
        });
        assert_eq!(median(&src, 1).at(1, 1), Color::rgb(200, 10, 0));
    }

    #[test]
    fn test_window_larger_than_image_copies() {
        let src = PixelBuffer::par_from_fn(3, 3, |x, y| Color::rgb(x as u8, y as u8, 0));
        assert_eq!(median(&src, 2), src);
    }
}
