//! Color-depth reduction: Floyd–Steinberg error diffusion and ordered
//! (Bayer) dithering, both over the same channel quantizer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::debug;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::buffer::{clamp_channel, Color, PixelBuffer};
use crate::error::{Error, Result};

/// Output value used when a channel has a single quantization level
pub const SINGLE_LEVEL_VALUE: u8 = 0;

/// Per-channel quantization level counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Levels {
    pub r: u32,
    pub g: u32,
    pub b: u32,
}

impl Levels {
    pub const fn new(r: u32, g: u32, b: u32) -> Self {
        Self { r, g, b }
    }

    pub const fn uniform(levels: u32) -> Self {
        Self::new(levels, levels, levels)
    }

    pub fn validate(&self) -> Result<()> {
        if self.r == 0 || self.g == 0 || self.b == 0 {
            return Err(Error::InvalidLevels {
                r: self.r,
                g: self.g,
                b: self.b,
            });
        }
        Ok(())
    }

    pub fn max(&self) -> u32 {
        self.r.max(self.g).max(self.b)
    }

    fn as_array(self) -> [u32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Levels {
    fn default() -> Self {
        Self::uniform(2)
    }
}

/// Distance between adjacent levels, zero for the single-level case
#[inline]
fn level_step(levels: u32) -> f32 {
    if levels <= 1 {
        0.0
    } else {
        255.0 / (levels - 1) as f32
    }
}

/// Snap `value` to the closest of `levels` values evenly spaced over
/// [0, 255].
#[inline]
pub fn nearest_level(value: f32, levels: u32) -> u8 {
    if levels <= 1 {
        return SINGLE_LEVEL_VALUE;
    }
    let step = level_step(levels);
    clamp_channel((value.clamp(0.0, 255.0) / step).round() * step)
}

// ============================================================================
// Error diffusion
// ============================================================================

/// (dx, dy, weight in sixteenths) for every not-yet-visited neighbour
const FLOYD_STEINBERG: [(i32, i32, f32); 4] = [(1, 0, 7.0), (-1, 1, 3.0), (0, 1, 5.0), (1, 1, 1.0)];

/// Floyd–Steinberg dithering.
///
/// Later pixels read error left behind by earlier ones, so the scan is
/// strictly sequential: left to right, top to bottom.
pub fn floyd_steinberg(buffer: &PixelBuffer, levels: Levels) -> Result<PixelBuffer> {
    levels.validate()?;
    let w = buffer.width() as usize;
    let h = buffer.height() as usize;
    let counts = levels.as_array();

    // Working copy that accumulates diffused error
    let mut work: Vec<[f32; 3]> = buffer
        .pixels()
        .iter()
        .map(|&p| Color::from_argb(p).channels().map(f32::from))
        .collect();
    let mut out = buffer.clone();

    for y in 0..h {
        for x in 0..w {
            let old = work[y * w + x];
            let mut new = [0u8; 3];
            let mut err = [0.0f32; 3];
            for ch in 0..3 {
                new[ch] = nearest_level(old[ch], counts[ch]);
                err[ch] = old[ch] - new[ch] as f32;
            }
            let src = buffer.at(x, y);
            out.put(x, y, src.with_rgb(new[0], new[1], new[2]));

            for (dx, dy, weight) in FLOYD_STEINBERG {
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if nx < 0 || nx >= w as i32 || ny >= h as i32 {
                    continue;
                }
                let target = &mut work[ny as usize * w + nx as usize];
                for ch in 0..3 {
                    target[ch] = (target[ch] + err[ch] * weight / 16.0).clamp(0.0, 255.0);
                }
            }
        }
    }
    Ok(out)
}

// ============================================================================
// Ordered dithering
// ============================================================================

/// Dispersed-dot threshold matrix holding every value in `0..n²` once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BayerMatrix {
    size: usize,
    /// Indexed `[x * size + y]`
    values: Vec<u32>,
}

static BAYER_CACHE: Lazy<Mutex<HashMap<u32, Arc<BayerMatrix>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

impl BayerMatrix {
    /// Build the `n x n` matrix recursively from the `n/2` one.
    ///
    /// Quadrant column 0 of quadrant row `y` holds `4m + 2y`, quadrant
    /// column 1 holds `4m + 3 - 2y`.
    pub fn new(n: u32) -> Result<Self> {
        if n == 0 || !n.is_power_of_two() {
            return Err(Error::InvalidMatrixSize(n));
        }
        Ok(Self::build(n as usize))
    }

    fn build(n: usize) -> Self {
        if n == 1 {
            return Self {
                size: 1,
                values: vec![0],
            };
        }
        let half = n / 2;
        let m = Self::build(half);
        let mut values = vec![0; n * n];
        for qy in 0..2u32 {
            for qx in 0..2u32 {
                let (scale_add, x0, y0) = if qx == 0 {
                    (2 * qy, 0, qy as usize * half)
                } else {
                    (3 - 2 * qy, half, qy as usize * half)
                };
                for i in 0..half {
                    for j in 0..half {
                        values[(x0 + i) * n + y0 + j] = 4 * m.get(i, j) + scale_add;
                    }
                }
            }
        }
        Self { size: n, values }
    }

    /// Memoized matrix shared across calls
    pub fn shared(n: u32) -> Result<Arc<Self>> {
        let mut cache = BAYER_CACHE.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(m) = cache.get(&n) {
            return Ok(Arc::clone(m));
        }
        let matrix = Arc::new(Self::new(n)?);
        cache.insert(n, Arc::clone(&matrix));
        Ok(matrix)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.values[x * self.size + y]
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Threshold offset in [-0.5, 0.5) for canvas position (x, y)
    #[inline]
    pub fn offset(&self, x: usize, y: usize) -> f32 {
        let n = self.size;
        self.get(x % n, y % n) as f32 / (n * n) as f32 - 0.5
    }
}

/// Smallest power of two no less than twice the largest level count
pub fn default_matrix_size(levels: Levels) -> u32 {
    (2 * levels.max()).next_power_of_two()
}

/// Ordered dithering with an `n x n` Bayer matrix (`n` a power of two)
pub fn ordered_dither(buffer: &PixelBuffer, levels: Levels, n: u32) -> Result<PixelBuffer> {
    levels.validate()?;
    let matrix = BayerMatrix::shared(n)?;
    debug!("ordered dither: {}x{} matrix, levels {:?}", n, n, levels);
    let counts = levels.as_array();
    let steps = counts.map(level_step);

    Ok(PixelBuffer::par_from_fn(buffer.width(), buffer.height(), |x, y| {
        let src = buffer.at(x, y);
        let err = matrix.offset(x, y);
        let mut out = [0u8; 3];
        for (ch, value) in src.channels().into_iter().enumerate() {
            let biased = (value as f32 + err * steps[ch]).clamp(0.0, 255.0);
            out[ch] = nearest_level(biased, counts[ch]);
        }
        src.with_rgb(out[0], out[1], out[2])
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(w: u32, h: u32) -> PixelBuffer {
        PixelBuffer::par_from_fn(w, h, |x, y| {
            let v = ((x + y * w as usize) * 255 / (w as usize * h as usize - 1)) as u8;
            Color::argb(77, v, 255 - v, v / 2)
        })
    }

    #[test]
    fn test_nearest_level() {
        assert_eq!(nearest_level(127.0, 2), 0);
        assert_eq!(nearest_level(128.0, 2), 255);
        assert_eq!(nearest_level(100.0, 3), 128);
        assert_eq!(nearest_level(200.0, 256), 200);
        assert_eq!(nearest_level(200.0, 1), SINGLE_LEVEL_VALUE);
    }

    #[test]
    fn test_floyd_steinberg_two_levels_is_binary() {
        let out = floyd_steinberg(&ramp(16, 16), Levels::uniform(2)).unwrap();
        for &p in out.pixels() {
            let c = Color::from_argb(p);
            for v in c.channels() {
                assert!(v == 0 || v == 255, "channel value {}", v);
            }
            assert_eq!(c.a, 77);
        }
    }

    #[test]
    fn test_floyd_steinberg_preserves_mean() {
        let src = PixelBuffer::filled(32, 32, Color::rgb(64, 64, 64)).unwrap();
        let out = floyd_steinberg(&src, Levels::uniform(2)).unwrap();
        let lit = out.pixels().iter().filter(|&&p| Color::from_argb(p).r == 255).count();
        // A quarter of the pixels should light up, give or take the edges
        let ratio = lit as f32 / 1024.0;
        assert!((ratio - 0.25).abs() < 0.07, "ratio {}", ratio);
    }

    #[test]
    fn test_floyd_steinberg_exact_diffusion() {
        // Any other split of 7/3/5/1 over the four neighbours changes the result
        let gray = [150u8, 60, 40, 40, 110, 60];
        let src = PixelBuffer::from_argb(
            3,
            2,
            gray.iter().map(|&v| Color::rgb(v, v, v).to_argb()).collect(),
        )
        .unwrap();
        let out = floyd_steinberg(&src, Levels::uniform(2)).unwrap();
        let got: Vec<u8> = out.pixels().iter().map(|&p| Color::from_argb(p).r).collect();
        assert_eq!(got, vec![255, 0, 0, 0, 0, 255]);
    }

    #[test]
    fn test_floyd_steinberg_error_stays_ahead_of_scan() {
        // A single mid pixel pushes error right and down only
        let mut src = PixelBuffer::filled(3, 3, Color::BLACK).unwrap();
        src.set_pixel(1, 1, Color::rgb(100, 100, 100));
        src.set_pixel(2, 1, Color::rgb(70, 70, 70));
        let out = floyd_steinberg(&src, Levels::uniform(2)).unwrap();
        // 70 + 100 * 7/16 = 113.75 stays dark; the row above is untouched
        assert!(out.pixels().iter().all(|&p| Color::from_argb(p).r == 0));
        src.set_pixel(2, 1, Color::rgb(90, 90, 90));
        let out = floyd_steinberg(&src, Levels::uniform(2)).unwrap();
        // 90 + 43.75 crosses the midpoint
        assert_eq!(out.at(2, 1).r, 255);
        assert_eq!(out.at(1, 1).r, 0);
    }

    #[test]
    fn test_single_level_needs_no_division() {
        let out = floyd_steinberg(&ramp(4, 4), Levels::new(1, 2, 2)).unwrap();
        assert!(out.pixels().iter().all(|&p| Color::from_argb(p).r == SINGLE_LEVEL_VALUE));
        let out = ordered_dither(&ramp(4, 4), Levels::new(1, 1, 1), 2).unwrap();
        assert!(out.pixels().iter().all(|&p| Color::from_argb(p).g == SINGLE_LEVEL_VALUE));
    }

    #[test]
    fn test_zero_levels_rejected() {
        assert!(matches!(
            floyd_steinberg(&ramp(2, 2), Levels::new(2, 0, 2)),
            Err(Error::InvalidLevels { .. })
        ));
    }

    #[test]
    fn test_bayer_small_matrices() {
        assert_eq!(BayerMatrix::new(1).unwrap().values(), &[0]);
        let mut two = BayerMatrix::new(2).unwrap().values().to_vec();
        two.sort_unstable();
        assert_eq!(two, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_bayer_layout() {
        let rows = |m: &BayerMatrix| -> Vec<Vec<u32>> {
            (0..m.size())
                .map(|y| (0..m.size()).map(|x| m.get(x, y)).collect())
                .collect()
        };
        let two = BayerMatrix::new(2).unwrap();
        assert_eq!(two.get(0, 0), 0);
        assert_eq!(two.get(1, 1), 1);
        assert_eq!(rows(&two), vec![vec![0, 3], vec![2, 1]]);
        let four = BayerMatrix::new(4).unwrap();
        assert_eq!(
            rows(&four),
            vec![
                vec![0, 12, 3, 15],
                vec![8, 4, 11, 7],
                vec![2, 14, 1, 13],
                vec![10, 6, 9, 5],
            ]
        );
    }

    #[test]
    fn test_bayer_holds_each_value_once() {
        let m = BayerMatrix::new(8).unwrap();
        let mut v = m.values().to_vec();
        v.sort_unstable();
        assert_eq!(v, (0..64).collect::<Vec<_>>());
    }

    #[test]
    fn test_bayer_rejects_non_power_of_two() {
        assert!(matches!(BayerMatrix::new(6), Err(Error::InvalidMatrixSize(6))));
        assert!(matches!(BayerMatrix::new(0), Err(Error::InvalidMatrixSize(0))));
    }

    #[test]
    fn test_bayer_cache_returns_same_matrix() {
        let a = BayerMatrix::shared(4).unwrap();
        let b = BayerMatrix::shared(4).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_ordered_dither_outputs_levels_only() {
        let levels = Levels::new(2, 3, 5);
        let n = default_matrix_size(levels);
        assert_eq!(n, 16);
        let out = ordered_dither(&ramp(20, 10), levels, n).unwrap();
        for &p in out.pixels() {
            let c = Color::from_argb(p);
            assert!(c.r == 0 || c.r == 255);
            assert!([0, 128, 255].contains(&c.g), "g = {}", c.g);
            assert_eq!(c.a, 77);
        }
    }

    #[test]
    fn test_ordered_dither_mid_gray_is_half_lit() {
        let src = PixelBuffer::filled(8, 8, Color::rgb(128, 128, 128)).unwrap();
        let out = ordered_dither(&src, Levels::uniform(2), 4).unwrap();
        let lit = out.pixels().iter().filter(|&&p| Color::from_argb(p).r == 255).count();
        assert_eq!(lit, 32);
    }
}
