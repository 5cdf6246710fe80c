//! Kernel convolution and the filters built on it.
//!
//! Border policy: a pixel whose window would leave the canvas is copied from
//! the source unchanged, leaving a `radius`-wide untouched frame.

use log::debug;

use super::point::{binarize, grayscale, offset};
use crate::buffer::{clamp_channel, PixelBuffer};
use crate::error::{Error, Result};

/// Square convolution mask with an odd side, stored row-major as
/// `weights[dy * side + dx]`
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    side: usize,
    weights: Vec<f32>,
}

impl Kernel {
    pub fn new(side: usize, weights: Vec<f32>) -> Result<Self> {
        if side == 0 || side % 2 == 0 {
            return Err(Error::InvalidKernel(format!(
                "side must be odd and positive, got {}",
                side
            )));
        }
        if weights.len() != side * side {
            return Err(Error::InvalidKernel(format!(
                "{}x{} kernel needs {} weights, got {}",
                side,
                side,
                side * side,
                weights.len()
            )));
        }
        Ok(Self { side, weights })
    }

    /// Build from a fixed 3x3 table, rows top to bottom
    pub fn from_rows3(rows: [[f32; 3]; 3]) -> Self {
        Self {
            side: 3,
            weights: rows.iter().flatten().copied().collect(),
        }
    }

    /// Uniform averaging kernel
    pub fn box_blur(side: usize) -> Result<Self> {
        let w = 1.0 / (side * side).max(1) as f32;
        Self::new(side, vec![w; side * side])
    }

    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    #[inline]
    pub fn radius(&self) -> usize {
        (self.side - 1) / 2
    }

    #[inline]
    pub fn weight(&self, dx: usize, dy: usize) -> f32 {
        self.weights[dy * self.side + dx]
    }
}

const GAUSS_3: [[f32; 3]; 3] = [
    [0.0947416, 0.118318, 0.0947416],
    [0.118318, 0.147761, 0.118318],
    [0.0947416, 0.118318, 0.0947416],
];

/// Binomial 5x5, weights over 256
const GAUSS_5: [[f32; 5]; 5] = [
    [1.0, 4.0, 6.0, 4.0, 1.0],
    [4.0, 16.0, 24.0, 16.0, 4.0],
    [6.0, 24.0, 36.0, 24.0, 6.0],
    [4.0, 16.0, 24.0, 16.0, 4.0],
    [1.0, 4.0, 6.0, 4.0, 1.0],
];

const SHARPEN: [[f32; 3]; 3] = [[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]];

const EMBOSS: [[f32; 3]; 3] = [[0.0, -1.0, 0.0], [1.0, 0.0, -1.0], [0.0, 1.0, 0.0]];

const SOBEL: [[f32; 3]; 3] = [[1.0, 2.0, 1.0], [0.0, 0.0, 0.0], [-1.0, -2.0, -1.0]];

const ROBERTS: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, -1.0]];

pub const DEFAULT_EMBOSS_OFFSET: i32 = 128;
pub const DEFAULT_SOBEL_THRESHOLD: u8 = 70;
pub const DEFAULT_ROBERTS_THRESHOLD: u8 = 50;

/// Convolve R, G and B with `kernel`; alpha is copied.
pub fn apply_kernel(buffer: &PixelBuffer, kernel: &Kernel) -> PixelBuffer {
    let w = buffer.width() as usize;
    let h = buffer.height() as usize;
    let r = kernel.radius();

    PixelBuffer::par_from_fn(buffer.width(), buffer.height(), |x, y| {
        let src = buffer.at(x, y);
        if x < r || y < r || x + r >= w || y + r >= h {
            return src;
        }
        let (mut sr, mut sg, mut sb) = (0.0f32, 0.0f32, 0.0f32);
        for ky in 0..kernel.side() {
            for kx in 0..kernel.side() {
                let weight = kernel.weight(kx, ky);
                if weight == 0.0 {
                    continue;
                }
                let c = buffer.at(x + kx - r, y + ky - r);
                sr += c.r as f32 * weight;
                sg += c.g as f32 * weight;
                sb += c.b as f32 * weight;
            }
        }
        src.with_rgb(clamp_channel(sr), clamp_channel(sg), clamp_channel(sb))
    })
}

/// Gaussian-like blur for sizes 3 and 5, uniform box blur for any other
/// odd size
pub fn blur(buffer: &PixelBuffer, size: usize) -> Result<PixelBuffer> {
    let kernel = match size {
        3 => Kernel::from_rows3(GAUSS_3),
        5 => Kernel::new(5, GAUSS_5.iter().flatten().map(|w| w / 256.0).collect())?,
        _ => Kernel::box_blur(size)?,
    };
    debug!("blur: {}x{} kernel", kernel.side(), kernel.side());
    Ok(apply_kernel(buffer, &kernel))
}

pub fn sharpen(buffer: &PixelBuffer) -> PixelBuffer {
    apply_kernel(buffer, &Kernel::from_rows3(SHARPEN))
}

/// Directional relief on the grayscale image, lifted by `bias`
pub fn emboss(buffer: &PixelBuffer, bias: i32) -> PixelBuffer {
    let relief = apply_kernel(&grayscale(buffer), &Kernel::from_rows3(EMBOSS));
    offset(&relief, bias)
}

/// Horizontal-edge Sobel response, binarized at `threshold`
pub fn sobel(buffer: &PixelBuffer, threshold: u8) -> PixelBuffer {
    edges(buffer, &Kernel::from_rows3(SOBEL), threshold)
}

/// Diagonal Roberts cross response, binarized at `threshold`
pub fn roberts(buffer: &PixelBuffer, threshold: u8) -> PixelBuffer {
    edges(buffer, &Kernel::from_rows3(ROBERTS), threshold)
}

fn edges(buffer: &PixelBuffer, kernel: &Kernel, threshold: u8) -> PixelBuffer {
    binarize(&apply_kernel(&grayscale(buffer), kernel), threshold)
}
