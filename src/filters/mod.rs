//! Whole-image filters. Every filter reads the source buffer and returns a
//! freshly allocated one; the source is never touched.

pub mod convolve;
pub mod dither;
pub mod median;
pub mod normal_map;
pub mod point;

pub use convolve::{apply_kernel, blur, emboss, roberts, sharpen, sobel, Kernel};
pub use dither::{
    default_matrix_size, floyd_steinberg, nearest_level, ordered_dither, BayerMatrix, Levels,
};
pub use median::{median, watercolor};
pub use normal_map::normal_map;
pub use point::{binarize, gamma, grayscale, inverse, offset};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::buffer::{Color, PixelBuffer};
use crate::error::Result;
use crate::transform;

fn default_gamma() -> f64 {
    0.5
}

fn default_blur_size() -> usize {
    5
}

fn default_emboss_offset() -> i32 {
    convolve::DEFAULT_EMBOSS_OFFSET
}

fn default_sobel_threshold() -> u8 {
    convolve::DEFAULT_SOBEL_THRESHOLD
}

fn default_roberts_threshold() -> u8 {
    convolve::DEFAULT_ROBERTS_THRESHOLD
}

fn default_watercolor_radius() -> usize {
    median::DEFAULT_WATERCOLOR_RADIUS
}

fn default_zoom_factor() -> u32 {
    2
}

fn default_zoom_extent() -> u32 {
    transform::DEFAULT_MAX_ZOOM_EXTENT
}

fn default_background() -> Color {
    transform::DEFAULT_BACKGROUND
}

fn default_strength() -> f32 {
    normal_map::DEFAULT_NORMAL_STRENGTH
}

/// A filter that produces a new buffer from a source buffer.
///
/// Parameters missing from serialized recipes fall back to the paint tool's
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Filter {
    Grayscale,
    Inverse,
    Gamma {
        #[serde(default = "default_gamma")]
        gamma: f64,
    },
    Blur {
        #[serde(default = "default_blur_size")]
        size: usize,
    },
    Sharpen,
    Emboss {
        #[serde(default = "default_emboss_offset")]
        offset: i32,
    },
    Sobel {
        #[serde(default = "default_sobel_threshold")]
        threshold: u8,
    },
    Roberts {
        #[serde(default = "default_roberts_threshold")]
        threshold: u8,
    },
    Median {
        #[serde(default = "default_watercolor_radius")]
        radius: usize,
    },
    Watercolor {
        #[serde(default = "default_watercolor_radius")]
        radius: usize,
    },
    FloydSteinberg {
        #[serde(default)]
        levels: Levels,
    },
    OrderedDither {
        #[serde(default)]
        levels: Levels,
        /// Bayer matrix side; derived from `levels` when absent
        #[serde(default)]
        matrix_size: Option<u32>,
    },
    Zoom {
        #[serde(default = "default_zoom_factor")]
        factor: u32,
        #[serde(default = "default_zoom_extent")]
        max_extent: u32,
    },
    Rotate {
        degrees: f64,
        #[serde(default = "default_background")]
        background: Color,
    },
    Twirl {
        degrees: f64,
    },
    NormalMap {
        #[serde(default = "default_strength")]
        strength: f32,
    },
}

impl Filter {
    pub fn apply(&self, buffer: &PixelBuffer) -> Result<PixelBuffer> {
        debug!("{}: {}x{}", self.name(), buffer.width(), buffer.height());
        match self {
            Filter::Grayscale => Ok(grayscale(buffer)),
            Filter::Inverse => Ok(inverse(buffer)),
            Filter::Gamma { gamma: g } => gamma(buffer, *g),
            Filter::Blur { size } => blur(buffer, *size),
            Filter::Sharpen => Ok(sharpen(buffer)),
            Filter::Emboss { offset } => Ok(emboss(buffer, *offset)),
            Filter::Sobel { threshold } => Ok(sobel(buffer, *threshold)),
            Filter::Roberts { threshold } => Ok(roberts(buffer, *threshold)),
            Filter::Median { radius } => Ok(median(buffer, *radius)),
            Filter::Watercolor { radius } => Ok(watercolor(buffer, *radius)),
            Filter::FloydSteinberg { levels } => floyd_steinberg(buffer, *levels),
            Filter::OrderedDither {
                levels,
                matrix_size,
            } => {
                let n = matrix_size.unwrap_or_else(|| default_matrix_size(*levels));
                ordered_dither(buffer, *levels, n)
            }
            Filter::Zoom { factor, max_extent } => transform::zoom(buffer, *factor, *max_extent),
            Filter::Rotate {
                degrees,
                background,
            } => transform::rotate(buffer, *degrees, *background),
            Filter::Twirl { degrees } => transform::twirl(buffer, degrees.to_radians()),
            Filter::NormalMap { strength } => normal_map(buffer, *strength),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Filter::Grayscale => "grayscale",
            Filter::Inverse => "inverse",
            Filter::Gamma { .. } => "gamma",
            Filter::Blur { .. } => "blur",
            Filter::Sharpen => "sharpen",
            Filter::Emboss { .. } => "emboss",
            Filter::Sobel { .. } => "sobel",
            Filter::Roberts { .. } => "roberts",
            Filter::Median { .. } => "median",
            Filter::Watercolor { .. } => "watercolor",
            Filter::FloydSteinberg { .. } => "floyd_steinberg",
            Filter::OrderedDither { .. } => "ordered_dither",
            Filter::Zoom { .. } => "zoom",
            Filter::Rotate { .. } => "rotate",
            Filter::Twirl { .. } => "twirl",
            Filter::NormalMap { .. } => "normal_map",
        }
    }
}
