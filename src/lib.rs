//! Pixel-level raster engine: drawing primitives, scanline flood fill,
//! convolution and edge filters, dithering, geometric transforms and
//! normal-map generation over a packed ARGB buffer.

pub mod buffer;
pub mod draw;
pub mod error;
pub mod filters;
pub mod recipe;
pub mod transform;

pub use buffer::{Color, PixelBuffer, Point};
pub use draw::{Brush, DrawOp, Shape};
pub use error::{Error, Result};
pub use filters::{Filter, Levels};
pub use recipe::{Recipe, Step};
