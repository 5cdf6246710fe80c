//! In-place drawing tools: lines, shapes, brush strokes and flood fill.
//!
//! Everything here mutates the caller's buffer and returns nothing but
//! validation errors. Tool state (color, thickness, shape geometry) is passed
//! explicitly with each call.

mod fill;
mod shapes;

pub use fill::fill;
pub use shapes::{
    draw_closed, draw_line, draw_polygon, draw_star, polygon_vertices, star_vertices, stroke,
};

use serde::{Deserialize, Serialize};

use crate::buffer::{Color, PixelBuffer, Point};
use crate::error::Result;

/// Immutable snapshot of the host's pen settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Brush {
    pub color: Color,
    /// Stroke width in pixels; 1 draws a plain Bresenham line
    pub thickness: u32,
}

impl Brush {
    pub fn new(color: Color, thickness: u32) -> Self {
        Self {
            color,
            thickness: thickness.max(1),
        }
    }

    /// Paints the default canvas background
    pub fn eraser(thickness: u32) -> Self {
        Self::new(Color::WHITE, thickness)
    }
}

impl Default for Brush {
    fn default() -> Self {
        Self::new(Color::BLACK, 1)
    }
}

/// Regular polygon / star geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shape {
    /// Corner count for polygons, point count for stars
    pub vertices: u32,
    pub radius: f64,
    pub rotation_deg: f64,
}

impl Default for Shape {
    fn default() -> Self {
        Self {
            vertices: 5,
            radius: 70.0,
            rotation_deg: 0.0,
        }
    }
}

/// A drawing operation that mutates a buffer in place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Line {
        from: Point,
        to: Point,
        #[serde(default)]
        brush: Brush,
    },
    Polygon {
        center: Point,
        #[serde(default)]
        shape: Shape,
        #[serde(default)]
        brush: Brush,
    },
    Star {
        center: Point,
        #[serde(default)]
        shape: Shape,
        #[serde(default)]
        brush: Brush,
    },
    Fill {
        seed: Point,
        color: Color,
    },
}

impl DrawOp {
    pub fn apply(&self, buffer: &mut PixelBuffer) -> Result<()> {
        match self {
            DrawOp::Line { from, to, brush } => stroke(buffer, brush, *from, *to),
            DrawOp::Polygon {
                center,
                shape,
                brush,
            } => draw_polygon(buffer, brush, *center, shape)?,
            DrawOp::Star {
                center,
                shape,
                brush,
            } => draw_star(buffer, brush, *center, shape)?,
            DrawOp::Fill { seed, color } => fill(buffer, *color, seed.x, seed.y),
        }
        Ok(())
    }

    pub fn name(&self) -> &'static str {
        match self {
            DrawOp::Line { .. } => "line",
            DrawOp::Polygon { .. } => "polygon",
            DrawOp::Star { .. } => "star",
            DrawOp::Fill { .. } => "fill",
        }
    }
}
